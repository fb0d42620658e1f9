// ==========================================
// Printer inventory - spreadsheet layout
// ==========================================
// Column headers of the two sheets. The canonical header is what the
// exporter writes; aliases are accepted on import.
// ==========================================

/// Sheet name written for the printer list (import reads the first sheet)
pub const PRINTERS_SHEET_NAME: &str = "Druckerliste";

/// Sheet name written for the forms (import reads the second sheet)
pub const FORMS_SHEET_NAME: &str = "Forms";

/// Canonical column headers
pub mod columns {
    // printers sheet
    pub const LOCATION: &str = "Standort";
    pub const BUREAU: &str = "Bureau";
    pub const BUREAU_ID: &str = "Bureau-ID";
    pub const PRINTER_NAME: &str = "Druckername";
    pub const SLOT_NAME: &str = "Schacht Name";
    pub const DOCUMENT_FORMAT: &str = "CARIdoc";
    pub const PAPER_FORMAT: &str = "Format";
    pub const TWO_SIDED: &str = "2-sided";
    pub const AUTOPRINT: &str = "Autoprint";
    pub const DEPARTMENT: &str = "Fachabteilung";
    pub const PRINTER_MODEL: &str = "Drucker Modell";
    pub const REMARK: &str = "Bemerkung";

    // forms sheet
    pub const FORM: &str = "Formular";
    pub const FORM_FORMAT_CODE: &str = "Format CARI-Doc";
    pub const PAPER_INSERT_FORMAT: &str = "Format Druckeinlage";
    pub const FORM_DESCRIPTION: &str = "Beschreibung Formular";
}

/// One recognized column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    const fn required(header: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            header,
            aliases,
            required: true,
        }
    }

    const fn optional(header: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            header,
            aliases,
            required: false,
        }
    }

    /// Whether a sheet header (already trimmed) names this column
    pub fn matches(&self, header: &str) -> bool {
        self.header.eq_ignore_ascii_case(header)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(header))
    }
}

static PRINTER_COLUMNS: [ColumnSpec; 12] = [
    ColumnSpec::required(columns::LOCATION, &["Location"]),
    ColumnSpec::required(columns::BUREAU, &[]),
    ColumnSpec::required(columns::BUREAU_ID, &["Bureau ID", "BureauID"]),
    ColumnSpec::required(columns::PRINTER_NAME, &["Printer", "Printer Name", "PrinterName"]),
    ColumnSpec::optional(columns::SLOT_NAME, &["Slot", "Slot Name", "SlotName"]),
    ColumnSpec::optional(columns::DOCUMENT_FORMAT, &["Document Format"]),
    ColumnSpec::optional(columns::PAPER_FORMAT, &["Paper Format", "PaperFormat"]),
    ColumnSpec::optional(columns::TWO_SIDED, &["Two-Sided", "TwoSided"]),
    ColumnSpec::optional(columns::AUTOPRINT, &[]),
    ColumnSpec::required(columns::DEPARTMENT, &["Department"]),
    ColumnSpec::required(columns::PRINTER_MODEL, &["Printer Model", "PrinterModel"]),
    ColumnSpec::optional(columns::REMARK, &["Remark"]),
];

static FORM_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::optional(columns::FORM, &["Document Format"]),
    ColumnSpec::optional(columns::FORM_FORMAT_CODE, &["Format Code"]),
    ColumnSpec::required(columns::PAPER_INSERT_FORMAT, &["Paper Insert Format"]),
    ColumnSpec::optional(columns::FORM_DESCRIPTION, &["Description"]),
];

/// Column layout of one sheet
#[derive(Debug, Clone, Copy)]
pub struct SheetLayout {
    pub sheet_name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl SheetLayout {
    pub fn printers() -> Self {
        Self {
            sheet_name: PRINTERS_SHEET_NAME,
            columns: &PRINTER_COLUMNS,
        }
    }

    pub fn forms() -> Self {
        Self {
            sheet_name: FORMS_SHEET_NAME,
            columns: &FORM_COLUMNS,
        }
    }

    /// Find the column spec a sheet header belongs to
    pub fn column_for(&self, header: &str) -> Option<&ColumnSpec> {
        let header = header.trim();
        self.columns.iter().find(|c| c.matches(header))
    }
}
