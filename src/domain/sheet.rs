// ==========================================
// Printer inventory - typed spreadsheet rows
// ==========================================
// Produced by the field mapper, consumed by normalizer / loader /
// reconciler. `None` means the cell was empty; text is kept verbatim.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PrinterSheetRow - one printer/slot/bureau/document combination
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterSheetRow {
    pub row_number: usize,                 // 1-based sheet row (header = 1)

    pub location: Option<String>,          // Standort
    pub bureau: Option<String>,            // Bureau
    pub bureau_id: Option<i64>,            // Bureau-ID
    pub printer_name: Option<String>,      // Druckername
    pub slot_name: Option<String>,         // Schacht Name
    pub document_format: Option<String>,   // CARIdoc
    pub paper_format: Option<String>,      // Format
    pub two_sided: Option<String>,         // 2-sided (raw indicator)
    pub autoprint: Option<String>,         // Autoprint (raw indicator)
    pub department: Option<String>,        // Fachabteilung
    pub printer_model: Option<String>,     // Drucker Modell
    pub remark: Option<String>,            // Bemerkung
}

// ==========================================
// FormSheetRow - one document format (CARIdoc)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSheetRow {
    pub row_number: usize,

    pub document_format: Option<String>,     // Formular
    pub format_code: Option<String>,         // Format CARI-Doc
    pub paper_insert_format: Option<String>, // Format Druckeinlage
    pub description: Option<String>,         // Beschreibung Formular
}
