// ==========================================
// Printer inventory - export workbook writer
// ==========================================
// Tool: rust_xlsxwriter
// Sheet layout matches the import layout so an export re-imports.
// Null cells and empty strings are left blank.
// ==========================================

use crate::config::{columns, FORMS_SHEET_NAME, PRINTERS_SHEET_NAME};
use crate::exporter::error::ExportResult;
use crate::exporter::queries::{FormListRow, PrinterListRow};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// "Druckerliste" columns in sheet order
pub const PRINTER_LIST_HEADERS: [&str; 12] = [
    columns::LOCATION,
    columns::BUREAU,
    columns::BUREAU_ID,
    columns::PRINTER_NAME,
    columns::SLOT_NAME,
    columns::DOCUMENT_FORMAT,
    columns::PAPER_FORMAT,
    columns::TWO_SIDED,
    columns::AUTOPRINT,
    columns::DEPARTMENT,
    columns::PRINTER_MODEL,
    columns::REMARK,
];

/// "Forms" columns in sheet order
pub const FORMS_HEADERS: [&str; 4] = [
    columns::FORM,
    columns::FORM_FORMAT_CODE,
    columns::PAPER_INSERT_FORMAT,
    columns::FORM_DESCRIPTION,
];

/// Write both sheets to `path`, replacing any existing file
pub fn write_export_workbook(
    path: &Path,
    printer_rows: &[PrinterListRow],
    form_rows: &[FormListRow],
) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet().set_name(PRINTERS_SHEET_NAME)?;
        write_headers(sheet, &PRINTER_LIST_HEADERS, &header_format)?;
        for (idx, row) in printer_rows.iter().enumerate() {
            let r = idx as u32 + 1;
            write_text(sheet, r, 0, row.location.as_deref())?;
            write_text(sheet, r, 1, row.bureau.as_deref())?;
            if let Some(id) = row.bureau_id {
                sheet.write_number(r, 2, id as f64)?;
            }
            write_text(sheet, r, 3, row.printer_name.as_deref())?;
            write_text(sheet, r, 4, row.slot_name.as_deref())?;
            write_text(sheet, r, 5, row.document_format.as_deref())?;
            write_text(sheet, r, 6, row.paper_format.as_deref())?;
            write_text(sheet, r, 7, Some(row.two_sided.as_str()))?;
            write_text(sheet, r, 8, Some(row.autoprint.as_str()))?;
            write_text(sheet, r, 9, row.department.as_deref())?;
            write_text(sheet, r, 10, row.printer_model.as_deref())?;
            write_text(sheet, r, 11, row.remark.as_deref())?;
        }
    }

    {
        let sheet = workbook.add_worksheet().set_name(FORMS_SHEET_NAME)?;
        write_headers(sheet, &FORMS_HEADERS, &header_format)?;
        for (idx, row) in form_rows.iter().enumerate() {
            let r = idx as u32 + 1;
            write_text(sheet, r, 0, Some(row.document_format.as_str()))?;
            write_text(sheet, r, 1, row.format_code.as_deref())?;
            write_text(sheet, r, 2, row.paper_insert_format.as_deref())?;
            write_text(sheet, r, 3, row.description.as_deref())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> ExportResult<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&str>) -> ExportResult<()> {
    if let Some(text) = value.filter(|t| !t.is_empty()) {
        sheet.write_string(row, col, text)?;
    }
    Ok(())
}
