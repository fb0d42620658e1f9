// ==========================================
// Printer inventory - field mapper
// ==========================================
// Stage 1: raw header-keyed records -> typed sheet rows
// - resolve header aliases to canonical columns
// - fail on missing required columns
// - bureau ID must be an integer
// ==========================================

use crate::config::{columns, SheetLayout};
use crate::domain::{FormSheetRow, PrinterSheetRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, RawSheet};
use std::collections::HashMap;

/// Indicator values (lower-cased, trimmed) that mean "two-sided"
pub const TWO_SIDED_TRUE_VALUES: [&str; 3] = ["2-sided", "true", "1"];

/// Indicator values (lower-cased, trimmed) that mean "autoprint"
pub const AUTOPRINT_TRUE_VALUES: [&str; 4] = ["true", "1", "yes", "x"];

/// Two-sided flag; blank and unknown values are false
pub fn parse_two_sided(raw: Option<&str>) -> bool {
    parse_indicator(raw, &TWO_SIDED_TRUE_VALUES)
}

/// Autoprint flag; blank and unknown values are false
pub fn parse_autoprint(raw: Option<&str>) -> bool {
    parse_indicator(raw, &AUTOPRINT_TRUE_VALUES)
}

fn parse_indicator(raw: Option<&str>, truthy: &[&str]) -> bool {
    match raw {
        Some(value) => {
            let normalized = value.trim().to_lowercase();
            truthy.contains(&normalized.as_str())
        }
        None => false,
    }
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    /// Map every record of the printers sheet
    pub fn map_printer_sheet(&self, sheet: &RawSheet) -> ImportResult<Vec<PrinterSheetRow>> {
        let header_map = resolve_headers(sheet, &SheetLayout::printers())?;
        sheet
            .records
            .iter()
            .map(|record| self.map_printer_row(record, &header_map))
            .collect()
    }

    /// Map every record of the forms sheet
    pub fn map_form_sheet(&self, sheet: &RawSheet) -> ImportResult<Vec<FormSheetRow>> {
        let header_map = resolve_headers(sheet, &SheetLayout::forms())?;
        Ok(sheet
            .records
            .iter()
            .map(|record| {
                let get = |column: &str| get_string(record, &header_map, column);
                FormSheetRow {
                    row_number: record.row_number,
                    document_format: get(columns::FORM),
                    format_code: get(columns::FORM_FORMAT_CODE),
                    paper_insert_format: get(columns::PAPER_INSERT_FORMAT),
                    description: get(columns::FORM_DESCRIPTION),
                }
            })
            .collect())
    }

    fn map_printer_row(
        &self,
        record: &RawRecord,
        header_map: &HashMap<&'static str, String>,
    ) -> ImportResult<PrinterSheetRow> {
        let get = |column: &str| get_string(record, header_map, column);

        Ok(PrinterSheetRow {
            row_number: record.row_number,
            location: get(columns::LOCATION),
            bureau: get(columns::BUREAU),
            bureau_id: parse_i64(get(columns::BUREAU_ID), columns::BUREAU_ID, record.row_number)?,
            printer_name: get(columns::PRINTER_NAME),
            slot_name: get(columns::SLOT_NAME),
            document_format: get(columns::DOCUMENT_FORMAT),
            paper_format: get(columns::PAPER_FORMAT),
            two_sided: get(columns::TWO_SIDED),
            autoprint: get(columns::AUTOPRINT),
            department: get(columns::DEPARTMENT),
            printer_model: get(columns::PRINTER_MODEL),
            remark: get(columns::REMARK),
        })
    }
}

/// Canonical header -> header actually used in the sheet.
///
/// The first sheet header matching a column wins.
fn resolve_headers(
    sheet: &RawSheet,
    layout: &SheetLayout,
) -> ImportResult<HashMap<&'static str, String>> {
    let mut header_map: HashMap<&'static str, String> = HashMap::new();
    for header in &sheet.headers {
        if let Some(spec) = layout.column_for(header) {
            header_map
                .entry(spec.header)
                .or_insert_with(|| header.clone());
        }
    }

    if let Some(missing) = layout
        .columns
        .iter()
        .find(|spec| spec.required && !header_map.contains_key(spec.header))
    {
        return Err(ImportError::MissingColumn {
            sheet: sheet.name.clone(),
            column: missing.header.to_string(),
        });
    }

    Ok(header_map)
}

fn get_string(
    record: &RawRecord,
    header_map: &HashMap<&'static str, String>,
    column: &str,
) -> Option<String> {
    header_map
        .get(column)
        .and_then(|header| record.get(header))
        .map(str::to_string)
}

/// Lower bound of i64 as f64 (exact); the upper bound 2^63 is exclusive
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_LIMIT_F64: f64 = 9_223_372_036_854_775_808.0;

/// Parse an integer cell. "10" and "10.0" are accepted, "10.5", text and
/// values outside the i64 range are not.
fn parse_i64(value: Option<String>, field: &str, row_number: usize) -> ImportResult<Option<i64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(Some(v));
    }

    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite()
            && f.fract() == 0.0
            && (I64_MIN_F64..I64_LIMIT_F64).contains(&f) =>
        {
            Ok(Some(f as i64))
        }
        _ => Err(ImportError::TypeConversion {
            row: row_number,
            field: field.to_string(),
            message: format!("not an integer: {}", value),
        }),
    }
}
