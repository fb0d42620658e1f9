// ==========================================
// Printer inventory - workbook parser
// ==========================================
// Stage 0: read the two sheets into header-keyed raw records
// Sheet #0 = printers, sheet #1 = forms (matched by position, not name)
// ==========================================

use crate::config::SheetLayout;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Sheet positions inside the workbook
pub const PRINTERS_SHEET_INDEX: usize = 0;
pub const FORMS_SHEET_INDEX: usize = 1;

// ==========================================
// Raw data structures
// ==========================================

/// One data row; empty cells are absent from `cells`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }
}

/// One sheet: trimmed headers plus its non-empty data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
            records: Vec::new(),
        }
    }

    /// Append a row given in header order; `None` / "" cells are left out
    pub fn push_row(&mut self, values: &[Option<&str>]) {
        let row_number = self.records.len() + 2;
        let mut cells = HashMap::new();
        for (header, value) in self.headers.iter().zip(values) {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                cells.insert(header.clone(), v.to_string());
            }
        }
        if !cells.is_empty() {
            self.records.push(RawRecord { row_number, cells });
        }
    }
}

/// Both input sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWorkbook {
    pub printers: RawSheet,
    pub forms: RawSheet,
}

// ==========================================
// FileParser trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// Read the printers and forms sheets of the workbook at `file_path`
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<RawWorkbook>;
}

// ==========================================
// Excel parser (calamine)
// ==========================================
pub struct ExcelParser;

const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

impl FileParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<RawWorkbook> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();
        debug!(sheets = ?sheet_names, "workbook opened");

        let printers = read_sheet_at(
            &mut workbook,
            &sheet_names,
            PRINTERS_SHEET_INDEX,
            &SheetLayout::printers(),
        )?;
        let forms = read_sheet_at(&mut workbook, &sheet_names, FORMS_SHEET_INDEX, &SheetLayout::forms())?;

        Ok(RawWorkbook { printers, forms })
    }
}

fn read_sheet_at(
    workbook: &mut Sheets<BufReader<File>>,
    sheet_names: &[String],
    index: usize,
    layout: &SheetLayout,
) -> ImportResult<RawSheet> {
    let missing = || ImportError::MissingSheet {
        index,
        expected: layout.sheet_name.to_string(),
    };

    let name = sheet_names.get(index).cloned().ok_or_else(missing)?;
    let range = workbook
        .worksheet_range_at(index)
        .ok_or_else(missing)??;

    Ok(range_to_sheet(name, &range))
}

/// Convert a calamine range (first row = header) into a raw sheet
pub fn range_to_sheet(name: String, range: &Range<Data>) -> RawSheet {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default().trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    // data rows start on sheet row 2 relative to the range start
    let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let mut records = Vec::new();
    for (offset, data_row) in rows.enumerate() {
        let mut cells = HashMap::new();
        for (col_idx, cell) in data_row.iter().enumerate() {
            let Some(header) = headers.get(col_idx).filter(|h| !h.is_empty()) else {
                continue;
            };
            if let Some(value) = cell_to_string(cell) {
                cells.insert(header.clone(), value);
            }
        }

        // fully empty rows carry nothing
        if cells.is_empty() {
            continue;
        }

        records.push(RawRecord {
            row_number: first_row + offset + 1,
            cells,
        });
    }

    RawSheet {
        name,
        headers,
        records,
    }
}

/// Cell -> text. Empty cells and error cells are null; integral numbers
/// lose their fractional part so `10.0` reads as `"10"`.
pub fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String(String::new())), None);
        assert_eq!(cell_to_string(&Data::String(" A4 ".into())), Some(" A4 ".into()));
        assert_eq!(cell_to_string(&Data::Float(10.0)), Some("10".into()));
        assert_eq!(cell_to_string(&Data::Float(2.5)), Some("2.5".into()));
        assert_eq!(cell_to_string(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_to_string(&Data::Bool(true)), Some("true".into()));
    }

    #[test]
    fn test_range_to_sheet_skips_empty_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Druckername".into()));
        range.set_value((0, 1), Data::String("Bureau-ID".into()));
        range.set_value((1, 0), Data::String("P1".into()));
        range.set_value((1, 1), Data::Float(10.0));
        // row 2 stays empty
        range.set_value((3, 0), Data::String("P2".into()));

        let sheet = range_to_sheet("Druckerliste".into(), &range);
        assert_eq!(sheet.headers, vec!["Druckername", "Bureau-ID"]);
        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.records[0].row_number, 2);
        assert_eq!(sheet.records[0].get("Bureau-ID"), Some("10"));
        assert_eq!(sheet.records[1].row_number, 4);
        assert_eq!(sheet.records[1].get("Bureau-ID"), None);
    }

    #[test]
    fn test_parser_rejects_missing_and_unsupported_files() {
        let parser = ExcelParser;
        assert!(matches!(
            parser.parse_workbook(Path::new("does_not_exist.xlsx")),
            Err(ImportError::FileNotFound(_))
        ));

        let temp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            parser.parse_workbook(temp.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_push_row_numbers_rows_from_two() {
        let mut sheet = RawSheet::new("Forms", &["Formular", "Format Druckeinlage"]);
        sheet.push_row(&[Some("F1"), Some("A4")]);
        sheet.push_row(&[None, Some("")]);
        sheet.push_row(&[Some("F2"), None]);

        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.records[1].row_number, 4);
        assert_eq!(sheet.records[1].get("Format Druckeinlage"), None);
    }
}
