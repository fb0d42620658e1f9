// ==========================================
// Printer inventory - import pipeline
// ==========================================
// parse -> map -> (one transaction:) rebuild schema -> load
//   -> validate locations -> back-fill printer locations -> count
// Any failure rolls the whole transaction back, schema rebuild included,
// so the previous database survives a failed import.
// ==========================================

use crate::db;
use crate::domain::{FormSheetRow, ImportSummary, PrinterSheetRow, TableCounts};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{ExcelParser, FileParser, RawWorkbook};
use crate::importer::loader;
use crate::importer::reconciler::backfill_printer_locations;
use crate::importer::validator::validate_single_printer_location;
use crate::schema::{count_rows, rebuild_schema};
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// Spreadsheet importer
pub struct InventoryImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl Default for InventoryImporter {
    fn default() -> Self {
        Self::new(Box::new(ExcelParser))
    }
}

impl InventoryImporter {
    pub fn new(file_parser: Box<dyn FileParser>) -> Self {
        Self {
            file_parser,
            field_mapper: FieldMapper,
        }
    }

    /// Replace the contents of `db_path` with the workbook at `file_path`
    pub fn run_import(&self, file_path: &Path, db_path: &str) -> ImportResult<ImportSummary> {
        let source = file_path.display().to_string();
        let workbook = self.file_parser.parse_workbook(file_path).map_err(|e| {
            error!(error = %e, file = %source, "workbook could not be read");
            e
        })?;
        self.import_workbook(workbook, &source, db_path)
    }

    /// Import already-parsed sheets
    pub fn import_workbook(
        &self,
        workbook: RawWorkbook,
        source: &str,
        db_path: &str,
    ) -> ImportResult<ImportSummary> {
        let import_id = Uuid::new_v4().to_string();
        let span = info_span!("import", import_id = %import_id);
        let _entered = span.enter();

        let started_at = Utc::now();
        let start = Instant::now();
        info!(source = %source, db_path = %db_path, "import started");

        let printer_rows = self.field_mapper.map_printer_sheet(&workbook.printers)?;
        let form_rows = self.field_mapper.map_form_sheet(&workbook.forms)?;
        debug!(printers = printer_rows.len(), forms = form_rows.len(), "sheets mapped");

        let result = db::with_connection(db_path, |tx| load_database(tx, &printer_rows, &form_rows));
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "import rolled back");
                return Err(e);
            }
        };

        let summary = ImportSummary {
            import_id: import_id.clone(),
            source_file: source.to_string(),
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: start.elapsed().as_millis(),
            printer_rows: printer_rows.len(),
            form_rows: form_rows.len(),
            skipped_slot_rows: outcome.skipped_slot_rows,
            folded_remarks: outcome.folded_remarks,
            located_printers: outcome.located_printers,
            counts: outcome.counts,
        };

        info!(
            printers = summary.counts.printers,
            slots = summary.counts.slots,
            bureaus = summary.counts.bureaus,
            assignments = summary.counts.slot_assignments,
            elapsed_ms = summary.elapsed_ms as u64,
            "import finished"
        );
        Ok(summary)
    }
}

/// Convenience wrapper around the default (Excel) importer
pub fn run_import(file_path: &Path, db_path: &str) -> ImportResult<ImportSummary> {
    InventoryImporter::default().run_import(file_path, db_path)
}

struct LoadOutcome {
    skipped_slot_rows: usize,
    folded_remarks: usize,
    located_printers: usize,
    counts: TableCounts,
}

fn load_database(
    conn: &Connection,
    printer_rows: &[PrinterSheetRow],
    form_rows: &[FormSheetRow],
) -> ImportResult<LoadOutcome> {
    rebuild_schema(conn)?;
    debug!("schema rebuilt");

    let (maps, slot_stats) = loader::load_all(conn, printer_rows, form_rows)?;

    validate_single_printer_location(conn)?;

    let located_printers = backfill_printer_locations(conn, printer_rows, &maps.locations)?;
    info!(located_printers, "printer locations back-filled");

    Ok(LoadOutcome {
        skipped_slot_rows: slot_stats.skipped_rows,
        folded_remarks: slot_stats.folded_remarks,
        located_printers,
        counts: table_counts(conn)?,
    })
}

/// Row counts of all inventory tables
pub fn table_counts(conn: &Connection) -> ImportResult<TableCounts> {
    Ok(TableCounts {
        locations: count_rows(conn, "lieugestion")?,
        departments: count_rows(conn, "fachabteilung")?,
        printer_models: count_rows(conn, "printermodels")?,
        paper_insert_formats: count_rows(conn, "druckeinlage")?,
        document_formats: count_rows(conn, "caridocs")?,
        printers: count_rows(conn, "printernames")?,
        slots: count_rows(conn, "printerslots")?,
        bureaus: count_rows(conn, "bureaus")?,
        slot_assignments: count_rows(conn, "slot_caridocs")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::RawSheet;

    struct FixedParser(RawWorkbook);

    impl FileParser for FixedParser {
        fn parse_workbook(&self, _file_path: &Path) -> ImportResult<RawWorkbook> {
            Ok(self.0.clone())
        }
    }

    const PRINTER_HEADERS: [&str; 12] = [
        "Standort", "Bureau", "Bureau-ID", "Druckername", "Schacht Name", "CARIdoc", "Format",
        "2-sided", "Autoprint", "Fachabteilung", "Drucker Modell", "Bemerkung",
    ];

    fn workbook(printer_rows: &[[Option<&str>; 12]]) -> RawWorkbook {
        let mut printers = RawSheet::new("Druckerliste", &PRINTER_HEADERS);
        for row in printer_rows {
            printers.push_row(row);
        }
        let mut forms = RawSheet::new(
            "Forms",
            &["Formular", "Format CARI-Doc", "Format Druckeinlage", "Beschreibung Formular"],
        );
        forms.push_row(&[Some("F1"), Some("DIN"), Some("A4"), None]);
        RawWorkbook { printers, forms }
    }

    fn full_row<'a>(location: &'a str, bureau: &'a str, id: &'a str, printer: &'a str) -> [Option<&'a str>; 12] {
        [
            Some(location), Some(bureau), Some(id), Some(printer), Some("S1"), Some("F1"),
            Some("A4"), Some("2-sided"), None, Some("Finance"), Some("HP100"), None,
        ]
    }

    #[test]
    fn test_import_workbook_counts() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("printers.db");
        let db_path = db_path.to_str().unwrap();

        let importer = InventoryImporter::new(Box::new(FixedParser(workbook(&[full_row(
            "Paris", "Acct", "10", "P1",
        )]))));
        let summary = importer.run_import(Path::new("in.xlsx"), db_path).unwrap();

        assert_eq!(summary.printer_rows, 1);
        assert_eq!(summary.located_printers, 1);
        assert_eq!(
            summary.counts,
            TableCounts {
                locations: 1,
                departments: 1,
                printer_models: 1,
                paper_insert_formats: 1,
                document_formats: 1,
                printers: 1,
                slots: 1,
                bureaus: 1,
                slot_assignments: 1,
            }
        );
    }

    #[test]
    fn test_failed_import_keeps_previous_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("printers.db");
        let db_path = db_path.to_str().unwrap();

        let good = InventoryImporter::new(Box::new(FixedParser(workbook(&[full_row(
            "Paris", "Acct", "10", "P1",
        )]))));
        good.run_import(Path::new("good.xlsx"), db_path).unwrap();

        let bad = InventoryImporter::new(Box::new(FixedParser(workbook(&[
            full_row("Paris", "Acct", "10", "P9"),
            full_row("Lyon", "Sales", "20", "P9"),
        ]))));
        let err = bad.run_import(Path::new("bad.xlsx"), db_path).unwrap_err();
        assert!(err.is_validation_error());

        let printers: Vec<String> = db::with_read_connection(db_path, |tx| {
            let mut stmt = tx.prepare("SELECT PrinterName FROM printernames")?;
            let names = stmt
                .query_map([], |r| r.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok::<_, rusqlite::Error>(names)
        })
        .unwrap();
        assert_eq!(printers, vec!["P1"]);
    }
}
