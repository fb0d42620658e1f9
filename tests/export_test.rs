// ==========================================
// Export integration tests
// ==========================================


use printer_inventory::exporter::{export_printer_data, FORMS_HEADERS, PRINTER_LIST_HEADERS};
use printer_inventory::importer::{run_import, ExcelParser, FileParser};
use printer_inventory::logging;
use printer_inventory::repository::PrinterRepository;
use std::cell::RefCell;
use std::path::Path;
use test_helpers::{default_forms, single_printer_rows, write_workbook, PrinterRow, TestWorkspace};

/// P1/S1 serves Acct (10), P1/S2 serves nobody, HR (20) has no printer
fn three_branch_rows() -> Vec<PrinterRow> {
    vec![
        PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1"),
        PrinterRow::slot_only("Paris", "P1", "S2"),
        PrinterRow::bureau_only("Paris", "HR", 20),
    ]
}

fn import_fixture(ws: &TestWorkspace, rows: &[PrinterRow]) {
    let xlsx = ws.path("input.xlsx");
    write_workbook(&xlsx, rows, &default_forms());
    run_import(&xlsx, &ws.db_path).expect("import failed");
}

#[test]
fn test_export_statistics_per_branch() {
    logging::init_test();
    let ws = TestWorkspace::new();
    import_fixture(&ws, &three_branch_rows());

    let output = ws.path("export.xlsx");
    let outcome = export_printer_data(Path::new(&ws.db_path), &output, None);

    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.contains("export.xlsx"));
    let stats = outcome.stats.expect("stats missing");
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.bureau_printer_connections, 1);
    assert_eq!(stats.printers_without_bureaus, 1);
    assert_eq!(stats.bureaus_without_printers, 1);
    assert_eq!(stats.total_document_formats, 2);
    assert_eq!(stats.printer_list_columns, PRINTER_LIST_HEADERS.to_vec());
    assert_eq!(stats.forms_columns, FORMS_HEADERS.to_vec());
    assert!(output.exists());
}

#[test]
fn test_exported_rows_are_sorted_with_nulls_last() {
    let ws = TestWorkspace::new();
    import_fixture(&ws, &three_branch_rows());
    let output = ws.path("export.xlsx");
    assert!(export_printer_data(Path::new(&ws.db_path), &output, None).success);

    let workbook = ExcelParser.parse_workbook(&output).unwrap();
    let records = &workbook.printers.records;
    assert_eq!(records.len(), 3);

    // Acct, HR, then the unassigned slot (no bureau)
    assert_eq!(records[0].get("Bureau"), Some("Acct"));
    assert_eq!(records[0].get("CARIdoc"), Some("F1"));
    assert_eq!(records[0].get("2-sided"), Some("2-sided"));
    assert_eq!(records[0].get("Autoprint"), Some("TRUE"));

    assert_eq!(records[1].get("Bureau"), Some("HR"));
    assert_eq!(records[1].get("Druckername"), None);
    assert_eq!(records[1].get("Autoprint"), Some("FALSE"));

    assert_eq!(records[2].get("Bureau"), None);
    assert_eq!(records[2].get("Druckername"), Some("P1"));
    assert_eq!(records[2].get("Schacht Name"), Some("S2"));
    assert_eq!(records[2].get("Standort"), Some("Paris"));

    let forms: Vec<_> = workbook
        .forms
        .records
        .iter()
        .map(|r| r.get("Formular").unwrap_or_default().to_string())
        .collect();
    assert_eq!(forms, vec!["F1", "F2"]);
}

#[test]
fn test_export_reimports_to_the_same_counts() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    write_workbook(&xlsx, &three_branch_rows(), &default_forms());
    let first = run_import(&xlsx, &ws.db_path).unwrap();

    let output = ws.path("export.xlsx");
    assert!(export_printer_data(Path::new(&ws.db_path), &output, None).success);

    let second_db = ws.path("second.db");
    let second = run_import(&output, second_db.to_str().unwrap()).unwrap();
    assert_eq!(first.counts, second.counts);
}

#[test]
fn test_missing_database_fails_with_empty_stats() {
    let ws = TestWorkspace::new();
    let output = ws.path("export.xlsx");

    let outcome = export_printer_data(Path::new(&ws.db_path), &output, None);
    assert!(!outcome.success);
    assert!(outcome.message.contains("Database file not found"));
    assert!(outcome.stats.is_none());
    assert!(!output.exists());
}

#[test]
fn test_progress_callback_receives_every_step() {
    let ws = TestWorkspace::new();
    import_fixture(&ws, &three_branch_rows());

    let messages = RefCell::new(Vec::<String>::new());
    let callback = |m: &str| messages.borrow_mut().push(m.to_string());
    let outcome = export_printer_data(Path::new(&ws.db_path), &ws.path("export.xlsx"), Some(&callback));
    assert!(outcome.success);

    let messages = messages.into_inner();
    assert!(messages.first().unwrap().starts_with("Connecting to database"));
    assert!(messages.iter().any(|m| m.starts_with("Executing query 3")));
    assert!(messages.last().unwrap().starts_with("Export completed successfully"));
}

#[test]
fn test_single_row_exports_one_full_row() {
    let ws = TestWorkspace::new();
    import_fixture(&ws, &single_printer_rows());
    let output = ws.path("export.xlsx");
    let outcome = export_printer_data(Path::new(&ws.db_path), &output, None);
    assert!(outcome.success, "{}", outcome.message);

    let workbook = ExcelParser.parse_workbook(&output).unwrap();
    let records = &workbook.printers.records;
    assert_eq!(records.len(), 1);
    let row = &records[0];
    assert_eq!(row.get("Standort"), Some("Paris"));
    assert_eq!(row.get("Bureau"), Some("Acct"));
    assert_eq!(row.get("Bureau-ID"), Some("10"));
    assert_eq!(row.get("Druckername"), Some("P1"));
    assert_eq!(row.get("Drucker Modell"), Some("HP100"));
    assert_eq!(row.get("Schacht Name"), Some("S1"));
    assert_eq!(row.get("Format"), Some("A4"));
    assert_eq!(row.get("CARIdoc"), Some("F1"));
    assert_eq!(row.get("Fachabteilung"), Some("Finance"));
}

#[test]
fn test_progress_callback_may_read_the_database() {
    let ws = TestWorkspace::new();
    import_fixture(&ws, &three_branch_rows());
    let repo = PrinterRepository::new(&ws.db_path);

    let seen = RefCell::new(Vec::new());
    let callback = |m: &str| {
        if m.starts_with("Sorting data") {
            seen.borrow_mut().push(repo.list_printers(None).map(|p| p.len()));
        }
    };
    let outcome = export_printer_data(Path::new(&ws.db_path), &ws.path("export.xlsx"), Some(&callback));
    assert!(outcome.success, "{}", outcome.message);

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].as_ref().ok(), Some(&1));

    // later scopes in the same process still open
    assert_eq!(repo.list_printers(None).unwrap().len(), 1);
}
