// ==========================================
// Import pipeline integration tests
// ==========================================
// Workbook on disk -> run_import -> database, checked through the
// repositories.
// ==========================================


use printer_inventory::importer::{run_import, ImportError, LookupKind};
use printer_inventory::logging;
use printer_inventory::repository::{
    AssignmentFilter, AssignmentRepository, BureauRepository, LookupRepository, PrinterRepository,
    SlotRepository,
};
use test_helpers::{
    default_forms, single_printer_rows, write_single_sheet_workbook, write_workbook,
    write_workbook_with_headers, FormRow, PrinterRow, TestWorkspace, PRINTER_HEADERS,
};

#[test]
fn test_single_row_round_trip() {
    logging::init_test();
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    write_workbook(&xlsx, &single_printer_rows(), &[FormRow::new("F1", "A4")]);

    let summary = run_import(&xlsx, &ws.db_path).expect("import failed");
    assert_eq!(summary.printer_rows, 1);
    assert_eq!(summary.form_rows, 1);
    assert_eq!(summary.counts.locations, 1);
    assert_eq!(summary.counts.departments, 1);
    assert_eq!(summary.counts.printers, 1);
    assert_eq!(summary.counts.slots, 1);
    assert_eq!(summary.counts.bureaus, 1);
    assert_eq!(summary.counts.slot_assignments, 1);

    let rows = AssignmentRepository::new(&ws.db_path)
        .list_slot_assignments(&AssignmentFilter::All)
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.printer_name, "P1");
    assert_eq!(row.printer_model, "HP100");
    assert_eq!(row.slot_name.as_deref(), Some("S1"));
    assert_eq!(row.paper_format.as_deref(), Some("A4"));
    assert_eq!(row.two_sided, Some(true));
    assert_eq!(row.autoprint, Some(true));
    assert_eq!(row.document_format.as_deref(), Some("F1"));
    assert_eq!(row.bureau.as_deref(), Some("Acct"));
    assert_eq!(row.bureau_id, Some(10));
    assert_eq!(row.department.as_deref(), Some("Finance"));
    assert_eq!(row.location.as_deref(), Some("Paris"));

    // location back-filled from the sheet
    let printer = PrinterRepository::new(&ws.db_path)
        .find_printer("P1")
        .unwrap()
        .expect("printer P1 missing");
    let paris = LookupRepository::new(&ws.db_path).list_locations().unwrap();
    assert_eq!(printer.location_id, Some(paris[0].location_id));
}

#[test]
fn test_lookup_values_are_deduplicated_exactly() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut rows = vec![
        PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1"),
        PrinterRow::full("Paris", "Acct", 10, "P1", "S2", "F2"),
        PrinterRow::full("Paris", "HR", 11, "P1", "S1", "F1"),
    ];
    let mut variant = PrinterRow::full("Paris ", "Sales", 12, "P2", "S1", "F1");
    variant.model = Some("HP200");
    rows.push(variant);
    write_workbook(&xlsx, &rows, &default_forms());

    let summary = run_import(&xlsx, &ws.db_path).unwrap();
    assert_eq!(summary.counts.locations, 2);
    assert_eq!(summary.counts.departments, 1);
    assert_eq!(summary.counts.printer_models, 2);
    assert_eq!(summary.counts.paper_insert_formats, 2);

    let names: Vec<String> = LookupRepository::new(&ws.db_path)
        .list_locations()
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert!(names.contains(&"Paris".to_string()));
    assert!(names.contains(&"Paris ".to_string()));
}

#[test]
fn test_multi_location_printer_aborts_and_keeps_previous_database() {
    logging::init_test();
    let ws = TestWorkspace::new();
    let good = ws.path("good.xlsx");
    write_workbook(&good, &single_printer_rows(), &default_forms());
    run_import(&good, &ws.db_path).expect("first import failed");

    let bad = ws.path("bad.xlsx");
    write_workbook(
        &bad,
        &[
            PrinterRow::full("Paris", "Acct", 10, "P7", "S1", "F1"),
            PrinterRow::full("Lyon", "Sales", 20, "P7", "S1", "F1"),
        ],
        &default_forms(),
    );

    let err = run_import(&bad, &ws.db_path).unwrap_err();
    match &err {
        ImportError::MultiLocationPrinter { printers } => assert_eq!(printers, &vec!["P7".to_string()]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("P7"));

    // the first import is still there, untouched
    let printers = PrinterRepository::new(&ws.db_path).list_printers(None).unwrap();
    assert_eq!(printers.len(), 1);
    assert_eq!(printers[0].printer_name, "P1");
    let bureaus = BureauRepository::new(&ws.db_path).list_bureaus(None).unwrap();
    assert_eq!(bureaus.len(), 1);
}

#[test]
fn test_remark_without_assignment_is_folded_onto_slot() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut remark_row = PrinterRow::slot_only("Paris", "P1", "S1");
    remark_row.remark = Some("manual feed");
    write_workbook(&xlsx, &[remark_row], &default_forms());

    let summary = run_import(&xlsx, &ws.db_path).unwrap();
    assert_eq!(summary.folded_remarks, 1);
    assert_eq!(summary.counts.slot_assignments, 0);

    let slots = SlotRepository::new(&ws.db_path).list_slots(Some("P1")).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].remark.as_deref(), Some("manual feed"));
    assert!(!slots[0].two_sided);
}

#[test]
fn test_assignment_remark_stays_on_assignment() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut row = PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1");
    row.remark = Some("letterhead");
    write_workbook(&xlsx, &[row], &default_forms());
    run_import(&xlsx, &ws.db_path).unwrap();

    let assignments = AssignmentRepository::new(&ws.db_path)
        .list_assignments_for_slot("P1", "S1")
        .unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].remark.as_deref(), Some("letterhead"));

    let slots = SlotRepository::new(&ws.db_path).list_slots(Some("P1")).unwrap();
    assert_eq!(slots[0].remark, None);
}

#[test]
fn test_blank_department_is_a_missing_lookup() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut row = PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1");
    row.department = Some("   ");
    write_workbook(&xlsx, &[row], &default_forms());

    let err = run_import(&xlsx, &ws.db_path).unwrap_err();
    match err {
        ImportError::MissingLookup { kind, name, bureau_id } => {
            assert_eq!(kind, LookupKind::Department);
            assert_eq!(name, "   ");
            assert_eq!(bureau_id, 10);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_printer_with_two_models_fails() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut second = PrinterRow::full("Paris", "Acct", 10, "P1", "S2", "F1");
    second.model = Some("Canon");
    write_workbook(
        &xlsx,
        &[PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1"), second],
        &default_forms(),
    );

    let err = run_import(&xlsx, &ws.db_path).unwrap_err();
    assert!(
        matches!(err, ImportError::ConstraintViolation(ref msg) if msg.contains("UNIQUE")),
        "{:?}",
        err
    );
}

#[test]
fn test_rows_without_slot_are_skipped_but_still_feed_lookups() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut no_slot = PrinterRow::full("Lyon", "Sales", 20, "P2", "S1", "F1");
    no_slot.slot = None;
    write_workbook(
        &xlsx,
        &[PrinterRow::full("Paris", "Acct", 10, "P1", "S1", "F1"), no_slot],
        &default_forms(),
    );

    let summary = run_import(&xlsx, &ws.db_path).unwrap();
    assert_eq!(summary.skipped_slot_rows, 1);
    assert_eq!(summary.counts.printers, 2);
    assert_eq!(summary.counts.slots, 1);
    assert_eq!(summary.counts.bureaus, 2);
    assert_eq!(summary.counts.locations, 2);
}

#[test]
fn test_flag_columns() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let mut a = PrinterRow::slot_only("Paris", "P1", "S1");
    a.two_sided = Some(" TRUE ");
    a.autoprint = Some("x");
    let mut b = PrinterRow::slot_only("Paris", "P1", "S2");
    b.two_sided = Some("yes");
    b.autoprint = Some("2-sided");
    write_workbook(&xlsx, &[a, b], &default_forms());
    run_import(&xlsx, &ws.db_path).unwrap();

    let slots = SlotRepository::new(&ws.db_path).list_slots(Some("P1")).unwrap();
    assert!(slots[0].two_sided && slots[0].autoprint);
    assert!(!slots[1].two_sided && !slots[1].autoprint);
}

#[test]
fn test_missing_required_column_fails_before_touching_database() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    let headers: Vec<&str> = PRINTER_HEADERS[..10].to_vec();
    write_workbook_with_headers(&xlsx, &headers, &single_printer_rows(), &default_forms());

    let err = run_import(&xlsx, &ws.db_path).unwrap_err();
    match err {
        ImportError::MissingColumn { column, .. } => assert_eq!(column, "Drucker Modell"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!std::path::Path::new(&ws.db_path).exists());
}

#[test]
fn test_missing_forms_sheet() {
    let ws = TestWorkspace::new();
    let xlsx = ws.path("input.xlsx");
    write_single_sheet_workbook(&xlsx, &single_printer_rows());

    let err = run_import(&xlsx, &ws.db_path).unwrap_err();
    match &err {
        ImportError::MissingSheet { index, expected } => {
            assert_eq!(*index, 1);
            assert_eq!(expected, "Forms");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("'Forms'"));
}

#[test]
fn test_missing_file() {
    let ws = TestWorkspace::new();
    let err = run_import(&ws.path("nope.xlsx"), &ws.db_path).unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}
