// ==========================================
// Printer inventory - import summary
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Row counts of the rebuilt tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub locations: i64,
    pub departments: i64,
    pub printer_models: i64,
    pub paper_insert_formats: i64,
    pub document_formats: i64,
    pub printers: i64,
    pub slots: i64,
    pub bureaus: i64,
    pub slot_assignments: i64,
}

/// Outcome of a successful import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub import_id: String,
    pub source_file: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u128,

    pub printer_rows: usize,       // data rows read from the printers sheet
    pub form_rows: usize,          // data rows read from the forms sheet
    pub skipped_slot_rows: usize,  // rows without printer or slot name
    pub folded_remarks: usize,     // remarks written onto the slot itself
    pub located_printers: usize,   // printers whose location was backfilled

    pub counts: TableCounts,
}
