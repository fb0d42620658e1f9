// ==========================================
// Printer inventory - export entry point
// ==========================================
// Reads the database through a read-only scope, writes the workbook and
// reports the outcome. Never returns an error: every failure becomes a
// failed outcome without statistics.
// ==========================================

use crate::db;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::queries::{
    query_assigned_rows, query_forms, query_unassigned_bureaus, query_unassigned_slots,
    sort_printer_rows, FormListRow, PrinterListRow,
};
use crate::exporter::xlsx_writer::{write_export_workbook, FORMS_HEADERS, PRINTER_LIST_HEADERS};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// Export statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub total_rows: usize,
    pub bureau_printer_connections: usize, // branch (a)
    pub printers_without_bureaus: usize,   // branch (b)
    pub bureaus_without_printers: usize,   // branch (c)
    pub total_document_formats: usize,
    pub printer_list_columns: Vec<String>,
    pub forms_columns: Vec<String>,
}

/// Result of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    pub stats: Option<ExportStats>,
}

impl ExportOutcome {
    fn failed(err: &ExportError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            stats: None,
        }
    }
}

struct ExportData {
    printer_rows: Vec<PrinterListRow>,
    form_rows: Vec<FormListRow>,
    assigned: usize,
    unassigned_slots: usize,
    unassigned_bureaus: usize,
}

/// Export the database at `db_path` to the workbook at `output_path`.
///
/// `progress` receives every step message; the same messages are logged.
pub fn export_printer_data(
    db_path: &Path,
    output_path: &Path,
    progress: Option<&dyn Fn(&str)>,
) -> ExportOutcome {
    let report = |message: &str| {
        info!("{}", message);
        if let Some(callback) = progress {
            callback(message);
        }
    };

    match run_export(db_path, output_path, &report, progress) {
        Ok(stats) => {
            let message = format!(
                "Export completed successfully!\nCreated: {}",
                output_path.display()
            );
            report(&message);
            ExportOutcome {
                success: true,
                message,
                stats: Some(stats),
            }
        }
        Err(e) => {
            error!(error = %e, db_path = %db_path.display(), "export failed");
            if let Some(callback) = progress {
                callback(&e.to_string());
            }
            ExportOutcome::failed(&e)
        }
    }
}

fn run_export(
    db_path: &Path,
    output_path: &Path,
    report: &dyn Fn(&str),
    progress: Option<&dyn Fn(&str)>,
) -> ExportResult<ExportStats> {
    if !db_path.exists() {
        return Err(ExportError::DatabaseNotFound(db_path.display().to_string()));
    }
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| ExportError::InvalidPath(db_path.display().to_string()))?;

    report(&format!("Connecting to database: {}", db_path.display()));

    // Steps inside the scope are logged at once but handed to `progress`
    // only after the scope lock is released; the callback may open its own
    // scope (a view refreshing through a repository, say).
    let mut deferred: Vec<String> = Vec::new();
    let data = db::with_read_connection(db_path_str, |tx| -> ExportResult<ExportData> {
        let mut step = |message: &str| {
            info!("{}", message);
            deferred.push(message.to_string());
        };

        step("Executing query 1: Bureau-printer combinations...");
        let mut printer_rows = query_assigned_rows(tx)?;
        let assigned = printer_rows.len();

        step("Executing query 2: Printers without bureaus...");
        let slots = query_unassigned_slots(tx)?;
        let unassigned_slots = slots.len();

        step("Executing query 3: Bureaus without printers...");
        let bureaus = query_unassigned_bureaus(tx)?;
        let unassigned_bureaus = bureaus.len();

        step("Combining results...");
        printer_rows.extend(slots);
        printer_rows.extend(bureaus);

        step("Sorting data...");
        sort_printer_rows(&mut printer_rows);

        step("Exporting forms data...");
        let form_rows = query_forms(tx)?;

        Ok(ExportData {
            printer_rows,
            form_rows,
            assigned,
            unassigned_slots,
            unassigned_bureaus,
        })
    });
    if let Some(callback) = progress {
        for message in &deferred {
            callback(message);
        }
    }
    let data = data?;
    report("Database connection closed");

    report(&format!("Writing to Excel file: {}", output_path.display()));
    write_export_workbook(output_path, &data.printer_rows, &data.form_rows)?;

    Ok(ExportStats {
        total_rows: data.printer_rows.len(),
        bureau_printer_connections: data.assigned,
        printers_without_bureaus: data.unassigned_slots,
        bureaus_without_printers: data.unassigned_bureaus,
        total_document_formats: data.form_rows.len(),
        printer_list_columns: PRINTER_LIST_HEADERS.iter().map(|h| h.to_string()).collect(),
        forms_columns: FORMS_HEADERS.iter().map(|h| h.to_string()).collect(),
    })
}

/// Plain-text statistics block for the CLI
pub fn render_statistics(stats: &ExportStats) -> String {
    format!(
        "Sheet 1 - Druckerliste:\n  Total rows: {}\n  - Rows with bureau-printer connections: {}\n  - Rows with printers without bureaus: {}\n  - Rows with bureaus without printers: {}\n\nSheet 2 - Forms:\n  Total CARIdocs: {}\n\nColumn structure (Sheet 1):\n  {}\n\nColumn structure (Sheet 2):\n  {}\n",
        stats.total_rows,
        stats.bureau_printer_connections,
        stats.printers_without_bureaus,
        stats.bureaus_without_printers,
        stats.total_document_formats,
        stats.printer_list_columns.join(", "),
        stats.forms_columns.join(", "),
    )
}
