// ==========================================
// Printer inventory - export layer
// ==========================================
// Responsibility: normalized tables -> denormalized workbook
// ==========================================

pub mod error;
pub mod printer_exporter;
pub mod queries;
pub mod xlsx_writer;

pub use error::{ExportError, ExportResult};
pub use printer_exporter::{export_printer_data, render_statistics, ExportOutcome, ExportStats};
pub use queries::{FormListRow, PrinterListRow};
pub use xlsx_writer::{write_export_workbook, FORMS_HEADERS, PRINTER_LIST_HEADERS};
