// ==========================================
// Printer inventory - core library
// ==========================================
// Spreadsheet import into a normalized SQLite inventory of printers,
// slots, document formats (CARIdocs) and bureaus, plus the reverse export.
// Stack: calamine / rust_xlsxwriter + rusqlite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities and typed rows
pub mod domain;

// Configuration - paths and sheet layout
pub mod config;

// Database infrastructure (connection scope, PRAGMAs)
pub mod db;

// Schema - DDL and constraint report
pub mod schema;

// Import layer - spreadsheet -> tables
pub mod importer;

// Export layer - tables -> spreadsheet
pub mod exporter;

// Repository layer - row-level CRUD
pub mod repository;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use config::AppConfig;
pub use domain::{ImportSummary, TableCounts};
pub use exporter::{export_printer_data, ExportOutcome, ExportStats};
pub use importer::{run_import, ImportError, InventoryImporter};
pub use repository::{RepositoryError, RepositoryResult};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Printer Inventory";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
