// ==========================================
// Printer inventory - configuration layer
// ==========================================
// Responsibility: database / export paths, spreadsheet layout
// Sources: environment variables, built-in defaults
// ==========================================

pub mod app_config;
pub mod sheet_layout;

pub use app_config::{
    get_default_db_path, get_default_export_path, AppConfig, DB_PATH_ENV, DEFAULT_DB_FILE,
    DEFAULT_EXPORT_FILE, EXPORT_PATH_ENV,
};
pub use sheet_layout::{columns, ColumnSpec, SheetLayout, FORMS_SHEET_NAME, PRINTERS_SHEET_NAME};
