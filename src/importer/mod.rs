// ==========================================
// Printer inventory - import layer
// ==========================================
// Responsibility: spreadsheet -> normalized SQLite tables
// Pipeline: file_parser -> field_mapper -> normalizer/loader
//           -> validator -> reconciler
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod inventory_importer;
pub mod loader;
pub mod normalizer;
pub mod reconciler;
pub mod validator;

pub use error::{ImportError, ImportResult, LookupKind};
pub use field_mapper::FieldMapper;
pub use file_parser::{ExcelParser, FileParser, RawRecord, RawSheet, RawWorkbook};
pub use inventory_importer::{run_import, table_counts, InventoryImporter};
pub use loader::{LookupMaps, SlotLoadStats};
pub use normalizer::{assign_surrogate_ids, distinct_complete, extract_lookup, SurrogateIds};
pub use reconciler::backfill_printer_locations;
pub use validator::{find_multi_location_printers, validate_single_printer_location};
