// ==========================================
// Printer inventory - domain model
// ==========================================
// Responsibility: entities, typed spreadsheet rows, import summaries
// No data access, no import logic
// ==========================================

pub mod import;
pub mod inventory;
pub mod sheet;

pub use import::{ImportSummary, TableCounts};
pub use inventory::{
    Bureau, BureauOverview, Department, DocumentFormat, Location, PaperInsertFormat, Printer,
    PrinterModel, PrinterOverview, Slot, SlotAssignment, SlotAssignmentKey, SlotAssignmentView,
};
pub use sheet::{FormSheetRow, PrinterSheetRow};
