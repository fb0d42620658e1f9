// ==========================================
// Printer inventory - repository layer
// ==========================================
// Responsibility: row-level reads and edits after an import
// Rule: every call opens its own connection scope; no business logic
// Rule: all queries are parameterized
// ==========================================

pub mod assignment_repo;
pub mod bureau_repo;
pub mod error;
pub mod lookup_repo;
pub mod printer_repo;
pub mod slot_repo;

pub use assignment_repo::{AssignmentFilter, AssignmentRepository};
pub use bureau_repo::BureauRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use lookup_repo::LookupRepository;
pub use printer_repo::{PrinterRepository, PrinterUpdate};
pub use slot_repo::SlotRepository;
