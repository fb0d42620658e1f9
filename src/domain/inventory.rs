// ==========================================
// Printer inventory - entities
// ==========================================
// One struct per table, plus the joined read models the views use.
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterModel {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperInsertFormat {
    pub name: String,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
}

// ==========================================
// DocumentFormat - CARIdoc (joined with its paper insert dimensions)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFormat {
    pub name: String,                        // CARIdoc
    pub description: Option<String>,         // BeschreibungFormular
    pub format_code: Option<String>,         // FormatCARIDoc
    pub paper_insert_format: Option<String>, // FormatDruckeinlage
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub name: String,
    pub model: String,
    pub location_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub printer_name: String,
    pub slot_name: String,
    pub paper_format: Option<String>,
    pub two_sided: bool,
    pub autoprint: bool,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bureau {
    pub bureau_id: i64,
    pub name: Option<String>,
    pub department_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Composite key of `slot_caridocs`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAssignmentKey {
    pub printer_name: String,
    pub slot_name: String,
    pub document_format: String,
    pub bureau_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub key: SlotAssignmentKey,
    pub remark: Option<String>,
}

// ==========================================
// Read models
// ==========================================

/// Printer list row with its usage counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterOverview {
    pub printer_name: String,
    pub slot_count: i64,           // slots of this printer
    pub document_count: i64,       // distinct (slot, CARIdoc) pairs
    pub bureau_count: i64,         // distinct bureaus served
    pub model: String,
    pub location: Option<String>,
}

/// Bureau list row with its usage counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BureauOverview {
    pub bureau_id: i64,
    pub name: Option<String>,
    pub printer_count: i64,        // distinct printers
    pub document_count: i64,       // distinct (slot, CARIdoc) pairs
    pub department: Option<String>,
    pub location: Option<String>,
}

/// One slot joined with (at most) one of its assignments
///
/// Printers without slots and slots without assignments appear with the
/// missing side set to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAssignmentView {
    pub printer_name: String,
    pub printer_model: String,
    pub slot_name: Option<String>,
    pub paper_format: Option<String>,
    pub two_sided: Option<bool>,
    pub autoprint: Option<bool>,
    pub slot_remark: Option<String>,
    pub document_format: Option<String>,
    pub document_description: Option<String>,
    pub bureau: Option<String>,
    pub bureau_id: Option<i64>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub assignment_remark: Option<String>,
}

impl SlotAssignmentView {
    /// Full key of the assignment, if this row carries one
    pub fn assignment_key(&self) -> Option<SlotAssignmentKey> {
        Some(SlotAssignmentKey {
            printer_name: self.printer_name.clone(),
            slot_name: self.slot_name.clone()?,
            document_format: self.document_format.clone()?,
            bureau_id: self.bureau_id?,
        })
    }
}
