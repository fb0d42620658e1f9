// ==========================================
// Printer inventory - slot assignment repository
// ==========================================
// Table: slot_caridocs
// The listing starts from printers, so printers without slots and slots
// without assignments show up with empty assignment columns.
// ==========================================

use crate::db;
use crate::domain::{SlotAssignment, SlotAssignmentKey, SlotAssignmentView};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Row, ToSql};
use tracing::info;

const ASSIGNMENT_VIEW_SELECT: &str = r#"
SELECT
    pn.PrinterName,
    pn.PrinterModel,
    ps.SlotName,
    ps.PaperFormat,
    ps.TwoSided,
    ps.Autoprint,
    ps.Bemerkung,
    sc.CARIdoc,
    cd.BeschreibungFormular,
    b.Bureau,
    b.BureauID,
    f.Fachabteilung,
    l.Standort,
    sc.Bemerkung
FROM printernames pn
LEFT JOIN printerslots ps ON pn.PrinterName = ps.PrinterName
LEFT JOIN slot_caridocs sc
    ON ps.PrinterName = sc.PrinterName
    AND ps.SlotName = sc.SlotName
LEFT JOIN caridocs cd ON sc.CARIdoc = cd.CARIdoc
LEFT JOIN bureaus b ON sc.BureauID = b.BureauID
LEFT JOIN fachabteilung f ON b.FachabteilungID = f.FachabteilungID
LEFT JOIN lieugestion l ON b.StandortID = l.StandortID
"#;

/// Listing filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssignmentFilter {
    #[default]
    All,
    Printer(String),
    Slot { printer: String, slot: String },
    Bureau(i64),
}

pub struct AssignmentRepository {
    db_path: String,
}

impl AssignmentRepository {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn list_slot_assignments(
        &self,
        filter: &AssignmentFilter,
    ) -> RepositoryResult<Vec<SlotAssignmentView>> {
        let (clause, args): (&str, Vec<&dyn ToSql>) = match filter {
            AssignmentFilter::All => ("ORDER BY pn.PrinterName, ps.SlotName", vec![]),
            AssignmentFilter::Printer(printer) => {
                ("WHERE pn.PrinterName = ?1 ORDER BY ps.SlotName", vec![printer as &dyn ToSql])
            }
            AssignmentFilter::Slot { printer, slot } => (
                "WHERE pn.PrinterName = ?1 AND ps.SlotName = ?2 ORDER BY sc.CARIdoc",
                vec![printer as &dyn ToSql, slot],
            ),
            AssignmentFilter::Bureau(bureau_id) => (
                "WHERE b.BureauID = ?1 ORDER BY pn.PrinterName, ps.SlotName",
                vec![bureau_id as &dyn ToSql],
            ),
        };

        db::with_read_connection(&self.db_path, |tx| {
            let mut stmt = tx.prepare(&format!("{} {}", ASSIGNMENT_VIEW_SELECT, clause))?;
            let rows = stmt
                .query_map(args.as_slice(), map_view)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Assignments stored for one slot
    pub fn list_assignments_for_slot(
        &self,
        printer: &str,
        slot: &str,
    ) -> RepositoryResult<Vec<SlotAssignment>> {
        db::with_read_connection(&self.db_path, |tx| {
            let mut stmt = tx.prepare(
                r#"
                SELECT PrinterName, SlotName, CARIdoc, BureauID, Bemerkung
                FROM slot_caridocs
                WHERE PrinterName = ?1 AND SlotName = ?2
                ORDER BY CARIdoc, BureauID
                "#,
            )?;
            let rows = stmt
                .query_map(params![printer, slot], |row| {
                    Ok(SlotAssignment {
                        key: SlotAssignmentKey {
                            printer_name: row.get(0)?,
                            slot_name: row.get(1)?,
                            document_format: row.get(2)?,
                            bureau_id: row.get(3)?,
                        },
                        remark: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Delete the assignments shown in `rows`.
    ///
    /// Every row must carry the full key; if any does not, nothing is deleted.
    pub fn delete_assignments(&self, rows: &[SlotAssignmentView]) -> RepositoryResult<usize> {
        let mut keys = Vec::with_capacity(rows.len());
        for row in rows {
            match row.assignment_key() {
                Some(key) => keys.push(key),
                None => {
                    return Err(RepositoryError::ValidationError(format!(
                        "row for printer '{}' is missing {}; nothing was deleted",
                        row.printer_name,
                        missing_key_fields(row).join(", ")
                    )))
                }
            }
        }
        self.delete_assignment_keys(&keys)
    }

    pub fn delete_assignment_keys(&self, keys: &[SlotAssignmentKey]) -> RepositoryResult<usize> {
        db::with_connection(&self.db_path, |tx| {
            let mut stmt = tx.prepare(
                r#"
                DELETE FROM slot_caridocs
                WHERE PrinterName = ?1 AND SlotName = ?2 AND CARIdoc = ?3 AND BureauID = ?4
                "#,
            )?;
            let mut deleted = 0;
            for key in keys {
                deleted += stmt.execute(params![
                    key.printer_name,
                    key.slot_name,
                    key.document_format,
                    key.bureau_id
                ])?;
            }
            info!(deleted, "slot assignments deleted");
            Ok(deleted)
        })
    }
}

fn missing_key_fields(row: &SlotAssignmentView) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if row.slot_name.is_none() {
        missing.push("slot");
    }
    if row.document_format.is_none() {
        missing.push("CARIdoc");
    }
    if row.bureau_id.is_none() {
        missing.push("bureau ID");
    }
    missing
}

fn map_view(row: &Row<'_>) -> rusqlite::Result<SlotAssignmentView> {
    Ok(SlotAssignmentView {
        printer_name: row.get(0)?,
        printer_model: row.get(1)?,
        slot_name: row.get(2)?,
        paper_format: row.get(3)?,
        two_sided: row.get(4)?,
        autoprint: row.get(5)?,
        slot_remark: row.get(6)?,
        document_format: row.get(7)?,
        document_description: row.get(8)?,
        bureau: row.get(9)?,
        bureau_id: row.get(10)?,
        department: row.get(11)?,
        location: row.get(12)?,
        assignment_remark: row.get(13)?,
    })
}
