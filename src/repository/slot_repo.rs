// ==========================================
// Printer inventory - slot repository
// ==========================================

use crate::db;
use crate::domain::Slot;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Row};
use tracing::info;

const SLOT_SELECT: &str =
    "SELECT PrinterName, SlotName, PaperFormat, TwoSided, Autoprint, Bemerkung FROM printerslots";

pub struct SlotRepository {
    db_path: String,
}

impl SlotRepository {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// All slots, or only those of `printer`
    pub fn list_slots(&self, printer: Option<&str>) -> RepositoryResult<Vec<Slot>> {
        db::with_read_connection(&self.db_path, |tx| {
            let slots = match printer {
                Some(name) => tx
                    .prepare(&format!("{} WHERE PrinterName = ?1 ORDER BY SlotName", SLOT_SELECT))?
                    .query_map(params![name], map_slot)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => tx
                    .prepare(&format!("{} ORDER BY PrinterName, SlotName", SLOT_SELECT))?
                    .query_map([], map_slot)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(slots)
        })
    }

    /// Delete (printer, slot) pairs; assignments of those slots cascade
    pub fn delete_slots(&self, slots: &[(String, String)]) -> RepositoryResult<usize> {
        db::with_connection(&self.db_path, |tx| {
            let mut stmt =
                tx.prepare("DELETE FROM printerslots WHERE PrinterName = ?1 AND SlotName = ?2")?;
            let mut deleted = 0;
            for (printer, slot) in slots {
                deleted += stmt.execute(params![printer, slot])?;
            }
            info!(deleted, "slots deleted");
            Ok(deleted)
        })
    }
}

fn map_slot(row: &Row<'_>) -> rusqlite::Result<Slot> {
    Ok(Slot {
        printer_name: row.get(0)?,
        slot_name: row.get(1)?,
        paper_format: row.get(2)?,
        two_sided: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        autoprint: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        remark: row.get(5)?,
    })
}
