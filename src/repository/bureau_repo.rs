// ==========================================
// Printer inventory - bureau repository
// ==========================================
// Bureau IDs are referenced outside this database; deleting a bureau that
// still has assignments is refused by the foreign key.
// ==========================================

use crate::db;
use crate::domain::{Bureau, BureauOverview};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{info, warn};

const OVERVIEW_SELECT: &str = r#"
SELECT
    b.BureauID,
    b.Bureau,
    (SELECT COUNT(DISTINCT sc.PrinterName) FROM slot_caridocs sc WHERE sc.BureauID = b.BureauID),
    (SELECT COUNT(*) FROM (
        SELECT DISTINCT SlotName, CARIdoc
        FROM slot_caridocs sc
        WHERE sc.BureauID = b.BureauID
    )),
    f.Fachabteilung,
    l.Standort
FROM bureaus b
LEFT JOIN fachabteilung f ON b.FachabteilungID = f.FachabteilungID
LEFT JOIN lieugestion l ON b.StandortID = l.StandortID
"#;

pub struct BureauRepository {
    db_path: String,
}

impl BureauRepository {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Bureau overview, optionally only bureaus served by `printer`
    pub fn list_bureaus(&self, printer: Option<&str>) -> RepositoryResult<Vec<BureauOverview>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = match printer {
                Some(name) => tx
                    .prepare(&format!(
                        "{} WHERE EXISTS (SELECT 1 FROM slot_caridocs sc2 \
                         WHERE sc2.BureauID = b.BureauID AND sc2.PrinterName = ?1) \
                         ORDER BY b.BureauID",
                        OVERVIEW_SELECT
                    ))?
                    .query_map(params![name], map_overview)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => tx
                    .prepare(&format!("{} ORDER BY b.BureauID", OVERVIEW_SELECT))?
                    .query_map([], map_overview)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(rows)
        })
    }

    pub fn find_bureau(&self, bureau_id: i64) -> RepositoryResult<Option<Bureau>> {
        db::with_read_connection(&self.db_path, |tx| {
            let bureau = tx
                .query_row(
                    "SELECT BureauID, Bureau, FachabteilungID, StandortID FROM bureaus WHERE BureauID = ?1",
                    params![bureau_id],
                    |row| {
                        Ok(Bureau {
                            bureau_id: row.get(0)?,
                            name: row.get(1)?,
                            department_id: row.get(2)?,
                            location_id: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(bureau)
        })
    }

    /// Delete bureaus; all or nothing
    pub fn delete_bureaus(&self, bureau_ids: &[i64]) -> RepositoryResult<usize> {
        db::with_connection(&self.db_path, |tx| {
            let mut stmt = tx.prepare("DELETE FROM bureaus WHERE BureauID = ?1")?;
            let mut deleted = 0;
            for id in bureau_ids {
                deleted += stmt.execute(params![id]).map_err(|e| {
                    warn!(bureau_id = *id, "bureau still referenced");
                    RepositoryError::from(e).with_guidance(
                        "The bureau is still referenced by slot assignments; delete them first",
                    )
                })?;
            }
            info!(deleted, "bureaus deleted");
            Ok(deleted)
        })
    }
}

fn map_overview(row: &Row<'_>) -> rusqlite::Result<BureauOverview> {
    Ok(BureauOverview {
        bureau_id: row.get(0)?,
        name: row.get(1)?,
        printer_count: row.get(2)?,
        document_count: row.get(3)?,
        department: row.get(4)?,
        location: row.get(5)?,
    })
}
