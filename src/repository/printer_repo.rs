// ==========================================
// Printer inventory - printer repository
// ==========================================
// Table: printernames (slots and assignments cascade on delete)
// Each call runs in its own connection scope.
// ==========================================

use crate::db;
use crate::domain::{Printer, PrinterOverview};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::collections::HashMap;
use tracing::info;

const OVERVIEW_SELECT: &str = r#"
SELECT
    p.PrinterName,
    (SELECT COUNT(*) FROM printerslots ps WHERE ps.PrinterName = p.PrinterName),
    (SELECT COUNT(*) FROM (
        SELECT DISTINCT SlotName, CARIdoc
        FROM slot_caridocs sc
        WHERE sc.PrinterName = p.PrinterName
    )),
    (SELECT COUNT(DISTINCT sc.BureauID) FROM slot_caridocs sc WHERE sc.PrinterName = p.PrinterName),
    p.PrinterModel,
    l.Standort
FROM printernames p
LEFT JOIN lieugestion l ON p.StandortID = l.StandortID
"#;

/// New values for an existing printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterUpdate {
    pub name: String,
    pub model: String,
    pub location_id: Option<i64>,
}

pub struct PrinterRepository {
    db_path: String,
}

impl PrinterRepository {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Printer overview, optionally only printers serving `bureau_id`
    pub fn list_printers(&self, bureau_id: Option<i64>) -> RepositoryResult<Vec<PrinterOverview>> {
        db::with_read_connection(&self.db_path, |tx| {
            let sql = match bureau_id {
                Some(_) => format!(
                    "{} WHERE EXISTS (SELECT 1 FROM slot_caridocs sc \
                     WHERE sc.PrinterName = p.PrinterName AND sc.BureauID = ?1) \
                     ORDER BY p.PrinterName",
                    OVERVIEW_SELECT
                ),
                None => format!("{} ORDER BY p.PrinterName", OVERVIEW_SELECT),
            };
            let mut stmt = tx.prepare(&sql)?;
            let rows = match bureau_id {
                Some(id) => stmt
                    .query_map(params![id], map_overview)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => stmt
                    .query_map([], map_overview)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(rows)
        })
    }

    pub fn find_printer(&self, name: &str) -> RepositoryResult<Option<Printer>> {
        db::with_read_connection(&self.db_path, |tx| {
            let printer = tx
                .query_row(
                    "SELECT PrinterName, PrinterModel, StandortID FROM printernames WHERE PrinterName = ?1",
                    params![name],
                    |row| {
                        Ok(Printer {
                            name: row.get(0)?,
                            model: row.get(1)?,
                            location_id: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(printer)
        })
    }

    /// Slot count per printer; printers without slots are absent
    pub fn slot_counts(&self, names: &[String]) -> RepositoryResult<HashMap<String, i64>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        db::with_read_connection(&self.db_path, |tx| {
            let sql = format!(
                "SELECT PrinterName, COUNT(*) FROM printerslots WHERE PrinterName IN ({}) GROUP BY PrinterName",
                placeholders(names.len())
            );
            let mut stmt = tx.prepare(&sql)?;
            let counts = stmt
                .query_map(params_from_iter(names.iter()), |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<HashMap<String, i64>>>()?;
            Ok(counts)
        })
    }

    /// Rename / re-model / relocate one printer
    pub fn update_printer(&self, current_name: &str, update: &PrinterUpdate) -> RepositoryResult<()> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError(
                "Printer name cannot be empty".to_string(),
            ));
        }
        if update.model.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "Printer model cannot be empty".to_string(),
            ));
        }

        db::with_connection(&self.db_path, |tx| {
            let changed = tx
                .execute(
                    "UPDATE printernames SET PrinterName = ?1, PrinterModel = ?2, StandortID = ?3 WHERE PrinterName = ?4",
                    params![name, update.model, update.location_id, current_name],
                )
                .map_err(|e| {
                    RepositoryError::from(e)
                        .with_guidance("A printer with that name may already exist, or it still has slots")
                })?;
            if changed == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "Printer".to_string(),
                    id: current_name.to_string(),
                });
            }
            info!(printer = %current_name, new_name = %name, "printer updated");
            Ok(())
        })
    }

    /// Delete printers; their slots and slot assignments go with them
    pub fn delete_printers(&self, names: &[String]) -> RepositoryResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }
        db::with_connection(&self.db_path, |tx| {
            let sql = format!(
                "DELETE FROM printernames WHERE PrinterName IN ({})",
                placeholders(names.len())
            );
            let deleted = tx.execute(&sql, params_from_iter(names.iter()))?;
            info!(deleted, "printers deleted");
            Ok(deleted)
        })
    }
}

fn map_overview(row: &Row<'_>) -> rusqlite::Result<PrinterOverview> {
    Ok(PrinterOverview {
        printer_name: row.get(0)?,
        slot_count: row.get(1)?,
        document_count: row.get(2)?,
        bureau_count: row.get(3)?,
        model: row.get(4)?,
        location: row.get(5)?,
    })
}

pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
