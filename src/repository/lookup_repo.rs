// ==========================================
// Printer inventory - lookup table repository
// ==========================================
// Tables: lieugestion, fachabteilung, printermodels, druckeinlage, caridocs
// ==========================================

use crate::db;
use crate::domain::{Department, DocumentFormat, Location, PaperInsertFormat, PrinterModel};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::params;
use tracing::info;

pub struct LookupRepository {
    db_path: String,
}

impl LookupRepository {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = tx
                .prepare("SELECT StandortID, Standort FROM lieugestion ORDER BY Standort")?
                .query_map([], |row| {
                    Ok(Location {
                        location_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = tx
                .prepare("SELECT FachabteilungID, Fachabteilung FROM fachabteilung ORDER BY FachabteilungID")?
                .query_map([], |row| {
                    Ok(Department {
                        department_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Delete departments; fails while a bureau still uses one
    pub fn delete_departments(&self, department_ids: &[i64]) -> RepositoryResult<usize> {
        db::with_connection(&self.db_path, |tx| {
            let mut stmt = tx.prepare("DELETE FROM fachabteilung WHERE FachabteilungID = ?1")?;
            let mut deleted = 0;
            for id in department_ids {
                deleted += stmt.execute(params![id]).map_err(|e| {
                    RepositoryError::from(e)
                        .with_guidance("Please ensure that the department is not in use")
                })?;
            }
            info!(deleted, "departments deleted");
            Ok(deleted)
        })
    }

    pub fn list_printer_models(&self) -> RepositoryResult<Vec<PrinterModel>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = tx
                .prepare("SELECT PrinterModel FROM printermodels ORDER BY PrinterModel")?
                .query_map([], |row| Ok(PrinterModel { name: row.get(0)? }))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn list_paper_insert_formats(&self) -> RepositoryResult<Vec<PaperInsertFormat>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = tx
                .prepare("SELECT FormatDruckeinlage, WidthMM, HeightMM FROM druckeinlage ORDER BY FormatDruckeinlage")?
                .query_map([], |row| {
                    Ok(PaperInsertFormat {
                        name: row.get(0)?,
                        width_mm: row.get(1)?,
                        height_mm: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Set or clear the dimensions of a paper insert format; values must be positive
    pub fn set_paper_insert_dimensions(
        &self,
        name: &str,
        width_mm: Option<f64>,
        height_mm: Option<f64>,
    ) -> RepositoryResult<()> {
        for (label, value) in [("width", width_mm), ("height", height_mm)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(RepositoryError::ValidationError(format!(
                        "{} must be a positive number of millimetres, got {}",
                        label, v
                    )));
                }
            }
        }

        db::with_connection(&self.db_path, |tx| {
            let changed = tx.execute(
                "UPDATE druckeinlage SET WidthMM = ?1, HeightMM = ?2 WHERE FormatDruckeinlage = ?3",
                params![width_mm, height_mm, name],
            )?;
            if changed == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "PaperInsertFormat".to_string(),
                    id: name.to_string(),
                });
            }
            Ok(())
        })
    }

    /// Document formats joined with their paper insert dimensions
    pub fn list_document_formats(&self) -> RepositoryResult<Vec<DocumentFormat>> {
        db::with_read_connection(&self.db_path, |tx| {
            let rows = tx
                .prepare(
                    r#"
                    SELECT cd.CARIdoc, cd.BeschreibungFormular, cd.FormatCARIDoc,
                           cd.FormatDruckeinlage, de.WidthMM, de.HeightMM
                    FROM caridocs cd
                    LEFT JOIN druckeinlage de ON cd.FormatDruckeinlage = de.FormatDruckeinlage
                    ORDER BY cd.CARIdoc
                    "#,
                )?
                .query_map([], |row| {
                    Ok(DocumentFormat {
                        name: row.get(0)?,
                        description: row.get(1)?,
                        format_code: row.get(2)?,
                        paper_insert_format: row.get(3)?,
                        width_mm: row.get(4)?,
                        height_mm: row.get(5)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }
}
