// ==========================================
// Printer inventory - location validator
// ==========================================
// Business rule: a printer serves bureaus of at most one location.
// Checked after the load, before location back-fill.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use rusqlite::Connection;
use tracing::warn;

/// Printers whose assigned bureaus span more than one location, with the
/// number of distinct locations. Ordered by printer name.
pub fn find_multi_location_printers(conn: &Connection) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT sc.PrinterName, COUNT(DISTINCT b.StandortID) AS LocationCount
        FROM slot_caridocs sc
        JOIN bureaus b ON b.BureauID = sc.BureauID
        GROUP BY sc.PrinterName
        HAVING COUNT(DISTINCT b.StandortID) > 1
        ORDER BY sc.PrinterName
        "#,
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Fail with every offending printer named
pub fn validate_single_printer_location(conn: &Connection) -> ImportResult<()> {
    let offenders = find_multi_location_printers(conn)?;
    if offenders.is_empty() {
        return Ok(());
    }

    for (printer, locations) in &offenders {
        warn!(printer = %printer, locations, "printer spans several locations");
    }
    Err(ImportError::MultiLocationPrinter {
        printers: offenders.into_iter().map(|(name, _)| name).collect(),
    })
}
