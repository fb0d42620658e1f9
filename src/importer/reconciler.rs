// ==========================================
// Printer inventory - printer location back-fill
// ==========================================
// Printers are inserted without a location. Each distinct complete
// (printer, location) pair of the sheet sets the location of a printer
// that still has none; the first pair per printer wins.
// ==========================================

use crate::domain::PrinterSheetRow;
use crate::importer::error::ImportResult;
use crate::importer::normalizer::{distinct_complete, SurrogateIds};
use rusqlite::{params, Connection};
use tracing::debug;

/// Returns the number of printers that received a location
pub fn backfill_printer_locations(
    conn: &Connection,
    rows: &[PrinterSheetRow],
    locations: &SurrogateIds,
) -> ImportResult<usize> {
    let pairs = distinct_complete(rows, |r| {
        Some((r.printer_name.clone()?, r.location.clone()?))
    });

    let mut stmt = conn.prepare(
        "UPDATE printernames SET StandortID = ?1 WHERE PrinterName = ?2 AND StandortID IS NULL",
    )?;

    let mut updated = 0;
    for (printer, location) in &pairs {
        // blank locations never got an ID
        let Some(location_id) = locations.get(location) else {
            debug!(printer = %printer, location = %location, "no location ID, skipped");
            continue;
        };
        updated += stmt.execute(params![location_id, printer])?;
    }
    Ok(updated)
}
