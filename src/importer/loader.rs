// ==========================================
// Printer inventory - loader
// ==========================================
// Populates every table in dependency order. One function per step,
// each step is one extraction pass over the typed rows:
//   1 paper inserts -> 2 CARIdocs -> 3 locations / departments
//   -> 4 printer models -> 5 printers -> 6 bureaus -> 7 slots + assignments
// Any database error aborts the load (the caller's scope rolls back).
// ==========================================

use crate::domain::{FormSheetRow, PrinterSheetRow};
use crate::importer::error::{ImportError, ImportResult, LookupKind};
use crate::importer::field_mapper::{parse_autoprint, parse_two_sided};
use crate::importer::normalizer::{
    assign_surrogate_ids, distinct_complete, extract_lookup, SurrogateIds, SurrogateTable,
};
use rusqlite::{params, Connection};
use tracing::{debug, info, trace};

/// Name -> ID maps produced by step 3
#[derive(Debug, Clone, Default)]
pub struct LookupMaps {
    pub locations: SurrogateIds,
    pub departments: SurrogateIds,
}

/// Counters reported by step 7
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotLoadStats {
    pub skipped_rows: usize,
    pub slots_inserted: usize,
    pub assignments_inserted: usize,
    pub folded_remarks: usize,
}

/// Run steps 1-7 against an empty schema
pub fn load_all(
    conn: &Connection,
    printer_rows: &[PrinterSheetRow],
    form_rows: &[FormSheetRow],
) -> ImportResult<(LookupMaps, SlotLoadStats)> {
    let paper_inserts = insert_paper_insert_formats(conn, form_rows)?;
    let document_formats = insert_document_formats(conn, form_rows)?;
    info!(paper_inserts, document_formats, "forms loaded");

    let maps = insert_locations_and_departments(conn, printer_rows)?;
    let models = insert_printer_models(conn, printer_rows)?;
    let printers = insert_printers(conn, printer_rows)?;
    let bureaus = insert_bureaus(conn, printer_rows, &maps)?;
    info!(
        locations = maps.locations.len(),
        departments = maps.departments.len(),
        models,
        printers,
        bureaus,
        "lookups, printers and bureaus loaded"
    );

    let stats = insert_slots_and_assignments(conn, printer_rows)?;
    info!(
        slots = stats.slots_inserted,
        assignments = stats.assignments_inserted,
        skipped = stats.skipped_rows,
        folded_remarks = stats.folded_remarks,
        "slots and assignments loaded"
    );

    Ok((maps, stats))
}

/// Step 1: paper insert formats, name only (dimensions stay NULL)
pub fn insert_paper_insert_formats(conn: &Connection, rows: &[FormSheetRow]) -> ImportResult<usize> {
    let names = extract_lookup(rows, |r| r.paper_insert_format.as_deref());
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO druckeinlage (FormatDruckeinlage) VALUES (?1)")?;
    let mut inserted = 0;
    for name in &names {
        inserted += stmt.execute(params![name])?;
    }
    Ok(inserted)
}

/// Step 2: document formats; rows without a key are skipped, first key wins
pub fn insert_document_formats(conn: &Connection, rows: &[FormSheetRow]) -> ImportResult<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR IGNORE INTO caridocs
            (CARIdoc, FormatCARIDoc, FormatDruckeinlage, BeschreibungFormular)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )?;

    let mut inserted = 0;
    for row in rows {
        let Some(key) = row.document_format.as_deref() else {
            continue;
        };
        let changed = stmt.execute(params![
            key,
            row.format_code,
            row.paper_insert_format,
            row.description,
        ])?;
        if changed == 0 {
            trace!(row = row.row_number, caridoc = key, "duplicate CARIdoc ignored");
        }
        inserted += changed;
    }
    Ok(inserted)
}

/// Step 3: locations and departments with generated IDs
pub fn insert_locations_and_departments(
    conn: &Connection,
    rows: &[PrinterSheetRow],
) -> ImportResult<LookupMaps> {
    let locations = extract_lookup(rows, |r| r.location.as_deref());
    let departments = extract_lookup(rows, |r| r.department.as_deref());

    Ok(LookupMaps {
        locations: assign_surrogate_ids(conn, SurrogateTable::Location, &locations)?,
        departments: assign_surrogate_ids(conn, SurrogateTable::Department, &departments)?,
    })
}

/// Step 4: printer models (natural key)
pub fn insert_printer_models(conn: &Connection, rows: &[PrinterSheetRow]) -> ImportResult<usize> {
    let models = extract_lookup(rows, |r| r.printer_model.as_deref());
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO printermodels (PrinterModel) VALUES (?1)")?;
    let mut inserted = 0;
    for model in &models {
        inserted += stmt.execute(params![model])?;
    }
    Ok(inserted)
}

/// Step 5: one printer per distinct (name, model) pair.
///
/// Plain INSERT: the same printer listed with two models violates the
/// primary key and aborts the import.
pub fn insert_printers(conn: &Connection, rows: &[PrinterSheetRow]) -> ImportResult<usize> {
    let pairs = distinct_complete(rows, |r| {
        Some((r.printer_name.clone()?, r.printer_model.clone()?))
    });

    let mut stmt =
        conn.prepare("INSERT INTO printernames (PrinterName, PrinterModel) VALUES (?1, ?2)")?;
    for (name, model) in &pairs {
        stmt.execute(params![name, model]).map_err(|e| match ImportError::from(e) {
            ImportError::ConstraintViolation(msg) => ImportError::ConstraintViolation(format!(
                "{} (printer '{}' listed with model '{}')",
                msg, name, model
            )),
            other => other,
        })?;
    }
    Ok(pairs.len())
}

/// Step 6: one bureau per distinct complete (name, ID, department, location).
///
/// Department and location names are resolved through step 3's maps; an
/// unknown name is a missing-lookup error. Rows with a missing component are
/// dropped silently, unlike step 7's skips this asymmetry is kept on purpose.
pub fn insert_bureaus(
    conn: &Connection,
    rows: &[PrinterSheetRow],
    maps: &LookupMaps,
) -> ImportResult<usize> {
    let bureaus = distinct_complete(rows, |r| {
        Some((
            r.bureau.clone()?,
            r.bureau_id?,
            r.department.clone()?,
            r.location.clone()?,
        ))
    });

    let mut stmt = conn.prepare(
        "INSERT INTO bureaus (BureauID, Bureau, FachabteilungID, StandortID) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (name, bureau_id, department, location) in &bureaus {
        let department_id =
            maps.departments
                .get(department)
                .ok_or_else(|| ImportError::MissingLookup {
                    kind: LookupKind::Department,
                    name: department.clone(),
                    bureau_id: *bureau_id,
                })?;
        let location_id = maps
            .locations
            .get(location)
            .ok_or_else(|| ImportError::MissingLookup {
                kind: LookupKind::Location,
                name: location.clone(),
                bureau_id: *bureau_id,
            })?;

        stmt.execute(params![bureau_id, name, department_id, location_id])?;
    }
    Ok(bureaus.len())
}

/// Step 7: slots and slot assignments, one pass over every row.
///
/// - rows without printer or slot name are skipped
/// - slot: INSERT OR IGNORE (first row of a slot wins)
/// - document format and bureau ID present: assignment INSERT OR IGNORE
/// - otherwise a remark overwrites the slot's own remark
pub fn insert_slots_and_assignments(
    conn: &Connection,
    rows: &[PrinterSheetRow],
) -> ImportResult<SlotLoadStats> {
    let mut insert_slot = conn.prepare(
        r#"
        INSERT OR IGNORE INTO printerslots
            (PrinterName, SlotName, PaperFormat, TwoSided, Autoprint, Bemerkung)
        VALUES (?1, ?2, ?3, ?4, ?5, NULL)
        "#,
    )?;
    let mut insert_assignment = conn.prepare(
        r#"
        INSERT OR IGNORE INTO slot_caridocs
            (PrinterName, SlotName, CARIdoc, BureauID, Bemerkung)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )?;
    let mut fold_remark = conn.prepare(
        "UPDATE printerslots SET Bemerkung = ?1 WHERE PrinterName = ?2 AND SlotName = ?3",
    )?;

    let mut stats = SlotLoadStats::default();
    for row in rows {
        let (Some(printer), Some(slot)) = (row.printer_name.as_deref(), row.slot_name.as_deref())
        else {
            stats.skipped_rows += 1;
            continue;
        };

        stats.slots_inserted += insert_slot.execute(params![
            printer,
            slot,
            row.paper_format,
            parse_two_sided(row.two_sided.as_deref()),
            parse_autoprint(row.autoprint.as_deref()),
        ])?;

        match (row.document_format.as_deref(), row.bureau_id) {
            (Some(document), Some(bureau_id)) => {
                stats.assignments_inserted += insert_assignment.execute(params![
                    printer, slot, document, bureau_id, row.remark,
                ])?;
            }
            _ => {
                if let Some(remark) = row.remark.as_deref() {
                    fold_remark.execute(params![remark, printer, slot])?;
                    stats.folded_remarks += 1;
                    debug!(row = row.row_number, printer, slot, "remark folded onto slot");
                }
            }
        }
    }

    Ok(stats)
}
