// ==========================================
// Printer inventory - export queries
// ==========================================
// Denormalizes the tables back into one row per
//   (a) assignment                    printer + slot + document + bureau
//   (b) slot without assignments      bureau columns empty
//   (c) bureau without assignments    printer columns empty
// The three branches are concatenated and sorted in Rust.
// ==========================================

use rusqlite::{Connection, Row};
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the "Druckerliste" sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrinterListRow {
    pub location: Option<String>,
    pub bureau: Option<String>,
    pub bureau_id: Option<i64>,
    pub printer_name: Option<String>,
    pub slot_name: Option<String>,
    pub document_format: Option<String>,
    pub paper_format: Option<String>,
    pub two_sided: String,  // "2-sided" or ""
    pub autoprint: String,  // "TRUE" or "FALSE"
    pub department: Option<String>,
    pub printer_model: Option<String>,
    pub remark: Option<String>,
}

/// One row of the "Forms" sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormListRow {
    pub document_format: String,
    pub format_code: Option<String>,
    pub paper_insert_format: Option<String>,
    pub description: Option<String>,
}

const ASSIGNED_ROWS_SQL: &str = r#"
SELECT
    l.Standort,
    b.Bureau,
    b.BureauID,
    pn.PrinterName,
    ps.SlotName,
    sc.CARIdoc,
    ps.PaperFormat,
    CASE WHEN ps.TwoSided = 1 THEN '2-sided' ELSE '' END,
    CASE WHEN ps.Autoprint = 1 THEN 'TRUE' ELSE 'FALSE' END,
    f.Fachabteilung,
    pn.PrinterModel,
    sc.Bemerkung
FROM slot_caridocs sc
JOIN printerslots ps ON sc.PrinterName = ps.PrinterName AND sc.SlotName = ps.SlotName
JOIN printernames pn ON ps.PrinterName = pn.PrinterName
JOIN bureaus b ON sc.BureauID = b.BureauID
LEFT JOIN fachabteilung f ON b.FachabteilungID = f.FachabteilungID
LEFT JOIN lieugestion l ON b.StandortID = l.StandortID
"#;

const UNASSIGNED_SLOTS_SQL: &str = r#"
SELECT
    l.Standort,
    NULL,
    NULL,
    pn.PrinterName,
    ps.SlotName,
    NULL,
    ps.PaperFormat,
    CASE WHEN ps.TwoSided = 1 THEN '2-sided' ELSE '' END,
    CASE WHEN ps.Autoprint = 1 THEN 'TRUE' ELSE 'FALSE' END,
    NULL,
    pn.PrinterModel,
    ps.Bemerkung
FROM printerslots ps
JOIN printernames pn ON ps.PrinterName = pn.PrinterName
LEFT JOIN lieugestion l ON pn.StandortID = l.StandortID
WHERE NOT EXISTS (
    SELECT 1 FROM slot_caridocs sc
    WHERE sc.PrinterName = ps.PrinterName AND sc.SlotName = ps.SlotName
)
"#;

const UNASSIGNED_BUREAUS_SQL: &str = r#"
SELECT
    l.Standort,
    b.Bureau,
    b.BureauID,
    NULL,
    NULL,
    NULL,
    NULL,
    '',
    'FALSE',
    f.Fachabteilung,
    NULL,
    NULL
FROM bureaus b
LEFT JOIN fachabteilung f ON b.FachabteilungID = f.FachabteilungID
LEFT JOIN lieugestion l ON b.StandortID = l.StandortID
WHERE NOT EXISTS (
    SELECT 1 FROM slot_caridocs sc WHERE sc.BureauID = b.BureauID
)
"#;

const FORMS_SQL: &str = r#"
SELECT CARIdoc, FormatCARIDoc, FormatDruckeinlage, BeschreibungFormular
FROM caridocs
ORDER BY CARIdoc
"#;

/// Branch (a): every slot assignment with its full chain
pub fn query_assigned_rows(conn: &Connection) -> rusqlite::Result<Vec<PrinterListRow>> {
    query_printer_rows(conn, ASSIGNED_ROWS_SQL)
}

/// Branch (b): slots without assignments, located through their printer
pub fn query_unassigned_slots(conn: &Connection) -> rusqlite::Result<Vec<PrinterListRow>> {
    query_printer_rows(conn, UNASSIGNED_SLOTS_SQL)
}

/// Branch (c): bureaus that no slot serves
pub fn query_unassigned_bureaus(conn: &Connection) -> rusqlite::Result<Vec<PrinterListRow>> {
    query_printer_rows(conn, UNASSIGNED_BUREAUS_SQL)
}

pub fn query_forms(conn: &Connection) -> rusqlite::Result<Vec<FormListRow>> {
    let mut stmt = conn.prepare(FORMS_SQL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FormListRow {
                document_format: row.get(0)?,
                format_code: row.get(1)?,
                paper_insert_format: row.get(2)?,
                description: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn query_printer_rows(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<PrinterListRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], map_printer_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn map_printer_row(row: &Row<'_>) -> rusqlite::Result<PrinterListRow> {
    Ok(PrinterListRow {
        location: row.get(0)?,
        bureau: row.get(1)?,
        bureau_id: row.get(2)?,
        printer_name: row.get(3)?,
        slot_name: row.get(4)?,
        document_format: row.get(5)?,
        paper_format: row.get(6)?,
        two_sided: row.get(7)?,
        autoprint: row.get(8)?,
        department: row.get(9)?,
        printer_model: row.get(10)?,
        remark: row.get(11)?,
    })
}

/// Stable sort by (location, bureau, printer, slot, document format),
/// nulls after every value. Ties keep branch order.
pub fn sort_printer_rows(rows: &mut [PrinterListRow]) {
    rows.sort_by(|a, b| {
        nulls_last(&a.location, &b.location)
            .then_with(|| nulls_last(&a.bureau, &b.bureau))
            .then_with(|| nulls_last(&a.printer_name, &b.printer_name))
            .then_with(|| nulls_last(&a.slot_name, &b.slot_name))
            .then_with(|| nulls_last(&a.document_format, &b.document_format))
    });
}

fn nulls_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
