// ==========================================
// Printer inventory - schema definition
// ==========================================
// Nine tables. Table and column names follow the existing printers.db
// contract so the views keep working against an imported database.
// ==========================================

use rusqlite::Connection;
use serde::Serialize;
use std::fmt::Write as _;

/// Tables in creation (parent-first) order
pub const TABLE_NAMES: [&str; 9] = [
    "lieugestion",
    "fachabteilung",
    "printermodels",
    "druckeinlage",
    "caridocs",
    "printernames",
    "printerslots",
    "bureaus",
    "slot_caridocs",
];

/// Children first; `printersettings` is a retired table still present in
/// older database files.
pub const DROP_TABLES_SQL: &str = r#"
DROP TABLE IF EXISTS slot_caridocs;
DROP TABLE IF EXISTS printerslots;
DROP TABLE IF EXISTS bureaus;
DROP TABLE IF EXISTS printernames;
DROP TABLE IF EXISTS printermodels;
DROP TABLE IF EXISTS fachabteilung;
DROP TABLE IF EXISTS lieugestion;
DROP TABLE IF EXISTS caridocs;
DROP TABLE IF EXISTS druckeinlage;
DROP TABLE IF EXISTS printersettings;
"#;

pub const CREATE_SCHEMA_SQL: &str = r#"
CREATE TABLE lieugestion (
    StandortID INTEGER PRIMARY KEY,
    Standort TEXT NOT NULL UNIQUE CHECK (length(trim(Standort)) > 0)
);

CREATE TABLE fachabteilung (
    FachabteilungID INTEGER PRIMARY KEY,
    Fachabteilung TEXT NOT NULL UNIQUE CHECK (length(trim(Fachabteilung)) > 0)
);

CREATE TABLE printermodels (
    PrinterModel TEXT PRIMARY KEY CHECK (length(trim(PrinterModel)) > 0)
);

CREATE TABLE druckeinlage (
    FormatDruckeinlage TEXT PRIMARY KEY,
    WidthMM REAL CHECK (WidthMM IS NULL OR WidthMM > 0),
    HeightMM REAL CHECK (HeightMM IS NULL OR HeightMM > 0)
);

CREATE TABLE caridocs (
    CARIdoc TEXT PRIMARY KEY,
    FormatCARIDoc TEXT,
    FormatDruckeinlage TEXT,
    BeschreibungFormular TEXT,
    SettingsPNG BLOB,
    CONSTRAINT fk_caridocs_druckeinlage
        FOREIGN KEY (FormatDruckeinlage) REFERENCES druckeinlage (FormatDruckeinlage)
);

CREATE TABLE printernames (
    PrinterName TEXT PRIMARY KEY,
    PrinterModel TEXT NOT NULL,
    StandortID INTEGER,
    CONSTRAINT fk_printernames_model
        FOREIGN KEY (PrinterModel) REFERENCES printermodels (PrinterModel),
    CONSTRAINT fk_printernames_standort
        FOREIGN KEY (StandortID) REFERENCES lieugestion (StandortID)
);

CREATE TABLE printerslots (
    PrinterName TEXT,
    SlotName TEXT,
    PaperFormat TEXT,
    TwoSided BOOLEAN DEFAULT 0,
    Autoprint BOOLEAN DEFAULT 0,
    Bemerkung TEXT,
    CONSTRAINT pk_printerslots PRIMARY KEY (PrinterName, SlotName),
    CONSTRAINT fk_printerslots_printer
        FOREIGN KEY (PrinterName) REFERENCES printernames (PrinterName) ON DELETE CASCADE
);

CREATE TABLE bureaus (
    BureauID INTEGER PRIMARY KEY,
    Bureau TEXT UNIQUE,
    FachabteilungID INTEGER,
    StandortID INTEGER,
    CONSTRAINT fk_bureaus_fachabteilung
        FOREIGN KEY (FachabteilungID) REFERENCES fachabteilung (FachabteilungID),
    CONSTRAINT fk_bureaus_standort
        FOREIGN KEY (StandortID) REFERENCES lieugestion (StandortID)
);

CREATE TABLE slot_caridocs (
    PrinterName TEXT,
    SlotName TEXT,
    CARIdoc TEXT,
    BureauID INTEGER,
    Bemerkung TEXT,
    CONSTRAINT pk_slot_caridocs PRIMARY KEY (PrinterName, SlotName, CARIdoc, BureauID),
    CONSTRAINT fk_slot_caridocs_slot
        FOREIGN KEY (PrinterName, SlotName)
        REFERENCES printerslots (PrinterName, SlotName) ON DELETE CASCADE,
    CONSTRAINT fk_slot_caridocs_caridoc
        FOREIGN KEY (CARIdoc) REFERENCES caridocs (CARIdoc),
    CONSTRAINT fk_slot_caridocs_bureau
        FOREIGN KEY (BureauID) REFERENCES bureaus (BureauID)
);
"#;

/// Drop every inventory table (no-op for tables that do not exist)
pub fn drop_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(DROP_TABLES_SQL)
}

/// Create the nine tables; fails if any of them still exists
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SCHEMA_SQL)
}

/// Drop-then-create as one step
pub fn rebuild_schema(conn: &Connection) -> rusqlite::Result<()> {
    drop_tables(conn)?;
    create_schema(conn)
}

/// Count the rows of one inventory table
pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    // table names only ever come from TABLE_NAMES
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
}

// ==========================================
// Schema description (constraint report)
// ==========================================

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key_position: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyInfo {
    pub id: i64,
    pub seq: i64,
    pub table: String,
    pub from: String,
    pub to: Option<String>,
    pub on_update: String,
    pub on_delete: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub sql: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
    pub unique_indexes: Vec<String>,
}

/// Describe every table in the database (not only the inventory ones)
pub fn describe_schema(conn: &Connection) -> rusqlite::Result<Vec<TableDescription>> {
    let mut stmt = conn.prepare(
        "SELECT name, COALESCE(sql, '') FROM sqlite_master WHERE type = 'table' ORDER BY rowid",
    )?;
    let tables = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut descriptions = Vec::with_capacity(tables.len());
    for (name, sql) in tables {
        let columns = conn
            .prepare("SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)")?
            .query_map([&name], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    data_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? == 1,
                    default_value: row.get(4)?,
                    primary_key_position: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let foreign_keys = conn
            .prepare(
                "SELECT id, seq, \"table\", \"from\", \"to\", on_update, on_delete \
                 FROM pragma_foreign_key_list(?1)",
            )?
            .query_map([&name], |row| {
                Ok(ForeignKeyInfo {
                    id: row.get(0)?,
                    seq: row.get(1)?,
                    table: row.get(2)?,
                    from: row.get(3)?,
                    to: row.get(4)?,
                    on_update: row.get(5)?,
                    on_delete: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let unique_indexes = conn
            .prepare("SELECT name FROM pragma_index_list(?1) WHERE \"unique\" = 1")?
            .query_map([&name], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        descriptions.push(TableDescription {
            name,
            sql,
            columns,
            foreign_keys,
            unique_indexes,
        });
    }

    Ok(descriptions)
}

/// Render the plain-text constraint report
pub fn render_schema_report(tables: &[TableDescription]) -> String {
    let rule = "=".repeat(40);
    let mut out = String::new();

    for table in tables {
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "TABLE: {}", table.name);
        let _ = writeln!(out, "{}\n", rule);

        let _ = writeln!(out, "Schema:");
        let _ = writeln!(out, "{}\n", table.sql.trim());

        let _ = writeln!(out, "Columns:");
        for col in &table.columns {
            let _ = writeln!(
                out,
                "  {} {} {}{}{}{}",
                col.cid,
                col.name,
                if col.data_type.is_empty() { "ANY" } else { col.data_type.as_str() },
                if col.not_null { " NOT NULL" } else { "" },
                col.default_value
                    .as_deref()
                    .map(|d| format!(" DEFAULT {}", d))
                    .unwrap_or_default(),
                if col.primary_key_position > 0 {
                    format!(" PK#{}", col.primary_key_position)
                } else {
                    String::new()
                },
            );
        }
        out.push('\n');

        let _ = writeln!(out, "Foreign Keys:");
        if table.foreign_keys.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for fk in &table.foreign_keys {
            let _ = writeln!(
                out,
                "  #{} {} -> {}({}) ON UPDATE {} ON DELETE {}",
                fk.id,
                fk.from,
                fk.table,
                fk.to.as_deref().unwrap_or("<primary key>"),
                fk.on_update,
                fk.on_delete,
            );
        }
        out.push('\n');

        let _ = writeln!(out, "Unique Indexes:");
        for idx in &table.unique_indexes {
            let _ = writeln!(out, "  {}", idx);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    #[test]
    fn test_create_schema_emits_nine_tables() {
        let conn = memory_db();
        create_schema(&conn).unwrap();

        for table in TABLE_NAMES {
            assert_eq!(count_rows(&conn, table).unwrap(), 0, "table {}", table);
        }
    }

    #[test]
    fn test_create_schema_twice_fails() {
        let conn = memory_db();
        create_schema(&conn).unwrap();
        assert!(create_schema(&conn).is_err());
    }

    #[test]
    fn test_rebuild_schema_is_repeatable() {
        let conn = memory_db();
        rebuild_schema(&conn).unwrap();
        conn.execute("INSERT INTO printermodels VALUES ('HP100')", []).unwrap();
        rebuild_schema(&conn).unwrap();
        assert_eq!(count_rows(&conn, "printermodels").unwrap(), 0);
    }

    #[test]
    fn test_check_constraints() {
        let conn = memory_db();
        create_schema(&conn).unwrap();

        assert!(conn
            .execute("INSERT INTO lieugestion (Standort) VALUES ('   ')", [])
            .is_err());
        assert!(conn
            .execute("INSERT INTO printermodels VALUES ('')", [])
            .is_err());
        assert!(conn
            .execute(
                "INSERT INTO druckeinlage (FormatDruckeinlage, WidthMM) VALUES ('A4', 0)",
                []
            )
            .is_err());
        conn.execute(
            "INSERT INTO druckeinlage (FormatDruckeinlage, WidthMM, HeightMM) VALUES ('A4', 210, NULL)",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_describe_schema_reports_cascade() {
        let conn = memory_db();
        create_schema(&conn).unwrap();

        let tables = describe_schema(&conn).unwrap();
        assert_eq!(tables.len(), 9);

        let slots = tables.iter().find(|t| t.name == "printerslots").unwrap();
        assert_eq!(slots.foreign_keys.len(), 1);
        assert_eq!(slots.foreign_keys[0].on_delete, "CASCADE");
        assert_eq!(slots.columns.len(), 6);

        let report = render_schema_report(&tables);
        assert!(report.contains("TABLE: slot_caridocs"));
        assert!(report.contains("ON DELETE CASCADE"));
    }
}
