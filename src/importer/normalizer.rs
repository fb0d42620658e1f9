// ==========================================
// Printer inventory - normalizer
// ==========================================
// Derives the deduplicated lookup sets from the wide rows and assigns
// surrogate IDs to locations and departments.
// - dedup is exact string match (no trimming / case folding)
// - order is first occurrence in the sheet
// ==========================================

use crate::importer::error::ImportResult;
use rusqlite::{params, Connection};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Ordered distinct non-null, non-blank values of one column.
///
/// `column` projects a row onto the column's cell.
pub fn extract_lookup<'a, T, F>(rows: &'a [T], column: F) -> Vec<String>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut values = Vec::new();
    for value in rows.iter().filter_map(&column) {
        if value.trim().is_empty() {
            continue;
        }
        if seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Ordered distinct tuples whose every component is present.
///
/// `project` returns `None` when any component of the row is null, which
/// drops the row.
pub fn distinct_complete<T, K, F>(rows: &[T], project: F) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> Option<K>,
{
    let mut seen: HashSet<K> = HashSet::new();
    let mut out = Vec::new();
    for key in rows.iter().filter_map(project) {
        if seen.insert(key.clone()) {
            out.push(key);
        }
    }
    out
}

// ==========================================
// SurrogateIds - ordered name -> generated ID map
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurrogateIds {
    entries: Vec<(String, i64)>,
    by_name: HashMap<String, i64>,
}

impl SurrogateIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generated ID; the first ID recorded for a name is kept
    pub fn insert(&mut self, name: String, id: i64) {
        if self.by_name.contains_key(&name) {
            return;
        }
        self.by_name.insert(name.clone(), id);
        self.entries.push((name, id));
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Lookup tables that receive database-generated IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurrogateTable {
    Location,
    Department,
}

impl SurrogateTable {
    fn insert_sql(self) -> &'static str {
        match self {
            SurrogateTable::Location => "INSERT INTO lieugestion (Standort) VALUES (?1)",
            SurrogateTable::Department => "INSERT INTO fachabteilung (Fachabteilung) VALUES (?1)",
        }
    }
}

/// Insert each value one row at a time and capture the generated key.
///
/// Values must already be distinct (see [`extract_lookup`]); a repeated
/// value fails on the table's UNIQUE constraint.
pub fn assign_surrogate_ids(
    conn: &Connection,
    table: SurrogateTable,
    values: &[String],
) -> ImportResult<SurrogateIds> {
    let mut stmt = conn.prepare(table.insert_sql())?;
    let mut ids = SurrogateIds::new();

    for value in values {
        stmt.execute(params![value])?;
        ids.insert(value.clone(), conn.last_insert_rowid());
    }

    debug!(table = ?table, count = ids.len(), "surrogate IDs assigned");
    Ok(ids)
}
