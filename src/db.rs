// ==========================================
// Printer inventory - SQLite connection scope
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
//   (foreign_keys must be enabled per connection)
// - one transactional boundary for every caller: commit on Ok,
//   rollback on Err, release the handle last
// ==========================================

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::cell::Cell;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Serializes connection scopes inside one process.
///
/// An import drops and recreates every table; a reader or a second writer
/// interleaving with it would observe a half-built schema. Across processes
/// the IMMEDIATE transaction plus busy_timeout provides the same guarantee.
static SCOPE_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    /// Set while this thread holds `SCOPE_LOCK`
    static IN_SCOPE: Cell<bool> = const { Cell::new(false) };
}

/// Clears `IN_SCOPE` when the scope ends, panics included
struct ScopeMarker;

impl ScopeMarker {
    fn enter() -> rusqlite::Result<Self> {
        if IN_SCOPE.with(Cell::get) {
            return Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some("connection scope opened inside another scope on the same thread".to_string()),
            ));
        }
        IN_SCOPE.with(|flag| flag.set(true));
        Ok(ScopeMarker)
    }
}

impl Drop for ScopeMarker {
    fn drop(&mut self) {
        IN_SCOPE.with(|flag| flag.set(false));
    }
}

/// Apply the shared PRAGMA setup to a connection
///
/// - foreign_keys must be switched on for every connection, and outside of
///   a transaction (SQLite ignores it inside one)
/// - busy_timeout is per connection as well
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a read/write connection (creating the file if needed) and configure it
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Open an existing database read-only and configure it
pub fn open_sqlite_connection_read_only(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Returns whether foreign key enforcement is active on `conn`
pub fn foreign_keys_enabled(conn: &Connection) -> rusqlite::Result<bool> {
    let on: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
    Ok(on == 1)
}

/// Run `f` as one unit of work against the database at `db_path`.
///
/// The closure receives the open transaction. On `Ok` the transaction is
/// committed, on `Err` it is rolled back and the closure's error is returned
/// unchanged. The connection is closed when this function returns.
pub fn with_connection<T, E, F>(db_path: &str, f: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    run_scope(db_path, false, f)
}

/// Read-only variant of [`with_connection`]; the database must already exist.
pub fn with_read_connection<T, E, F>(db_path: &str, f: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    run_scope(db_path, true, f)
}

fn run_scope<T, E, F>(db_path: &str, read_only: bool, f: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    // a poisoned lock only means another scope panicked; the database itself
    // was rolled back by SQLite when that connection dropped
    // a nested scope would wait on its own thread forever
    let _marker = ScopeMarker::enter()?;
    let _guard = SCOPE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut conn = if read_only {
        open_sqlite_connection_read_only(db_path)?
    } else {
        open_sqlite_connection(db_path)?
    };

    let behavior = if read_only {
        TransactionBehavior::Deferred
    } else {
        TransactionBehavior::Immediate
    };
    let tx = conn.transaction_with_behavior(behavior)?;
    debug!(db_path = %db_path, read_only, "connection scope opened");

    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!(db_path = %db_path, "connection scope committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "rollback failed");
            } else {
                debug!(db_path = %db_path, "connection scope rolled back");
            }
            Err(err)
        }
    }
}
