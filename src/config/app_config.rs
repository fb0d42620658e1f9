// ==========================================
// Printer inventory - application configuration
// ==========================================

use serde::Serialize;
use std::path::PathBuf;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "PRINTER_INVENTORY_DB_PATH";

/// Environment variable overriding the export file path
pub const EXPORT_PATH_ENV: &str = "PRINTER_INVENTORY_EXPORT_PATH";

/// Database file used when nothing else is configured (relative to cwd)
pub const DEFAULT_DB_FILE: &str = "printers.db";

/// Export file name used when nothing else is configured
pub const DEFAULT_EXPORT_FILE: &str = "Druckerliste_CARI_export.xlsx";

/// Runtime configuration for the CLI and the batch jobs
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub db_path: String,
    pub export_path: PathBuf,
}

impl AppConfig {
    /// Build the configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            db_path: get_default_db_path(),
            export_path: get_default_export_path(),
        }
    }

    /// Override the database path (e.g. from a CLI flag)
    pub fn with_db_path(mut self, db_path: Option<String>) -> Self {
        if let Some(path) = db_path.and_then(non_empty) {
            self.db_path = path;
        }
        self
    }

    /// Override the export path (e.g. from a CLI flag)
    pub fn with_export_path(mut self, export_path: Option<PathBuf>) -> Self {
        if let Some(path) = export_path {
            self.export_path = path;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_FILE.to_string(),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Default database path
///
/// `PRINTER_INVENTORY_DB_PATH` wins when set and non-empty; otherwise the
/// fixed `printers.db` in the working directory.
pub fn get_default_db_path() -> String {
    std::env::var(DB_PATH_ENV)
        .ok()
        .and_then(non_empty)
        .unwrap_or_else(|| DEFAULT_DB_FILE.to_string())
}

/// Default export path (`PRINTER_INVENTORY_EXPORT_PATH` or the fixed file name)
pub fn get_default_export_path() -> PathBuf {
    std::env::var(EXPORT_PATH_ENV)
        .ok()
        .and_then(non_empty)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, "printers.db");
        assert_eq!(config.export_path, PathBuf::from(DEFAULT_EXPORT_FILE));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let config = AppConfig::default()
            .with_db_path(Some("   ".to_string()))
            .with_export_path(None);
        assert_eq!(config.db_path, "printers.db");

        let config = config.with_db_path(Some(" other.db ".to_string()));
        assert_eq!(config.db_path, "other.db");
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }
}
