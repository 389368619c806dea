//! Store configuration loaded from environment variables.
//!
//! All settings have sensible defaults so a store can be opened with zero
//! configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use huddle_shared::constants::{DB_FILE_EXTENSION, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_QUEUE_BOUND};

use crate::error::{Result, StoreError};

const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one database file per server.
    /// Env: `HUDDLE_DATA_DIR`
    /// Default: the platform data directory (see [`StoreConfig::data_dir`]).
    pub data_dir: Option<PathBuf>,

    /// SQLite journal mode.
    /// Env: `HUDDLE_JOURNAL_MODE`
    /// Default: `WAL`
    pub journal_mode: String,

    /// How long a connection waits on a locked database before failing.
    /// Env: `HUDDLE_BUSY_TIMEOUT_MS`
    /// Default: 5000 ms
    pub busy_timeout: Duration,

    /// Capacity of the per-server write queue used by the runtime.
    /// Env: `HUDDLE_QUEUE_BOUND`
    /// Default: `64`
    pub queue_bound: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            journal_mode: "WAL".to_string(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            queue_bound: DEFAULT_QUEUE_BOUND,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("HUDDLE_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Ok(mode) = std::env::var("HUDDLE_JOURNAL_MODE") {
            match parse_journal_mode(&mode) {
                Some(mode) => config.journal_mode = mode,
                None => {
                    tracing::warn!(value = %mode, "Invalid HUDDLE_JOURNAL_MODE, using default");
                }
            }
        }

        if let Ok(val) = std::env::var("HUDDLE_BUSY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.busy_timeout = Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid HUDDLE_BUSY_TIMEOUT_MS, using default");
                }
            }
        }

        if let Ok(val) = std::env::var("HUDDLE_QUEUE_BOUND") {
            match val.parse::<usize>() {
                // a zero-capacity mpsc channel panics
                Ok(n) => config.queue_bound = n.max(1),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid HUDDLE_QUEUE_BOUND, using default");
                }
            }
        }

        config
    }

    /// Resolve the directory that holds the server databases.
    ///
    /// Without an explicit `data_dir` this is the platform data directory:
    /// - Linux:   `~/.local/share/huddle`
    /// - macOS:   `~/Library/Application Support/chat.huddle.huddle`
    /// - Windows: `{FOLDERID_RoamingAppData}\huddle\huddle\data`
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let project_dirs =
            ProjectDirs::from("chat", "huddle", "huddle").ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().to_path_buf())
    }

    /// Path of the database file for one server.
    pub fn database_path(&self, server_url: &str) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(database_file_name(server_url)))
    }
}

/// File name of a server's database: the BLAKE3 digest of the normalized
/// server URL. Fixed length whatever the URL, so long URLs stay under the
/// file system's name limit.
pub fn database_file_name(server_url: &str) -> String {
    let normalized = server_url.trim().trim_end_matches('/');
    format!("{}.{}", blake3::hash(normalized.as_bytes()).to_hex(), DB_FILE_EXTENSION)
}

fn parse_journal_mode(value: &str) -> Option<String> {
    let upper = value.trim().to_ascii_uppercase();
    JOURNAL_MODES.contains(&upper.as_str()).then_some(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.journal_mode, "WAL");
        assert_eq!(config.queue_bound, DEFAULT_QUEUE_BOUND);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_database_file_name_ignores_trailing_slash() {
        assert_eq!(
            database_file_name("https://chat.example.com/"),
            database_file_name("https://chat.example.com")
        );
        assert_ne!(
            database_file_name("https://a.example.com"),
            database_file_name("https://b.example.com")
        );
        assert!(database_file_name("x").ends_with(".db"));
    }

    #[test]
    fn test_database_file_name_length_is_bounded() {
        let long_url = format!("https://chat.example.com/{}", "segment/".repeat(64));
        let name = database_file_name(&long_url);
        assert_eq!(name.len(), 64 + ".db".len());
        assert_ne!(name, database_file_name("https://chat.example.com"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/tmp/huddle-test")),
            ..StoreConfig::default()
        };
        let path = config.database_path("https://chat.example.com").unwrap();
        assert!(path.starts_with("/tmp/huddle-test"));
    }

    #[test]
    fn test_invalid_queue_bound_falls_back_to_default() {
        std::env::set_var("HUDDLE_QUEUE_BOUND", "plenty");
        assert_eq!(StoreConfig::from_env().queue_bound, DEFAULT_QUEUE_BOUND);

        std::env::set_var("HUDDLE_QUEUE_BOUND", "0");
        assert_eq!(StoreConfig::from_env().queue_bound, 1);

        std::env::remove_var("HUDDLE_QUEUE_BOUND");
    }

    #[test]
    fn test_parse_journal_mode() {
        assert_eq!(parse_journal_mode("wal"), Some("WAL".to_string()));
        assert_eq!(parse_journal_mode("fast"), None);
    }
}
