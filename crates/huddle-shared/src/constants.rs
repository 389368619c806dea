/// Separator placed between the parts of a composite local key
pub const KEY_SEPARATOR: char = '-';

/// Escape character used when a key part contains the separator
pub const KEY_ESCAPE: char = '\\';

/// File extension of the per-server SQLite databases
pub const DB_FILE_EXTENSION: &str = "db";

/// Upper bound on bound parameters per `IN (...)` lookup
pub const MAX_LOOKUP_CHUNK: usize = 500;

/// Default capacity of the per-server write queue
pub const DEFAULT_QUEUE_BOUND: usize = 64;

/// Default SQLite busy timeout in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
