//! SQL DDL for initializing the quote storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, assigned on insert
/// - `date_of_birth` as `YYYY-MM-DD` text
/// - `monthly_premium` REAL dollars, rounded to cents before insert
/// - `created_at` as `YYYY-MM-DD HH:MM:SS` UTC text, defaulting to insert time
/// - Index on `created_at` for the rolling-window searches
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    zip_code TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    monthly_premium REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_quotes_created_at ON quotes(created_at);
"#;

/// Text layout of `created_at`, matching SQLite's `CURRENT_TIMESTAMP`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text layout of `date_of_birth`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
