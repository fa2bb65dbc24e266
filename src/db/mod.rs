//! Database module: the quote table and typed access to it.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `filter.rs`: allow-listed, parameterized query construction
//! - `sqlite.rs`: the storage handle

pub mod filter;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use filter::{FilterValue, QuoteField, QuoteFilter, QuoteQuery};
pub use models::{NewQuote, Quote};
pub use schema::SQLITE_INIT;
pub use sqlite::{QuoteStorage, SqlitePool};
