//! Persistent QA cache backed by SQLite

pub mod sqlite;

pub use sqlite::SqliteQaCache;
