//! Storage layer: repositories over the shared SQLite connection.

pub mod sqlite;
