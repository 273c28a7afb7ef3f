//! SQL schema for the Vouch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Logical tables ("keys", "identities", ...) are rows in a single physical
/// table, keyed by (tbl, id). Table names stay data, never SQL identifiers,
/// so caller-configured names need no quoting rules.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS documents (
    tbl  TEXT NOT NULL,   -- logical table name
    id   TEXT NOT NULL,   -- primary-key attribute of the document
    doc  TEXT NOT NULL,   -- full record as a JSON document
    PRIMARY KEY (tbl, id)
);

PRAGMA user_version = 1;
";
