//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use vouch_core::store::{DocumentStore, Record};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vouch document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn put<R: Record>(&self, table: &str, record: &R) -> Result<()> {
    let tbl = table.to_owned();
    let id  = record.primary_key();
    let doc = serde_json::to_string(record)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (tbl, id, doc) VALUES (?1, ?2, ?3)
           ON CONFLICT (tbl, id) DO UPDATE SET doc = excluded.doc",
          rusqlite::params![tbl, id, doc],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get<R: Record>(&self, table: &str, id: &str) -> Result<Option<R>> {
    let tbl = table.to_owned();
    let id  = id.to_owned();

    let doc: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT doc FROM documents WHERE tbl = ?1 AND id = ?2",
              rusqlite::params![tbl, id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    doc
      .map(|d| serde_json::from_str(&d))
      .transpose()
      .map_err(Error::from)
  }

  async fn put_if<R: Record>(&self, table: &str, record: &R, expected: &R) -> Result<bool> {
    let tbl = table.to_owned();
    let id  = record.primary_key();
    let doc = serde_json::to_string(record)?;
    // Serialisation is deterministic (struct field order), so equality of the
    // stored text is equality of the document the caller read.
    let expected_doc = serde_json::to_string(expected)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET doc = ?4 WHERE tbl = ?1 AND id = ?2 AND doc = ?3",
          rusqlite::params![tbl, id, expected_doc, doc],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }
}
