//! The `DocumentStore` trait and the `Record` bound it operates on.
//!
//! The trait is implemented by storage backends (e.g. `vouch-store-sqlite`).
//! The managers in this crate depend on this abstraction, not on any concrete
//! backend. A backend is a plain key-value document store: two logical tables,
//! addressed by name, each holding records addressed by primary key.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};

/// A typed document that can live in a [`DocumentStore`] table.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
  /// Value of the primary-key attribute under which the record is stored.
  fn primary_key(&self) -> String;
}

/// Abstraction over the backing key-value datastore.
///
/// Absence is an explicit `Ok(None)` result, distinct from backend failure.
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Unconditional upsert by primary key.
  fn put<R: Record>(
    &self,
    table: &str,
    record: &R,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Point lookup by primary key. Returns `None` if no record is stored.
  fn get<R: Record>(
    &self,
    table: &str,
    id: &str,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send;

  /// Conditional upsert: writes `record` only if the stored document for its
  /// primary key is still identical to `expected`.
  ///
  /// Returns `false` when the stored document changed since `expected` was
  /// read; the write is not applied in that case. Callers use this as an
  /// optimistic-concurrency guard around read-then-write sequences.
  fn put_if<R: Record>(
    &self,
    table: &str,
    record: &R,
    expected: &R,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
