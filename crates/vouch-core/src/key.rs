//! Encryption-key records and their manager.
//!
//! Key material is decoupled from any identity: identity records point at a
//! key by id (association only), and nothing here knows identities exist.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  secret,
  store::{DocumentStore, Record},
};

/// A stored symmetric key. Stored documents have the shape
/// `{"id": "550e8400-…", "encryptionKey": "e9e0e7…"}`.
///
/// Created exactly once, never mutated afterwards. Deletion is not an
/// operation of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
  pub id:             Uuid,
  /// Hex-encoded symmetric key, generated at record creation.
  pub encryption_key: String,
}

impl Record for KeyRecord {
  fn primary_key(&self) -> String {
    self.id.to_string()
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Mints and retrieves [`KeyRecord`]s. Holds no state of its own; every
/// operation round-trips through the store.
pub struct KeyManager<S> {
  store: S,
  table: String,
}

impl<S: DocumentStore> KeyManager<S> {
  /// `table` names the backing key table; passed in explicitly so test
  /// doubles and multi-tenant setups need no process-wide configuration.
  pub fn new(store: S, table: impl Into<String>) -> Self {
    Self { store, table: table.into() }
  }

  /// Mint a new key record and return its id.
  ///
  /// Not idempotent: a retried call after a write failure produces a second,
  /// distinct record.
  pub async fn create(&self) -> Result<Uuid> {
    let record = KeyRecord {
      id:             Uuid::new_v4(),
      encryption_key: secret::generate_key(),
    };
    self
      .store
      .put(&self.table, &record)
      .await
      .map_err(Error::store)?;
    tracing::debug!(id = %record.id, "minted encryption key");
    Ok(record.id)
  }

  /// Look up a key record by id. Returns `None` if no such record is stored.
  pub async fn get(&self, id: &str) -> Result<Option<KeyRecord>> {
    if id.is_empty() {
      return Err(Error::InvalidArgument("key id must not be empty"));
    }
    self.store.get(&self.table, id).await.map_err(Error::store)
  }
}
