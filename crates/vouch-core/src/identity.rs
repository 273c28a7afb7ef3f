//! Identity records and the verification state machine.
//!
//! Each identifier (phone number, or eventually email address) moves through
//! three states: unregistered (no record), pending (record exists,
//! `verified == false`), and verified. Registration issues a six-digit code
//! the caller delivers out of band; presenting that code back flips the record
//! to verified and rotates the code so the consumed value can never be
//! replayed. The verified flag never reverts, and records are never deleted
//! here.
//!
//! `verify` and `get_verified` answer every non-disclosing miss (unknown
//! identifier, wrong code, not yet verified) with the same `None`, so callers
//! cannot probe which identifiers exist. Only `set_new_code`, meant for an
//! already-authenticated re-issuance flow, discloses existence.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  secret, validate,
  store::{DocumentStore, Record},
};

/// Kind of identifier a record binds. `Email` is a reserved variant; no
/// current operation writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
  Phone,
  Email,
}

/// A stored identity. The identifier string itself is the primary key; there
/// is no surrogate id. Stored documents have the shape
/// `{"id": "+15550001234", "type": "phone", "keyId": "…", "code": "042917",
/// "verified": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
  /// The phone number or email address.
  pub id:       String,
  #[serde(rename = "type")]
  pub kind:     IdentifierKind,
  /// Reference to the encryption-key record; association only, no cascading
  /// lifecycle.
  pub key_id:   String,
  /// The current proof-of-ownership secret. Exactly one value is valid at a
  /// time; every rotation invalidates the prior one.
  pub code:     String,
  pub verified: bool,
}

impl Record for IdentityRecord {
  fn primary_key(&self) -> String {
    self.id.clone()
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Owns the verification state machine per identifier.
///
/// Mutating operations use the store's conditional write so a read-then-write
/// sequence cannot silently lose to a concurrent writer: a stale write is
/// retried once from a fresh read, and a second loss surfaces as
/// [`Error::Conflict`].
pub struct IdentityManager<S> {
  store: S,
  table: String,
}

/// Attempts per mutating operation before reporting a conflict: the initial
/// write plus one retry from a fresh read.
const WRITE_ATTEMPTS: usize = 2;

impl<S: DocumentStore> IdentityManager<S> {
  /// `table` names the backing identity table.
  pub fn new(store: S, table: impl Into<String>) -> Self {
    Self { store, table: table.into() }
  }

  /// Register `phone` bound to the key referenced by `key_id`, returning the
  /// verification code for out-of-band delivery.
  ///
  /// Registration is an unconditional upsert: re-registering an identifier
  /// overwrites the existing record, resetting it to unverified with a fresh
  /// code.
  pub async fn create(&self, phone: &str, key_id: &str) -> Result<String> {
    if !validate::is_phone(phone) {
      return Err(Error::InvalidArgument("malformed phone number"));
    }
    if key_id.is_empty() {
      return Err(Error::InvalidArgument("key reference must not be empty"));
    }

    let record = IdentityRecord {
      id:       phone.to_owned(),
      kind:     IdentifierKind::Phone,
      key_id:   key_id.to_owned(),
      code:     secret::generate_code(),
      verified: false,
    };
    self
      .store
      .put(&self.table, &record)
      .await
      .map_err(Error::store)?;
    tracing::debug!(phone, "registered identifier, verification pending");
    Ok(record.code)
  }

  /// Prove ownership of `phone` by presenting its current code.
  ///
  /// On match the record is marked verified and its code rotated; the updated
  /// record is returned only after the rotation is durably persisted. An
  /// unknown identifier and a wrong code both yield `None`, with no stored
  /// change in either case.
  pub async fn verify(&self, phone: &str, code: &str) -> Result<Option<IdentityRecord>> {
    if !validate::is_phone(phone) {
      return Err(Error::InvalidArgument("malformed phone number"));
    }
    if !validate::is_code(code) {
      return Err(Error::InvalidArgument("malformed verification code"));
    }

    for _ in 0..WRITE_ATTEMPTS {
      let current: Option<IdentityRecord> = self
        .store
        .get(&self.table, phone)
        .await
        .map_err(Error::store)?;
      let Some(current) = current else {
        return Ok(None);
      };
      if current.code != code {
        return Ok(None);
      }

      let mut updated = current.clone();
      updated.verified = true;
      updated.code = secret::generate_code();

      if self
        .store
        .put_if(&self.table, &updated, &current)
        .await
        .map_err(Error::store)?
      {
        tracing::debug!(phone, "identifier verified, code rotated");
        return Ok(Some(updated));
      }
      // Stale read: the record changed under us. Re-read and re-check; if the
      // presented code was consumed meanwhile, the next pass returns None.
    }
    Err(Error::Conflict(phone.to_owned()))
  }

  /// Fetch the record for `phone` only if it has been verified. Unknown and
  /// unverified identifiers both yield `None`.
  pub async fn get_verified(&self, phone: &str) -> Result<Option<IdentityRecord>> {
    if !validate::is_phone(phone) {
      return Err(Error::InvalidArgument("malformed phone number"));
    }
    let record: Option<IdentityRecord> = self
      .store
      .get(&self.table, phone)
      .await
      .map_err(Error::store)?;
    Ok(record.filter(|r| r.verified))
  }

  /// Rotate the code for an existing identifier, preserving its kind, key
  /// reference, and verified flag. Returns the new code.
  ///
  /// Fails with [`Error::NotFound`] if the identifier was never registered.
  /// This operation serves an already-authenticated re-issuance flow, so
  /// disclosing existence is intended.
  pub async fn set_new_code(&self, phone: &str) -> Result<String> {
    if !validate::is_phone(phone) {
      return Err(Error::InvalidArgument("malformed phone number"));
    }

    for _ in 0..WRITE_ATTEMPTS {
      let current: Option<IdentityRecord> = self
        .store
        .get(&self.table, phone)
        .await
        .map_err(Error::store)?;
      let Some(current) = current else {
        return Err(Error::NotFound(phone.to_owned()));
      };

      let mut updated = current.clone();
      updated.code = secret::generate_code();

      if self
        .store
        .put_if(&self.table, &updated, &current)
        .await
        .map_err(Error::store)?
      {
        tracing::debug!(phone, "issued replacement code");
        return Ok(updated.code);
      }
    }
    Err(Error::Conflict(phone.to_owned()))
  }
}
