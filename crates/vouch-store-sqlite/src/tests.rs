//! Integration tests for `SqliteStore` against an in-memory database, driving
//! the record managers end to end.

use vouch_core::{
  identity::{IdentifierKind, IdentityManager, IdentityRecord},
  key::KeyManager,
  store::DocumentStore,
};

use crate::SqliteStore;

const KEYS: &str = "keys";
const IDENTITIES: &str = "identities";
const PHONE: &str = "+15550001234";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn identity(code: &str, verified: bool) -> IdentityRecord {
  IdentityRecord {
    id:       PHONE.to_owned(),
    kind:     IdentifierKind::Phone,
    key_id:   "k1".to_owned(),
    code:     code.to_owned(),
    verified,
  }
}

// ─── Document semantics ──────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_document_returns_none() {
  let s = store().await;
  let found: Option<IdentityRecord> = s.get(IDENTITIES, PHONE).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn put_is_an_upsert() {
  let s = store().await;

  s.put(IDENTITIES, &identity("111111", false)).await.unwrap();
  s.put(IDENTITIES, &identity("222222", true)).await.unwrap();

  let got: IdentityRecord = s.get(IDENTITIES, PHONE).await.unwrap().unwrap();
  assert_eq!(got.code, "222222");
  assert!(got.verified);
}

#[tokio::test]
async fn put_if_applies_only_when_document_is_unchanged() {
  let s = store().await;

  let original = identity("111111", false);
  s.put(IDENTITIES, &original).await.unwrap();

  let first = identity("222222", false);
  assert!(s.put_if(IDENTITIES, &first, &original).await.unwrap());

  // A second writer still holding the original snapshot must lose.
  let second = identity("333333", false);
  assert!(!s.put_if(IDENTITIES, &second, &original).await.unwrap());

  let got: IdentityRecord = s.get(IDENTITIES, PHONE).await.unwrap().unwrap();
  assert_eq!(got.code, "222222");
}

#[tokio::test]
async fn put_if_on_missing_document_is_stale() {
  let s = store().await;

  let record = identity("111111", false);
  assert!(!s.put_if(IDENTITIES, &record, &record).await.unwrap());

  let found: Option<IdentityRecord> = s.get(IDENTITIES, PHONE).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn logical_tables_are_isolated() {
  let s = store().await;

  s.put(IDENTITIES, &identity("111111", false)).await.unwrap();
  s.put("staging", &identity("999999", true)).await.unwrap();

  let live: IdentityRecord = s.get(IDENTITIES, PHONE).await.unwrap().unwrap();
  let staged: IdentityRecord = s.get("staging", PHONE).await.unwrap().unwrap();
  assert_eq!(live.code, "111111");
  assert_eq!(staged.code, "999999");
}

// ─── Manager scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn full_enrollment_round_trip() {
  let s = store().await;
  let keys = KeyManager::new(s.clone(), KEYS);
  let ids = IdentityManager::new(s.clone(), IDENTITIES);

  let key_id = keys.create().await.unwrap();
  let code = ids.create(PHONE, &key_id.to_string()).await.unwrap();

  let record = ids.verify(PHONE, &code).await.unwrap().unwrap();
  assert!(record.verified);
  assert_eq!(record.key_id, key_id.to_string());

  let fetched = ids.get_verified(PHONE).await.unwrap().unwrap();
  assert_eq!(fetched, record);

  // The bound key is retrievable through its own manager.
  let key = keys.get(&fetched.key_id).await.unwrap().unwrap();
  assert!(!key.encryption_key.is_empty());
}

#[tokio::test]
async fn wrong_code_leaves_stored_record_untouched() {
  let s = store().await;
  let ids = IdentityManager::new(s.clone(), IDENTITIES);

  let code = ids.create(PHONE, "k1").await.unwrap();
  let wrong = if code == "000000" { "000001" } else { "000000" };

  assert!(ids.verify(PHONE, wrong).await.unwrap().is_none());

  let stored: IdentityRecord = s.get(IDENTITIES, PHONE).await.unwrap().unwrap();
  assert!(!stored.verified);
  assert_eq!(stored.code, code);

  // The genuine code still verifies, and consumes itself.
  assert!(ids.verify(PHONE, &code).await.unwrap().is_some());
  assert!(ids.verify(PHONE, &code).await.unwrap().is_none());
}

#[tokio::test]
async fn rotation_is_persisted_before_verify_returns() {
  let s = store().await;
  let ids = IdentityManager::new(s.clone(), IDENTITIES);

  let code = ids.create(PHONE, "k1").await.unwrap();
  let record = ids.verify(PHONE, &code).await.unwrap().unwrap();

  let stored: IdentityRecord = s.get(IDENTITIES, PHONE).await.unwrap().unwrap();
  assert_eq!(stored, record, "returned record must match storage");
  assert_ne!(stored.code, code);
}

#[tokio::test]
async fn set_new_code_round_trip() {
  let s = store().await;
  let ids = IdentityManager::new(s.clone(), IDENTITIES);

  let old = ids.create(PHONE, "k1").await.unwrap();
  let new = ids.set_new_code(PHONE).await.unwrap();
  assert_ne!(old, new);

  assert!(ids.verify(PHONE, &old).await.unwrap().is_none());
  let record = ids.verify(PHONE, &new).await.unwrap().unwrap();
  assert!(record.verified);
}

#[tokio::test]
async fn managers_share_state_across_store_clones() {
  let s = store().await;

  let code = IdentityManager::new(s.clone(), IDENTITIES)
    .create(PHONE, "k1")
    .await
    .unwrap();

  // A manager built over another clone of the connection sees the record.
  let record = IdentityManager::new(s.clone(), IDENTITIES)
    .verify(PHONE, &code)
    .await
    .unwrap()
    .unwrap();
  assert!(record.verified);
}
