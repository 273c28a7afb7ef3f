//! Core types and trait definitions for the Vouch identity keystore.
//!
//! This crate is deliberately free of database dependencies. It defines the
//! record types, the [`store::DocumentStore`] abstraction over the backing
//! key-value datastore, and the two record managers that own the business
//! rules: [`key::KeyManager`] for encryption-key material and
//! [`identity::IdentityManager`] for the identifier verification state
//! machine. Backend crates (e.g. `vouch-store-sqlite`) implement the store
//! trait; embedding processes own transport, code delivery, and retry policy.

pub mod error;
pub mod identity;
pub mod key;
pub mod secret;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
