//! # Object Storage
//!
//! The content-addressed persistence layer for ledger objects.
//!
//! ```text
//! object.rs — StorableObject: the key/marshal/unmarshal/no-update contract
//! store.rs  — ObjectStore<T>: a typed sled tree enforcing that contract
//! ```
//!
//! Every persisted entity implements [`StorableObject`]: its storage key is
//! derived from its identity, its binary form is its canonical encoding,
//! and — for append-only objects like transfers — any attempt to update an
//! already-stored object is a fatal contract violation, not a recoverable
//! error. The store never invents keys and never rewrites content-addressed
//! entries; identical re-stores are idempotent no-ops.

pub mod object;
pub mod store;

pub use object::StorableObject;
pub use store::{ObjectStore, StoreError, StoreResult};
