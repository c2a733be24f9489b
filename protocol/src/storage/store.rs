//! # ObjectStore — Typed Content-Addressed Persistence
//!
//! A thin, typed layer over a sled tree. Each object kind gets its own
//! named tree within the database, keyed by the object's identity bytes and
//! holding its marshaled canonical form. sled gives us lock-free concurrent
//! reads and crash-safe writes; this layer adds the [`StorableObject`]
//! contract on top:
//!
//! - storing the same object twice is an idempotent no-op;
//! - storing *different* content under an existing key routes through the
//!   object's `update` hook — which, for append-only objects like
//!   transfers, aborts the process rather than corrupting the ledger;
//! - loading decodes through `unmarshal` with the key available, so
//!   content-addressed objects never re-hash on the way out.
//!
//! The store holds no locks of its own and is cheap to clone; clones share
//! the underlying tree.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use sled::{Db, Tree};
use thiserror::Error;
use tracing::{debug, trace};

use super::object::StorableObject;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing sled database failed.
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    /// A stored blob failed to decode — the store holds corrupt data.
    #[error("corrupt object under key {key}: {source}")]
    Corrupt {
        /// Base-58 rendering of the offending key.
        key: String,
        /// The decode failure reported by the object type.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Shorthand result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// A typed, content-addressed object store over one sled tree.
pub struct ObjectStore<T: StorableObject> {
    tree: Tree,
    _object: PhantomData<fn() -> T>,
}

impl<T: StorableObject> ObjectStore<T> {
    /// Opens (or creates) a store at `path`, using the named tree.
    pub fn open<P: AsRef<Path>>(path: P, tree: &str) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db, tree)
    }

    /// Opens a named tree from an already-open database.
    ///
    /// Use this when several object kinds share one database file.
    pub fn from_db(db: &Db, tree: &str) -> StoreResult<Self> {
        Ok(Self {
            tree: db.open_tree(tree)?,
            _object: PhantomData,
        })
    }

    /// Creates a store backed by a temporary database that is removed when
    /// the last handle drops.
    ///
    /// Ideal for tests — no filesystem residue, no cleanup.
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(&db, "objects")
    }

    /// Persists an object under its own storage key.
    ///
    /// Re-storing identical content is a no-op. Storing different content
    /// under an existing key routes through the object's
    /// [`update`](StorableObject::update) hook; for append-only objects
    /// that hook aborts, for mutable ones the merged state is written back.
    pub fn store(&self, object: &T) -> StoreResult<()> {
        let key = object.storage_key();
        let value = object.marshal();

        match self.tree.get(&key)? {
            Some(existing) if existing.as_ref() == value.as_slice() => {
                trace!(key = %base58(&key), "object already stored");
                Ok(())
            }
            Some(existing) => {
                let mut current = self.decode(&key, &existing)?;
                current.update(object);
                self.tree.insert(key.as_slice(), current.marshal())?;
                debug!(key = %base58(&key), "merged update into stored object");
                Ok(())
            }
            None => {
                self.tree.insert(key.as_slice(), value)?;
                debug!(key = %base58(&key), "stored object");
                Ok(())
            }
        }
    }

    /// Loads the object stored under `key`, if any.
    pub fn load(&self, key: &[u8]) -> StoreResult<Option<T>> {
        match self.tree.get(key)? {
            Some(bytes) => {
                let object = self.decode(key, &bytes)?;
                trace!(key = %base58(key), "loaded object");
                Ok(Some(object))
            }
            None => Ok(None),
        }
    }

    /// Returns `true` if an object is stored under `key`.
    pub fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.tree.contains_key(key)?)
    }

    /// Evicts the object stored under `key`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&self, key: &[u8]) -> StoreResult<bool> {
        let removed = self.tree.remove(key)?.is_some();
        if removed {
            debug!(key = %base58(key), "removed object");
        }
        Ok(removed)
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Blocks until all pending writes are durable on disk.
    pub fn flush(&self) -> StoreResult<()> {
        self.tree.flush()?;
        Ok(())
    }

    fn decode(&self, key: &[u8], bytes: &[u8]) -> StoreResult<T> {
        T::unmarshal(key, bytes).map_err(|source| StoreError::Corrupt {
            key: base58(key),
            source: Box::new(source),
        })
    }
}

impl<T: StorableObject> Clone for ObjectStore<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            _object: PhantomData,
        }
    }
}

impl<T: StorableObject> fmt::Debug for ObjectStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("tree", &self.tree.name())
            .field("len", &self.len())
            .finish()
    }
}

fn base58(key: &[u8]) -> String {
    bs58::encode(key).into_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::string::FromUtf8Error;

    // -- Test object types ---------------------------------------------------

    /// A mutable object whose updates merge: the highest revision wins.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Revision {
        key: u8,
        revision: u8,
    }

    impl StorableObject for Revision {
        type DecodeError = Infallible;

        fn storage_key(&self) -> Vec<u8> {
            vec![self.key]
        }

        fn marshal(&self) -> Vec<u8> {
            vec![self.key, self.revision]
        }

        fn unmarshal(key: &[u8], bytes: &[u8]) -> Result<Self, Infallible> {
            Ok(Self {
                key: key[0],
                revision: bytes[1],
            })
        }

        fn update(&mut self, other: &Self) {
            self.revision = self.revision.max(other.revision);
        }
    }

    /// An append-only object: conflicting re-stores are fatal.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Sealed {
        key: u8,
        text: String,
    }

    impl StorableObject for Sealed {
        type DecodeError = FromUtf8Error;

        fn storage_key(&self) -> Vec<u8> {
            vec![self.key]
        }

        fn marshal(&self) -> Vec<u8> {
            self.text.as_bytes().to_vec()
        }

        fn unmarshal(key: &[u8], bytes: &[u8]) -> Result<Self, FromUtf8Error> {
            Ok(Self {
                key: key[0],
                text: String::from_utf8(bytes.to_vec())?,
            })
        }

        fn update(&mut self, _other: &Self) {
            panic!("sealed objects are immutable");
        }
    }

    // -- Tests ---------------------------------------------------------------

    #[test]
    fn store_and_load_roundtrip() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        let object = Sealed {
            key: 1,
            text: "genesis".into(),
        };

        store.store(&object).unwrap();
        let loaded = store.load(&[1]).unwrap().expect("object should exist");
        assert_eq!(loaded, object);
    }

    #[test]
    fn load_missing_key_returns_none() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        assert!(store.load(&[9]).unwrap().is_none());
    }

    #[test]
    fn identical_restore_is_idempotent() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        let object = Sealed {
            key: 1,
            text: "once".into(),
        };
        store.store(&object).unwrap();
        store.store(&object).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    #[should_panic(expected = "immutable")]
    fn conflicting_restore_of_sealed_object_is_fatal() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        store
            .store(&Sealed {
                key: 1,
                text: "first".into(),
            })
            .unwrap();
        // Same key, different content: the update tripwire fires.
        let _ = store.store(&Sealed {
            key: 1,
            text: "second".into(),
        });
    }

    #[test]
    fn conflicting_restore_of_mutable_object_merges() {
        let store = ObjectStore::<Revision>::temporary().unwrap();
        store.store(&Revision { key: 1, revision: 5 }).unwrap();
        store.store(&Revision { key: 1, revision: 3 }).unwrap();

        let loaded = store.load(&[1]).unwrap().unwrap();
        assert_eq!(loaded.revision, 5);

        store.store(&Revision { key: 1, revision: 8 }).unwrap();
        let loaded = store.load(&[1]).unwrap().unwrap();
        assert_eq!(loaded.revision, 8);
    }

    #[test]
    fn contains_and_remove() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        let object = Sealed {
            key: 7,
            text: "ephemeral".into(),
        };
        store.store(&object).unwrap();
        assert!(store.contains(&[7]).unwrap());

        assert!(store.remove(&[7]).unwrap());
        assert!(!store.contains(&[7]).unwrap());
        assert!(!store.remove(&[7]).unwrap());
    }

    #[test]
    fn len_tracks_distinct_keys() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        assert!(store.is_empty());
        for key in 0..4u8 {
            store
                .store(&Sealed {
                    key,
                    text: format!("object-{key}"),
                })
                .unwrap();
        }
        assert_eq!(store.len(), 4);
        assert!(!store.is_empty());
    }

    #[test]
    fn clones_share_the_tree() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        let clone = store.clone();
        store
            .store(&Sealed {
                key: 2,
                text: "shared".into(),
            })
            .unwrap();
        assert!(clone.contains(&[2]).unwrap());
    }

    #[test]
    fn flush_does_not_error() {
        let store = ObjectStore::<Sealed>::temporary().unwrap();
        store
            .store(&Sealed {
                key: 1,
                text: "durable".into(),
            })
            .unwrap();
        store.flush().expect("flush should succeed");
    }
}
