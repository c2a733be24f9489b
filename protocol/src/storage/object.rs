//! The contract every persistable ledger object honors.

/// A binary-persistable object with an identity-derived storage key.
///
/// The contract the store relies on:
///
/// - [`storage_key`](Self::storage_key) is deterministic and derived from
///   the object's identity — for content-addressed objects, the identity
///   *is* the hash of the marshaled bytes.
/// - [`unmarshal`](Self::unmarshal) is the left inverse of
///   [`marshal`](Self::marshal): unmarshaling marshaled bytes under the
///   object's own key reproduces an equivalent object.
/// - [`update`](Self::update) is invoked by the store when a write hits an
///   existing key with different content. Mutable objects merge the new
///   state into themselves; append-only objects panic, because a
///   conflicting write to a content-addressed entry means an invariant
///   upstream is already broken.
pub trait StorableObject: Sized {
    /// Decode failure type returned by [`unmarshal`](Self::unmarshal).
    type DecodeError: std::error::Error + Send + Sync + 'static;

    /// The key this object is stored under; equals its identity bytes.
    fn storage_key(&self) -> Vec<u8>;

    /// The binary form persisted to the backing store.
    fn marshal(&self) -> Vec<u8>;

    /// Reconstructs an object from its storage key and persisted bytes.
    fn unmarshal(key: &[u8], bytes: &[u8]) -> Result<Self, Self::DecodeError>;

    /// Merges `other` into `self` on a conflicting re-store.
    ///
    /// Append-only objects must panic here instead of mutating.
    fn update(&mut self, other: &Self);
}
