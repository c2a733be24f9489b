//! # Hashing
//!
//! BLAKE2b-256 is the identity digest of the ledger: a transfer's ID is the
//! BLAKE2b-256 hash of its canonical byte encoding. The 256-bit output keeps
//! identifiers at a fixed 32 bytes, and BLAKE2b needs no double-hashing —
//! it is not vulnerable to length-extension attacks in the first place.
//!
//! The digest function is part of the wire contract: every node must derive
//! the same identifier from the same bytes, so changing it is a hard fork.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// BLAKE2b parameterized to a 32-byte digest.
type Blake2b256 = Blake2b<U32>;

/// Computes the BLAKE2b-256 hash of the input data.
///
/// Returns the 32-byte digest as a fixed-size array, ready to be wrapped
/// into a transfer identifier.
///
/// # Example
///
/// ```
/// use aurum_protocol::crypto::blake2b_256;
///
/// let digest = blake2b_256(b"aurum");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
