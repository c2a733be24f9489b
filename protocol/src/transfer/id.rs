//! # Transfer Identifiers
//!
//! A [`TransferId`] is the content-derived identity of a transfer: the
//! BLAKE2b-256 digest of its canonical byte encoding. The same 32 bytes
//! double as the transfer's storage key, which is what makes the object
//! store content-addressed — there is no separate key space to keep in
//! sync with the data.
//!
//! Identifiers are ordered and compared byte-wise, never through their
//! display form. The base-58 rendering exists purely for humans reading
//! logs and API responses; it is not an identity channel and there is
//! deliberately no `FromStr`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes in a [`TransferId`].
pub const TRANSFER_ID_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a [`TransferId`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransferIdError {
    /// The source byte slice is not exactly [`TRANSFER_ID_LENGTH`] bytes.
    #[error("invalid identifier length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes actually provided.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// TransferId
// ---------------------------------------------------------------------------

/// The 32-byte hash-derived identity and storage key of a transfer.
///
/// Constructed from exactly 32 raw bytes or from a digest; never mutated
/// afterwards. Equality, ordering, and hashing all operate on the raw
/// bytes, so a `TransferId` is directly usable as a map key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferId([u8; TRANSFER_ID_LENGTH]);

impl TransferId {
    /// Creates an identifier from a byte slice of exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransferIdError> {
        if bytes.len() != TRANSFER_ID_LENGTH {
            return Err(TransferIdError::InvalidLength {
                expected: TRANSFER_ID_LENGTH,
                got: bytes.len(),
            });
        }
        let mut id = [0u8; TRANSFER_ID_LENGTH];
        id.copy_from_slice(bytes);
        Ok(Self(id))
    }

    /// Returns the raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; TRANSFER_ID_LENGTH] {
        &self.0
    }

    /// Renders the identifier as a base-58 string, for display only.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl From<[u8; TRANSFER_ID_LENGTH]> for TransferId {
    fn from(bytes: [u8; TRANSFER_ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransferId({})", self.to_base58())
    }
}

impl Serialize for TransferId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base58())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for TransferId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let bytes = bs58::decode(&s)
                .into_vec()
                .map_err(serde::de::Error::custom)?;
            TransferId::from_bytes(&bytes).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            TransferId::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_bytes_accepts_exact_length() {
        let id = TransferId::from_bytes(&[7u8; 32]).unwrap();
        assert_eq!(id.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn from_bytes_rejects_wrong_lengths() {
        let short = TransferId::from_bytes(&[0u8; 31]).unwrap_err();
        assert_eq!(
            short,
            TransferIdError::InvalidLength {
                expected: 32,
                got: 31,
            }
        );
        let long = TransferId::from_bytes(&[0u8; 33]).unwrap_err();
        assert_eq!(
            long,
            TransferIdError::InvalidLength {
                expected: 32,
                got: 33,
            }
        );
        assert!(TransferId::from_bytes(&[]).is_err());
    }

    #[test]
    fn ordering_is_byte_wise() {
        let low = TransferId::from([0u8; 32]);
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        let high = TransferId::from(bytes);
        assert!(low < high);

        // The first differing byte decides, regardless of later bytes.
        let mut a = [0xFFu8; 32];
        a[0] = 0x01;
        let mut b = [0x00u8; 32];
        b[0] = 0x02;
        assert!(TransferId::from(a) < TransferId::from(b));
    }

    #[test]
    fn display_is_base58() {
        let id = TransferId::from([0u8; 32]);
        // 32 zero bytes encode to 32 '1' characters in base-58.
        assert_eq!(id.to_string(), "1".repeat(32));
        assert_eq!(format!("{id:?}"), format!("TransferId({})", "1".repeat(32)));
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        let id = TransferId::from([42u8; 32]);
        map.insert(id, "spent");
        assert_eq!(map.get(&TransferId::from([42u8; 32])), Some(&"spent"));
    }

    #[test]
    fn serde_json_roundtrip_via_base58() {
        let id = TransferId::from([9u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_base58()));
        let recovered: TransferId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn serde_rejects_wrong_length_payload() {
        // base-58 of three bytes; too short to be an identifier.
        let json = format!("\"{}\"", bs58::encode([1u8, 2, 3]).into_string());
        assert!(serde_json::from_str::<TransferId>(&json).is_err());
    }
}
