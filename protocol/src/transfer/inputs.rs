//! # Input Sets
//!
//! The inputs of a transfer are references to outputs of prior transfers:
//! each [`OutputReference`] names the producing transfer by its identifier
//! and selects one of its outputs by index. A transfer consumes every
//! referenced output in full.
//!
//! [`Inputs`] keeps its references in canonical order — ascending by
//! transfer id bytes, then by output index — and refuses duplicates, so two
//! input sets with the same logical membership always encode to identical
//! bytes. Decoding is strict for the same reason: a byte stream whose
//! entries are unsorted or duplicated is malformed, not merely unsorted.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::id::{TransferId, TRANSFER_ID_LENGTH};
use crate::codec::{ByteReader, ByteWriter, CodecError};

/// Encoded width of one reference: 32-byte transfer id + 2-byte selector.
const REFERENCE_LENGTH: usize = TRANSFER_ID_LENGTH + 2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building or decoding an input set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputsError {
    /// Two references in the set are identical.
    #[error("duplicate input reference {0}")]
    Duplicate(OutputReference),

    /// Encoded references are not in canonical ascending order.
    #[error("input reference out of canonical order at position {position}")]
    OutOfOrder {
        /// Zero-based position of the offending entry.
        position: usize,
    },

    /// The byte stream is truncated or declares more entries than it holds.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// OutputReference
// ---------------------------------------------------------------------------

/// A reference to a single output of a previously booked transfer.
///
/// Ordering is canonical set order: transfer id bytes first, then the
/// numeric output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OutputReference {
    transfer_id: TransferId,
    output_index: u16,
}

impl OutputReference {
    /// Creates a reference to output `output_index` of `transfer_id`.
    pub fn new(transfer_id: TransferId, output_index: u16) -> Self {
        Self {
            transfer_id,
            output_index,
        }
    }

    /// The transfer that produced the referenced output.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    /// Which of the producing transfer's outputs is consumed.
    pub fn output_index(&self) -> u16 {
        self.output_index
    }
}

impl fmt::Display for OutputReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transfer_id, self.output_index)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The canonical, deduplicated set of output references a transfer consumes.
///
/// Immutable after construction. An empty set is valid — genesis-style
/// transfers consume nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inputs {
    references: Vec<OutputReference>,
}

impl Inputs {
    /// Builds an input set from references in any order.
    ///
    /// Sorts into canonical order and fails with [`InputsError::Duplicate`]
    /// if two references are identical.
    pub fn new<I>(references: I) -> Result<Self, InputsError>
    where
        I: IntoIterator<Item = OutputReference>,
    {
        let mut references: Vec<_> = references.into_iter().collect();
        references.sort_unstable();
        for pair in references.windows(2) {
            if pair[0] == pair[1] {
                return Err(InputsError::Duplicate(pair[0]));
            }
        }
        Ok(Self { references })
    }

    /// Number of references in the set.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Returns `true` if the set consumes nothing.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Iterates over the references in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &OutputReference> {
        self.references.iter()
    }

    /// Returns `true` if the set contains `reference`.
    pub fn contains(&self, reference: &OutputReference) -> bool {
        self.references.binary_search(reference).is_ok()
    }

    /// Serializes the set to its canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer =
            ByteWriter::with_capacity(4 + self.references.len() * REFERENCE_LENGTH);
        self.write_into(&mut writer);
        writer.into_bytes()
    }

    /// Deserializes a set from the front of `bytes`.
    ///
    /// Returns the set and the number of bytes consumed. Trailing bytes are
    /// left for the caller.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), InputsError> {
        let mut reader = ByteReader::new(bytes);
        let inputs = Self::read_from(&mut reader)?;
        Ok((inputs, reader.offset()))
    }

    pub(crate) fn write_into(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.references.len() as u32);
        for reference in &self.references {
            writer.write_bytes(reference.transfer_id.as_bytes());
            writer.write_u16(reference.output_index);
        }
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, InputsError> {
        let count = reader.read_u32()? as usize;
        // The declared count is validated against the buffer before any
        // allocation happens.
        reader.expect_elements(count, REFERENCE_LENGTH)?;

        let mut references = Vec::with_capacity(count);
        for position in 0..count {
            let transfer_id = TransferId::from(reader.read_array::<TRANSFER_ID_LENGTH>()?);
            let output_index = reader.read_u16()?;
            let reference = OutputReference::new(transfer_id, output_index);

            if let Some(previous) = references.last() {
                if *previous == reference {
                    return Err(InputsError::Duplicate(reference));
                }
                if *previous > reference {
                    return Err(InputsError::OutOfOrder { position });
                }
            }
            references.push(reference);
        }
        Ok(Self { references })
    }
}

impl fmt::Display for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, reference) in self.references.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{reference}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
