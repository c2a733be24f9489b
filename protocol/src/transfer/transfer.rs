//! # The Transfer Aggregate
//!
//! A [`Transfer`] is an immutable, content-addressed transaction: it
//! consumes the outputs referenced by its [`Inputs`] and books the deposits
//! described by its [`Outputs`]. Its identity is the BLAKE2b-256 digest of
//! its canonical byte encoding, and both the identity and the encoding are
//! derived lazily, on first demand, then memoized for the object's
//! lifetime.
//!
//! ## Why derived, not stored
//!
//! Most transfers arrive pre-encoded — from the object store or from a
//! peer — and the bytes that were hashed, gossiped, and persisted are the
//! source of truth. Re-encoding on arrival would duplicate work and risk
//! divergence from those bytes. Locally built transfers go the other way:
//! they should not pay for hashing or encoding until something actually
//! needs the identity, e.g. for deduplication or a map key.
//!
//! ## Concurrency
//!
//! Many tasks may hold a shared handle to the same transfer. Each derived
//! cache sits behind its own `parking_lot::RwLock`: readers take a shared
//! lock, and only on a miss escalate to an upgradable read, re-check, and
//! compute. A populated slot is never overwritten, so every caller
//! converges on the same value and nobody observes a partial one.

use std::fmt;

use bytes::Bytes;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use thiserror::Error;

use super::id::{TransferId, TransferIdError};
use super::inputs::{Inputs, InputsError};
use super::outputs::{Outputs, OutputsError};
use crate::codec::{ByteReader, ByteWriter};
use crate::crypto::hash::blake2b_256;
use crate::storage::StorableObject;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while reconstructing a transfer from bytes.
///
/// The variant identifies which section of the encoding failed; the wrapped
/// error carries the specific cause.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input section is malformed.
    #[error("input section: {0}")]
    Inputs(#[from] InputsError),

    /// The output section is malformed.
    #[error("output section: {0}")]
    Outputs(#[from] OutputsError),

    /// The storage key is not a valid identifier.
    #[error("storage key: {0}")]
    Key(#[from] TransferIdError),
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// An immutable, content-addressed value transfer.
///
/// Constructed fresh via [`Transfer::new`], reconstructed from persisted
/// bytes via [`Transfer::from_bytes`], or handed out as a key-only shell
/// via [`Transfer::from_storage_key`] while the store hydrates the body.
/// Once constructed there is no way to change the inputs or outputs, and
/// the derived identity and encoding are write-once.
pub struct Transfer {
    /// Consumed output references. `None` only for storage-key shells.
    inputs: Option<Inputs>,

    /// Created deposits. `None` only for storage-key shells.
    outputs: Option<Outputs>,

    /// Lazily computed identity; write-once.
    id: RwLock<Option<TransferId>>,

    /// Lazily computed (or decode-seeded) canonical encoding; write-once.
    bytes: RwLock<Option<Bytes>>,
}

impl Transfer {
    /// Creates a transfer from its inputs and outputs.
    ///
    /// Pure construction: nothing is hashed or encoded until
    /// [`id`](Self::id) or [`bytes`](Self::bytes) is first called.
    pub fn new(inputs: Inputs, outputs: Outputs) -> Self {
        Self {
            inputs: Some(inputs),
            outputs: Some(outputs),
            id: RwLock::new(None),
            bytes: RwLock::new(None),
        }
    }

    /// Reconstructs a transfer from the front of `bytes`.
    ///
    /// Parses the input section, then the output section, from a shared
    /// cursor. On success the returned transfer's canonical-bytes cache is
    /// pre-populated with exactly the consumed prefix — the stored bytes
    /// are the source of truth and are never re-encoded. Trailing bytes
    /// are ignored; the consumed count is returned alongside.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let inputs = Inputs::read_from(&mut reader)?;
        let outputs = Outputs::read_from(&mut reader)?;
        let consumed = reader.offset();

        let transfer = Self {
            inputs: Some(inputs),
            outputs: Some(outputs),
            id: RwLock::new(None),
            bytes: RwLock::new(Some(Bytes::copy_from_slice(&bytes[..consumed]))),
        };
        Ok((transfer, consumed))
    }

    /// Creates a key-only shell for the given storage key.
    ///
    /// The shell's identity is the key; inputs and outputs are unset. The
    /// store pairs every shell with a subsequent hydration step — calling
    /// any body-dependent accessor on a non-hydrated shell is a contract
    /// violation and aborts.
    pub fn from_storage_key(key: &[u8]) -> Result<Self, TransferIdError> {
        let id = TransferId::from_bytes(key)?;
        Ok(Self {
            inputs: None,
            outputs: None,
            id: RwLock::new(Some(id)),
            bytes: RwLock::new(None),
        })
    }

    /// Returns `true` if the transfer carries its body, `false` for a
    /// key-only shell.
    pub fn is_hydrated(&self) -> bool {
        self.inputs.is_some() && self.outputs.is_some()
    }

    /// The output references this transfer consumes.
    pub fn inputs(&self) -> &Inputs {
        self.inputs
            .as_ref()
            .expect("transfer shell is not hydrated: inputs are unset")
    }

    /// The deposits this transfer creates.
    pub fn outputs(&self) -> &Outputs {
        self.outputs
            .as_ref()
            .expect("transfer shell is not hydrated: outputs are unset")
    }

    /// The transfer's identity: BLAKE2b-256 of its canonical bytes.
    ///
    /// Computed on first call and cached; every subsequent call returns the
    /// same value. Safe under concurrent callers.
    pub fn id(&self) -> TransferId {
        if let Some(id) = *self.id.read() {
            return id;
        }

        // Single-flight: only one upgradable reader exists at a time, so
        // the hash runs at most once while plain readers stay unblocked.
        let slot = self.id.upgradable_read();
        if let Some(id) = *slot {
            return id;
        }
        let id = TransferId::from(blake2b_256(&self.bytes()));
        let mut slot = RwLockUpgradableReadGuard::upgrade(slot);
        *slot = Some(id);
        id
    }

    /// The transfer's canonical byte encoding: inputs, then outputs.
    ///
    /// Encoded on first call and cached; decode-constructed transfers
    /// return their original bytes without re-encoding. The returned
    /// [`Bytes`] handle shares the cached buffer. Safe under concurrent
    /// callers.
    pub fn bytes(&self) -> Bytes {
        if let Some(bytes) = self.bytes.read().as_ref() {
            return bytes.clone();
        }

        let slot = self.bytes.upgradable_read();
        if let Some(bytes) = slot.as_ref() {
            return bytes.clone();
        }
        let bytes = Bytes::from(self.encode());
        let mut slot = RwLockUpgradableReadGuard::upgrade(slot);
        *slot = Some(bytes.clone());
        bytes
    }

    fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.inputs().write_into(&mut writer);
        self.outputs().write_into(&mut writer);
        writer.into_bytes()
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer(id={}, inputs={}, outputs={})",
            self.id(),
            self.inputs(),
            self.outputs()
        )
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug must not trigger the lazy computations; show cached state.
        f.debug_struct("Transfer")
            .field("id", &*self.id.read())
            .field("hydrated", &self.is_hydrated())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StorableObject contract
// ---------------------------------------------------------------------------

impl StorableObject for Transfer {
    type DecodeError = DecodeError;

    fn storage_key(&self) -> Vec<u8> {
        self.id().as_bytes().to_vec()
    }

    fn marshal(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }

    fn unmarshal(key: &[u8], bytes: &[u8]) -> Result<Self, DecodeError> {
        let id = TransferId::from_bytes(key)?;
        let (transfer, _consumed) = Transfer::from_bytes(bytes)?;
        // The key under which the bytes were stored is the identity they
        // were hashed to; seed the cache instead of re-hashing.
        *transfer.id.write() = Some(id);
        Ok(transfer)
    }

    fn update(&mut self, _other: &Self) {
        panic!("transfers are immutable; updating a stored transfer is forbidden");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
