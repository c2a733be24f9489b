//! # Transfer Module
//!
//! The value-transfer object model: immutable, content-addressed transfers
//! and the pieces they are made of.
//!
//! ```text
//! id.rs       — TransferId: 32-byte hash-derived identity and storage key
//! inputs.rs   — OutputReference + Inputs: canonical consumed-output set
//! outputs.rs  — Address, Color, ColoredBalance, Output + Outputs
//! transfer.rs — Transfer: the aggregate, lazy identity/bytes, store binding
//! ```
//!
//! ## Lifecycle
//!
//! A transfer is either built fresh from inputs and outputs, or
//! reconstructed from a persisted blob fetched by its key. Both paths yield
//! the same logical object; the canonical encoding and the identifier are
//! derived on first demand and memoized forever after. Downstream layers
//! interact through exactly four operations: construct, `id()`, `bytes()`,
//! and the [`StorableObject`](crate::storage::StorableObject) surface.
//!
//! ## Canonical Form
//!
//! One logical transfer has exactly one byte encoding: input references
//! ascend by transfer id then selector, outputs ascend by address, balances
//! ascend by color, and duplicates are rejected at construction and at
//! decode. Without this, byte-equality and identity-equality would diverge
//! — the entire content-addressing scheme rests on it.

pub mod id;
pub mod inputs;
pub mod outputs;
pub mod transfer;

pub use id::{TransferId, TransferIdError, TRANSFER_ID_LENGTH};
pub use inputs::{Inputs, InputsError, OutputReference};
pub use outputs::{
    Address, Color, ColoredBalance, Output, Outputs, OutputsError, ADDRESS_LENGTH, COLOR_LENGTH,
};
pub use self::transfer::{DecodeError, Transfer};
