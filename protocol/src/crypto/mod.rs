//! # Cryptographic Primitives
//!
//! Hashing for the value-transfer core. This module is deliberately small:
//! the core needs exactly one digest function — BLAKE2b with a 256-bit
//! output — to turn a transfer's canonical bytes into its identity.
//! Signature schemes, key management, and everything else cryptographic
//! live with the layers that need them.

pub mod hash;

pub use hash::blake2b_256;
