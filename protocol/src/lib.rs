// Copyright (c) 2026 Aurum Contributors. MIT License.
// See LICENSE for details.

//! # Aurum Protocol — Value-Transfer Core
//!
//! The core object model of the Aurum ledger: immutable, content-addressed
//! value transfers and the storage contract that lets them be cached,
//! persisted, and retrieved by the hash of their canonical bytes.
//!
//! This crate is intentionally narrow. It guarantees four things and leaves
//! the rest to the surrounding node:
//!
//! 1. A transfer's identity is computed exactly once and never changes.
//! 2. Concurrent readers never observe a half-initialized transfer or race
//!    on the lazy identity/encoding computations.
//! 3. The binary encoding is canonical and round-trips exactly.
//! 4. A persisted transfer is immutable — in-place updates are a fatal
//!    programming error, not a condition to recover from.
//!
//! ## Architecture
//!
//! - **transfer** — The transfer aggregate, its identifier, and the input
//!   and output set models with their canonical codecs.
//! - **crypto** — BLAKE2b-256, the identity digest.
//! - **codec** — The little-endian binary cursor the encodings build on.
//! - **storage** — The `StorableObject` contract and a typed sled-backed
//!   object store enforcing it.
//!
//! The API layer, gossip, the message DAG, and consensus all live elsewhere
//! and consume this crate through its public contract only.

pub mod codec;
pub mod crypto;
pub mod storage;
pub mod transfer;
