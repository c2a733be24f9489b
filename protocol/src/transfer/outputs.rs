//! # Output Sets
//!
//! The outputs of a transfer are the value deposits it creates: one
//! [`Output`] per destination address, each carrying one or more
//! [`ColoredBalance`] entries. A color tags a token kind; [`Color::NATIVE`]
//! (all zero bytes) is the uncolored base token.
//!
//! Canonical form mirrors the input set: outputs sort ascending by address
//! bytes, balances within an output sort ascending by color bytes, and
//! duplicates at either level are rejected. Zero-valued balances and
//! balance-less outputs are construction errors, never silently dropped —
//! a transfer that deposits nothing somewhere should not exist.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::codec::{ByteReader, ByteWriter, CodecError};

/// Number of bytes in an [`Address`].
pub const ADDRESS_LENGTH: usize = 32;

/// Number of bytes in a [`Color`].
pub const COLOR_LENGTH: usize = 32;

/// Encoded width of one balance: 32-byte color + 8-byte value.
const BALANCE_LENGTH: usize = COLOR_LENGTH + 8;

/// Minimum encoded width of one output: 32-byte address + 4-byte count.
const OUTPUT_MIN_LENGTH: usize = ADDRESS_LENGTH + 4;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building or decoding an output set.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OutputsError {
    /// An output carries no balances at all.
    #[error("output for address {address} has no balances")]
    EmptyBalances {
        /// The address of the offending output.
        address: Address,
    },

    /// A balance has a zero value.
    #[error("zero balance of color {color} for address {address}")]
    ZeroBalance {
        /// The address of the offending output.
        address: Address,
        /// The color carrying the zero value.
        color: Color,
    },

    /// Two balances within one output share the same color.
    #[error("duplicate balance color {color} for address {address}")]
    DuplicateColor {
        /// The address of the offending output.
        address: Address,
        /// The duplicated color.
        color: Color,
    },

    /// Two outputs in the set target the same address.
    #[error("duplicate output address {0}")]
    DuplicateAddress(Address),

    /// Encoded outputs are not in canonical ascending address order.
    #[error("output out of canonical order at position {position}")]
    OutOfOrder {
        /// Zero-based position of the offending output.
        position: usize,
    },

    /// Encoded balances within an output are not in canonical color order.
    #[error("balances out of canonical order for address {address}")]
    UnsortedBalances {
        /// The address of the offending output.
        address: Address,
    },

    /// The byte stream is truncated or declares more entries than it holds.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte destination address.
///
/// The core treats addresses as opaque fixed-width bytes; how they are
/// derived from key material is the wallet layer's business.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Renders the address as a base-58 string, for display only.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A 32-byte token-color identifier.
///
/// Colored tokens let the ledger carry user-defined assets alongside the
/// base token without a separate asset registry: the color is the identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Color([u8; COLOR_LENGTH]);

impl Color {
    /// The uncolored base token.
    pub const NATIVE: Color = Color([0u8; COLOR_LENGTH]);

    /// Returns the raw color bytes.
    pub fn as_bytes(&self) -> &[u8; COLOR_LENGTH] {
        &self.0
    }
}

impl From<[u8; COLOR_LENGTH]> for Color {
    fn from(bytes: [u8; COLOR_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NATIVE {
            write!(f, "NATIVE")
        } else {
            write!(f, "{}", bs58::encode(self.0).into_string())
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

// ---------------------------------------------------------------------------
// ColoredBalance
// ---------------------------------------------------------------------------

/// A quantity of tokens of a single color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColoredBalance {
    color: Color,
    value: u64,
}

impl ColoredBalance {
    /// Creates a balance of `value` tokens of `color`.
    ///
    /// Zero values are rejected when the balance is attached to an output;
    /// the pair itself is just data.
    pub fn new(color: Color, value: u64) -> Self {
        Self { color, value }
    }

    /// The token color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The token quantity.
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl fmt::Display for ColoredBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.color)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The deposits a transfer books onto one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    address: Address,
    balances: Vec<ColoredBalance>,
}

impl Output {
    /// Builds an output from balances in any order.
    ///
    /// Sorts balances into canonical color order and validates: at least
    /// one balance, no zero values, no duplicate colors.
    pub fn new<I>(address: Address, balances: I) -> Result<Self, OutputsError>
    where
        I: IntoIterator<Item = ColoredBalance>,
    {
        let mut balances: Vec<_> = balances.into_iter().collect();
        if balances.is_empty() {
            return Err(OutputsError::EmptyBalances { address });
        }
        balances.sort_unstable_by(|a, b| a.color.cmp(&b.color));
        for (i, balance) in balances.iter().enumerate() {
            if balance.value == 0 {
                return Err(OutputsError::ZeroBalance {
                    address,
                    color: balance.color,
                });
            }
            if i > 0 && balances[i - 1].color == balance.color {
                return Err(OutputsError::DuplicateColor {
                    address,
                    color: balance.color,
                });
            }
        }
        Ok(Self { address, balances })
    }

    /// The destination address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The balances in canonical color order.
    pub fn balances(&self) -> &[ColoredBalance] {
        &self.balances
    }

    /// Total value deposited on this output for `color`.
    pub fn value_of(&self, color: Color) -> u64 {
        self.balances
            .iter()
            .find(|balance| balance.color == color)
            .map(|balance| balance.value)
            .unwrap_or(0)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- [", self.address)?;
        for (i, balance) in self.balances.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{balance}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// The canonical set of outputs a transfer creates.
///
/// One output per address, sorted ascending by address bytes. Immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outputs {
    outputs: Vec<Output>,
}

impl Outputs {
    /// Builds an output set from outputs in any order.
    ///
    /// Sorts into canonical address order and fails with
    /// [`OutputsError::DuplicateAddress`] if two outputs target the same
    /// address.
    pub fn new<I>(outputs: I) -> Result<Self, OutputsError>
    where
        I: IntoIterator<Item = Output>,
    {
        let mut outputs: Vec<_> = outputs.into_iter().collect();
        outputs.sort_unstable_by(|a, b| a.address.cmp(&b.address));
        for pair in outputs.windows(2) {
            if pair[0].address == pair[1].address {
                return Err(OutputsError::DuplicateAddress(pair[0].address));
            }
        }
        Ok(Self { outputs })
    }

    /// Number of outputs in the set.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if the set deposits nothing.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Iterates over the outputs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }

    /// Looks up the output for `address`, if any.
    pub fn get(&self, address: &Address) -> Option<&Output> {
        self.outputs
            .binary_search_by(|output| output.address.cmp(address))
            .ok()
            .map(|index| &self.outputs[index])
    }

    /// Serializes the set to its canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(4 + self.encoded_length());
        self.write_into(&mut writer);
        writer.into_bytes()
    }

    /// Deserializes a set from the front of `bytes`.
    ///
    /// Returns the set and the number of bytes consumed. Trailing bytes are
    /// left for the caller.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), OutputsError> {
        let mut reader = ByteReader::new(bytes);
        let outputs = Self::read_from(&mut reader)?;
        Ok((outputs, reader.offset()))
    }

    fn encoded_length(&self) -> usize {
        self.outputs
            .iter()
            .map(|output| OUTPUT_MIN_LENGTH + output.balances.len() * BALANCE_LENGTH)
            .sum()
    }

    pub(crate) fn write_into(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.outputs.len() as u32);
        for output in &self.outputs {
            writer.write_bytes(output.address.as_bytes());
            writer.write_u32(output.balances.len() as u32);
            for balance in &output.balances {
                writer.write_bytes(balance.color.as_bytes());
                writer.write_u64(balance.value);
            }
        }
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, OutputsError> {
        let count = reader.read_u32()? as usize;
        reader.expect_elements(count, OUTPUT_MIN_LENGTH)?;

        let mut outputs: Vec<Output> = Vec::with_capacity(count);
        for position in 0..count {
            let address = Address::from(reader.read_array::<ADDRESS_LENGTH>()?);

            if let Some(previous) = outputs.last() {
                if previous.address == address {
                    return Err(OutputsError::DuplicateAddress(address));
                }
                if previous.address > address {
                    return Err(OutputsError::OutOfOrder { position });
                }
            }

            let balance_count = reader.read_u32()? as usize;
            reader.expect_elements(balance_count, BALANCE_LENGTH)?;
            if balance_count == 0 {
                return Err(OutputsError::EmptyBalances { address });
            }

            let mut balances: Vec<ColoredBalance> = Vec::with_capacity(balance_count);
            for _ in 0..balance_count {
                let color = Color::from(reader.read_array::<COLOR_LENGTH>()?);
                let value = reader.read_u64()?;
                if value == 0 {
                    return Err(OutputsError::ZeroBalance { address, color });
                }
                if let Some(previous) = balances.last() {
                    if previous.color == color {
                        return Err(OutputsError::DuplicateColor { address, color });
                    }
                    if previous.color > color {
                        return Err(OutputsError::UnsortedBalances { address });
                    }
                }
                balances.push(ColoredBalance::new(color, value));
            }
            outputs.push(Output { address, balances });
        }
        Ok(Self { outputs })
    }
}

impl fmt::Display for Outputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, output) in self.outputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{output}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
