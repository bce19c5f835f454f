//! Bidirectional binary composers.
//!
//! A type implements [`Composable`] by listing its fields once in
//! `read_from` and once, in the same order, in `write_to`. Decoding builds
//! a new value field by field from a bounded [`DfiReader`]; encoding reads
//! an existing value into a [`DfiWriter`]. Nothing is mutated in place.
//!
//! Field composers provided here:
//! - fixed-width little-endian integers (`u8`, `u16`, `u32`, `u64`)
//! - `bool` as a single `0x00`/`0x01` byte
//! - [`VarInt`] and the [`varuint`] adapter for varint-coded `u32` ids
//! - [`Amount`] satoshi fixed-point values
//! - [`Hash`] and `[u8; N]` raw fixed-width byte strings
//! - `String` as a varint-length UTF-8 string
//! - `Vec<T>` as a varint count followed by each element
//! - the [`optional`] adapter for length-flagged fixed-width fields

mod amount;

pub use amount::{Amount, COIN};

use serde::{Deserialize, Serialize};

use crate::chainhash::{Hash, HASH_SIZE};
use crate::util::{DfiReader, DfiWriter, VarInt};
use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// ComposeContext
// ---------------------------------------------------------------------------

/// Protocol activation context threaded through every composer call.
///
/// Some DfTx payloads switch wire layout at a network upgrade. The active
/// layout is chosen by the caller through this value, never by ambient
/// chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposeContext {
    /// Whether pool pair create/update payloads carry the trailing
    /// custom-rewards token list.
    pub custom_rewards: bool,
    /// Number of DfTx envelopes enclosing the value being composed.
    #[serde(skip)]
    dftx_depth: u8,
}

impl ComposeContext {
    /// Context for payloads created before the custom-rewards upgrade.
    pub const fn pre_custom_rewards() -> Self {
        ComposeContext { custom_rewards: false, dftx_depth: 0 }
    }

    /// How many DfTx envelopes enclose the value being composed.
    pub const fn dftx_depth(&self) -> u8 {
        self.dftx_depth
    }

    /// The context for a payload nested one DfTx envelope deeper.
    pub const fn nested_dftx(&self) -> Self {
        ComposeContext {
            custom_rewards: self.custom_rewards,
            dftx_depth: self.dftx_depth.saturating_add(1),
        }
    }
}

impl Default for ComposeContext {
    fn default() -> Self {
        ComposeContext { custom_rewards: true, dftx_depth: 0 }
    }
}

// ---------------------------------------------------------------------------
// Composable
// ---------------------------------------------------------------------------

/// A value with a canonical, symmetric binary layout.
pub trait Composable: Sized {
    /// Error produced by this type's composers.
    type Error: From<PrimitivesError>;

    /// Read one value from the cursor.
    ///
    /// # Arguments
    /// * `reader` - Bounded cursor positioned at the first byte of the value.
    /// * `ctx` - Protocol activation context.
    ///
    /// # Returns
    /// The decoded value, or an error. Never a partially built value.
    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, Self::Error>;

    /// Append this value's canonical encoding to the writer.
    ///
    /// # Arguments
    /// * `writer` - Destination buffer.
    /// * `ctx` - Protocol activation context.
    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), Self::Error>;

    /// Decode a value that must span the whole buffer, using the default context.
    fn decode(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::decode_with(bytes, &ComposeContext::default())
    }

    /// Decode a value that must span the whole buffer.
    ///
    /// # Arguments
    /// * `bytes` - The encoded value with no trailing data.
    /// * `ctx` - Protocol activation context.
    ///
    /// # Returns
    /// The decoded value, or `TrailingBytes` if input remains after it.
    fn decode_with(bytes: &[u8], ctx: &ComposeContext) -> Result<Self, Self::Error> {
        let mut reader = DfiReader::new(bytes);
        let value = Self::read_from(&mut reader, ctx)?;
        reader.finish()?;
        Ok(value)
    }

    /// Decode from a hex string, using the default context.
    fn decode_hex(hex_str: &str) -> Result<Self, Self::Error> {
        let bytes = hex::decode(hex_str).map_err(PrimitivesError::from)?;
        Self::decode(&bytes)
    }

    /// Encode into a new byte vector, using the default context.
    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        self.encode_with(&ComposeContext::default())
    }

    /// Encode into a new byte vector.
    fn encode_with(&self, ctx: &ComposeContext) -> Result<Vec<u8>, Self::Error> {
        let mut writer = DfiWriter::new();
        self.write_to(&mut writer, ctx)?;
        Ok(writer.into_bytes())
    }

    /// Encode into a lowercase hex string, using the default context.
    fn encode_hex(&self) -> Result<String, Self::Error> {
        Ok(hex::encode(self.encode()?))
    }
}

// ---- fixed-width integers ----

macro_rules! int_composable {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Composable for $ty {
            type Error = PrimitivesError;

            fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
                reader.$read()
            }

            fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
                writer.$write(*self);
                Ok(())
            }
        }
    };
}

int_composable!(u8, read_u8, write_u8);
int_composable!(u16, read_u16_le, write_u16_le);
int_composable!(u32, read_u32_le, write_u32_le);
int_composable!(u64, read_u64_le, write_u64_le);

impl Composable for bool {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        match reader.read_u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            b => Err(PrimitivesError::InvalidBool(b)),
        }
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_u8(u8::from(*self));
        Ok(())
    }
}

impl Composable for VarInt {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        reader.read_varint()
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_varint(*self);
        Ok(())
    }
}

// ---- byte strings ----

impl Composable for Hash {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        Ok(Hash::new(reader.read_array::<HASH_SIZE>()?))
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_bytes(self.as_bytes());
        Ok(())
    }
}

impl<const N: usize> Composable for [u8; N] {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        reader.read_array::<N>()
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_bytes(self);
        Ok(())
    }
}

impl Composable for String {
    type Error = PrimitivesError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, PrimitivesError> {
        let bytes = reader.read_var_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| PrimitivesError::InvalidUtf8(e.to_string()))
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), PrimitivesError> {
        writer.write_var_bytes(self.as_bytes());
        Ok(())
    }
}

// ---- lists ----

/// Count-prefixed list. `Vec<u8>` therefore encodes as a varint-length byte string.
impl<T: Composable> Composable for Vec<T> {
    type Error = T::Error;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, T::Error> {
        let count = reader.read_varint()?.as_len()?;
        // Every element occupies at least one byte.
        if count > reader.remaining() {
            return Err(PrimitivesError::UnexpectedEof.into());
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::read_from(reader, ctx)?);
        }
        Ok(items)
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), T::Error> {
        writer.write_varint(VarInt::from(self.len()));
        for item in self {
            item.write_to(writer, ctx)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field adapters
// ---------------------------------------------------------------------------

/// Varint-coded `u32` identifiers (token ids, pool ids, counts).
pub mod varuint {
    use super::*;

    /// Read a varint that must fit in 32 bits.
    ///
    /// # Arguments
    /// * `reader` - Source cursor.
    /// * `field` - Field name used in the error message.
    pub fn read(reader: &mut DfiReader<'_>, field: &'static str) -> Result<u32, PrimitivesError> {
        let value = reader.read_varint()?.value();
        u32::try_from(value).map_err(|_| {
            PrimitivesError::Other(format!("field `{}` varint {} exceeds u32", field, value))
        })
    }

    /// Write a `u32` as a canonical varint.
    pub fn write(writer: &mut DfiWriter, value: &u32, _field: &'static str) -> Result<(), PrimitivesError> {
        writer.write_varint(VarInt::from(*value));
        Ok(())
    }
}

/// Optional fixed-width byte fields.
///
/// Absence is a single `0x00` byte. Presence is a length byte equal to the
/// field width followed by that many bytes. Any other length byte is an
/// error naming the field.
pub mod optional {
    use super::*;

    /// Read an optional `N`-byte field.
    ///
    /// # Arguments
    /// * `reader` - Source cursor.
    /// * `field` - Field name used in the error message.
    ///
    /// # Returns
    /// `None` for a zero length byte, `Some(bytes)` for exactly `N` bytes.
    pub fn read<const N: usize>(
        reader: &mut DfiReader<'_>,
        field: &'static str,
    ) -> Result<Option<[u8; N]>, PrimitivesError> {
        match reader.read_u8()? as usize {
            0 => Ok(None),
            len if len == N => Ok(Some(reader.read_array::<N>()?)),
            got => Err(PrimitivesError::InvalidFieldWidth { field, expected: N, got }),
        }
    }

    /// Write an optional `N`-byte field.
    pub fn write<const N: usize>(
        writer: &mut DfiWriter,
        value: &Option<[u8; N]>,
        field: &'static str,
    ) -> Result<(), PrimitivesError> {
        match value {
            None => writer.write_u8(0),
            Some(bytes) => {
                let len = u8::try_from(N).map_err(|_| PrimitivesError::InvalidFieldWidth {
                    field,
                    expected: u8::MAX as usize,
                    got: N,
                })?;
                writer.write_u8(len);
                writer.write_bytes(bytes);
            }
        }
        Ok(())
    }

    /// Check a variable-length value against the field width before storing it.
    ///
    /// # Returns
    /// The bytes as a fixed array, or `InvalidFieldWidth` naming the field.
    pub fn exact<const N: usize>(bytes: &[u8], field: &'static str) -> Result<[u8; N], PrimitivesError> {
        <[u8; N]>::try_from(bytes).map_err(|_| PrimitivesError::InvalidFieldWidth {
            field,
            expected: N,
            got: bytes.len(),
        })
    }
}

/// Optional varint-length byte strings (`0x00` = absent).
///
/// Used for foreign-chain public keys whose width depends on the key format.
pub mod optional_bytes {
    use super::*;

    /// Read an optional varint-length byte string.
    pub fn read(reader: &mut DfiReader<'_>, _field: &'static str) -> Result<Option<Vec<u8>>, PrimitivesError> {
        let bytes = reader.read_var_bytes()?;
        Ok(if bytes.is_empty() { None } else { Some(bytes.to_vec()) })
    }

    /// Write an optional varint-length byte string.
    ///
    /// An empty `Some` is rejected since it would decode as `None`.
    pub fn write(writer: &mut DfiWriter, value: &Option<Vec<u8>>, field: &'static str) -> Result<(), PrimitivesError> {
        match value {
            None => writer.write_u8(0),
            Some(bytes) if bytes.is_empty() => {
                return Err(PrimitivesError::Other(format!("field `{}` is present but empty", field)));
            }
            Some(bytes) => writer.write_var_bytes(bytes),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ComposeContext {
        ComposeContext::default()
    }

    #[test]
    fn test_default_context_has_custom_rewards() {
        assert!(ComposeContext::default().custom_rewards);
        assert!(!ComposeContext::pre_custom_rewards().custom_rewards);

        let parsed: ComposeContext = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ComposeContext::default());
        let parsed: ComposeContext = serde_json::from_str(r#"{"customRewards":false}"#).unwrap();
        assert!(!parsed.custom_rewards);
    }

    #[test]
    fn test_nested_dftx_depth() {
        let outer = ComposeContext::pre_custom_rewards();
        assert_eq!(outer.dftx_depth(), 0);
        let inner = outer.nested_dftx().nested_dftx();
        assert_eq!(inner.dftx_depth(), 2);
        assert!(!inner.custom_rewards);

        // Depth is runtime state and never serialized.
        let json = serde_json::to_string(&inner).unwrap();
        assert_eq!(json, r#"{"customRewards":false}"#);
        let parsed: ComposeContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.dftx_depth(), 0);
    }

    #[test]
    fn test_integers_little_endian() {
        assert_eq!(0x1234u16.encode().unwrap(), vec![0x34, 0x12]);
        assert_eq!(0xdeadbeefu32.encode().unwrap(), vec![0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(u64::decode(&[1, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 1);
        assert!(u32::decode(&[1, 0, 0]).is_err());
    }

    #[test]
    fn test_bool_strict() {
        assert!(bool::decode(&[0x01]).unwrap());
        assert!(!bool::decode(&[0x00]).unwrap());
        assert!(matches!(bool::decode(&[0x02]), Err(PrimitivesError::InvalidBool(2))));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert!(matches!(u8::decode(&[0x01, 0x02]), Err(PrimitivesError::TrailingBytes(1))));
    }

    #[test]
    fn test_string_varint_length() {
        let s = String::from("DFI");
        assert_eq!(s.encode_hex().unwrap(), "03444649");
        assert_eq!(String::decode_hex("03444649").unwrap(), "DFI");
        assert!(String::decode(&[0x02, 0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_list_count_prefix() {
        let list: Vec<u16> = vec![1, 2];
        assert_eq!(list.encode_hex().unwrap(), "0201000200");
        assert_eq!(Vec::<u16>::decode_hex("0201000200").unwrap(), list);
        assert!(Vec::<u16>::decode_hex("00").unwrap().is_empty());
    }

    #[test]
    fn test_list_count_exceeding_data() {
        // Declares 0xffff elements but carries one byte.
        let err = Vec::<u8>::decode(&[0xfd, 0xff, 0xff, 0x01]).unwrap_err();
        assert!(matches!(err, PrimitivesError::UnexpectedEof));
    }

    #[test]
    fn test_hash_is_wire_order() {
        let hash = Hash::from_hex("01").unwrap();
        let bytes = hash.encode().unwrap();
        assert_eq!(bytes[0], 0x01);
        assert_eq!(Hash::decode(&bytes).unwrap(), hash);
    }

    #[test]
    fn test_varuint_bounds() {
        let mut w = DfiWriter::new();
        varuint::write(&mut w, &300, "id").unwrap();
        assert_eq!(w.as_bytes(), &[0xfd, 0x2c, 0x01]);

        let mut r = DfiReader::new(w.as_bytes());
        assert_eq!(varuint::read(&mut r, "id").unwrap(), 300);

        let big = VarInt(u32::MAX as u64 + 1).to_bytes();
        assert!(varuint::read(&mut DfiReader::new(&big), "id").is_err());
    }

    #[test]
    fn test_optional_fixed_width() {
        let mut r = DfiReader::new(&[0x00]);
        assert_eq!(optional::read::<20>(&mut r, "operatorPubKeyHash").unwrap(), None);

        let mut present = vec![0x14];
        present.extend_from_slice(&[0xab; 20]);
        let mut r = DfiReader::new(&present);
        assert_eq!(optional::read::<20>(&mut r, "operatorPubKeyHash").unwrap(), Some([0xab; 20]));

        let mut w = DfiWriter::new();
        optional::write(&mut w, &Some([0xab; 20]), "operatorPubKeyHash").unwrap();
        assert_eq!(w.as_bytes(), present.as_slice());
    }

    #[test]
    fn test_optional_wrong_width_names_field() {
        let mut wrong = vec![0x13];
        wrong.extend_from_slice(&[0xab; 19]);
        let err = optional::read::<20>(&mut DfiReader::new(&wrong), "operatorPubKeyHash").unwrap_err();
        assert!(err.to_string().contains("operatorPubKeyHash"));
        assert!(matches!(
            err,
            PrimitivesError::InvalidFieldWidth { field: "operatorPubKeyHash", expected: 20, got: 19 }
        ));
        assert!(optional::exact::<20>(&[0u8; 19], "operatorPubKeyHash").is_err());
    }

    #[test]
    fn test_optional_bytes() {
        let mut w = DfiWriter::new();
        optional_bytes::write(&mut w, &None, "receivePubkey").unwrap();
        optional_bytes::write(&mut w, &Some(vec![0x02; 33]), "receivePubkey").unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 33);

        let mut r = DfiReader::new(&bytes);
        assert_eq!(optional_bytes::read(&mut r, "receivePubkey").unwrap(), None);
        assert_eq!(optional_bytes::read(&mut r, "receivePubkey").unwrap(), Some(vec![0x02; 33]));

        let mut w = DfiWriter::new();
        assert!(optional_bytes::write(&mut w, &Some(Vec::new()), "receivePubkey").is_err());
    }

    #[test]
    fn test_context_threads_through_lists() {
        // Lists pass the caller's context to each element unchanged.
        let list = vec![Amount::from_sat(1)];
        let bytes = list.encode_with(&ComposeContext::pre_custom_rewards()).unwrap();
        assert_eq!(Vec::<Amount>::decode_with(&bytes, &ctx()).unwrap(), list);
    }
}
