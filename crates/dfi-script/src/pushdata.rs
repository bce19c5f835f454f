//! Data push opcodes.
//!
//! A push stores its bytes in wire order. Callers holding display-order
//! (big-endian) bytes, such as a txid copied from RPC output, pass
//! [`Endian::Big`] and the bytes are reversed once at construction.

use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};
use dfi_primitives::PrimitivesError;

use crate::ScriptError;

/// Push prefix followed by a 1-byte length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push prefix followed by a 2-byte LE length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push prefix followed by a 4-byte LE length.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Largest push the chain accepts: 2^24 - 1 bytes.
pub const MAX_PUSHDATA_LEN: usize = 0x00ff_ffff;

/// Byte order of data handed to [`PushData::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Bytes are already in wire order.
    Little,
    /// Bytes are in display order and are reversed for the wire.
    Big,
}

/// A data push.
#[derive(Clone, PartialEq, Eq)]
pub struct PushData {
    data: Vec<u8>,
}

impl PushData {
    /// Create a push from bytes in the given order.
    ///
    /// # Arguments
    /// * `data` - The bytes to push.
    /// * `endian` - Order of `data`; `Endian::Big` is reversed into wire order.
    ///
    /// # Returns
    /// The push, `EmptyPush` for no bytes, or `PushDataTooLarge` above
    /// 16,777,215 bytes.
    pub fn new(data: impl Into<Vec<u8>>, endian: Endian) -> Result<Self, ScriptError> {
        let mut data = data.into();
        if data.is_empty() {
            return Err(ScriptError::EmptyPush);
        }
        if data.len() > MAX_PUSHDATA_LEN {
            return Err(ScriptError::PushDataTooLarge(data.len()));
        }
        if endian == Endian::Big {
            data.reverse();
        }
        Ok(PushData { data })
    }

    /// Create a push from a hex string in the given order.
    pub fn from_hex(hex_str: &str, endian: Endian) -> Result<Self, ScriptError> {
        Self::new(hex::decode(hex_str)?, endian)
    }

    /// Wrap bytes already known to be in wire order and within limits.
    pub(crate) fn from_wire(data: Vec<u8>) -> Self {
        PushData { data }
    }

    /// The pushed bytes in wire order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the push and return its wire-order bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Return the bytes in the requested order.
    pub fn to_vec(&self, endian: Endian) -> Vec<u8> {
        let mut out = self.data.clone();
        if endian == Endian::Big {
            out.reverse();
        }
        out
    }

    /// Wire-order hex of the pushed bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    /// Number of pushed bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the push carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the push length and data following an already consumed prefix byte.
    ///
    /// Non-minimal prefixes (e.g. `OP_PUSHDATA1` for 10 bytes) are accepted
    /// here and re-encoded minimally by [`PushData::write_to`]. A zero length
    /// yields an empty push, which callers must map to `OP_0` or reject.
    ///
    /// # Arguments
    /// * `prefix` - A byte in `0x01..=0x4e`.
    /// * `reader` - Cursor positioned after the prefix.
    pub(crate) fn read_after_prefix(prefix: u8, reader: &mut DfiReader<'_>) -> Result<Self, ScriptError> {
        let len = match prefix {
            OP_PUSHDATA1 => reader.read_u8()? as usize,
            OP_PUSHDATA2 => reader.read_u16_le()? as usize,
            OP_PUSHDATA4 => reader.read_u32_le()? as usize,
            n => n as usize,
        };
        if len > MAX_PUSHDATA_LEN {
            return Err(ScriptError::PushDataTooLarge(len));
        }
        let data = reader.read_bytes(len).map_err(|e| match e {
            PrimitivesError::UnexpectedEof => ScriptError::DataTooSmall(len),
            other => other.into(),
        })?;
        Ok(PushData { data: data.to_vec() })
    }
}

/// Write the minimal push prefix for a payload of `len` bytes.
///
/// # Returns
/// `PushDataTooLarge` when `len` exceeds [`MAX_PUSHDATA_LEN`].
pub fn write_push_prefix(writer: &mut DfiWriter, len: usize) -> Result<(), ScriptError> {
    match len {
        0..=0x4b => writer.write_u8(len as u8),
        0x4c..=0xff => {
            writer.write_u8(OP_PUSHDATA1);
            writer.write_u8(len as u8);
        }
        0x100..=0xffff => {
            writer.write_u8(OP_PUSHDATA2);
            writer.write_u16_le(len as u16);
        }
        0x1_0000..=MAX_PUSHDATA_LEN => {
            writer.write_u8(OP_PUSHDATA4);
            writer.write_u32_le(len as u32);
        }
        _ => return Err(ScriptError::PushDataTooLarge(len)),
    }
    Ok(())
}

impl Composable for PushData {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let prefix = reader.read_u8()?;
        if !(0x01..=OP_PUSHDATA4).contains(&prefix) {
            return Err(ScriptError::InvalidScript(format!("{:#04x} is not a push prefix", prefix)));
        }
        let push = Self::read_after_prefix(prefix, reader)?;
        if push.is_empty() {
            return Err(ScriptError::EmptyPush);
        }
        Ok(push)
    }

    fn write_to(&self, writer: &mut DfiWriter, _ctx: &ComposeContext) -> Result<(), ScriptError> {
        if self.data.is_empty() {
            return Err(ScriptError::EmptyPush);
        }
        write_push_prefix(writer, self.data.len())?;
        writer.write_bytes(&self.data);
        Ok(())
    }
}

impl std::fmt::Debug for PushData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PushData({})", self.to_hex())
    }
}
