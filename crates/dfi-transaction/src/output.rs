//! Transaction output with value, locking script and token id.
//!
//! Outputs have two wire layouts. Transactions before version 4 use the
//! plain Bitcoin layout (V2); from version 4 every output also carries the
//! id of the token it holds (V4).

use serde::{Deserialize, Serialize};

use dfi_primitives::compose::{Amount, ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter, VarInt};
use dfi_script::Script;

use crate::TransactionError;

/// Transaction version from which outputs carry a token id.
pub const TOKEN_ID_MIN_VERSION: u32 = 4;

/// Output wire layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoutLayout {
    /// `value || script`; the token id is implied to be 0.
    V2,
    /// `value || script || varint(token id)`.
    V4,
}

impl VoutLayout {
    /// The layout used by a transaction of the given version.
    pub fn for_version(version: u32) -> Self {
        if version >= TOKEN_ID_MIN_VERSION {
            VoutLayout::V4
        } else {
            VoutLayout::V2
        }
    }
}

/// A single transaction output.
///
/// # Wire format
///
/// | Field    | Size                          |
/// |----------|-------------------------------|
/// | value    | 8 bytes (LE satoshis)         |
/// | script   | VarInt length + opcode bytes  |
/// | token id | VarInt (V4 layout only)       |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vout {
    /// Value locked by this output.
    pub value: Amount,
    /// Locking script (scriptPubKey).
    pub script: Script,
    /// Token held by this output; `0` is the native coin.
    #[serde(default)]
    pub token_id: u32,
}

impl Vout {
    /// Create a native-coin output.
    pub fn new(value: Amount, script: Script) -> Self {
        Vout { value, script, token_id: 0 }
    }

    /// Read an output in the given layout.
    ///
    /// # Arguments
    /// * `reader` - Cursor positioned at the output.
    /// * `layout` - Layout selected from the transaction version.
    /// * `ctx` - Protocol activation context for any DfTx in the script.
    pub fn read_from_layout(
        reader: &mut DfiReader<'_>,
        layout: VoutLayout,
        ctx: &ComposeContext,
    ) -> Result<Self, TransactionError> {
        let value = Amount::read_from(reader, ctx)?;
        let script = Script::read_from(reader, ctx)?;
        let token_id = match layout {
            VoutLayout::V2 => 0,
            VoutLayout::V4 => {
                let raw = reader.read_varint()?.value();
                u32::try_from(raw).map_err(|_| {
                    TransactionError::SerializationError(format!("token id {} exceeds u32", raw))
                })?
            }
        };
        Ok(Vout { value, script, token_id })
    }

    /// Write an output in the given layout.
    ///
    /// # Returns
    /// `Unsupported` when a non-native token id would be dropped by the V2 layout.
    pub fn write_to_layout(
        &self,
        writer: &mut DfiWriter,
        layout: VoutLayout,
        ctx: &ComposeContext,
    ) -> Result<(), TransactionError> {
        self.value.write_to(writer, ctx)?;
        self.script.write_to(writer, ctx)?;
        match layout {
            VoutLayout::V2 if self.token_id != 0 => {
                return Err(TransactionError::Unsupported(format!(
                    "token id {} cannot be encoded before version {}",
                    self.token_id, TOKEN_ID_MIN_VERSION
                )));
            }
            VoutLayout::V2 => {}
            VoutLayout::V4 => writer.write_varint(VarInt::from(self.token_id)),
        }
        Ok(())
    }

    /// Serialize in the given layout.
    pub fn to_bytes(&self, layout: VoutLayout) -> Result<Vec<u8>, TransactionError> {
        let mut writer = DfiWriter::new();
        self.write_to_layout(&mut writer, layout, &ComposeContext::default())?;
        Ok(writer.into_bytes())
    }
}

/// Read `varint(count) || outputs` in the given layout.
pub(crate) fn read_vouts(
    reader: &mut DfiReader<'_>,
    layout: VoutLayout,
    ctx: &ComposeContext,
) -> Result<Vec<Vout>, TransactionError> {
    let count = reader.read_varint()?.as_len()?;
    if count > reader.remaining() {
        return Err(TransactionError::SerializationError(format!(
            "{} outputs declared with {} bytes left",
            count,
            reader.remaining()
        )));
    }
    let mut vout = Vec::with_capacity(count);
    for _ in 0..count {
        vout.push(Vout::read_from_layout(reader, layout, ctx)?);
    }
    Ok(vout)
}

/// Write `varint(count) || outputs` in the given layout.
pub(crate) fn write_vouts(
    writer: &mut DfiWriter,
    vout: &[Vout],
    layout: VoutLayout,
    ctx: &ComposeContext,
) -> Result<(), TransactionError> {
    writer.write_varint(VarInt::from(vout.len()));
    for output in vout {
        output.write_to_layout(writer, layout, ctx)?;
    }
    Ok(())
}
