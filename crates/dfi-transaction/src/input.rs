//! Transaction input referencing a previous output.

use serde::{Deserialize, Serialize};

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};
use dfi_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// # Wire format
///
/// | Field    | Size                          |
/// |----------|-------------------------------|
/// | txid     | 32 bytes (wire order)         |
/// | index    | 4 bytes (LE)                  |
/// | script   | VarInt length + opcode bytes  |
/// | sequence | 4 bytes (LE)                  |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    /// Id of the transaction holding the spent output. Displays reversed.
    pub txid: Hash,
    /// Index of the spent output.
    pub index: u32,
    /// Unlocking script (scriptSig); empty for segwit spends.
    pub script: Script,
    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,
}

impl Vin {
    /// Create an input spending `txid:index` with an empty script and final sequence.
    ///
    /// # Arguments
    /// * `txid` - Id of the transaction holding the spent output.
    /// * `index` - Output index within that transaction.
    pub fn new(txid: Hash, index: u32) -> Self {
        Vin {
            txid,
            index,
            script: Script::default(),
            sequence: DEFAULT_SEQUENCE_NUMBER,
        }
    }

    /// Write the 36-byte outpoint (txid || index).
    pub(crate) fn write_outpoint(&self, writer: &mut DfiWriter) {
        writer.write_bytes(self.txid.as_bytes());
        writer.write_u32_le(self.index);
    }
}

impl Composable for Vin {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        Ok(Vin {
            txid: Hash::read_from(reader, ctx)?,
            index: reader.read_u32_le()?,
            script: Script::read_from(reader, ctx)?,
            sequence: reader.read_u32_le()?,
        })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        self.write_outpoint(writer);
        self.script.write_to(writer, ctx)?;
        writer.write_u32_le(self.sequence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_layout() {
        let hex_str = concat!(
            "346faf87ccf6fe45463831a23054780d78e4a6decab10575aba212d2e087eb3d",
            "00000000",
            "00",
            "ffffffff",
        );
        let vin = Vin::decode_hex(hex_str).unwrap();
        assert_eq!(vin.index, 0);
        assert!(vin.script.is_empty());
        assert_eq!(vin.sequence, DEFAULT_SEQUENCE_NUMBER);
        assert_eq!(
            vin.txid.to_string(),
            "3deb87e0d212a2ab7505b1cadea6e4780d785430a231384645fef6cc87af6f34"
        );
        assert_eq!(vin.encode_hex().unwrap(), hex_str);
    }

    #[test]
    fn test_vin_truncated() {
        assert!(Vin::decode(&[0u8; 39]).is_err());
    }
}
