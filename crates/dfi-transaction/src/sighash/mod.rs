//! Signature hash computation for segwit input signing.
//!
//! Computes the BIP143 digest that is signed by ECDSA to authorize spending
//! a transaction input. The chain extends vanilla BIP143 in one place: from
//! transaction version 4, every output committed in `hashOutputs` also
//! carries its token id.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::{Amount, ComposeContext, Composable};
use dfi_primitives::hash::sha256d;
use dfi_primitives::util::{DfiReader, DfiWriter};
use dfi_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs. The only supported type.
pub const SIGHASH_ALL: u32 = 0x01;

/// Reject every sighash type except `SIGHASH_ALL`.
pub(crate) fn ensure_supported(sighash_type: u32) -> Result<(), TransactionError> {
    if sighash_type != SIGHASH_ALL {
        return Err(TransactionError::UnsupportedSigHash(sighash_type));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// BIP143 preimage
// -----------------------------------------------------------------------

/// The BIP143 signing preimage of one input.
///
/// # Wire format
///
/// | Field         | Size                          |
/// |---------------|-------------------------------|
/// | version       | 4 bytes (LE)                  |
/// | hashPrevouts  | 32 bytes                      |
/// | hashSequence  | 32 bytes                      |
/// | outpoint      | 32 bytes txid + 4 bytes index |
/// | scriptCode    | VarInt length + opcode bytes  |
/// | value         | 8 bytes (LE satoshis)         |
/// | sequence      | 4 bytes (LE)                  |
/// | hashOutputs   | 32 bytes                      |
/// | lockTime      | 4 bytes (LE)                  |
/// | sighashType   | 4 bytes (LE)                  |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WitnessProgram {
    pub version: u32,
    pub hash_prevouts: [u8; 32],
    pub hash_sequence: [u8; 32],
    pub outpoint_txid: Hash,
    pub outpoint_index: u32,
    /// Script being satisfied, e.g. the P2PKH form of a P2WPKH prevout.
    pub script_code: Script,
    /// Value of the output being spent.
    pub value: Amount,
    pub sequence: u32,
    pub hash_outputs: [u8; 32],
    pub lock_time: u32,
    pub sighash_type: u32,
}

impl WitnessProgram {
    /// Build the preimage for one input of `tx`.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - Script the input satisfies.
    /// * `value` - Value of the output being spent.
    /// * `sighash_type` - Must be `SIGHASH_ALL`.
    ///
    /// # Returns
    /// The preimage, `UnsupportedSigHash` for any other type, or
    /// `SigningPolicy` if the index is out of range.
    pub fn new(
        tx: &Transaction,
        input_index: usize,
        script_code: Script,
        value: Amount,
        sighash_type: u32,
    ) -> Result<Self, TransactionError> {
        ensure_supported(sighash_type)?;
        let input = tx.vin.get(input_index).ok_or_else(|| {
            TransactionError::SigningPolicy(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.vin.len()
            ))
        })?;

        Ok(WitnessProgram {
            version: tx.version,
            hash_prevouts: hash_prevouts(tx),
            hash_sequence: hash_sequence(tx),
            outpoint_txid: input.txid,
            outpoint_index: input.index,
            script_code,
            value,
            sequence: input.sequence,
            hash_outputs: hash_outputs(tx)?,
            lock_time: tx.lock_time,
            sighash_type,
        })
    }

    /// The 32-byte digest to sign: double SHA-256 of the encoded preimage.
    pub fn sighash(&self) -> Result<[u8; 32], TransactionError> {
        Ok(sha256d(&self.encode()?))
    }
}

impl Composable for WitnessProgram {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        Ok(WitnessProgram {
            version: reader.read_u32_le()?,
            hash_prevouts: reader.read_array::<32>()?,
            hash_sequence: reader.read_array::<32>()?,
            outpoint_txid: Hash::read_from(reader, ctx)?,
            outpoint_index: reader.read_u32_le()?,
            script_code: Script::read_from(reader, ctx)?,
            value: Amount::read_from(reader, ctx)?,
            sequence: reader.read_u32_le()?,
            hash_outputs: reader.read_array::<32>()?,
            lock_time: reader.read_u32_le()?,
            sighash_type: reader.read_u32_le()?,
        })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        writer.write_u32_le(self.version);
        writer.write_bytes(&self.hash_prevouts);
        writer.write_bytes(&self.hash_sequence);
        writer.write_bytes(self.outpoint_txid.as_bytes());
        writer.write_u32_le(self.outpoint_index);
        self.script_code.write_to(writer, ctx)?;
        self.value.write_to(writer, ctx)?;
        writer.write_u32_le(self.sequence);
        writer.write_bytes(&self.hash_outputs);
        writer.write_u32_le(self.lock_time);
        writer.write_u32_le(self.sighash_type);
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Commitment hashes
// -----------------------------------------------------------------------

/// Double SHA-256 of every input outpoint (txid || index).
pub fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut writer = DfiWriter::with_capacity(tx.vin.len() * 36);
    for input in &tx.vin {
        input.write_outpoint(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 of every input sequence number.
pub fn hash_sequence(tx: &Transaction) -> [u8; 32] {
    let mut writer = DfiWriter::with_capacity(tx.vin.len() * 4);
    for input in &tx.vin {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 of every output in the transaction's own layout.
///
/// Version 4 and later transactions commit to each output's token id.
pub fn hash_outputs(tx: &Transaction) -> Result<[u8; 32], TransactionError> {
    let layout = tx.vout_layout();
    let ctx = ComposeContext::default();
    let mut writer = DfiWriter::new();
    for output in &tx.vout {
        output.write_to_layout(&mut writer, layout, &ctx)?;
    }
    Ok(sha256d(writer.as_bytes()))
}
