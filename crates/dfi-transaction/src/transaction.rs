//! Legacy and SegWit transaction composers.
//!
//! Both layouts share version, inputs, outputs and lock time. The segwit
//! layout inserts a `0x00 0x01` marker/flag pair after the version and one
//! witness per input before the lock time. Output layout follows the version
//! (see [`VoutLayout`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use dfi_primitives::chainhash::{double_hash_h, Hash};
use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::input::Vin;
use crate::output::{read_vouts, write_vouts, Vout, VoutLayout};
use crate::witness::Witness;
use crate::TransactionError;

/// Transaction version the chain currently produces.
pub const DEFAULT_TX_VERSION: u32 = 4;

/// Segwit marker byte.
pub const SEGWIT_MARKER: u8 = 0x00;
/// Segwit flag byte.
pub const SEGWIT_FLAG: u8 = 0x01;

/// A transaction without witness data.
///
/// # Wire format
///
/// | Field     | Size                      |
/// |-----------|---------------------------|
/// | version   | 4 bytes (LE)              |
/// | vin       | VarInt count + inputs     |
/// | vout      | VarInt count + outputs    |
/// | lock_time | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction format version; 4 and above carry output token ids.
    pub version: u32,
    /// Ordered inputs.
    pub vin: Vec<Vin>,
    /// Ordered outputs.
    pub vout: Vec<Vout>,
    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Output layout selected by this transaction's version.
    pub fn vout_layout(&self) -> VoutLayout {
        VoutLayout::for_version(self.version)
    }

    /// Compute the transaction id (double SHA-256 of the non-witness serialization).
    ///
    /// # Returns
    /// The id; its `Display` form is the conventional reversed hex.
    pub fn txid(&self) -> Result<Hash, TransactionError> {
        Ok(double_hash_h(&self.encode()?))
    }
}

impl Composable for Transaction {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le()?;
        let vin = Vec::<Vin>::read_from(reader, ctx)?;
        let vout = read_vouts(reader, VoutLayout::for_version(version), ctx)?;
        let lock_time = reader.read_u32_le()?;
        Ok(Transaction { version, vin, vout, lock_time })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        writer.write_u32_le(self.version);
        self.vin.write_to(writer, ctx)?;
        write_vouts(writer, &self.vout, self.vout_layout(), ctx)?;
        writer.write_u32_le(self.lock_time);
        Ok(())
    }
}

/// A transaction with witness data.
///
/// # Wire format
///
/// | Field     | Size                             |
/// |-----------|----------------------------------|
/// | version   | 4 bytes (LE)                     |
/// | marker    | 1 byte (`0x00`)                  |
/// | flag      | 1 byte (`0x01`)                  |
/// | vin       | VarInt count + inputs            |
/// | vout      | VarInt count + outputs           |
/// | witness   | one per input, no count          |
/// | lock_time | 4 bytes (LE)                     |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSegWit {
    pub version: u32,
    pub marker: u8,
    pub flag: u8,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    /// One witness per input, in input order.
    pub witness: Vec<Witness>,
    pub lock_time: u32,
}

impl TransactionSegWit {
    /// Attach witnesses to a transaction.
    ///
    /// # Arguments
    /// * `tx` - The transaction to extend.
    /// * `witness` - One witness per input.
    ///
    /// # Returns
    /// `SerializationError` if the witness count differs from the input count.
    pub fn from_transaction(tx: &Transaction, witness: Vec<Witness>) -> Result<Self, TransactionError> {
        if witness.len() != tx.vin.len() {
            return Err(TransactionError::SerializationError(format!(
                "{} witnesses for {} inputs",
                witness.len(),
                tx.vin.len()
            )));
        }
        Ok(TransactionSegWit {
            version: tx.version,
            marker: SEGWIT_MARKER,
            flag: SEGWIT_FLAG,
            vin: tx.vin.clone(),
            vout: tx.vout.clone(),
            witness,
            lock_time: tx.lock_time,
        })
    }

    /// The non-witness view of this transaction.
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            version: self.version,
            vin: self.vin.clone(),
            vout: self.vout.clone(),
            lock_time: self.lock_time,
        }
    }

    /// Transaction id, computed over the non-witness serialization.
    pub fn txid(&self) -> Result<Hash, TransactionError> {
        self.to_transaction().txid()
    }
}

impl Composable for TransactionSegWit {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le()?;
        let marker = reader.read_u8()?;
        let flag = reader.read_u8()?;
        if marker != SEGWIT_MARKER || flag != SEGWIT_FLAG {
            return Err(TransactionError::SerializationError(format!(
                "segwit marker/flag must be 00 01, got {:02x} {:02x}",
                marker, flag
            )));
        }
        let vin = Vec::<Vin>::read_from(reader, ctx)?;
        let vout = read_vouts(reader, VoutLayout::for_version(version), ctx)?;
        let mut witness = Vec::with_capacity(vin.len());
        for _ in 0..vin.len() {
            witness.push(Witness::read_from(reader, ctx)?);
        }
        let lock_time = reader.read_u32_le()?;
        Ok(TransactionSegWit { version, marker, flag, vin, vout, witness, lock_time })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        if self.witness.len() != self.vin.len() {
            return Err(TransactionError::SerializationError(format!(
                "{} witnesses for {} inputs",
                self.witness.len(),
                self.vin.len()
            )));
        }
        writer.write_u32_le(self.version);
        writer.write_u8(self.marker);
        writer.write_u8(self.flag);
        self.vin.write_to(writer, ctx)?;
        write_vouts(writer, &self.vout, VoutLayout::for_version(self.version), ctx)?;
        for witness in &self.witness {
            witness.write_to(writer, ctx)?;
        }
        writer.write_u32_le(self.lock_time);
        Ok(())
    }
}

/// A raw transaction in either layout.
///
/// Decoding peeks at the two bytes after the version: `00 01` selects the
/// segwit layout. A legacy transaction cannot start its input list with a
/// zero count, so the two never overlap for transactions with inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum RawTransaction {
    Legacy(Transaction),
    SegWit(TransactionSegWit),
}

impl RawTransaction {
    /// The non-witness view.
    pub fn to_transaction(&self) -> Transaction {
        match self {
            RawTransaction::Legacy(tx) => tx.clone(),
            RawTransaction::SegWit(tx) => tx.to_transaction(),
        }
    }

    /// Transaction id of either layout.
    pub fn txid(&self) -> Result<Hash, TransactionError> {
        match self {
            RawTransaction::Legacy(tx) => tx.txid(),
            RawTransaction::SegWit(tx) => tx.txid(),
        }
    }
}

impl Composable for RawTransaction {
    type Error = TransactionError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, TransactionError> {
        let mut peek = reader.clone();
        peek.read_u32_le()?;
        let is_segwit = peek.read_u8()? == SEGWIT_MARKER && peek.read_u8()? == SEGWIT_FLAG;
        tracing::trace!(is_segwit, "sniffed raw transaction layout");
        if is_segwit {
            Ok(RawTransaction::SegWit(TransactionSegWit::read_from(reader, ctx)?))
        } else {
            Ok(RawTransaction::Legacy(Transaction::read_from(reader, ctx)?))
        }
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), TransactionError> {
        match self {
            RawTransaction::Legacy(tx) => tx.write_to(writer, ctx),
            RawTransaction::SegWit(tx) => tx.write_to(writer, ctx),
        }
    }
}

impl fmt::Display for Transaction {
    /// Display the transaction as raw hex, or `[error]` if it cannot be encoded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode_hex() {
            Ok(hex_str) => f.write_str(&hex_str),
            Err(_) => f.write_str("[error]"),
        }
    }
}

impl fmt::Display for TransactionSegWit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode_hex() {
            Ok(hex_str) => f.write_str(&hex_str),
            Err(_) => f.write_str("[error]"),
        }
    }
}
