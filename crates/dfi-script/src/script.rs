/// Script type - an ordered stack of opcodes, data pushes and DfTx payloads.
///
/// On the wire a script is `varint(len) || opcode bytes`. Decoding parses the
/// opcode bytes into a [`Vec<OpCode>`] and then unwraps a DfTx envelope when
/// the script is exactly `OP_RETURN <push>` and the push carries the magic.

use std::fmt;

use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::dftx::{DfTx, DFTX_MAGIC, MAX_DFTX_NESTING};
use crate::opcodes::{OpCode, StaticOp};
use crate::pushdata::{Endian, PushData};
use crate::ScriptError;

/// A locking or unlocking script.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Script {
    /// The parsed elements in wire order.
    pub stack: Vec<OpCode>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a script from a list of elements.
    ///
    /// # Arguments
    /// * `stack` - The elements, in wire order.
    pub fn new(stack: Vec<OpCode>) -> Self {
        Script { stack }
    }

    /// Parse raw opcode bytes (no length prefix) with the default context.
    ///
    /// # Arguments
    /// * `bytes` - Opcode bytes, e.g. the 22 bytes of a P2WPKH output script.
    ///
    /// # Returns
    /// The parsed script, or an error if a push is truncated or a DfTx
    /// envelope holds a malformed known payload.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, ScriptError> {
        Self::from_raw_with(bytes, &ComposeContext::default())
    }

    /// Parse raw opcode bytes (no length prefix).
    pub fn from_raw_with(bytes: &[u8], ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let mut reader = DfiReader::new(bytes);
        let mut stack = Vec::new();
        while !reader.is_empty() {
            stack.push(OpCode::read_from(&mut reader, ctx)?);
        }
        let mut script = Script { stack };
        script.detect_dftx(ctx)?;
        Ok(script)
    }

    /// Parse raw opcode bytes from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Unprefixed script hex (e.g. "0014...").
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Self::from_raw(&bytes)
    }

    /// Build a script from its ASM form.
    ///
    /// Tokens are `OP_*` names (aliases accepted), `OP_UNKNOWN_0x..` for
    /// unmapped bytes, or wire-order hex for pushes.
    ///
    /// # Returns
    /// The script, or `InvalidOpcode` for a token that is neither.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut stack = Vec::new();
        for token in asm.split_whitespace() {
            if let Some(op) = StaticOp::from_name(token) {
                stack.push(OpCode::Static(op));
            } else if let Some(byte) = token.strip_prefix("OP_UNKNOWN_0x") {
                let byte = u8::from_str_radix(byte, 16)
                    .map_err(|_| ScriptError::InvalidOpcode(token.to_string()))?;
                stack.push(OpCode::Unmapped(byte));
            } else {
                let data = hex::decode(token).map_err(|_| ScriptError::InvalidOpcode(token.to_string()))?;
                if data.is_empty() {
                    return Err(ScriptError::InvalidOpcode(token.to_string()));
                }
                stack.push(OpCode::PushData(PushData::new(data, Endian::Little)?));
            }
        }
        let mut script = Script { stack };
        script.detect_dftx(&ComposeContext::default())?;
        Ok(script)
    }

    /// P2WPKH output script `OP_0 <20-byte hash>`.
    pub fn p2wpkh_from_hash(hash: &[u8; 20]) -> Self {
        Script {
            stack: vec![
                OpCode::Static(StaticOp::OP_0),
                OpCode::PushData(PushData::from_wire(hash.to_vec())),
            ],
        }
    }

    /// P2PKH script `OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG`.
    ///
    /// This is also the BIP143 script code of a P2WPKH input.
    pub fn p2pkh_from_hash(hash: &[u8; 20]) -> Self {
        Script {
            stack: vec![
                OpCode::Static(StaticOp::OP_DUP),
                OpCode::Static(StaticOp::OP_HASH160),
                OpCode::PushData(PushData::from_wire(hash.to_vec())),
                OpCode::Static(StaticOp::OP_EQUALVERIFY),
                OpCode::Static(StaticOp::OP_CHECKSIG),
            ],
        }
    }

    /// `OP_RETURN <envelope>` output script carrying a DfTx.
    pub fn dftx_output(tx: DfTx) -> Self {
        Script {
            stack: vec![OpCode::Static(StaticOp::OP_RETURN), OpCode::from(tx)],
        }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the opcode bytes without the length prefix.
    pub fn to_raw(&self) -> Result<Vec<u8>, ScriptError> {
        self.to_raw_with(&ComposeContext::default())
    }

    /// Encode the opcode bytes without the length prefix.
    pub fn to_raw_with(&self, ctx: &ComposeContext) -> Result<Vec<u8>, ScriptError> {
        let mut writer = DfiWriter::new();
        for op in &self.stack {
            op.write_to(&mut writer, ctx)?;
        }
        Ok(writer.into_bytes())
    }

    /// Unprefixed script hex.
    pub fn to_hex(&self) -> Result<String, ScriptError> {
        Ok(hex::encode(self.to_raw()?))
    }

    /// Space-separated ASM tokens.
    ///
    /// # Returns
    /// An empty string for an empty script.
    pub fn to_asm(&self) -> String {
        self.stack
            .iter()
            .map(OpCode::to_asm)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of elements on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the script has no elements.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// The unwrapped DfTx, if this is a DfTx output script.
    pub fn dftx(&self) -> Option<&DfTx> {
        match self.stack.as_slice() {
            [ret, OpCode::DfTx(tx)] if ret.is(StaticOp::OP_RETURN) => Some(tx),
            _ => None,
        }
    }

    /// Pattern: `OP_0 <20 bytes>`.
    pub fn is_p2wpkh(&self) -> bool {
        self.p2wpkh_hash().is_some()
    }

    /// The 20-byte witness program of a P2WPKH script.
    pub fn p2wpkh_hash(&self) -> Option<[u8; 20]> {
        match self.stack.as_slice() {
            [zero, OpCode::PushData(push)] if zero.is(StaticOp::OP_0) => push.data().try_into().ok(),
            _ => None,
        }
    }

    /// Pattern: `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn is_p2pkh(&self) -> bool {
        match self.stack.as_slice() {
            [dup, hash160, OpCode::PushData(push), equal_verify, checksig] => {
                dup.is(StaticOp::OP_DUP)
                    && hash160.is(StaticOp::OP_HASH160)
                    && push.len() == 20
                    && equal_verify.is(StaticOp::OP_EQUALVERIFY)
                    && checksig.is(StaticOp::OP_CHECKSIG)
            }
            _ => false,
        }
    }

    /// Pattern: `OP_HASH160 <20 bytes> OP_EQUAL`.
    pub fn is_p2sh(&self) -> bool {
        match self.stack.as_slice() {
            [hash160, OpCode::PushData(push), equal] => {
                hash160.is(StaticOp::OP_HASH160) && push.len() == 20 && equal.is(StaticOp::OP_EQUAL)
            }
            _ => false,
        }
    }

    /// Whether the script starts with `OP_RETURN` (DfTx outputs included).
    pub fn is_null_data(&self) -> bool {
        self.stack.first().is_some_and(|op| op.is(StaticOp::OP_RETURN))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace `OP_RETURN <push>` with the decoded DfTx when the push carries the magic.
    ///
    /// A push with the magic and a known type byte must decode strictly;
    /// unknown type bytes fall back to the unmapped payload. Past
    /// [`MAX_DFTX_NESTING`] enclosing envelopes the push is left as is.
    fn detect_dftx(&mut self, ctx: &ComposeContext) -> Result<(), ScriptError> {
        let envelope = match self.stack.as_slice() {
            [ret, OpCode::PushData(push)]
                if ret.is(StaticOp::OP_RETURN)
                    && push.len() > DFTX_MAGIC.len()
                    && push.data().starts_with(&DFTX_MAGIC) =>
            {
                push.data()
            }
            _ => return Ok(()),
        };
        if ctx.dftx_depth() >= MAX_DFTX_NESTING {
            tracing::debug!(depth = ctx.dftx_depth(), "DfTx nesting limit reached, keeping raw push");
            return Ok(());
        }
        let tx = DfTx::decode_with(envelope, &ctx.nested_dftx())?;
        tracing::debug!(
            type_byte = tx.payload.type_byte(),
            name = tx.payload.name(),
            "unwrapped DfTx envelope"
        );
        self.stack[1] = OpCode::from(tx);
        Ok(())
    }
}

impl Composable for Script {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let len = reader.read_varint()?.as_len()?;
        let mut body = reader.sub_reader(len)?;
        let mut stack = Vec::new();
        while !body.is_empty() {
            stack.push(OpCode::read_from(&mut body, ctx)?);
        }
        tracing::trace!(len, ops = stack.len(), "parsed script");
        let mut script = Script { stack };
        script.detect_dftx(ctx)?;
        Ok(script)
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        let raw = self.to_raw_with(ctx)?;
        writer.write_var_bytes(&raw);
        Ok(())
    }
}

impl From<Vec<OpCode>> for Script {
    fn from(stack: Vec<OpCode>) -> Self {
        Script { stack }
    }
}

impl fmt::Display for Script {
    /// Display the script as ASM.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_asm())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let hex_str = self.to_hex().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
