//! Opcode table and the tagged opcode variant.
//!
//! [`StaticOp`] covers every fixed, payload-free opcode. [`OpCode`] is the
//! element type of a script stack: a static opcode, a data push, an
//! unwrapped DfTx payload, or an unmapped byte kept for lossless round-trip.

use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::dftx::DfTx;
use crate::pushdata::{PushData, OP_PUSHDATA4};
use crate::ScriptError;

macro_rules! static_ops {
    ($( $(#[$doc:meta])* $name:ident = $byte:literal ),* $(,)?) => {
        /// A fixed opcode with no payload.
        ///
        /// Discriminants are the wire bytes. Push opcodes (`0x01..=0x4e`) are
        /// not listed here; they are represented by [`PushData`].
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum StaticOp {
            $( $(#[$doc])* $name = $byte, )*
        }

        impl StaticOp {
            /// Every static opcode, in byte order.
            pub const ALL: &'static [StaticOp] = &[$(StaticOp::$name),*];

            /// Look up the static opcode for a wire byte.
            ///
            /// # Returns
            /// `None` for push prefixes and unassigned bytes.
            pub const fn from_byte(byte: u8) -> Option<StaticOp> {
                match byte {
                    $( $byte => Some(StaticOp::$name), )*
                    _ => None,
                }
            }

            /// Canonical `OP_*` name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( StaticOp::$name => stringify!($name), )*
                }
            }

            fn from_canonical_name(name: &str) -> Option<StaticOp> {
                match name {
                    $( stringify!($name) => Some(StaticOp::$name), )*
                    _ => None,
                }
            }
        }
    };
}

static_ops! {
    // ---- constants ----
    /// Pushes an empty byte vector.
    OP_0 = 0x00,
    OP_1NEGATE = 0x4f,
    OP_RESERVED = 0x50,
    OP_1 = 0x51,
    OP_2 = 0x52,
    OP_3 = 0x53,
    OP_4 = 0x54,
    OP_5 = 0x55,
    OP_6 = 0x56,
    OP_7 = 0x57,
    OP_8 = 0x58,
    OP_9 = 0x59,
    OP_10 = 0x5a,
    OP_11 = 0x5b,
    OP_12 = 0x5c,
    OP_13 = 0x5d,
    OP_14 = 0x5e,
    OP_15 = 0x5f,
    OP_16 = 0x60,

    // ---- flow control ----
    OP_NOP = 0x61,
    OP_VER = 0x62,
    OP_IF = 0x63,
    OP_NOTIF = 0x64,
    OP_VERIF = 0x65,
    OP_VERNOTIF = 0x66,
    OP_ELSE = 0x67,
    OP_ENDIF = 0x68,
    OP_VERIFY = 0x69,
    /// Marks an output unspendable; DfTx payloads follow it.
    OP_RETURN = 0x6a,

    // ---- stack ----
    OP_TOALTSTACK = 0x6b,
    OP_FROMALTSTACK = 0x6c,
    OP_2DROP = 0x6d,
    OP_2DUP = 0x6e,
    OP_3DUP = 0x6f,
    OP_2OVER = 0x70,
    OP_2ROT = 0x71,
    OP_2SWAP = 0x72,
    OP_IFDUP = 0x73,
    OP_DEPTH = 0x74,
    OP_DROP = 0x75,
    OP_DUP = 0x76,
    OP_NIP = 0x77,
    OP_OVER = 0x78,
    OP_PICK = 0x79,
    OP_ROLL = 0x7a,
    OP_ROT = 0x7b,
    OP_SWAP = 0x7c,
    OP_TUCK = 0x7d,

    // ---- splice ----
    OP_CAT = 0x7e,
    OP_SUBSTR = 0x7f,
    OP_LEFT = 0x80,
    OP_RIGHT = 0x81,
    OP_SIZE = 0x82,

    // ---- bitwise logic ----
    OP_INVERT = 0x83,
    OP_AND = 0x84,
    OP_OR = 0x85,
    OP_XOR = 0x86,
    OP_EQUAL = 0x87,
    OP_EQUALVERIFY = 0x88,
    OP_RESERVED1 = 0x89,
    OP_RESERVED2 = 0x8a,

    // ---- arithmetic ----
    OP_1ADD = 0x8b,
    OP_1SUB = 0x8c,
    OP_2MUL = 0x8d,
    OP_2DIV = 0x8e,
    OP_NEGATE = 0x8f,
    OP_ABS = 0x90,
    OP_NOT = 0x91,
    OP_0NOTEQUAL = 0x92,
    OP_ADD = 0x93,
    OP_SUB = 0x94,
    OP_MUL = 0x95,
    OP_DIV = 0x96,
    OP_MOD = 0x97,
    OP_LSHIFT = 0x98,
    OP_RSHIFT = 0x99,
    OP_BOOLAND = 0x9a,
    OP_BOOLOR = 0x9b,
    OP_NUMEQUAL = 0x9c,
    OP_NUMEQUALVERIFY = 0x9d,
    OP_NUMNOTEQUAL = 0x9e,
    OP_LESSTHAN = 0x9f,
    OP_GREATERTHAN = 0xa0,
    OP_LESSTHANOREQUAL = 0xa1,
    OP_GREATERTHANOREQUAL = 0xa2,
    OP_MIN = 0xa3,
    OP_MAX = 0xa4,
    OP_WITHIN = 0xa5,

    // ---- crypto ----
    OP_RIPEMD160 = 0xa6,
    OP_SHA1 = 0xa7,
    OP_SHA256 = 0xa8,
    OP_HASH160 = 0xa9,
    OP_HASH256 = 0xaa,
    OP_CODESEPARATOR = 0xab,
    OP_CHECKSIG = 0xac,
    OP_CHECKSIGVERIFY = 0xad,
    OP_CHECKMULTISIG = 0xae,
    OP_CHECKMULTISIGVERIFY = 0xaf,

    // ---- expansion ----
    OP_NOP1 = 0xb0,
    OP_CHECKLOCKTIMEVERIFY = 0xb1,
    OP_CHECKSEQUENCEVERIFY = 0xb2,
    OP_NOP4 = 0xb3,
    OP_NOP5 = 0xb4,
    OP_NOP6 = 0xb5,
    OP_NOP7 = 0xb6,
    OP_NOP8 = 0xb7,
    OP_NOP9 = 0xb8,
    OP_NOP10 = 0xb9,
}

impl StaticOp {
    /// Alias of [`StaticOp::OP_0`].
    pub const OP_FALSE: StaticOp = StaticOp::OP_0;
    /// Alias of [`StaticOp::OP_1`].
    pub const OP_TRUE: StaticOp = StaticOp::OP_1;
    /// Alias of [`StaticOp::OP_CHECKLOCKTIMEVERIFY`].
    pub const OP_NOP2: StaticOp = StaticOp::OP_CHECKLOCKTIMEVERIFY;
    /// Alias of [`StaticOp::OP_CHECKSEQUENCEVERIFY`].
    pub const OP_NOP3: StaticOp = StaticOp::OP_CHECKSEQUENCEVERIFY;

    /// The wire byte.
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Look up a static opcode by name, accepting aliases.
    ///
    /// # Arguments
    /// * `name` - An `OP_*` name such as `"OP_DUP"` or `"OP_FALSE"`.
    pub fn from_name(name: &str) -> Option<StaticOp> {
        match name {
            "OP_FALSE" => Some(StaticOp::OP_FALSE),
            "OP_TRUE" => Some(StaticOp::OP_TRUE),
            "OP_NOP2" => Some(StaticOp::OP_NOP2),
            "OP_NOP3" => Some(StaticOp::OP_NOP3),
            _ => StaticOp::from_canonical_name(name),
        }
    }

    /// Small-integer opcode `OP_1..=OP_16` for `n`, or `OP_0` for zero.
    pub const fn small_int(n: u8) -> Option<StaticOp> {
        match n {
            0 => Some(StaticOp::OP_0),
            1..=16 => StaticOp::from_byte(0x50 + n),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OpCode
// ---------------------------------------------------------------------------

/// One element of a script stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpCode {
    /// A fixed opcode.
    Static(StaticOp),
    /// A data push (`0x01..=0x4e` prefixes).
    PushData(PushData),
    /// A DfTx payload unwrapped from `OP_RETURN <push>`.
    DfTx(Box<DfTx>),
    /// A byte with no assigned opcode, preserved verbatim.
    Unmapped(u8),
}

impl OpCode {
    /// Map a non-push byte to its opcode.
    ///
    /// Total over all bytes: known static opcodes map to [`OpCode::Static`],
    /// everything else (including push prefixes, which need their payload
    /// and are parsed by [`OpCode::read_from`]) maps to [`OpCode::Unmapped`].
    pub fn from_byte(byte: u8) -> OpCode {
        match StaticOp::from_byte(byte) {
            Some(op) => OpCode::Static(op),
            None => OpCode::Unmapped(byte),
        }
    }

    /// Render this element as an ASM token.
    ///
    /// Pushes render as wire-order hex; a DfTx renders as the hex of its
    /// envelope, or `[error]` if the payload cannot be encoded.
    pub fn to_asm(&self) -> String {
        match self {
            OpCode::Static(op) => op.name().to_string(),
            OpCode::PushData(push) => push.to_hex(),
            OpCode::DfTx(tx) => tx
                .encode()
                .map(hex::encode)
                .unwrap_or_else(|_| "[error]".to_string()),
            OpCode::Unmapped(byte) => format!("OP_UNKNOWN_{:#04x}", byte),
        }
    }

    /// Check whether this element is the given static opcode.
    pub fn is(&self, op: StaticOp) -> bool {
        matches!(self, OpCode::Static(o) if *o == op)
    }
}

impl From<StaticOp> for OpCode {
    fn from(op: StaticOp) -> Self {
        OpCode::Static(op)
    }
}

impl From<PushData> for OpCode {
    fn from(push: PushData) -> Self {
        OpCode::PushData(push)
    }
}

impl From<DfTx> for OpCode {
    fn from(tx: DfTx) -> Self {
        OpCode::DfTx(Box::new(tx))
    }
}

impl Composable for OpCode {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, _ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let byte = reader.read_u8()?;
        match byte {
            0x01..=OP_PUSHDATA4 => {
                let push = PushData::read_after_prefix(byte, reader)?;
                // A zero-length PUSHDATA pushes the same empty vector as OP_0.
                if push.is_empty() {
                    Ok(OpCode::Static(StaticOp::OP_0))
                } else {
                    Ok(OpCode::PushData(push))
                }
            }
            _ => Ok(OpCode::from_byte(byte)),
        }
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        match self {
            OpCode::Static(op) => writer.write_u8(op.byte()),
            OpCode::PushData(push) => push.write_to(writer, ctx)?,
            OpCode::DfTx(tx) => {
                let envelope = tx.encode_with(ctx)?;
                PushData::from_wire(envelope).write_to(writer, ctx)?;
            }
            OpCode::Unmapped(byte) => {
                if (0x01..=OP_PUSHDATA4).contains(byte) {
                    return Err(ScriptError::InvalidScript(format!(
                        "push prefix {:#04x} cannot be written without data",
                        byte
                    )));
                }
                writer.write_u8(*byte);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_byte_exact() {
        assert_eq!(StaticOp::ALL.len(), 108);
        for op in StaticOp::ALL {
            assert_eq!(StaticOp::from_byte(op.byte()), Some(*op));
            assert_eq!(StaticOp::from_name(op.name()), Some(*op));
        }
        assert_eq!(StaticOp::OP_RETURN.byte(), 0x6a);
        assert_eq!(StaticOp::OP_CHECKSIG.byte(), 0xac);
        assert_eq!(StaticOp::OP_NOP10.byte(), 0xb9);
    }

    #[test]
    fn test_aliases_are_same_variant() {
        assert_eq!(StaticOp::OP_FALSE, StaticOp::OP_0);
        assert_eq!(StaticOp::OP_TRUE, StaticOp::OP_1);
        assert_eq!(StaticOp::OP_NOP2, StaticOp::OP_CHECKLOCKTIMEVERIFY);
        assert_eq!(StaticOp::OP_NOP3.byte(), 0xb2);
        assert_eq!(StaticOp::from_name("OP_NOP2"), Some(StaticOp::OP_CHECKLOCKTIMEVERIFY));
        assert_eq!(StaticOp::from_name("OP_FALSE").map(StaticOp::name), Some("OP_0"));
    }

    #[test]
    fn test_from_byte_is_total() {
        for byte in 0..=u8::MAX {
            let op = OpCode::from_byte(byte);
            match byte {
                0x01..=0x4e | 0xba..=0xff => assert_eq!(op, OpCode::Unmapped(byte)),
                _ => assert!(matches!(op, OpCode::Static(s) if s.byte() == byte)),
            }
        }
    }

    #[test]
    fn test_unmapped_roundtrip() {
        let op = OpCode::decode(&[0xfe]).unwrap();
        assert_eq!(op, OpCode::Unmapped(0xfe));
        assert_eq!(op.encode().unwrap(), vec![0xfe]);
        assert_eq!(op.to_asm(), "OP_UNKNOWN_0xfe");
    }

    #[test]
    fn test_small_int() {
        assert_eq!(StaticOp::small_int(0), Some(StaticOp::OP_0));
        assert_eq!(StaticOp::small_int(16), Some(StaticOp::OP_16));
        assert_eq!(StaticOp::small_int(17), None);
    }

    #[test]
    fn test_zero_length_push_reads_as_op_0() {
        for raw in [&[0x4c, 0x00][..], &[0x4d, 0x00, 0x00], &[0x4e, 0x00, 0x00, 0x00, 0x00]] {
            let op = OpCode::decode(raw).unwrap();
            assert_eq!(op, OpCode::Static(StaticOp::OP_0));
            assert_eq!(op.encode().unwrap(), vec![0x00]);
        }
    }

    #[test]
    fn test_unmapped_push_prefix_not_writable() {
        assert!(OpCode::Unmapped(0x14).encode().is_err());
    }
}
