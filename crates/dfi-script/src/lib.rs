//! DeFi chain SDK - Opcodes, scripts and DfTx payloads.
//!
//! Provides the static opcode table, data pushes, the length-prefixed script
//! composer and the DfTx envelope with its payload family.

pub mod dftx;
pub mod opcodes;
pub mod pushdata;
pub mod script;

mod error;
pub use error::ScriptError;
pub use dftx::{DfTx, DfTxPayload, DFTX_MAGIC, MAX_DFTX_NESTING};
pub use opcodes::{OpCode, StaticOp};
pub use pushdata::{Endian, PushData, MAX_PUSHDATA_LEN};
pub use script::Script;
