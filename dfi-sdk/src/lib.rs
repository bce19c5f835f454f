#![deny(missing_docs)]

//! DeFi chain SDK - Complete SDK.
//!
//! Re-exports the primitives, script and transaction crates for convenient
//! single-crate usage.
//!
//! ```
//! use dfi_sdk::primitives::compose::Composable;
//! use dfi_sdk::script::{DfTxPayload, Script};
//!
//! let script = Script::from_hex("6a0744665478610000").unwrap();
//! let dftx = script.dftx().unwrap();
//! assert!(matches!(dftx.payload, DfTxPayload::AnyAccountToAccount(_)));
//! assert_eq!(script.encode_hex().unwrap(), "096a0744665478610000");
//! ```

pub use dfi_primitives as primitives;
pub use dfi_script as script;
pub use dfi_transaction as transaction;
