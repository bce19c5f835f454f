/// DeFi chain SDK - Transaction composition and signing.
///
/// Provides inputs, outputs in both the V2 and token-carrying V4 layouts,
/// legacy and segwit transaction composers, the BIP143 signature hash and
/// an async input signer over an injected key pair.

pub mod transaction;
pub mod input;
pub mod output;
pub mod witness;
pub mod sighash;
pub mod signer;

mod error;
pub use error::TransactionError;
pub use transaction::{RawTransaction, Transaction, TransactionSegWit, DEFAULT_TX_VERSION};
pub use input::{Vin, DEFAULT_SEQUENCE_NUMBER};
pub use output::{Vout, VoutLayout};
pub use witness::Witness;
pub use sighash::{WitnessProgram, SIGHASH_ALL};
pub use signer::{sign, sign_input, EllipticPair, SignInputOption, SignerValidation};
