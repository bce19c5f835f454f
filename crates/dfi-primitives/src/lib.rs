/// DeFi chain SDK - Cryptographic primitives, hashing, and binary composers.
///
/// This crate provides the foundational building blocks for the DfTx codec:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - Elliptic curve cryptography (secp256k1 keys, DER signatures, WIF)
/// - Variable-length integer encoding and cursor reader/writer
/// - The `Composable` trait and field composers (satoshi amounts,
///   optional fixed-width fields, count-prefixed lists)

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod compose;
pub mod ec;

mod error;
pub use error::PrimitivesError;
