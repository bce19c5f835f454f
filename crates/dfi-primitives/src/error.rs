/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC operations, binary composition, and key management.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("varint too large")]
    VarIntTooLarge,

    #[error("non-canonical varint: {value} encoded in {len} bytes")]
    NonCanonicalVarInt { value: u64, len: usize },

    #[error("invalid width for field `{field}`: expected {expected} bytes, got {got}")]
    InvalidFieldWidth {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    #[error("invalid utf-8 string: {0}")]
    InvalidUtf8(String),

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    #[error("{0}")]
    Other(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
