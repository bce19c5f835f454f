/// Error types for script and DfTx operations.
///
/// Covers truncated pushes, oversized pushes, malformed DfTx payloads and
/// layouts the active protocol context cannot express.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Generic invalid script error.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// An unrecognized token was encountered while parsing ASM.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data for push of {0} bytes")]
    DataTooSmall(usize),

    /// A data push with no bytes; the empty vector is pushed by `OP_0`.
    #[error("empty data push, use OP_0")]
    EmptyPush,

    /// Push data exceeds the 4-byte PUSHDATA length limit.
    #[error("push data of {0} bytes exceeds the 16777215 byte limit")]
    PushDataTooLarge(usize),

    /// The pushed bytes carry the DfTx magic but not a valid payload.
    #[error("invalid DfTx payload: {0}")]
    InvalidDfTx(String),

    /// A field layout the active compose context cannot encode.
    #[error("unsupported in this context: {0}")]
    Unsupported(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] dfi_primitives::PrimitivesError),
}
