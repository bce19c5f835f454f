/// Error types for transaction composition and signing.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The bytes do not form a valid transaction (e.g. bad segwit marker).
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// A value the selected wire layout cannot carry.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Only `SIGHASH_ALL` is supported.
    #[error("unsupported sighash type {0:#04x}")]
    UnsupportedSigHash(u32),
    /// The transaction or signing options violate the signing policy
    /// (count mismatch, version, lock time, unguessable prevout script).
    #[error("signing policy: {0}")]
    SigningPolicy(String),
    /// The signing capability failed.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An underlying script error (forwarded from `dfi-script`).
    #[error("script error: {0}")]
    Script(#[from] dfi_script::ScriptError),
    /// An underlying primitives error (forwarded from `dfi-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] dfi_primitives::PrimitivesError),
}
