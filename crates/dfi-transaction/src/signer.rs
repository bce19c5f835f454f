//! Segwit input signer.
//!
//! Signing never mutates the transaction. Each input is signed independently
//! through an injected [`EllipticPair`], which may be a local key or a remote
//! signer; its failures propagate to the caller unchanged.

use std::future::{ready, Future};

use serde::{Deserialize, Serialize};

use dfi_primitives::ec::PrivateKey;
use dfi_primitives::hash::hash160;
use dfi_script::Script;

use crate::output::Vout;
use crate::sighash::{ensure_supported, WitnessProgram, SIGHASH_ALL};
use crate::transaction::{Transaction, TransactionSegWit, DEFAULT_TX_VERSION};
use crate::witness::Witness;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Signing capability
// -----------------------------------------------------------------------

/// A secp256k1 key pair able to sign digests.
pub trait EllipticPair {
    /// The serialized public key placed in the witness.
    fn public_key(&self) -> impl Future<Output = Result<Vec<u8>, TransactionError>> + Send;

    /// Sign a 32-byte digest, returning the DER-encoded signature.
    fn sign(&self, digest: &[u8; 32]) -> impl Future<Output = Result<Vec<u8>, TransactionError>> + Send;
}

impl EllipticPair for PrivateKey {
    fn public_key(&self) -> impl Future<Output = Result<Vec<u8>, TransactionError>> + Send {
        ready(Ok(self.pub_key().to_compressed().to_vec()))
    }

    fn sign(&self, digest: &[u8; 32]) -> impl Future<Output = Result<Vec<u8>, TransactionError>> + Send {
        let signature = PrivateKey::sign(self, digest)
            .map(|sig| sig.to_der())
            .map_err(|e| TransactionError::SigningError(e.to_string()));
        ready(signature)
    }
}

// -----------------------------------------------------------------------
// Options
// -----------------------------------------------------------------------

/// What the signer needs to know about one input.
#[derive(Clone, Debug)]
pub struct SignInputOption<P> {
    /// The output being spent.
    pub prevout: Vout,
    /// Key material for this input.
    pub pair: P,
    /// Explicit script code. Required unless the prevout is P2WPKH.
    pub witness_script: Option<Script>,
}

impl<P> SignInputOption<P> {
    /// Options for spending `prevout` with `pair`, guessing the script code.
    pub fn new(prevout: Vout, pair: P) -> Self {
        SignInputOption { prevout, pair, witness_script: None }
    }
}

/// Whole-transaction checks applied by [`sign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignerValidation {
    /// Require `version == DEFAULT_TX_VERSION`.
    pub version: bool,
    /// Require `lock_time == 0`.
    pub lock_time: bool,
}

impl Default for SignerValidation {
    fn default() -> Self {
        SignerValidation { version: true, lock_time: true }
    }
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

/// Work out the script code for an input.
///
/// An explicit witness script wins. Otherwise the prevout must be P2WPKH
/// paying to the signer's own key, in which case the P2PKH form is used.
fn script_code<P>(option: &SignInputOption<P>, pubkey: &[u8]) -> Result<Script, TransactionError> {
    if let Some(script) = &option.witness_script {
        return Ok(script.clone());
    }
    match option.prevout.script.p2wpkh_hash() {
        Some(hash) if hash == hash160(pubkey) => Ok(Script::p2pkh_from_hash(&hash)),
        _ => Err(TransactionError::SigningPolicy(format!(
            "cannot derive script code from prevout script '{}'; provide a witness script",
            option.prevout.script
        ))),
    }
}

/// Sign one input.
///
/// # Arguments
/// * `tx` - The transaction being signed; left untouched.
/// * `index` - Index of the input to sign.
/// * `option` - Prevout, key material and optional witness script.
/// * `sighash_type` - Must be `SIGHASH_ALL`.
///
/// # Returns
/// The witness `[der_signature || sighash_type, pubkey]`.
pub async fn sign_input<P: EllipticPair>(
    tx: &Transaction,
    index: usize,
    option: &SignInputOption<P>,
    sighash_type: u32,
) -> Result<Witness, TransactionError> {
    ensure_supported(sighash_type)?;
    let pubkey = option.pair.public_key().await?;
    let script_code = script_code(option, &pubkey)?;
    let digest = WitnessProgram::new(tx, index, script_code, option.prevout.value, sighash_type)?.sighash()?;

    let mut signature = option.pair.sign(&digest).await?;
    // The sighash byte is the low byte of the type; only ALL is accepted above.
    signature.push(sighash_type as u8);
    tracing::debug!(index, digest = %hex::encode(digest), "signed input");
    Ok(Witness::new(vec![signature, pubkey]))
}

/// Sign every input of a transaction with `SIGHASH_ALL`.
///
/// # Arguments
/// * `tx` - The unsigned transaction.
/// * `options` - One entry per input, in input order.
/// * `validation` - Which default-policy checks to apply.
///
/// # Returns
/// The segwit transaction carrying one witness per input, or the first error.
pub async fn sign<P: EllipticPair>(
    tx: &Transaction,
    options: &[SignInputOption<P>],
    validation: SignerValidation,
) -> Result<TransactionSegWit, TransactionError> {
    if tx.vin.len() != options.len() {
        return Err(TransactionError::SigningPolicy(format!(
            "{} inputs but {} sign options",
            tx.vin.len(),
            options.len()
        )));
    }
    if validation.version && tx.version != DEFAULT_TX_VERSION {
        return Err(TransactionError::SigningPolicy(format!(
            "version {} is not the default {}",
            tx.version, DEFAULT_TX_VERSION
        )));
    }
    if validation.lock_time && tx.lock_time != 0 {
        return Err(TransactionError::SigningPolicy(format!(
            "lock time {} is not 0",
            tx.lock_time
        )));
    }

    let mut witness = Vec::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        witness.push(sign_input(tx, index, option, SIGHASH_ALL).await?);
    }
    tracing::debug!(inputs = witness.len(), version = tx.version, "signed transaction");
    TransactionSegWit::from_transaction(tx, witness)
}
