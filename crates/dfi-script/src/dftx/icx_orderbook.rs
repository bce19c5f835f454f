//! Inter-chain exchange (ICX) order book payloads.
//!
//! An order sells a token on this chain for an asset on another chain (or the
//! reverse). Offers take an order, and the two sides lock funds with hash
//! time-locked contracts (HTLCs) that are claimed by revealing the seed.

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::Amount;

use crate::Script;

/// Order sells a token on this chain for an external asset.
pub const ICX_ORDER_INTERNAL: u8 = 0x01;
/// Order sells an external asset for a token on this chain.
pub const ICX_ORDER_EXTERNAL: u8 = 0x02;

dftx_struct! {
    /// Create an order (`1`).
    pub struct ICXCreateOrder {
        /// [`ICX_ORDER_INTERNAL`] or [`ICX_ORDER_EXTERNAL`].
        pub order_type: u8,
        pub token_id: u32 => varuint,
        pub owner_address: Script,
        /// Public key on the other chain; absent for internal orders.
        #[serde(default, with = "crate::dftx::hex_option")]
        pub receive_pubkey: Option<Vec<u8>> => optional_bytes,
        pub amount_from: Amount,
        pub amount_to_fill: Amount,
        pub order_price: Amount,
        /// Blocks until expiry.
        pub expiry: u32,
    }
}

dftx_struct! {
    /// Make an offer against an order (`2`).
    pub struct ICXMakeOffer {
        pub order_tx: Hash,
        pub amount: Amount,
        pub owner_address: Script,
        #[serde(default, with = "crate::dftx::hex_option")]
        pub receive_pubkey: Option<Vec<u8>> => optional_bytes,
        pub expiry: u32,
        pub taker_fee: Amount,
    }
}

dftx_struct! {
    /// Lock funds on this chain (`3`).
    pub struct ICXSubmitDFCHTLC {
        pub offer_tx: Hash,
        pub amount: Amount,
        /// Hash of the seed that unlocks the contract.
        pub hash: Hash,
        /// Timeout in blocks.
        pub timeout: u32,
    }
}

dftx_struct! {
    /// Announce funds locked on the other chain (`4`).
    pub struct ICXSubmitEXTHTLC {
        pub offer_tx: Hash,
        pub amount: Amount,
        pub hash: Hash,
        /// HTLC address on the other chain.
        pub htlc_script_address: String,
        #[serde(with = "hex::serde")]
        pub owner_pubkey: Vec<u8>,
        pub timeout: u32,
    }
}

dftx_struct! {
    /// Claim a contract on this chain by revealing its seed (`5`).
    pub struct ICXClaimDFCHTLC {
        pub dfc_htlc_tx: Hash,
        #[serde(with = "hex::serde")]
        pub seed: Vec<u8>,
    }
}

dftx_struct! {
    /// Close an order (`6`).
    pub struct ICXCloseOrder {
        pub order_tx: Hash,
    }
}

dftx_struct! {
    /// Close an offer (`7`).
    pub struct ICXCloseOffer {
        pub offer_tx: Hash,
    }
}
