//! Token payloads.

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::Amount;

use super::balance::TokenBalance;
use crate::Script;

dftx_struct! {
    /// Create a token (`T`).
    pub struct TokenCreate {
        pub symbol: String,
        pub name: String,
        pub decimal: u8,
        pub limit: Amount,
        pub is_dat: bool,
        pub tradeable: bool,
        pub mintable: bool,
    }
}

dftx_struct! {
    /// Mint tokens to the owner's account (`M`).
    pub struct TokenMint {
        pub balances: Vec<TokenBalance>,
    }
}

dftx_struct! {
    /// Toggle the DAT flag of a token (`N`).
    pub struct TokenUpdate {
        pub creation_tx: Hash,
        pub is_dat: bool,
    }
}

dftx_struct! {
    /// Update every mutable attribute of a token (`n`).
    pub struct TokenUpdateAny {
        pub creation_tx: Hash,
        pub symbol: String,
        pub name: String,
        pub decimal: u8,
        pub limit: Amount,
        pub is_dat: bool,
        pub tradeable: bool,
        pub mintable: bool,
    }
}

dftx_struct! {
    /// Burn tokens from an address (`F`).
    pub struct TokenBurn {
        pub amounts: Vec<TokenBalance>,
        pub from: Script,
        pub burn_type: u8,
        pub context: Script,
    }
}
