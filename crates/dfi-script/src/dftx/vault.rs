//! Vault payloads.

use dfi_primitives::chainhash::Hash;

use super::balance::TokenBalance;
use crate::Script;

dftx_struct! {
    /// Open a vault (`V`). An empty scheme id selects the default scheme.
    pub struct CreateVault {
        pub owner_address: Script,
        pub scheme_id: String,
    }
}

dftx_struct! {
    /// Change a vault's owner or scheme (`v`).
    pub struct UpdateVault {
        pub vault_id: Hash,
        pub owner_address: Script,
        pub scheme_id: String,
    }
}

dftx_struct! {
    /// Add collateral (`S`).
    pub struct DepositToVault {
        pub vault_id: Hash,
        pub from: Script,
        pub token_amount: TokenBalance,
    }
}

dftx_struct! {
    /// Remove collateral (`J`).
    pub struct WithdrawFromVault {
        pub vault_id: Hash,
        pub to: Script,
        pub token_amount: TokenBalance,
    }
}

dftx_struct! {
    /// Close an empty vault (`e`).
    pub struct CloseVault {
        pub vault_id: Hash,
        pub to: Script,
    }
}

dftx_struct! {
    /// Bid on a batch of a vault under liquidation (`I`).
    pub struct PlaceAuctionBid {
        pub vault_id: Hash,
        /// Batch index within the auction.
        pub index: u32,
        pub from: Script,
        pub token_amount: TokenBalance,
    }
}
