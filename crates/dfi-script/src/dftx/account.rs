//! Account transfer payloads.

use super::balance::{ScriptBalances, TokenBalance};
use crate::Script;

dftx_struct! {
    /// Move UTXO value into token accounts (`U`).
    pub struct UtxosToAccount {
        pub to: Vec<ScriptBalances>,
    }
}

dftx_struct! {
    /// Move account balances back to UTXOs (`b`).
    pub struct AccountToUtxos {
        pub from: Script,
        pub balances: Vec<TokenBalance>,
        /// Index of the first output minted by this transfer.
        pub minting_outputs_start: u32,
    }
}

dftx_struct! {
    /// Transfer from one account to many (`B`).
    pub struct AccountToAccount {
        pub from: Script,
        pub to: Vec<ScriptBalances>,
    }
}

dftx_struct! {
    /// Transfer from many accounts to many (`a`).
    pub struct AnyAccountToAccount {
        pub from: Vec<ScriptBalances>,
        pub to: Vec<ScriptBalances>,
    }
}

dftx_struct! {
    /// Queue a future swap, or withdraw a queued one (`Q`).
    pub struct SetFutureSwap {
        pub owner: Script,
        pub source: TokenBalance,
        pub destination: u32 => varuint,
        pub withdraw: bool,
    }
}
