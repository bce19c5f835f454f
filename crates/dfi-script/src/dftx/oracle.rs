//! Price oracle payloads.

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::Amount;

use crate::Script;

dftx_struct! {
    /// A price feed identifier, e.g. `("TSLA", "USD")`.
    pub struct CurrencyPair {
        pub token: String,
        pub currency: String,
    }
}

dftx_struct! {
    /// Register a new oracle (`o`).
    pub struct AppointOracle {
        pub script: Script,
        pub weightage: u8,
        pub price_feeds: Vec<CurrencyPair>,
    }
}

dftx_struct! {
    /// Remove an oracle (`h`).
    pub struct RemoveOracle {
        pub oracle_id: Hash,
    }
}

dftx_struct! {
    /// Replace an oracle's owner, weight and feeds (`t`).
    pub struct UpdateOracle {
        pub oracle_id: Hash,
        pub script: Script,
        pub weightage: u8,
        pub price_feeds: Vec<CurrencyPair>,
    }
}

dftx_struct! {
    /// A price quoted in one currency.
    pub struct CurrencyAmount {
        pub currency: String,
        pub amount: Amount,
    }
}

dftx_struct! {
    /// All prices an oracle reports for one token.
    pub struct TokenPrice {
        pub token: String,
        pub prices: Vec<CurrencyAmount>,
    }
}

dftx_struct! {
    /// Publish prices (`y`).
    pub struct SetOracleData {
        pub oracle_id: Hash,
        /// Unix seconds.
        pub timestamp: u64,
        pub tokens: Vec<TokenPrice>,
    }
}
