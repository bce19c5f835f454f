//! Loan scheme, collateral and loan token payloads.

use dfi_primitives::chainhash::Hash;
use dfi_primitives::compose::Amount;

use super::balance::TokenBalance;
use super::oracle::CurrencyPair;
use crate::Script;

dftx_struct! {
    /// Create or update a loan scheme (`L`).
    pub struct SetLoanScheme {
        /// Minimum collateralization ratio, in percent.
        pub ratio: u32,
        /// Interest rate, satoshi-scaled.
        pub rate: Amount,
        pub identifier: String,
        /// Activation height for an update; `0` for immediate.
        pub update: u64,
    }
}

dftx_struct! {
    /// Destroy a loan scheme (`D`).
    pub struct DestroyLoanScheme {
        pub identifier: String,
        pub height: u64,
    }
}

dftx_struct! {
    /// Make a loan scheme the default (`d`).
    pub struct SetDefaultLoanScheme {
        pub identifier: String,
    }
}

dftx_struct! {
    /// Accept a token as vault collateral (`c`).
    pub struct SetCollateralToken {
        pub token: u32 => varuint,
        /// Collateral factor, satoshi-scaled (1.0 = full value).
        pub factor: Amount,
        pub currency_pair: CurrencyPair,
        pub activate_after_block: u32,
    }
}

dftx_struct! {
    /// Create a loan token (`g`).
    pub struct SetLoanToken {
        pub symbol: String,
        pub name: String,
        pub currency_pair: CurrencyPair,
        pub mintable: bool,
        pub interest: Amount,
    }
}

dftx_struct! {
    /// Update a loan token (`x`).
    pub struct UpdateLoanToken {
        pub symbol: String,
        pub name: String,
        pub currency_pair: CurrencyPair,
        pub mintable: bool,
        pub interest: Amount,
        pub token_tx: Hash,
    }
}

dftx_struct! {
    /// Borrow against a vault (`X`).
    pub struct TakeLoan {
        pub vault_id: Hash,
        pub to: Script,
        pub token_amounts: Vec<TokenBalance>,
    }
}

dftx_struct! {
    /// Repay a vault's loans (`H`).
    pub struct PaybackLoan {
        pub vault_id: Hash,
        pub from: Script,
        pub token_amounts: Vec<TokenBalance>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfi_primitives::compose::Composable;

    #[test]
    fn test_set_loan_scheme_layout() {
        let scheme = SetLoanScheme {
            ratio: 150,
            rate: Amount::from_sat(300_000_000),
            identifier: "MIN150".into(),
            update: 0,
        };
        let hex_str = concat!(
            "96000000",
            "00a3e11100000000",
            "064d494e313530",
            "0000000000000000",
        );
        assert_eq!(scheme.encode_hex().unwrap(), hex_str);
        assert_eq!(SetLoanScheme::decode_hex(hex_str).unwrap(), scheme);
    }

    #[test]
    fn test_collateral_token_roundtrip() {
        let collateral = SetCollateralToken {
            token: 1,
            factor: Amount::from_coins(1).unwrap(),
            currency_pair: CurrencyPair { token: "BTC".into(), currency: "USD".into() },
            activate_after_block: 0,
        };
        let bytes = collateral.encode().unwrap();
        assert_eq!(bytes.len(), 1 + 8 + 4 + 4 + 4);
        assert_eq!(SetCollateralToken::decode(&bytes).unwrap(), collateral);
    }

    #[test]
    fn test_take_and_payback_share_layout() {
        let amounts = vec![TokenBalance { token: 2, amount: Amount::from_sat(40) }];
        let take = TakeLoan {
            vault_id: Hash::new([0x5a; 32]),
            to: Script::p2wpkh_from_hash(&[0x01; 20]),
            token_amounts: amounts.clone(),
        };
        let payback = PaybackLoan {
            vault_id: Hash::new([0x5a; 32]),
            from: Script::p2wpkh_from_hash(&[0x01; 20]),
            token_amounts: amounts,
        };
        assert_eq!(take.encode().unwrap(), payback.encode().unwrap());
        assert_eq!(TakeLoan::decode(&payback.encode().unwrap()).unwrap(), take);
    }

    #[test]
    fn test_update_loan_token_requires_hash() {
        let update = UpdateLoanToken {
            symbol: "TSLA".into(),
            name: "Tesla".into(),
            currency_pair: CurrencyPair { token: "TSLA".into(), currency: "USD".into() },
            mintable: true,
            interest: Amount::ZERO,
            token_tx: Hash::new([0x03; 32]),
        };
        let bytes = update.encode().unwrap();
        assert_eq!(UpdateLoanToken::decode(&bytes).unwrap(), update);
        assert!(UpdateLoanToken::decode(&bytes[..bytes.len() - 1]).is_err());
    }
}
