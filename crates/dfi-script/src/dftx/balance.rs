//! Balance shapes shared by the token, pool, account and loan payloads.

use dfi_primitives::compose::Amount;

use crate::Script;

dftx_struct! {
    /// An amount of one token.
    pub struct TokenBalance {
        pub token: u32 => varuint,
        pub amount: Amount,
    }
}

dftx_struct! {
    /// Balances held by, or sent to, one script.
    pub struct ScriptBalances {
        pub script: Script,
        pub balances: Vec<TokenBalance>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfi_primitives::compose::Composable;

    #[test]
    fn test_token_balance_layout() {
        let balance = TokenBalance { token: 300, amount: Amount::from_coins(1).unwrap() };
        assert_eq!(balance.encode_hex().unwrap(), "fd2c0100e1f50500000000");
        assert_eq!(TokenBalance::decode_hex("fd2c0100e1f50500000000").unwrap(), balance);
    }

    #[test]
    fn test_script_balances_layout() {
        let balances = ScriptBalances {
            script: Script::p2wpkh_from_hash(&[0x11; 20]),
            balances: vec![TokenBalance { token: 0, amount: Amount::from_sat(10) }],
        };
        let bytes = balances.encode().unwrap();
        // script (1 + 22) || count (1) || token (1) || amount (8)
        assert_eq!(bytes.len(), 33);
        assert_eq!(&bytes[..3], &[0x16, 0x00, 0x14]);
        assert_eq!(ScriptBalances::decode(&bytes).unwrap(), balances);
    }

    #[test]
    fn test_json_uses_camel_case_and_strings() {
        let balance = TokenBalance { token: 1, amount: Amount::from_sat(150_000_000) };
        let json = serde_json::to_string(&balance).unwrap();
        assert_eq!(json, r#"{"token":1,"amount":"1.50000000"}"#);
    }
}
