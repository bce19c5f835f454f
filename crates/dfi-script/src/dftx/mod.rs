//! DfTx envelope and payload dispatch.
//!
//! A DfTx is carried as the single push of an `OP_RETURN` output:
//!
//! ```text
//! "DfTx" (44 66 54 78) || type (1 byte) || payload
//! ```
//!
//! The payload length is implied by the enclosing push. Each type byte maps to
//! one payload composer in [`DfTxPayload`]; an unrecognized type byte decodes
//! to [`DfTxPayload::Unmapped`] and re-encodes byte-identical.
//!
//! Payload field conventions: lists are `varint(count) || elements`, amounts
//! are [`Amount`](dfi_primitives::compose::Amount) satoshis, ids and counts
//! are varints, and hashes are 32 wire-order bytes.

use serde::{Deserialize, Serialize};

use dfi_primitives::compose::{ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::ScriptError;

/// Declare a payload struct together with its symmetric [`Composable`] impl.
///
/// Fields are composed in declaration order. A field may name an adapter
/// module from `dfi_primitives::compose` with `=> adapter` when its wire form
/// differs from its Rust type's own composer (e.g. varint-coded `u32` ids).
macro_rules! dftx_struct {
    (@read $reader:ident, $ctx:ident, $field:ident, $ty:ty) => {
        <$ty as ::dfi_primitives::compose::Composable>::read_from($reader, $ctx)?
    };
    (@read $reader:ident, $ctx:ident, $field:ident, $ty:ty, $via:ident) => {
        ::dfi_primitives::compose::$via::read($reader, stringify!($field))?
    };
    (@write $writer:ident, $ctx:ident, $value:expr, $field:ident) => {
        ::dfi_primitives::compose::Composable::write_to($value, $writer, $ctx)?
    };
    (@write $writer:ident, $ctx:ident, $value:expr, $field:ident, $via:ident) => {
        ::dfi_primitives::compose::$via::write($writer, $value, stringify!($field))?
    };
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                pub $field:ident : $ty:ty $(=> $via:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl ::dfi_primitives::compose::Composable for $name {
            type Error = $crate::ScriptError;

            #[allow(unused_variables)]
            fn read_from(
                reader: &mut ::dfi_primitives::util::DfiReader<'_>,
                ctx: &::dfi_primitives::compose::ComposeContext,
            ) -> Result<Self, $crate::ScriptError> {
                Ok($name {
                    $( $field: dftx_struct!(@read reader, ctx, $field, $ty $(, $via)?), )*
                })
            }

            #[allow(unused_variables)]
            fn write_to(
                &self,
                writer: &mut ::dfi_primitives::util::DfiWriter,
                ctx: &::dfi_primitives::compose::ComposeContext,
            ) -> Result<(), $crate::ScriptError> {
                $( dftx_struct!(@write writer, ctx, &self.$field, $field $(, $via)?); )*
                Ok(())
            }
        }
    };
}

/// Declare the payload enum and its type-byte dispatch.
macro_rules! dftx_payloads {
    ($( $(#[$doc:meta])* $variant:ident($ty:ty) = $byte:literal ),* $(,)?) => {
        /// Every DfTx payload, keyed by its envelope type byte.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "data")]
        pub enum DfTxPayload {
            $( $(#[$doc])* $variant($ty), )*
            /// A type byte with no registered composer; the body is kept verbatim.
            ///
            /// Encoding fails when `type_byte` is one of the registered bytes,
            /// since the output would decode as that payload instead.
            Unmapped {
                #[serde(rename = "typeByte")]
                type_byte: u8,
                #[serde(with = "hex::serde")]
                raw: Vec<u8>,
            },
        }

        impl DfTxPayload {
            /// The envelope type byte.
            pub fn type_byte(&self) -> u8 {
                match self {
                    $( DfTxPayload::$variant(_) => $byte, )*
                    DfTxPayload::Unmapped { type_byte, .. } => *type_byte,
                }
            }

            /// Payload name, e.g. `"PoolSwap"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $( DfTxPayload::$variant(_) => stringify!($variant), )*
                    DfTxPayload::Unmapped { .. } => "Unmapped",
                }
            }

            /// Whether a type byte has a registered composer.
            pub fn is_known_type(type_byte: u8) -> bool {
                matches!(type_byte, $( $byte )|*)
            }

            fn read_body(type_byte: u8, body: &[u8], ctx: &ComposeContext) -> Result<Self, ScriptError> {
                match type_byte {
                    $(
                        $byte => <$ty as Composable>::decode_with(body, ctx)
                            .map(DfTxPayload::$variant)
                            .map_err(|e| ScriptError::InvalidDfTx(format!("{}: {}", stringify!($variant), e))),
                    )*
                    _ => {
                        tracing::debug!(type_byte, len = body.len(), "unmapped DfTx type");
                        Ok(DfTxPayload::Unmapped { type_byte, raw: body.to_vec() })
                    }
                }
            }

            fn write_body(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
                match self {
                    $( DfTxPayload::$variant(payload) => payload.write_to(writer, ctx), )*
                    DfTxPayload::Unmapped { type_byte, .. } if Self::is_known_type(*type_byte) => {
                        Err(ScriptError::Unsupported(format!(
                            "type byte {:#04x} is registered; use its typed payload",
                            type_byte
                        )))
                    }
                    DfTxPayload::Unmapped { raw, .. } => {
                        writer.write_bytes(raw);
                        Ok(())
                    }
                }
            }
        }

        $(
            impl From<$ty> for DfTxPayload {
                fn from(payload: $ty) -> Self {
                    DfTxPayload::$variant(payload)
                }
            }
        )*
    };
}

pub mod account;
pub mod balance;
pub mod governance;
pub mod icx_orderbook;
pub mod loans;
pub mod masternode;
pub mod misc;
pub mod oracle;
pub mod pool;
pub mod token;
pub mod vault;

use account::*;
use governance::SetGovernance;
use icx_orderbook::*;
use loans::*;
use masternode::*;
use misc::AutoAuthPrep;
use oracle::*;
use pool::*;
use token::*;
use vault::*;

/// Envelope magic, ASCII `"DfTx"`.
pub const DFTX_MAGIC: [u8; 4] = *b"DfTx";

/// Deepest DfTx envelope unwrapped inside another envelope's script fields.
///
/// Envelopes nested below this depth stay as plain `OP_RETURN <push>`
/// scripts, which still re-encode to the same bytes.
pub const MAX_DFTX_NESTING: u8 = 16;

dftx_payloads! {
    // ---- token ----
    TokenCreate(TokenCreate) = b'T',
    TokenMint(TokenMint) = b'M',
    TokenUpdate(TokenUpdate) = b'N',
    TokenUpdateAny(TokenUpdateAny) = b'n',
    TokenBurn(TokenBurn) = b'F',

    // ---- pool ----
    PoolSwap(PoolSwap) = b's',
    CompositeSwap(CompositeSwap) = b'i',
    PoolAddLiquidity(PoolAddLiquidity) = b'l',
    PoolRemoveLiquidity(PoolRemoveLiquidity) = b'r',
    PoolCreatePair(PoolCreatePair) = b'p',
    PoolUpdatePair(PoolUpdatePair) = b'u',

    // ---- account ----
    UtxosToAccount(UtxosToAccount) = b'U',
    AccountToUtxos(AccountToUtxos) = b'b',
    AccountToAccount(AccountToAccount) = b'B',
    AnyAccountToAccount(AnyAccountToAccount) = b'a',
    SetFutureSwap(SetFutureSwap) = b'Q',

    // ---- oracle ----
    AppointOracle(AppointOracle) = b'o',
    RemoveOracle(RemoveOracle) = b'h',
    UpdateOracle(UpdateOracle) = b't',
    SetOracleData(SetOracleData) = b'y',

    // ---- masternode ----
    CreateMasternode(CreateMasternode) = b'C',
    ResignMasternode(ResignMasternode) = b'R',
    UpdateMasternode(UpdateMasternode) = b'm',

    // ---- ICX order book ----
    ICXCreateOrder(ICXCreateOrder) = b'1',
    ICXMakeOffer(ICXMakeOffer) = b'2',
    ICXSubmitDFCHTLC(ICXSubmitDFCHTLC) = b'3',
    ICXSubmitEXTHTLC(ICXSubmitEXTHTLC) = b'4',
    ICXClaimDFCHTLC(ICXClaimDFCHTLC) = b'5',
    ICXCloseOrder(ICXCloseOrder) = b'6',
    ICXCloseOffer(ICXCloseOffer) = b'7',

    // ---- loans ----
    SetLoanScheme(SetLoanScheme) = b'L',
    DestroyLoanScheme(DestroyLoanScheme) = b'D',
    SetDefaultLoanScheme(SetDefaultLoanScheme) = b'd',
    SetCollateralToken(SetCollateralToken) = b'c',
    SetLoanToken(SetLoanToken) = b'g',
    UpdateLoanToken(UpdateLoanToken) = b'x',
    TakeLoan(TakeLoan) = b'X',
    PaybackLoan(PaybackLoan) = b'H',

    // ---- vaults ----
    CreateVault(CreateVault) = b'V',
    UpdateVault(UpdateVault) = b'v',
    DepositToVault(DepositToVault) = b'S',
    WithdrawFromVault(WithdrawFromVault) = b'J',
    CloseVault(CloseVault) = b'e',
    PlaceAuctionBid(PlaceAuctionBid) = b'I',

    // ---- governance ----
    SetGovernance(SetGovernance) = b'G',

    // ---- misc ----
    AutoAuthPrep(AutoAuthPrep) = b'A',
}

/// A decoded DfTx envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfTx {
    /// The typed payload; its variant determines the envelope type byte.
    pub payload: DfTxPayload,
}

impl DfTx {
    /// Wrap a payload in an envelope.
    pub fn new(payload: impl Into<DfTxPayload>) -> Self {
        DfTx { payload: payload.into() }
    }
}

impl Composable for DfTx {
    type Error = ScriptError;

    /// Read the magic, the type byte, and the payload spanning the rest of the reader.
    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let magic = reader.read_array::<4>()?;
        if magic != DFTX_MAGIC {
            return Err(ScriptError::InvalidDfTx(format!("bad magic {}", hex::encode(magic))));
        }
        let type_byte = reader.read_u8()?;
        let body = reader.read_to_end();
        let payload = DfTxPayload::read_body(type_byte, body, ctx)?;
        Ok(DfTx { payload })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        writer.write_bytes(&DFTX_MAGIC);
        writer.write_u8(self.payload.type_byte());
        self.payload.write_body(writer, ctx)
    }
}

/// Serde helper rendering `Option<bytes>` as an optional hex string.
pub(crate) mod hex_option {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: hex::FromHex,
        T::Error: std::fmt::Display,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| T::from_hex(s).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfi_primitives::chainhash::Hash;
    use dfi_primitives::compose::Amount;

    use crate::dftx::balance::{ScriptBalances, TokenBalance};
    use crate::dftx::governance::{GovernanceVar, LiqPoolSplit};
    use crate::Script;

    fn owner() -> Script {
        Script::p2wpkh_from_hash(&[0x1d; 20])
    }

    fn balance(token: u32, sat: u64) -> TokenBalance {
        TokenBalance { token, amount: Amount::from_sat(sat) }
    }

    fn pair(token: &str, currency: &str) -> CurrencyPair {
        CurrencyPair { token: token.into(), currency: currency.into() }
    }

    /// One populated value of every registered payload.
    fn every_payload() -> Vec<DfTxPayload> {
        let hash = Hash::new([0xab; 32]);
        vec![
            TokenCreate {
                symbol: "GOLD".into(),
                name: "Gold".into(),
                decimal: 8,
                limit: Amount::ZERO,
                is_dat: false,
                tradeable: true,
                mintable: true,
            }
            .into(),
            TokenMint { balances: vec![balance(5, 1)] }.into(),
            TokenUpdate { creation_tx: hash, is_dat: true }.into(),
            TokenUpdateAny {
                creation_tx: hash,
                symbol: "SILVER".into(),
                name: "Silver".into(),
                decimal: 8,
                limit: Amount::from_sat(21_000_000),
                is_dat: true,
                tradeable: false,
                mintable: true,
            }
            .into(),
            TokenBurn { amounts: vec![balance(0, 700)], from: owner(), burn_type: 0, context: Script::default() }
                .into(),
            PoolSwap {
                from_script: owner(),
                from_token_id: 0,
                from_amount: Amount::from_sat(100),
                to_script: owner(),
                to_token_id: 2,
                max_price: MaxPrice { integer: 9, fraction: 99_999_999 },
            }
            .into(),
            CompositeSwap {
                pool_swap: PoolSwap {
                    from_script: owner(),
                    from_token_id: 1,
                    from_amount: Amount::from_sat(5),
                    to_script: owner(),
                    to_token_id: 3,
                    max_price: MaxPrice { integer: 0, fraction: 1 },
                },
                pools: vec![PoolId { id: 4 }, PoolId { id: 7 }],
            }
            .into(),
            PoolAddLiquidity {
                from: vec![ScriptBalances { script: owner(), balances: vec![balance(0, 10), balance(1, 20)] }],
                share_address: Script::p2pkh_from_hash(&[0x2e; 20]),
            }
            .into(),
            PoolRemoveLiquidity { script: owner(), token_id: 6, amount: Amount::from_sat(3_000) }.into(),
            PoolCreatePair {
                token_a: 0,
                token_b: 1,
                commission: Amount::from_sat(200_000),
                owner_address: owner(),
                status: true,
                pair_symbol: "DFI-BTC".into(),
                custom_rewards: Some(vec![balance(0, 10)]),
            }
            .into(),
            PoolUpdatePair {
                pool_id: 4,
                status: false,
                commission: Amount::ZERO,
                owner_address: owner(),
                custom_rewards: None,
            }
            .into(),
            UtxosToAccount { to: vec![ScriptBalances { script: owner(), balances: vec![balance(0, 1_000)] }] }
                .into(),
            AccountToUtxos { from: owner(), balances: vec![balance(0, 50)], minting_outputs_start: 2 }.into(),
            AccountToAccount {
                from: owner(),
                to: vec![ScriptBalances { script: Script::p2pkh_from_hash(&[0x01; 20]), balances: vec![balance(1, 9)] }],
            }
            .into(),
            AnyAccountToAccount {
                from: vec![ScriptBalances { script: owner(), balances: vec![balance(2, 3)] }],
                to: vec![ScriptBalances { script: owner(), balances: vec![balance(2, 3)] }],
            }
            .into(),
            SetFutureSwap { owner: owner(), source: balance(15, 100), destination: 0, withdraw: false }.into(),
            AppointOracle { script: owner(), weightage: 10, price_feeds: vec![pair("TSLA", "USD")] }.into(),
            RemoveOracle { oracle_id: hash }.into(),
            UpdateOracle {
                oracle_id: hash,
                script: owner(),
                weightage: 20,
                price_feeds: vec![pair("TSLA", "USD"), pair("BTC", "EUR")],
            }
            .into(),
            SetOracleData {
                oracle_id: hash,
                timestamp: 1_634_000_000,
                tokens: vec![TokenPrice {
                    token: "TSLA".into(),
                    prices: vec![CurrencyAmount { currency: "USD".into(), amount: Amount::from_sat(43_500_000_000) }],
                }],
            }
            .into(),
            CreateMasternode { node_type: 1, collateral_pub_key_hash: [0x3c; 20], operator_pub_key_hash: None }
                .into(),
            ResignMasternode { node_id: hash }.into(),
            UpdateMasternode {
                node_id: hash,
                updates: vec![UpdateMasternodeData {
                    update_type: 1,
                    address: UpdateMasternodeAddress { address_type: 4, address_pub_key_hash: Some([0x4d; 20]) },
                }],
            }
            .into(),
            ICXCreateOrder {
                order_type: ICX_ORDER_INTERNAL,
                token_id: 1,
                owner_address: owner(),
                receive_pubkey: None,
                amount_from: Amount::from_sat(15),
                amount_to_fill: Amount::from_sat(15),
                order_price: Amount::from_sat(1_000_000),
                expiry: 2_880,
            }
            .into(),
            ICXMakeOffer {
                order_tx: hash,
                amount: Amount::from_sat(10),
                owner_address: owner(),
                receive_pubkey: Some(vec![0x02; 33]),
                expiry: 20,
                taker_fee: Amount::from_sat(1),
            }
            .into(),
            ICXSubmitDFCHTLC { offer_tx: hash, amount: Amount::from_sat(10), hash, timeout: 1_440 }.into(),
            ICXSubmitEXTHTLC {
                offer_tx: hash,
                amount: Amount::from_sat(10),
                hash,
                htlc_script_address: "13sJQ9wBWh8ssihHUgAaCmNWJbBAG5Hr9N".into(),
                owner_pubkey: vec![0x03; 33],
                timeout: 24,
            }
            .into(),
            ICXClaimDFCHTLC { dfc_htlc_tx: hash, seed: vec![0x5e; 32] }.into(),
            ICXCloseOrder { order_tx: hash }.into(),
            ICXCloseOffer { offer_tx: hash }.into(),
            SetLoanScheme { ratio: 150, rate: Amount::from_sat(500_000_000), identifier: "MIN150".into(), update: 0 }
                .into(),
            DestroyLoanScheme { identifier: "MIN150".into(), height: 1_000 }.into(),
            SetDefaultLoanScheme { identifier: "MIN200".into() }.into(),
            SetCollateralToken {
                token: 0,
                factor: Amount::from_sat(100_000_000),
                currency_pair: pair("DFI", "USD"),
                activate_after_block: 130,
            }
            .into(),
            SetLoanToken {
                symbol: "TSLA".into(),
                name: "Tesla".into(),
                currency_pair: pair("TSLA", "USD"),
                mintable: true,
                interest: Amount::from_sat(5),
            }
            .into(),
            UpdateLoanToken {
                symbol: "TSLA".into(),
                name: "Tesla stock".into(),
                currency_pair: pair("TSLA", "USD"),
                mintable: false,
                interest: Amount::ZERO,
                token_tx: hash,
            }
            .into(),
            TakeLoan { vault_id: hash, to: owner(), token_amounts: vec![balance(2, 40)] }.into(),
            PaybackLoan { vault_id: hash, from: owner(), token_amounts: vec![balance(2, 40)] }.into(),
            CreateVault { owner_address: owner(), scheme_id: "MIN150".into() }.into(),
            UpdateVault { vault_id: hash, owner_address: owner(), scheme_id: String::new() }.into(),
            DepositToVault { vault_id: hash, from: owner(), token_amount: balance(0, 1_000) }.into(),
            WithdrawFromVault { vault_id: hash, to: owner(), token_amount: balance(0, 500) }.into(),
            CloseVault { vault_id: hash, to: owner() }.into(),
            PlaceAuctionBid { vault_id: hash, index: 0, from: owner(), token_amount: balance(2, 60) }.into(),
            SetGovernance {
                governance_vars: vec![
                    GovernanceVar::LpSplits(vec![LiqPoolSplit { token_id: 4, value: Amount::from_sat(100_000_000) }]),
                    GovernanceVar::LpDailyDfiReward(Amount::from_sat(1)),
                ],
            }
            .into(),
            AutoAuthPrep {}.into(),
        ]
    }

    #[test]
    fn test_registered_types_are_distinct() {
        let known: Vec<u8> = (0..=u8::MAX).filter(|b| DfTxPayload::is_known_type(*b)).collect();
        assert_eq!(known.len(), 46);
        assert!(DfTxPayload::is_known_type(b'p'));
        assert!(!DfTxPayload::is_known_type(0x00));
    }

    #[test]
    fn test_every_payload_roundtrips_through_envelope() {
        let payloads = every_payload();
        let mut covered: Vec<u8> = payloads.iter().map(DfTxPayload::type_byte).collect();
        covered.sort_unstable();
        covered.dedup();
        let known: Vec<u8> = (0..=u8::MAX).filter(|b| DfTxPayload::is_known_type(*b)).collect();
        assert_eq!(covered, known);

        for payload in payloads {
            let tx = DfTx::new(payload);
            let bytes = tx.encode().unwrap();
            assert_eq!(&bytes[..4], &DFTX_MAGIC);
            assert_eq!(bytes[4], tx.payload.type_byte());

            let decoded = DfTx::decode(&bytes).unwrap();
            assert_eq!(decoded, tx, "{}", tx.payload.name());

            let output = Script::dftx_output(tx.clone());
            assert_eq!(Script::from_raw(&output.to_raw().unwrap()).unwrap(), output, "{}", tx.payload.name());
        }
    }

    #[test]
    fn test_unmapped_with_registered_type_rejected() {
        let tx = DfTx { payload: DfTxPayload::Unmapped { type_byte: b'R', raw: vec![0u8; 32] } };
        assert!(matches!(tx.encode(), Err(ScriptError::Unsupported(_))));

        let tx = DfTx { payload: DfTxPayload::Unmapped { type_byte: 0xee, raw: vec![0u8; 32] } };
        assert!(tx.encode().is_ok());
    }

    #[test]
    fn test_envelope_layout() {
        let tx = DfTx::new(TokenMint {
            balances: vec![TokenBalance { token: 5, amount: Amount::from_sat(1) }],
        });
        assert_eq!(tx.encode_hex().unwrap(), "446654784d01050100000000000000");
        assert_eq!(DfTx::decode_hex("446654784d01050100000000000000").unwrap(), tx);
        assert_eq!(tx.payload.name(), "TokenMint");
        assert_eq!(tx.payload.type_byte(), b'M');
    }

    #[test]
    fn test_bad_magic() {
        assert!(matches!(DfTx::decode(b"DfTX\x00"), Err(ScriptError::InvalidDfTx(_))));
    }

    #[test]
    fn test_unmapped_preserves_body() {
        let bytes = hex::decode("44665478ee0102").unwrap();
        let tx = DfTx::decode(&bytes).unwrap();
        assert_eq!(tx.payload, DfTxPayload::Unmapped { type_byte: 0xee, raw: vec![1, 2] });
        assert_eq!(tx.encode().unwrap(), bytes);
    }

    #[test]
    fn test_known_type_is_strict() {
        // ResignMasternode is a single 32-byte hash; one extra byte is rejected.
        let mut bytes = hex::decode("4466547852").unwrap();
        bytes.extend_from_slice(&[0u8; 33]);
        let err = DfTx::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("ResignMasternode"));

        // Truncated body.
        let mut bytes = hex::decode("4466547852").unwrap();
        bytes.extend_from_slice(&[0u8; 31]);
        assert!(DfTx::decode(&bytes).is_err());
    }

    #[test]
    fn test_json_view() {
        let tx = DfTx::new(AutoAuthPrep {});
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["payload"]["type"], "AutoAuthPrep");

        let unmapped = DfTx { payload: DfTxPayload::Unmapped { type_byte: 0, raw: vec![0xab] } };
        let json = serde_json::to_string(&unmapped).unwrap();
        assert!(json.contains(r#""raw":"ab""#));
        let back: DfTx = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unmapped);
    }
}
