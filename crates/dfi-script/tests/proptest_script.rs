use proptest::prelude::*;

use dfi_primitives::compose::{Amount, ComposeContext, Composable};
use dfi_script::dftx::balance::{ScriptBalances, TokenBalance};
use dfi_script::dftx::account::AccountToAccount;
use dfi_script::dftx::pool::PoolUpdatePair;
use dfi_script::{DfTx, Endian, OpCode, PushData, Script, StaticOp};

fn arb_p2wpkh() -> impl Strategy<Value = Script> {
    prop::array::uniform20(any::<u8>()).prop_map(|h| Script::p2wpkh_from_hash(&h))
}

fn arb_balance() -> impl Strategy<Value = TokenBalance> {
    (any::<u32>(), any::<u64>()).prop_map(|(token, sat)| TokenBalance {
        token,
        amount: Amount::from_sat(sat),
    })
}

fn arb_opcode() -> impl Strategy<Value = OpCode> {
    prop_oneof![
        prop::sample::select(StaticOp::ALL).prop_map(OpCode::Static),
        prop::collection::vec(any::<u8>(), 1..300)
            .prop_map(|data| OpCode::PushData(PushData::new(data, Endian::Little).unwrap())),
        (0xbau8..=0xff).prop_map(OpCode::Unmapped),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_roundtrip(stack in prop::collection::vec(arb_opcode(), 0..12)) {
        // A leading OP_RETURN followed by a single push could be unwrapped as a DfTx;
        // start with OP_NOP so the shape never matches.
        let mut ops = vec![OpCode::Static(StaticOp::OP_NOP)];
        ops.extend(stack);
        let script = Script::new(ops);
        let bytes = script.encode().unwrap();
        let decoded = Script::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &script);
        prop_assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn script_asm_roundtrip(stack in prop::collection::vec(arb_opcode(), 1..12)) {
        let mut ops = vec![OpCode::Static(StaticOp::OP_NOP)];
        ops.extend(stack);
        let script = Script::new(ops);
        prop_assert_eq!(Script::from_asm(&script.to_asm()).unwrap(), script);
    }

    #[test]
    fn raw_parsing_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = Script::from_raw(&bytes);
        let _ = Script::decode(&bytes);
        let _ = DfTx::decode(&bytes);
    }

    #[test]
    fn unknown_dftx_body_is_preserved(body in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut envelope = b"DfTx".to_vec();
        envelope.push(0xf0);
        envelope.extend(&body);
        let tx = DfTx::decode(&envelope).unwrap();
        prop_assert_eq!(tx.encode().unwrap(), envelope);
    }

    #[test]
    fn account_to_account_roundtrip(
        from in arb_p2wpkh(),
        to in prop::collection::vec((arb_p2wpkh(), prop::collection::vec(arb_balance(), 0..4)), 0..4),
    ) {
        let payload = AccountToAccount {
            from,
            to: to.into_iter().map(|(script, balances)| ScriptBalances { script, balances }).collect(),
        };
        let script = Script::dftx_output(DfTx::new(payload));
        let bytes = script.encode().unwrap();
        prop_assert_eq!(Script::decode(&bytes).unwrap(), script);
    }

    #[test]
    fn pool_update_without_rewards_is_context_independent(
        pool_id in any::<u32>(),
        status in any::<bool>(),
        sat in any::<u64>(),
        owner in arb_p2wpkh(),
    ) {
        let payload = PoolUpdatePair {
            pool_id,
            status,
            commission: Amount::from_sat(sat),
            owner_address: owner,
            custom_rewards: None,
        };
        let pre = ComposeContext::pre_custom_rewards();
        let bytes = payload.encode().unwrap();
        prop_assert_eq!(payload.encode_with(&pre).unwrap(), bytes.clone());
        prop_assert_eq!(PoolUpdatePair::decode_with(&bytes, &pre).unwrap(), payload.clone());
        prop_assert_eq!(PoolUpdatePair::decode(&bytes).unwrap(), payload);
    }
}
