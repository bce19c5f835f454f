//! Liquidity pool payloads.
//!
//! Pool pair create and update carry a trailing custom-rewards list only
//! after the custom-rewards upgrade. The layout is chosen by
//! [`ComposeContext::custom_rewards`], never inferred from the bytes alone.

use serde::{Deserialize, Serialize};

use dfi_primitives::compose::{varuint, Amount, ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use super::balance::{ScriptBalances, TokenBalance};
use crate::{Script, ScriptError};

dftx_struct! {
    /// Upper bound on the swap price, as an integer part and an 8-decimal fraction.
    pub struct MaxPrice {
        pub integer: u64,
        pub fraction: u64,
    }
}

dftx_struct! {
    /// Swap through a single pool (`s`).
    pub struct PoolSwap {
        pub from_script: Script,
        pub from_token_id: u32 => varuint,
        pub from_amount: Amount,
        pub to_script: Script,
        pub to_token_id: u32 => varuint,
        pub max_price: MaxPrice,
    }
}

dftx_struct! {
    /// One hop of a composite swap route.
    pub struct PoolId {
        pub id: u32 => varuint,
    }
}

dftx_struct! {
    /// Swap along an explicit route of pools (`i`).
    pub struct CompositeSwap {
        pub pool_swap: PoolSwap,
        pub pools: Vec<PoolId>,
    }
}

dftx_struct! {
    /// Add liquidity from one or more accounts (`l`).
    pub struct PoolAddLiquidity {
        pub from: Vec<ScriptBalances>,
        pub share_address: Script,
    }
}

dftx_struct! {
    /// Remove liquidity by returning pool shares (`r`).
    pub struct PoolRemoveLiquidity {
        pub script: Script,
        pub token_id: u32 => varuint,
        pub amount: Amount,
    }
}

// ---------------------------------------------------------------------------
// Custom rewards
// ---------------------------------------------------------------------------

/// Read the optional trailing custom-rewards list.
///
/// When the context enables custom rewards the list is present iff bytes
/// remain; otherwise it is never read and any remaining byte is left for the
/// strict end-of-payload check.
fn read_custom_rewards(
    reader: &mut DfiReader<'_>,
    ctx: &ComposeContext,
) -> Result<Option<Vec<TokenBalance>>, ScriptError> {
    if ctx.custom_rewards && !reader.is_empty() {
        Ok(Some(Vec::<TokenBalance>::read_from(reader, ctx)?))
    } else {
        Ok(None)
    }
}

fn write_custom_rewards(
    writer: &mut DfiWriter,
    ctx: &ComposeContext,
    rewards: &Option<Vec<TokenBalance>>,
) -> Result<(), ScriptError> {
    match rewards {
        None => Ok(()),
        Some(_) if !ctx.custom_rewards => Err(ScriptError::Unsupported(
            "custom rewards before the custom-rewards upgrade".to_string(),
        )),
        Some(list) => list.write_to(writer, ctx),
    }
}

/// Create a pool pair (`p`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreatePair {
    pub token_a: u32,
    pub token_b: u32,
    /// Fee as a satoshi-scaled fraction (0.05 = 5,000,000 sat).
    pub commission: Amount,
    pub owner_address: Script,
    pub status: bool,
    pub pair_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rewards: Option<Vec<TokenBalance>>,
}

impl Composable for PoolCreatePair {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        Ok(PoolCreatePair {
            token_a: varuint::read(reader, "token_a")?,
            token_b: varuint::read(reader, "token_b")?,
            commission: Amount::read_from(reader, ctx)?,
            owner_address: Script::read_from(reader, ctx)?,
            status: bool::read_from(reader, ctx)?,
            pair_symbol: String::read_from(reader, ctx)?,
            custom_rewards: read_custom_rewards(reader, ctx)?,
        })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        varuint::write(writer, &self.token_a, "token_a")?;
        varuint::write(writer, &self.token_b, "token_b")?;
        self.commission.write_to(writer, ctx)?;
        self.owner_address.write_to(writer, ctx)?;
        self.status.write_to(writer, ctx)?;
        self.pair_symbol.write_to(writer, ctx)?;
        write_custom_rewards(writer, ctx, &self.custom_rewards)
    }
}

/// Update an existing pool pair (`u`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolUpdatePair {
    pub pool_id: u32,
    pub status: bool,
    pub commission: Amount,
    pub owner_address: Script,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rewards: Option<Vec<TokenBalance>>,
}

impl Composable for PoolUpdatePair {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        Ok(PoolUpdatePair {
            pool_id: varuint::read(reader, "pool_id")?,
            status: bool::read_from(reader, ctx)?,
            commission: Amount::read_from(reader, ctx)?,
            owner_address: Script::read_from(reader, ctx)?,
            custom_rewards: read_custom_rewards(reader, ctx)?,
        })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        varuint::write(writer, &self.pool_id, "pool_id")?;
        self.status.write_to(writer, ctx)?;
        self.commission.write_to(writer, ctx)?;
        self.owner_address.write_to(writer, ctx)?;
        write_custom_rewards(writer, ctx, &self.custom_rewards)
    }
}
