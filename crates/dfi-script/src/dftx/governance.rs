//! Governance variable payload.
//!
//! `SetGovernance` is a sequence of `(name, value)` pairs running to the end
//! of the payload. The value layout depends on the name; names without a
//! registered layout keep the remaining bytes verbatim, so such a variable
//! can only appear last.

use serde::{Deserialize, Serialize};

use dfi_primitives::compose::{Amount, ComposeContext, Composable};
use dfi_primitives::util::{DfiReader, DfiWriter};

use crate::ScriptError;

/// Name of the pool reward split variable.
pub const LP_SPLITS: &str = "LP_SPLITS";
/// Name of the daily pool reward variable.
pub const LP_DAILY_DFI_REWARD: &str = "LP_DAILY_DFI_REWARD";

dftx_struct! {
    /// Share of the pool rewards assigned to one pool.
    pub struct LiqPoolSplit {
        pub token_id: u32 => varuint,
        /// Satoshi-scaled fraction; all splits sum to 1.0.
        pub value: Amount,
    }
}

/// One governance variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernanceVar {
    LpSplits(Vec<LiqPoolSplit>),
    LpDailyDfiReward(Amount),
    /// A variable whose value layout is not registered. Encoding fails
    /// when `key` names a registered variable.
    Unmapped {
        key: String,
        #[serde(with = "hex::serde")]
        value: Vec<u8>,
    },
}

impl GovernanceVar {
    /// The on-chain variable name.
    pub fn key(&self) -> &str {
        match self {
            GovernanceVar::LpSplits(_) => LP_SPLITS,
            GovernanceVar::LpDailyDfiReward(_) => LP_DAILY_DFI_REWARD,
            GovernanceVar::Unmapped { key, .. } => key,
        }
    }
}

impl Composable for GovernanceVar {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let key = String::read_from(reader, ctx)?;
        let var = match key.as_str() {
            LP_SPLITS => GovernanceVar::LpSplits(Vec::<LiqPoolSplit>::read_from(reader, ctx)?),
            LP_DAILY_DFI_REWARD => GovernanceVar::LpDailyDfiReward(Amount::read_from(reader, ctx)?),
            _ => {
                tracing::debug!(key = %key, "unmapped governance variable");
                let value = reader.read_to_end().to_vec();
                GovernanceVar::Unmapped { key, value }
            }
        };
        Ok(var)
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        if let GovernanceVar::Unmapped { key, .. } = self {
            if key == LP_SPLITS || key == LP_DAILY_DFI_REWARD {
                return Err(ScriptError::Unsupported(format!(
                    "governance variable `{}` is registered; use its typed value",
                    key
                )));
            }
        }
        self.key().to_string().write_to(writer, ctx)?;
        match self {
            GovernanceVar::LpSplits(splits) => splits.write_to(writer, ctx),
            GovernanceVar::LpDailyDfiReward(amount) => Ok(amount.write_to(writer, ctx)?),
            GovernanceVar::Unmapped { value, .. } => {
                writer.write_bytes(value);
                Ok(())
            }
        }
    }
}

/// Set one or more governance variables (`G`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGovernance {
    pub governance_vars: Vec<GovernanceVar>,
}

impl Composable for SetGovernance {
    type Error = ScriptError;

    fn read_from(reader: &mut DfiReader<'_>, ctx: &ComposeContext) -> Result<Self, ScriptError> {
        let mut governance_vars = Vec::new();
        while !reader.is_empty() {
            governance_vars.push(GovernanceVar::read_from(reader, ctx)?);
        }
        Ok(SetGovernance { governance_vars })
    }

    fn write_to(&self, writer: &mut DfiWriter, ctx: &ComposeContext) -> Result<(), ScriptError> {
        let last = self.governance_vars.len().saturating_sub(1);
        for (i, var) in self.governance_vars.iter().enumerate() {
            if i != last && matches!(var, GovernanceVar::Unmapped { .. }) {
                return Err(ScriptError::Unsupported(format!(
                    "unmapped governance variable `{}` must be the last one",
                    var.key()
                )));
            }
            var.write_to(writer, ctx)?;
        }
        Ok(())
    }
}
