use serde::{Deserialize, Serialize};

use crate::identity::{Amount, Identity};

/// Every state-changing entrypoint of the ledger. Read-only accessors live
/// on `LedgerState` and never go through an invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum LedgerInstruction {
    // ══════════════════════════════════════════════════════════════
    // Token transfers
    // ══════════════════════════════════════════════════════════════
    Transfer { to: Identity, value: Amount },
    TransferFrom { from: Identity, to: Identity, value: Amount },
    TransferCrossChain { to: Identity, value: Amount },

    // ══════════════════════════════════════════════════════════════
    // Allowances
    // ══════════════════════════════════════════════════════════════
    Approve { spender: Identity, value: Amount },
    IncreaseApproval { spender: Identity, added_value: Amount },
    DecreaseApproval { spender: Identity, subtracted_value: Amount },

    // ══════════════════════════════════════════════════════════════
    // Dividends
    // ══════════════════════════════════════════════════════════════
    DistributionRewards { amount: Amount },
    ClaimDividends { account: Identity },

    // ══════════════════════════════════════════════════════════════
    // Administration & collaborators
    // ══════════════════════════════════════════════════════════════
    NewReserveAsset { reserve_asset: Identity },
    LoadCrossChainRelay,
}

impl LedgerInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerInstruction::Transfer { .. } => "transfer",
            LedgerInstruction::TransferFrom { .. } => "transferFrom",
            LedgerInstruction::TransferCrossChain { .. } => "transferCrossChain",
            LedgerInstruction::Approve { .. } => "approve",
            LedgerInstruction::IncreaseApproval { .. } => "increaseApproval",
            LedgerInstruction::DecreaseApproval { .. } => "decreaseApproval",
            LedgerInstruction::DistributionRewards { .. } => "distributionRewards",
            LedgerInstruction::ClaimDividends { .. } => "claimDividends",
            LedgerInstruction::NewReserveAsset { .. } => "newReserveAsset",
            LedgerInstruction::LoadCrossChainRelay => "loadCrossChainRelay",
        }
    }

    /// Payable entrypoints may carry attached value.
    pub fn is_payable(&self) -> bool {
        matches!(
            self,
            LedgerInstruction::DistributionRewards { .. } | LedgerInstruction::TransferCrossChain { .. }
        )
    }
}
