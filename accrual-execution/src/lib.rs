use accrual_types::{
    Amount, CallReturn, Identity, Invocation, LedgerError, LedgerEvent, LedgerInstruction, LedgerResult,
    LedgerState,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod host;
pub mod instructions;
pub mod memory_host;

pub use host::{CrossChainRelay, Host, ReserveAsset};
pub use memory_host::InMemoryHost;

pub struct ExecutionContext<'a> {
    pub state: &'a mut LedgerState,
    pub host: &'a mut dyn Host,
    pub caller: Identity,
    pub attached_value: Amount,
    pub events: Vec<LedgerEvent>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(state: &'a mut LedgerState, host: &'a mut dyn Host, caller: Identity, attached_value: Amount) -> Self {
        Self {
            state,
            host,
            caller,
            attached_value,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub result: CallReturn,
    pub events: Vec<LedgerEvent>,
}

/// Runs one invocation all-or-nothing: on error the ledger state is put
/// back to what it was before the call, the host is told to revert, and no
/// events are released.
pub fn execute_invocation(
    inv: &Invocation,
    state: &mut LedgerState,
    host: &mut dyn Host,
) -> LedgerResult<ExecutionOutcome> {
    if inv.attached_value > 0 && !inv.instruction.is_payable() {
        return Err(LedgerError::ValueMismatch {
            attached: inv.attached_value,
            required: 0,
        });
    }

    let snapshot = state.clone();
    host.checkpoint();

    let outcome = {
        let mut ctx = ExecutionContext::new(state, host, inv.caller, inv.attached_value);
        execute_li(&inv.instruction, &mut ctx).map(|result| ExecutionOutcome {
            result,
            events: ctx.events,
        })
    };

    match outcome {
        Ok(outcome) => {
            host.commit();
            debug!(
                id = %hex::encode(inv.id()),
                op = inv.instruction.name(),
                events = outcome.events.len(),
                "invocation committed"
            );
            Ok(outcome)
        }
        Err(e) => {
            *state = snapshot;
            host.revert();
            warn!(op = inv.instruction.name(), caller = %inv.caller, "invocation rejected: {}", e);
            Err(e)
        }
    }
}

pub fn execute_li(li: &LedgerInstruction, ctx: &mut ExecutionContext) -> LedgerResult<CallReturn> {
    use instructions::{admin, cross_chain, dividends, token};

    match li {
        LedgerInstruction::Transfer { to, value } => {
            let from = ctx.caller;
            token::transfer(ctx, from, *to, *value)?;
            Ok(CallReturn::Bool(true))
        }
        LedgerInstruction::TransferFrom { from, to, value } => {
            token::transfer_from(ctx, *from, *to, *value)?;
            Ok(CallReturn::Bool(true))
        }
        LedgerInstruction::TransferCrossChain { to, value } => {
            let accepted = cross_chain::transfer_cross_chain(ctx, *to, *value)?;
            Ok(CallReturn::Bool(accepted))
        }
        LedgerInstruction::Approve { spender, value } => {
            token::approve(ctx, *spender, *value);
            Ok(CallReturn::Bool(true))
        }
        LedgerInstruction::IncreaseApproval { spender, added_value } => {
            token::increase_approval(ctx, *spender, *added_value)?;
            Ok(CallReturn::Bool(true))
        }
        LedgerInstruction::DecreaseApproval { spender, subtracted_value } => {
            token::decrease_approval(ctx, *spender, *subtracted_value);
            Ok(CallReturn::Bool(true))
        }
        LedgerInstruction::DistributionRewards { amount } => {
            dividends::distribution_rewards(ctx, *amount)?;
            Ok(CallReturn::Unit)
        }
        LedgerInstruction::ClaimDividends { account } => {
            dividends::claim_dividends(ctx, *account)?;
            Ok(CallReturn::Unit)
        }
        LedgerInstruction::NewReserveAsset { reserve_asset } => {
            admin::new_reserve_asset(ctx, *reserve_asset)?;
            Ok(CallReturn::Unit)
        }
        LedgerInstruction::LoadCrossChainRelay => {
            let relay = cross_chain::load_cross_chain_relay(ctx)?;
            Ok(CallReturn::Identity(relay))
        }
    }
}
