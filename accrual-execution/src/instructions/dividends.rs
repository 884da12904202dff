//! Pro-rata dividend accrual.
//!
//! Deposits bump a global `dividend_per_token` accumulator (scaled by
//! `MULTIPLIER`). Each account keeps the accumulator value it was last
//! settled at; the difference times its balance is what it is owed. Any
//! operation that changes a balance settles the accounts involved first, so
//! an account's share is always computed on the balance it actually held
//! while the accumulator moved.

use accrual_types::state::{MIN_REWARD_DEPOSIT, MULTIPLIER};
use accrual_types::{Amount, Identity, LedgerError, LedgerResult};
use tracing::{debug, info};

use crate::host::ReserveAsset;
use crate::ExecutionContext;

/// Settles `account` and pays out whatever it is owed in the reserve asset.
/// Returns the amount paid. The snapshot always advances, even when nothing
/// is owed; a failed payout fails the invocation, which undoes the advance.
pub fn claim_dividends(ctx: &mut ExecutionContext, account: Identity) -> LedgerResult<Amount> {
    // An account never settled before reads as settled at 0.
    let owed = ctx.state.pending_dividends(&account)?;
    let current = ctx.state.dividend_per_token;
    ctx.state.settled_dividend_per_token.insert(account, current);

    if owed > 0 {
        let reserve = ReserveAsset(ctx.state.reserve_asset);
        reserve.transfer(ctx.host, account, owed)?;
        debug!(%account, %owed, "dividends paid");
    }
    Ok(owed)
}

/// Wraps the attached value into the reserve asset and spreads it over the
/// whole supply.
pub fn distribution_rewards(ctx: &mut ExecutionContext, amount: Amount) -> LedgerResult<()> {
    if amount < MIN_REWARD_DEPOSIT {
        return Err(LedgerError::AmountTooLow {
            amount,
            minimum: MIN_REWARD_DEPOSIT,
        });
    }
    if ctx.attached_value < amount {
        return Err(LedgerError::ValueMismatch {
            attached: ctx.attached_value,
            required: amount,
        });
    }

    let reserve = ReserveAsset(ctx.state.reserve_asset);
    reserve.deposit(ctx.host, amount)?;

    let increment = dividend_increment(amount, ctx.state.total_supply)?;
    ctx.state.dividend_per_token = ctx
        .state
        .dividend_per_token
        .checked_add(increment)
        .ok_or_else(|| LedgerError::overflow("dividend accumulator"))?;

    info!(
        from = %ctx.caller,
        %amount,
        %increment,
        dividend_per_token = %ctx.state.dividend_per_token,
        "rewards distributed"
    );
    Ok(())
}

/// `amount * MULTIPLIER / total_supply`, truncated.
pub fn dividend_increment(amount: Amount, total_supply: Amount) -> LedgerResult<Amount> {
    if total_supply == 0 {
        return Err(LedgerError::ZeroSupply);
    }
    let scaled = amount
        .checked_mul(MULTIPLIER)
        .ok_or_else(|| LedgerError::overflow("reward amount"))?;
    Ok(scaled / total_supply)
}
