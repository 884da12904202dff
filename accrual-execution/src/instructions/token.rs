use accrual_types::{Amount, Identity, LedgerError, LedgerEvent, LedgerResult};
use tracing::debug;

use super::dividends::claim_dividends;
use crate::ExecutionContext;

/// Moves `value` from `from` to `to`. Both sides are settled against their
/// pre-transfer balances first.
pub fn transfer(ctx: &mut ExecutionContext, from: Identity, to: Identity, value: Amount) -> LedgerResult<()> {
    claim_dividends(ctx, from)?;
    claim_dividends(ctx, to)?;
    move_balance(ctx, from, to, value)
}

/// Like `transfer`, spending the caller's allowance on `from`.
pub fn transfer_from(ctx: &mut ExecutionContext, from: Identity, to: Identity, value: Amount) -> LedgerResult<()> {
    claim_dividends(ctx, from)?;
    claim_dividends(ctx, to)?;
    let spender = ctx.caller;
    subtract_allowed(ctx, from, spender, value)?;
    move_balance(ctx, from, to, value)
}

pub fn approve(ctx: &mut ExecutionContext, spender: Identity, value: Amount) {
    let owner = ctx.caller;
    set_allowed(ctx, owner, spender, value);
    ctx.emit(LedgerEvent::Approval { owner, spender, value });
}

pub fn increase_approval(ctx: &mut ExecutionContext, spender: Identity, added_value: Amount) -> LedgerResult<()> {
    let owner = ctx.caller;
    let value = ctx
        .state
        .allowance(&owner, &spender)
        .checked_add(added_value)
        .ok_or_else(|| LedgerError::overflow("allowance"))?;
    set_allowed(ctx, owner, spender, value);
    ctx.emit(LedgerEvent::Approval { owner, spender, value });
    Ok(())
}

/// Never fails: subtracting more than the current allowance clamps it to 0.
pub fn decrease_approval(ctx: &mut ExecutionContext, spender: Identity, subtracted_value: Amount) {
    let owner = ctx.caller;
    let value = ctx.state.allowance(&owner, &spender).saturating_sub(subtracted_value);
    set_allowed(ctx, owner, spender, value);
    ctx.emit(LedgerEvent::Approval { owner, spender, value });
}

fn move_balance(ctx: &mut ExecutionContext, from: Identity, to: Identity, value: Amount) -> LedgerResult<()> {
    subtract_balance(ctx, from, value)?;
    add_balance(ctx, to, value)?;
    debug!(%from, %to, %value, "transfer");
    ctx.emit(LedgerEvent::Transfer {
        from: Some(from),
        to,
        value,
    });
    Ok(())
}

fn add_balance(ctx: &mut ExecutionContext, account: Identity, value: Amount) -> LedgerResult<()> {
    let balance = ctx.state.balance_of(&account);
    let next = balance
        .checked_add(value)
        .ok_or_else(|| LedgerError::overflow("balance"))?;
    ctx.state.balances.insert(account, next);
    Ok(())
}

fn subtract_balance(ctx: &mut ExecutionContext, account: Identity, value: Amount) -> LedgerResult<()> {
    let have = ctx.state.balance_of(&account);
    if have < value {
        return Err(LedgerError::InsufficientBalance { have, need: value });
    }
    ctx.state.balances.insert(account, have - value);
    Ok(())
}

fn subtract_allowed(ctx: &mut ExecutionContext, owner: Identity, spender: Identity, value: Amount) -> LedgerResult<()> {
    let have = ctx.state.allowance(&owner, &spender);
    if have < value {
        return Err(LedgerError::InsufficientAllowance { have, need: value });
    }
    set_allowed(ctx, owner, spender, have - value);
    Ok(())
}

fn set_allowed(ctx: &mut ExecutionContext, owner: Identity, spender: Identity, value: Amount) {
    ctx.state
        .allowances
        .entry(owner)
        .or_default()
        .insert(spender, value);
}
