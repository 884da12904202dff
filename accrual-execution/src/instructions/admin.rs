use accrual_types::{Identity, LedgerError, LedgerResult};
use tracing::info;

use crate::ExecutionContext;

pub fn require_owner(ctx: &ExecutionContext) -> LedgerResult<()> {
    if ctx.caller != ctx.state.owner {
        return Err(LedgerError::Unauthorized(ctx.caller));
    }
    Ok(())
}

pub fn new_reserve_asset(ctx: &mut ExecutionContext, reserve_asset: Identity) -> LedgerResult<()> {
    require_owner(ctx)?;
    let previous = std::mem::replace(&mut ctx.state.reserve_asset, reserve_asset);
    info!(%previous, current = %reserve_asset, "reserve asset replaced");
    Ok(())
}
