use accrual_types::{Amount, Identity, LedgerResult};
use tracing::{debug, info};

use super::dividends::claim_dividends;
use super::token::approve;
use crate::host::CrossChainRelay;
use crate::ExecutionContext;

/// Resolves the relay through the host and caches it, replacing any value
/// already cached.
pub fn load_cross_chain_relay(ctx: &mut ExecutionContext) -> LedgerResult<Identity> {
    let relay = CrossChainRelay::lookup(ctx.host)?;
    ctx.state.cross_chain_relay = Some(relay.0);
    info!(relay = %relay.0, "cross-chain relay loaded");
    Ok(relay.0)
}

/// Cached relay, resolved on first use.
pub fn cross_chain_relay(ctx: &mut ExecutionContext) -> LedgerResult<CrossChainRelay> {
    match ctx.state.cross_chain_relay {
        Some(id) => Ok(CrossChainRelay(id)),
        None => load_cross_chain_relay(ctx).map(CrossChainRelay),
    }
}

/// Lets the relay spend `value` of the caller's tokens and hands it the
/// transfer. Returns the relay's verdict.
///
/// No tokens move here. `Host::invoke` cannot re-enter the ledger, so the
/// relay has to spend the approval with a later `TransferFrom` of its own.
pub fn transfer_cross_chain(ctx: &mut ExecutionContext, to: Identity, value: Amount) -> LedgerResult<bool> {
    let from = ctx.caller;
    claim_dividends(ctx, from)?;
    claim_dividends(ctx, to)?;

    let relay = cross_chain_relay(ctx)?;
    approve(ctx, relay.0, value);

    let attached = ctx.attached_value;
    let accepted = relay.on_received(ctx.host, from, to, value, attached)?;
    debug!(%from, %to, %value, accepted, "cross-chain transfer handed to relay");
    Ok(accepted)
}
