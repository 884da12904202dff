//! The hosting runtime as seen from the ledger: one generic invoke
//! capability, plus typed proxies for the two collaborators reached
//! through it.

use accrual_types::{Amount, CallArg, CallReturn, CallTarget, Identity, LedgerError, LedgerResult};
use tracing::debug;

pub const METHOD_DEPOSIT: &str = "deposit";
pub const METHOD_TRANSFER: &str = "transfer";
pub const METHOD_RELAY_LOOKUP: &str = "getCrossTokenSystemContract";
pub const METHOD_RELAY_RECEIVE: &str = "onNRC20Received";

/// Nested-call capability provided by whatever runtime hosts the ledger.
///
/// `checkpoint`/`commit`/`revert` bracket a single invocation. Runtimes
/// that already roll back nested calls on abort can leave them as no-ops.
pub trait Host {
    fn invoke(
        &mut self,
        target: CallTarget,
        method: &str,
        args: &[CallArg],
        attached: Amount,
    ) -> LedgerResult<CallReturn>;

    fn checkpoint(&mut self) {}

    fn commit(&mut self) {}

    fn revert(&mut self) {}
}

/// Wrapped reserve asset used to fund dividend payouts.
#[derive(Debug, Clone, Copy)]
pub struct ReserveAsset(pub Identity);

impl ReserveAsset {
    /// Wraps `amount` of attached value. A falsy answer is a failure.
    pub fn deposit(&self, host: &mut dyn Host, amount: Amount) -> LedgerResult<()> {
        debug!(reserve = %self.0, %amount, "reserve deposit");
        let ret = host.invoke(
            CallTarget::Contract(self.0),
            METHOD_DEPOSIT,
            &[CallArg::Amount(amount)],
            amount,
        )?;
        if !ret.as_bool(METHOD_DEPOSIT)? {
            return Err(LedgerError::call_failed(METHOD_DEPOSIT, "Deposit did not succeed"));
        }
        Ok(())
    }

    /// Pays `amount` out of the ledger's own reserve holdings.
    pub fn transfer(&self, host: &mut dyn Host, to: Identity, amount: Amount) -> LedgerResult<()> {
        debug!(reserve = %self.0, %to, %amount, "reserve payout");
        let ret = host.invoke(
            CallTarget::Contract(self.0),
            METHOD_TRANSFER,
            &[CallArg::Identity(to), CallArg::Amount(amount)],
            0,
        )?;
        if !ret.as_bool(METHOD_TRANSFER)? {
            return Err(LedgerError::call_failed(METHOD_TRANSFER, "Failed to transfer"));
        }
        Ok(())
    }
}

/// Cross-chain system contract.
#[derive(Debug, Clone, Copy)]
pub struct CrossChainRelay(pub Identity);

impl CrossChainRelay {
    pub fn lookup(host: &mut dyn Host) -> LedgerResult<Self> {
        let ret = host.invoke(CallTarget::System, METHOD_RELAY_LOOKUP, &[], 0)?;
        let id = ret.as_identity(METHOD_RELAY_LOOKUP)?;
        debug!(relay = %id, "resolved cross-chain relay");
        Ok(Self(id))
    }

    /// Hands the outgoing transfer to the relay, forwarding the attached
    /// value. The relay's boolean answer is returned as-is.
    pub fn on_received(
        &self,
        host: &mut dyn Host,
        from: Identity,
        to: Identity,
        value: Amount,
        attached: Amount,
    ) -> LedgerResult<bool> {
        let ret = host.invoke(
            CallTarget::Contract(self.0),
            METHOD_RELAY_RECEIVE,
            &[CallArg::Identity(from), CallArg::Identity(to), CallArg::Amount(value)],
            attached,
        )?;
        ret.as_bool(METHOD_RELAY_RECEIVE)
    }
}
