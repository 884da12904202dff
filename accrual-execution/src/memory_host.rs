//! Self-contained host for simulation, fuzzing and tests. It plays the
//! wrapped reserve asset (any number of them, keyed by contract identity)
//! and the cross-chain relay, and journals its own state so a rejected
//! invocation leaves no trace here either.

use accrual_types::{Amount, CallArg, CallReturn, CallTarget, Identity, LedgerError, LedgerResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::host::{Host, METHOD_DEPOSIT, METHOD_RELAY_LOOKUP, METHOD_RELAY_RECEIVE, METHOD_TRANSFER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub target: CallTarget,
    pub method: String,
    pub args: Vec<CallArg>,
    pub attached: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub from: Identity,
    pub to: Identity,
    pub value: Amount,
    pub attached: Amount,
}

// reserve contract -> holder -> wrapped balance
type Reserves = HashMap<Identity, HashMap<Identity, Amount>>;

#[derive(Debug, Default)]
struct HostBook {
    reserves: Reserves,
    relay_requests: Vec<RelayRequest>,
    relay_lookups: u32,
    calls: Vec<RecordedCall>,
}

/// Rollback point. The logs only ever grow, so their lengths are enough.
#[derive(Debug)]
struct Checkpoint {
    reserves: Reserves,
    relay_requests: usize,
    relay_lookups: u32,
    calls: usize,
}

pub struct InMemoryHost {
    ledger: Identity,
    relay: Identity,
    relay_accepts: bool,
    failing: HashSet<String>,
    book: HostBook,
    saved: Option<Checkpoint>,
}

impl InMemoryHost {
    /// `ledger` is the identity the ledger contract itself holds reserve
    /// balances under.
    pub fn new(ledger: Identity, relay: Identity) -> Self {
        Self {
            ledger,
            relay,
            relay_accepts: true,
            failing: HashSet::new(),
            book: HostBook::default(),
            saved: None,
        }
    }

    /// Makes every later call to `method` answer `false`.
    pub fn fail_method(&mut self, method: &str) {
        self.failing.insert(method.to_string());
    }

    pub fn restore_method(&mut self, method: &str) {
        self.failing.remove(method);
    }

    pub fn set_relay_accepts(&mut self, accepts: bool) {
        self.relay_accepts = accepts;
    }

    pub fn reserve_balance(&self, reserve: &Identity, holder: &Identity) -> Amount {
        self.book
            .reserves
            .get(reserve)
            .and_then(|holders| holders.get(holder))
            .copied()
            .unwrap_or(0)
    }

    /// Reserve held by `reserve` for everyone except the ledger, i.e. what
    /// has been paid out as dividends so far.
    pub fn paid_out(&self, reserve: &Identity) -> Amount {
        self.book
            .reserves
            .get(reserve)
            .map(|holders| {
                holders
                    .iter()
                    .filter(|(holder, _)| **holder != self.ledger)
                    .fold(0u128, |acc, (_, v)| acc.saturating_add(*v))
            })
            .unwrap_or(0)
    }

    pub fn relay_requests(&self) -> &[RelayRequest] {
        &self.book.relay_requests
    }

    pub fn relay_lookups(&self) -> u32 {
        self.book.relay_lookups
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.book.calls
    }

    fn answer(&self, method: &str, ok: bool) -> CallReturn {
        CallReturn::Bool(ok && !self.failing.contains(method))
    }

    fn deposit(&mut self, reserve: Identity, args: &[CallArg], attached: Amount) -> LedgerResult<CallReturn> {
        let amount = match args {
            [CallArg::Amount(a)] => *a,
            _ => return Err(LedgerError::call_failed(METHOD_DEPOSIT, "expected (amount)")),
        };
        let ok = attached >= amount;
        let answer = self.answer(METHOD_DEPOSIT, ok);
        if answer == CallReturn::Bool(true) {
            let held = self.book.reserves.entry(reserve).or_default().entry(self.ledger).or_insert(0);
            *held = held.saturating_add(amount);
        }
        Ok(answer)
    }

    fn transfer(&mut self, reserve: Identity, args: &[CallArg]) -> LedgerResult<CallReturn> {
        let (to, amount) = match args {
            [CallArg::Identity(to), CallArg::Amount(a)] => (*to, *a),
            _ => return Err(LedgerError::call_failed(METHOD_TRANSFER, "expected (to, amount)")),
        };
        let available = self.reserve_balance(&reserve, &self.ledger);
        let answer = self.answer(METHOD_TRANSFER, available >= amount);
        if answer == CallReturn::Bool(true) {
            let holders = self.book.reserves.entry(reserve).or_default();
            holders.insert(self.ledger, available - amount);
            let dest = holders.entry(to).or_insert(0);
            *dest = dest.saturating_add(amount);
        }
        Ok(answer)
    }

    fn relay_receive(&mut self, args: &[CallArg], attached: Amount) -> LedgerResult<CallReturn> {
        let (from, to, value) = match args {
            [CallArg::Identity(from), CallArg::Identity(to), CallArg::Amount(v)] => (*from, *to, *v),
            _ => return Err(LedgerError::call_failed(METHOD_RELAY_RECEIVE, "expected (from, to, amount)")),
        };
        let answer = self.answer(METHOD_RELAY_RECEIVE, self.relay_accepts);
        if answer == CallReturn::Bool(true) {
            self.book.relay_requests.push(RelayRequest {
                from,
                to,
                value,
                attached,
            });
        }
        Ok(answer)
    }
}

impl Host for InMemoryHost {
    fn invoke(
        &mut self,
        target: CallTarget,
        method: &str,
        args: &[CallArg],
        attached: Amount,
    ) -> LedgerResult<CallReturn> {
        debug!(%target, method, %attached, "host call");
        self.book.calls.push(RecordedCall {
            target,
            method: method.to_string(),
            args: args.to_vec(),
            attached,
        });

        match (target, method) {
            (CallTarget::System, METHOD_RELAY_LOOKUP) => {
                self.book.relay_lookups += 1;
                Ok(CallReturn::Identity(self.relay))
            }
            (CallTarget::Contract(id), METHOD_RELAY_RECEIVE) if id == self.relay => {
                self.relay_receive(args, attached)
            }
            (CallTarget::Contract(id), METHOD_DEPOSIT) => self.deposit(id, args, attached),
            (CallTarget::Contract(id), METHOD_TRANSFER) => self.transfer(id, args),
            _ => Err(LedgerError::call_failed(method, format!("no such entrypoint on {target}"))),
        }
    }

    fn checkpoint(&mut self) {
        self.saved = Some(Checkpoint {
            reserves: self.book.reserves.clone(),
            relay_requests: self.book.relay_requests.len(),
            relay_lookups: self.book.relay_lookups,
            calls: self.book.calls.len(),
        });
    }

    fn commit(&mut self) {
        self.saved = None;
    }

    fn revert(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.book.reserves = saved.reserves;
            self.book.relay_requests.truncate(saved.relay_requests);
            self.book.relay_lookups = saved.relay_lookups;
            self.book.calls.truncate(saved.calls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: Identity = Identity([0xee; 32]);
    const RELAY: Identity = Identity([0xcc; 32]);
    const RESERVE: Identity = Identity([0xaa; 32]);

    #[test]
    fn deposit_then_payout_moves_wrapped_balance() {
        let mut host = InMemoryHost::new(LEDGER, RELAY);
        let r = host
            .invoke(CallTarget::Contract(RESERVE), METHOD_DEPOSIT, &[CallArg::Amount(500)], 500)
            .unwrap();
        assert_eq!(r, CallReturn::Bool(true));

        let holder = Identity([1u8; 32]);
        let r = host
            .invoke(
                CallTarget::Contract(RESERVE),
                METHOD_TRANSFER,
                &[CallArg::Identity(holder), CallArg::Amount(200)],
                0,
            )
            .unwrap();
        assert_eq!(r, CallReturn::Bool(true));
        assert_eq!(host.reserve_balance(&RESERVE, &LEDGER), 300);
        assert_eq!(host.paid_out(&RESERVE), 200);
    }

    #[test]
    fn payout_beyond_holdings_answers_false() {
        let mut host = InMemoryHost::new(LEDGER, RELAY);
        let r = host
            .invoke(
                CallTarget::Contract(RESERVE),
                METHOD_TRANSFER,
                &[CallArg::Identity(Identity([1u8; 32])), CallArg::Amount(1)],
                0,
            )
            .unwrap();
        assert_eq!(r, CallReturn::Bool(false));
    }

    #[test]
    fn revert_discards_book_changes() {
        let mut host = InMemoryHost::new(LEDGER, RELAY);
        host.checkpoint();
        host.invoke(CallTarget::Contract(RESERVE), METHOD_DEPOSIT, &[CallArg::Amount(9)], 9)
            .unwrap();
        host.revert();
        assert_eq!(host.reserve_balance(&RESERVE, &LEDGER), 0);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn revert_keeps_calls_from_committed_invocations() {
        let mut host = InMemoryHost::new(LEDGER, RELAY);
        host.checkpoint();
        host.invoke(CallTarget::Contract(RESERVE), METHOD_DEPOSIT, &[CallArg::Amount(5)], 5)
            .unwrap();
        host.invoke(CallTarget::System, METHOD_RELAY_LOOKUP, &[], 0).unwrap();
        host.commit();

        host.checkpoint();
        host.invoke(CallTarget::Contract(RESERVE), METHOD_DEPOSIT, &[CallArg::Amount(7)], 7)
            .unwrap();
        host.invoke(CallTarget::System, METHOD_RELAY_LOOKUP, &[], 0).unwrap();
        host.invoke(
            CallTarget::Contract(RELAY),
            METHOD_RELAY_RECEIVE,
            &[CallArg::Identity(LEDGER), CallArg::Identity(RESERVE), CallArg::Amount(1)],
            0,
        )
        .unwrap();
        host.revert();

        assert_eq!(host.calls().len(), 2);
        assert_eq!(host.relay_lookups(), 1);
        assert!(host.relay_requests().is_empty());
        assert_eq!(host.reserve_balance(&RESERVE, &LEDGER), 5);
    }
}
