#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use accrual_execution::{execute_invocation, InMemoryHost};
use accrual_types::state::MULTIPLIER;
use accrual_types::{Identity, Invocation, LedgerInstruction, LedgerState};

#[derive(Arbitrary, Debug)]
struct RewardInput {
    supply: u64,
    holder_share: u64,
    amount: u64,
    attached: u64,
}

fuzz_target!(|data: RewardInput| {
    let deployer = Identity([1u8; 32]);
    let holder = Identity([2u8; 32]);
    let reserve = Identity([0xaa; 32]);
    let ledger = Identity([0xee; 32]);

    let supply = data.supply as u128 + 1;
    let held = data.holder_share as u128 % supply;

    let mut state = LedgerState {
        total_supply: supply,
        reserve_asset: reserve,
        owner: deployer,
        ..Default::default()
    };
    state.balances.insert(deployer, supply - held);
    state.balances.insert(holder, held);

    let mut host = InMemoryHost::new(ledger, Identity([0xcc; 32]));
    let inv = Invocation::new(deployer, LedgerInstruction::DistributionRewards { amount: data.amount as u128 })
        .with_value(data.attached as u128);

    if execute_invocation(&inv, &mut state, &mut host).is_err() {
        assert_eq!(state.current_dividend_per_token(), 0);
        return;
    }

    let increment = data.amount as u128 * MULTIPLIER / supply;
    assert_eq!(state.current_dividend_per_token(), increment);

    for account in [holder, deployer] {
        let claim = Invocation::new(holder, LedgerInstruction::ClaimDividends { account });
        execute_invocation(&claim, &mut state, &mut host).expect("payout within deposit");
    }
    let paid = host.paid_out(&reserve);
    assert!(paid <= data.amount as u128);
    assert!(data.amount as u128 - paid <= supply / MULTIPLIER + 3);
});
