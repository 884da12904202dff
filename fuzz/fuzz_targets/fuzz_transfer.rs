#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use accrual_execution::{execute_invocation, InMemoryHost};
use accrual_types::{Identity, Invocation, LedgerInstruction, LedgerState};

#[derive(Arbitrary, Debug)]
struct TransferInput {
    sender: [u8; 32],
    to: [u8; 32],
    seed_balance: u64,
    value: u64,
}

fuzz_target!(|data: TransferInput| {
    let sender = Identity(data.sender);
    let to = Identity(data.to);
    let mut state = LedgerState {
        total_supply: data.seed_balance as u128,
        reserve_asset: Identity([0xaa; 32]),
        ..Default::default()
    };
    state.balances.insert(sender, data.seed_balance as u128);

    let mut host = InMemoryHost::new(Identity([0xee; 32]), Identity([0xcc; 32]));
    let before = state.clone();

    let inv = Invocation::new(sender, LedgerInstruction::Transfer { to, value: data.value as u128 });
    match execute_invocation(&inv, &mut state, &mut host) {
        Ok(_) => {
            if sender != to {
                assert_eq!(state.balance_of(&sender) + data.value as u128, before.balance_of(&sender));
            }
        }
        Err(_) => assert_eq!(state, before),
    }
    assert_eq!(state.circulating(), state.total_supply());
});
