#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use accrual_execution::{execute_invocation, InMemoryHost};
use accrual_types::{Identity, Invocation, LedgerInstruction, LedgerState};

const ACCOUNTS: [Identity; 4] = [
    Identity([1u8; 32]),
    Identity([2u8; 32]),
    Identity([3u8; 32]),
    Identity([4u8; 32]),
];

#[derive(Arbitrary, Debug)]
struct Step {
    op: u8,
    caller: u8,
    other: u8,
    third: u8,
    value: u32,
    attached: u32,
}

fn pick(i: u8) -> Identity {
    ACCOUNTS[i as usize % ACCOUNTS.len()]
}

fn instruction(step: &Step) -> LedgerInstruction {
    let value = step.value as u128;
    match step.op % 8 {
        0 => LedgerInstruction::Transfer { to: pick(step.other), value },
        1 => LedgerInstruction::TransferFrom {
            from: pick(step.other),
            to: pick(step.third),
            value,
        },
        2 => LedgerInstruction::Approve { spender: pick(step.other), value },
        3 => LedgerInstruction::IncreaseApproval {
            spender: pick(step.other),
            added_value: value,
        },
        4 => LedgerInstruction::DecreaseApproval {
            spender: pick(step.other),
            subtracted_value: value,
        },
        5 => LedgerInstruction::DistributionRewards { amount: value * 1_000 },
        6 => LedgerInstruction::ClaimDividends { account: pick(step.other) },
        _ => LedgerInstruction::TransferCrossChain { to: pick(step.other), value },
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let reserve = Identity([0xaa; 32]);
    let supply = 10_000_000u128;
    let mut state = LedgerState {
        total_supply: supply,
        reserve_asset: reserve,
        owner: ACCOUNTS[0],
        ..Default::default()
    };
    state.balances.insert(ACCOUNTS[0], supply);

    let mut host = InMemoryHost::new(Identity([0xee; 32]), Identity([0xcc; 32]));
    let mut deposited = 0u128;

    for step in steps.iter().take(256) {
        let li = instruction(step);
        let attached = if li.is_payable() { step.attached as u128 * 1_000 } else { 0 };
        let is_deposit = matches!(li, LedgerInstruction::DistributionRewards { .. });
        let before_dpt = state.current_dividend_per_token();

        let inv = Invocation::new(pick(step.caller), li).with_value(attached);
        let ok = execute_invocation(&inv, &mut state, &mut host).is_ok();
        if ok && is_deposit {
            deposited += step.value as u128 * 1_000;
        }

        assert_eq!(state.circulating(), state.total_supply());
        assert!(state.current_dividend_per_token() >= before_dpt);
        assert!(host.paid_out(&reserve) <= deposited);
        for account in ACCOUNTS {
            assert!(state.settled_dividend_per_token(&account) <= state.current_dividend_per_token());
        }
    }
});
