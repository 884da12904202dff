use accrual_execution::{execute_invocation, InMemoryHost};
use accrual_genesis::{create_genesis_state, GenesisConfig};
use accrual_types::{Amount, Identity, Invocation, LedgerInstruction, LedgerState};
use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dividend ledger simulation runner")]
struct Args {
    /// Number of holder wallets.
    #[arg(long, default_value_t = 200)]
    wallets: usize,
    /// Number of token transfers to execute.
    #[arg(long, default_value_t = 20_000)]
    transfers: usize,
    /// Distribute rewards every N transfers.
    #[arg(long, default_value_t = 500)]
    reward_every: usize,
    /// Size of each reward deposit, in reserve minor units.
    #[arg(long, default_value_t = 50_000_000)]
    reward_amount: u64,
    /// RNG seed, for reproducible runs.
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Genesis config (JSON). A built-in one is used when omitted.
    #[arg(long)]
    config: Option<String>,
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[derive(Debug, Default)]
struct Report {
    transfers_ok: u64,
    transfers_failed: u64,
    cross_chain: u64,
    escrowed: Amount,
    distributions: u64,
    deposited: Amount,
    paid_out: Amount,
}

fn default_config() -> GenesisConfig {
    GenesisConfig {
        name: "Accrual Dollar".to_string(),
        symbol: "ACD".to_string(),
        initial_amount: 10_000_000,
        decimals: 8,
        reserve_asset: Identity([0xaa; 32]),
        owner: None,
    }
}

fn build_wallets(rng: &mut StdRng, count: usize) -> Vec<Identity> {
    (0..count).map(|_| Identity(rng.gen())).collect()
}

fn call(state: &mut LedgerState, host: &mut InMemoryHost, inv: Invocation) -> bool {
    execute_invocation(&inv, state, host).is_ok()
}

/// The relay spends the approval it was just granted and holds the tokens
/// until the other chain releases them.
fn relay_escrow(state: &mut LedgerState, host: &mut InMemoryHost, from: Identity, value: Amount) -> bool {
    match state.cross_chain_relay() {
        Some(relay) => call(
            state,
            host,
            Invocation::new(relay, LedgerInstruction::TransferFrom { from, to: relay, value }),
        ),
        None => false,
    }
}

fn seed_wallets(state: &mut LedgerState, host: &mut InMemoryHost, deployer: Identity, wallets: &[Identity]) -> Result<()> {
    // Deployer keeps half the supply, the rest is spread evenly.
    let share = state.total_supply() / 2 / wallets.len().max(1) as Amount;
    for wallet in wallets {
        let inv = Invocation::new(deployer, LedgerInstruction::Transfer { to: *wallet, value: share });
        execute_invocation(&inv, state, host).context("seeding wallet")?;
    }
    Ok(())
}

fn run_simulation(args: &Args) -> Result<Report> {
    let config = match &args.config {
        Some(path) => GenesisConfig::load(path)?,
        None => default_config(),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let deployer = Identity(rng.gen());
    let ledger_id = Identity(rng.gen());
    let relay_id = Identity(rng.gen());

    let (mut state, _mint) = create_genesis_state(&config, deployer)?;
    let mut host = InMemoryHost::new(ledger_id, relay_id);

    let wallets = build_wallets(&mut rng, args.wallets);
    ensure!(wallets.len() >= 2, "need at least two wallets");
    seed_wallets(&mut state, &mut host, deployer, &wallets)?;

    let mut report = Report::default();
    let reward = args.reward_amount as Amount;
    let start = Instant::now();

    for i in 0..args.transfers {
        if args.reward_every > 0 && i % args.reward_every == 0 {
            let inv = Invocation::new(deployer, LedgerInstruction::DistributionRewards { amount: reward })
                .with_value(reward);
            execute_invocation(&inv, &mut state, &mut host).context("reward distribution")?;
            report.distributions += 1;
            report.deposited += reward;
        }

        let sender = wallets[rng.gen_range(0..wallets.len())];
        let mut receiver = wallets[rng.gen_range(0..wallets.len())];
        if receiver == sender {
            receiver = deployer;
        }
        // Overshoot now and then so rejected transfers are exercised too.
        let ceiling = state.balance_of(&sender) + state.balance_of(&sender) / 50 + 1;
        let value = rng.gen_range(0..ceiling);

        let cross_chain = i % 97 == 0;
        let inv = match i % 97 {
            0 => {
                report.cross_chain += 1;
                Invocation::new(sender, LedgerInstruction::TransferCrossChain { to: receiver, value })
            }
            1 => {
                call(
                    &mut state,
                    &mut host,
                    Invocation::new(sender, LedgerInstruction::Approve { spender: deployer, value }),
                );
                Invocation::new(
                    deployer,
                    LedgerInstruction::TransferFrom {
                        from: sender,
                        to: receiver,
                        value,
                    },
                )
            }
            _ => Invocation::new(sender, LedgerInstruction::Transfer { to: receiver, value }),
        };

        if call(&mut state, &mut host, inv) {
            report.transfers_ok += 1;
            if cross_chain && relay_escrow(&mut state, &mut host, sender, value) {
                report.escrowed += value;
            }
        } else {
            report.transfers_failed += 1;
        }
        ensure!(
            state.circulating() == state.total_supply(),
            "conservation violated after transfer {i}"
        );
    }

    let relay = state.cross_chain_relay();
    for holder in wallets.iter().chain(std::iter::once(&deployer)).chain(relay.iter()) {
        let inv = Invocation::new(deployer, LedgerInstruction::ClaimDividends { account: *holder });
        execute_invocation(&inv, &mut state, &mut host).context("final claim")?;
    }

    report.paid_out = host.paid_out(&state.reserve_asset());
    ensure!(report.paid_out <= report.deposited, "paid out more than deposited");

    let elapsed = start.elapsed();
    info!(
        transfers = args.transfers,
        elapsed_ms = elapsed.as_millis() as u64,
        "simulation finished"
    );

    println!("=== Accrual Simulation ===");
    println!("Token: {} ({}), supply {}", state.name(), state.symbol(), state.total_supply());
    println!("Wallets: {}", wallets.len());
    println!("Transfers ok / rejected: {} / {}", report.transfers_ok, report.transfers_failed);
    println!("Cross-chain transfers attempted: {}", report.cross_chain);
    println!("Escrowed by relay: {}", report.escrowed);
    println!("Reward distributions: {}", report.distributions);
    println!("Deposited: {}", report.deposited);
    println!("Paid out: {}", report.paid_out);
    println!("Truncation dust: {}", report.deposited - report.paid_out);
    println!("Dividend per token: {}", state.current_dividend_per_token());
    println!("State root: {}", hex::encode(state.root_hash()));
    println!("Elapsed: {:.2?}", elapsed);

    Ok(report)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(args.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    run_simulation(&args).map(|_| ())
}
