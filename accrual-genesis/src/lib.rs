use accrual_types::{Amount, Identity, LedgerError, LedgerEvent, LedgerResult, LedgerState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Largest `decimals` for which `10^decimals` still fits in an `Amount`.
pub const MAX_DECIMALS: u8 = 38;

/// Deployment parameters. The deployer receives the whole supply and, unless
/// `owner` says otherwise, the owner role.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisConfig {
    pub name: String,
    pub symbol: String,
    pub initial_amount: Amount,
    pub decimals: u8,
    pub reserve_asset: Identity,
    #[serde(default)]
    pub owner: Option<Identity>,
}

impl GenesisConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse genesis config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read genesis config {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// `initial_amount * 10^decimals`.
    pub fn total_supply(&self) -> LedgerResult<Amount> {
        if self.decimals > MAX_DECIMALS {
            return Err(LedgerError::InvalidConfig(format!(
                "decimals {} exceeds {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        10u128
            .checked_pow(self.decimals as u32)
            .and_then(|scale| self.initial_amount.checked_mul(scale))
            .ok_or_else(|| LedgerError::InvalidConfig("initial supply overflows".to_string()))
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidConfig("name is required".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(LedgerError::InvalidConfig("symbol is required".to_string()));
        }
        if self.initial_amount == 0 {
            return Err(LedgerError::InvalidConfig("initial amount must be positive".to_string()));
        }
        self.total_supply().map(|_| ())
    }
}

/// Builds the ledger with the full supply assigned to `deployer` and returns
/// it with the mint notification.
pub fn create_genesis_state(config: &GenesisConfig, deployer: Identity) -> LedgerResult<(LedgerState, LedgerEvent)> {
    config.validate()?;
    let total_supply = config.total_supply()?;

    let mut balances = HashMap::new();
    balances.insert(deployer, total_supply);

    let state = LedgerState {
        name: config.name.clone(),
        symbol: config.symbol.clone(),
        decimals: config.decimals,
        total_supply,
        balances,
        allowances: HashMap::new(),
        dividend_per_token: 0,
        settled_dividend_per_token: HashMap::new(),
        reserve_asset: config.reserve_asset,
        cross_chain_relay: None,
        owner: config.owner.unwrap_or(deployer),
    };

    info!(
        symbol = %state.symbol,
        %total_supply,
        %deployer,
        reserve_asset = %state.reserve_asset,
        "genesis ledger created"
    );

    let mint = LedgerEvent::Transfer {
        from: None,
        to: deployer,
        value: total_supply,
    };
    Ok((state, mint))
}
