use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{LedgerError, LedgerResult};
use crate::identity::{Amount, Identity};

/// Fixed-point scale of the dividend accumulator.
pub const MULTIPLIER: Amount = 1_000_000_000;

/// Smallest reward deposit accepted by `distributionRewards` (0.01 of a
/// 8-decimal reserve unit).
pub const MIN_REWARD_DEPOSIT: Amount = 1_000_000;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Amount,

    pub balances: HashMap<Identity, Amount>,
    pub allowances: HashMap<Identity, HashMap<Identity, Amount>>,

    // === Dividends ===
    pub dividend_per_token: Amount, // scaled by MULTIPLIER
    pub settled_dividend_per_token: HashMap<Identity, Amount>,

    // === Collaborators & roles ===
    pub reserve_asset: Identity,
    pub cross_chain_relay: Option<Identity>, // resolved on first use
    pub owner: Identity,
}

impl LedgerState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Identity) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Identity, spender: &Identity) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn current_dividend_per_token(&self) -> Amount {
        self.dividend_per_token
    }

    pub fn reserve_asset(&self) -> Identity {
        self.reserve_asset
    }

    pub fn owner(&self) -> Identity {
        self.owner
    }

    pub fn cross_chain_relay(&self) -> Option<Identity> {
        self.cross_chain_relay
    }

    pub fn settled_dividend_per_token(&self, account: &Identity) -> Amount {
        self.settled_dividend_per_token.get(account).copied().unwrap_or(0)
    }

    /// What a claim for `account` would pay right now:
    /// `(dividend_per_token - settled) * balance / MULTIPLIER`, truncated.
    pub fn pending_dividends(&self, account: &Identity) -> LedgerResult<Amount> {
        let settled = self.settled_dividend_per_token(account);
        let delta = self
            .dividend_per_token
            .checked_sub(settled)
            .ok_or_else(|| LedgerError::InvalidAmount("settled dividend ahead of accumulator".into()))?;
        let scaled = delta
            .checked_mul(self.balance_of(account))
            .ok_or_else(|| LedgerError::overflow("dividend share"))?;
        Ok(scaled / MULTIPLIER)
    }

    /// Sum of all balances. Equals `total_supply` after every invocation.
    pub fn circulating(&self) -> Amount {
        self.balances.values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    pub fn root_hash(&self) -> [u8; 32] {
        #[derive(Serialize)]
        struct Canonical<'a> {
            name: &'a str,
            symbol: &'a str,
            decimals: u8,
            total_supply: Amount,
            balances: BTreeMap<&'a Identity, &'a Amount>,
            allowances: BTreeMap<(&'a Identity, &'a Identity), &'a Amount>,
            dividend_per_token: Amount,
            settled: BTreeMap<&'a Identity, &'a Amount>,
            reserve_asset: &'a Identity,
            cross_chain_relay: &'a Option<Identity>,
            owner: &'a Identity,
        }

        let canonical = Canonical {
            name: &self.name,
            symbol: &self.symbol,
            decimals: self.decimals,
            total_supply: self.total_supply,
            balances: self.balances.iter().collect(),
            allowances: self
                .allowances
                .iter()
                .flat_map(|(owner, spenders)| spenders.iter().map(move |(spender, v)| ((owner, spender), v)))
                .collect(),
            dividend_per_token: self.dividend_per_token,
            settled: self.settled_dividend_per_token.iter().collect(),
            reserve_asset: &self.reserve_asset,
            cross_chain_relay: &self.cross_chain_relay,
            owner: &self.owner,
        };

        let mut hasher = blake3::Hasher::new();
        hasher.update(&bincode::serialize(&canonical).expect("ledger state serialization failed"));
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_zero() {
        let state = LedgerState::default();
        let a = Identity([1u8; 32]);
        let b = Identity([2u8; 32]);
        assert_eq!(state.balance_of(&a), 0);
        assert_eq!(state.allowance(&a, &b), 0);
        assert_eq!(state.settled_dividend_per_token(&a), 0);
        assert_eq!(state.pending_dividends(&a).unwrap(), 0);
    }

    #[test]
    fn pending_dividends_truncates() {
        let holder = Identity([3u8; 32]);
        let mut state = LedgerState {
            dividend_per_token: 1_500_000_000,
            ..Default::default()
        };
        state.balances.insert(holder, 3);
        // 1.5 * 3 = 4.5 -> 4
        assert_eq!(state.pending_dividends(&holder).unwrap(), 4);

        state.settled_dividend_per_token.insert(holder, 1_000_000_000);
        // 0.5 * 3 = 1.5 -> 1
        assert_eq!(state.pending_dividends(&holder).unwrap(), 1);
    }

    #[test]
    fn root_hash_ignores_map_order() {
        let mut a = LedgerState::default();
        let mut b = LedgerState::default();
        for i in 0..16u8 {
            a.balances.insert(Identity([i; 32]), i as Amount);
        }
        for i in (0..16u8).rev() {
            b.balances.insert(Identity([i; 32]), i as Amount);
        }
        assert_eq!(a.root_hash(), b.root_hash());

        b.balances.insert(Identity([0; 32]), 99);
        assert_ne!(a.root_hash(), b.root_hash());
    }
}
