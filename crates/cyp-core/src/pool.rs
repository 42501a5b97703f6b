// ─────────────────────────────────────────────────────────────────
// Pool Engine - deposit / withdraw / claim as atomic transitions
// ─────────────────────────────────────────────────────────────────
// Every call follows the same three steps:
//   1. settle the global index up to `now`
//   2. settle the caller's account against the new index
//   3. apply the operation's own effect
// All three run on working copies of the pool record and the account;
// the copies are committed only when every step succeeded, so a
// rejected call leaves the engine exactly as it found it.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accumulator::PoolState;
use crate::boost::boost_multiplier;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::fixed_point::{checked_add, checked_sub, mul_div, u256_dec, U256, WAD};
use crate::ledger::{settle_account, Account, AccountId};
use crate::penalty::{split_withdrawal, PenaltySink};

/// Result of a successful deposit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositOutcome {
    #[serde(with = "u256_dec")]
    pub shares_minted: U256,
    pub new_lock_expiry: u64,
}

/// Result of a successful withdrawal. The host transfers `amount_returned`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    #[serde(with = "u256_dec")]
    pub amount_returned: U256,
    #[serde(with = "u256_dec")]
    pub penalty_charged: U256,
    #[serde(with = "u256_dec")]
    pub shares_burned: U256,
}

/// Result of a successful claim. The host transfers `amount_paid`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    #[serde(with = "u256_dec")]
    pub amount_paid: U256,
}

/// Read-only pool summary projected to a given instant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    #[serde(with = "u256_dec")]
    pub total_shares: U256,
    /// Index as it would be if settled at the requested instant
    #[serde(with = "u256_dec")]
    pub acc_reward_per_share: U256,
    #[serde(with = "u256_dec")]
    pub reward_rate_per_second: U256,
    pub max_lock_seconds: u32,
    pub penalty_bps: u16,
    #[serde(with = "u256_dec")]
    pub boost_max_e18: U256,
    pub penalty_sink: PenaltySink,
    pub last_update_time: u64,
    #[serde(with = "u256_dec")]
    pub total_principal: U256,
    #[serde(with = "u256_dec")]
    pub total_rewards_claimed: U256,
    #[serde(with = "u256_dec")]
    pub total_penalties_collected: U256,
    pub account_count: u64,
    pub active_accounts: u64,
}

/// The accrual engine: one pool record plus every account it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEngine {
    pub(crate) pool: PoolState,
    /// BTreeMap for deterministic iteration and hashing
    pub(crate) accounts: BTreeMap<AccountId, Account>,
}

impl PoolEngine {
    /// Create an empty pool whose index starts at `genesis_time`.
    pub fn new(config: PoolConfig, genesis_time: u64) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;
        log::info!(
            "pool created at t={} rate={} max_lock={}s boost_max={} penalty={}bps sink={}",
            genesis_time,
            config.reward_rate_per_second,
            config.max_lock_seconds,
            config.boost_max_e18,
            config.penalty_bps,
            config.penalty_sink
        );
        Ok(Self {
            pool: PoolState::new(&config, genesis_time),
            accounts: BTreeMap::new(),
        })
    }

    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    /// Working copies of the pool and the account, both settled to `now`.
    fn settled_copies(&self, id: &str, now: u64) -> Result<(PoolState, Account), PoolError> {
        let mut pool = self.pool.clone();
        pool.settle(now)?;
        let mut account = self.accounts.get(id).cloned().unwrap_or_default();
        settle_account(&mut account, pool.acc_reward_per_share)?;
        Ok((pool, account))
    }

    fn commit(&mut self, id: &str, pool: PoolState, account: Account) {
        self.pool = pool;
        self.accounts.insert(id.to_string(), account);
    }

    /// Advance the global index to `now` without touching any account.
    pub fn settle(&mut self, now: u64) -> Result<U256, PoolError> {
        let mut pool = self.pool.clone();
        let delta = pool.settle(now)?;
        self.pool = pool;
        Ok(delta)
    }

    /// Stake `amount` with a `lock_seconds` commitment.
    ///
    /// A top-up never shortens an existing lock: the expiry only moves if
    /// `now + lock_seconds` is later than the current one.
    pub fn deposit(
        &mut self,
        id: &str,
        amount: U256,
        lock_seconds: u64,
        now: u64,
    ) -> Result<DepositOutcome, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount);
        }
        let boost = boost_multiplier(
            lock_seconds,
            self.pool.max_lock_seconds,
            self.pool.boost_max_e18,
        )?;

        let (mut pool, mut account) = self.settled_copies(id, now)?;

        let shares_minted = mul_div(amount, boost, WAD)?;
        account.principal = checked_add(account.principal, amount)?;
        account.shares = checked_add(account.shares, shares_minted)?;
        pool.total_shares = checked_add(pool.total_shares, shares_minted)?;
        pool.total_principal = checked_add(pool.total_principal, amount)?;

        let candidate_expiry = now
            .checked_add(lock_seconds)
            .ok_or(PoolError::ArithmeticOverflow)?;
        if candidate_expiry > account.lock_expiry {
            account.lock_expiry = candidate_expiry;
        }
        let new_lock_expiry = account.lock_expiry;

        self.commit(id, pool, account);
        log::info!(
            "deposit {} amount={} lock={}s shares+{} expiry={}",
            id,
            amount,
            lock_seconds,
            shares_minted,
            new_lock_expiry
        );
        Ok(DepositOutcome {
            shares_minted,
            new_lock_expiry,
        })
    }

    /// Unstake `amount` of principal, burning shares proportionally.
    ///
    /// Before the lock expires the early-exit penalty is taken from the
    /// returned amount and routed to the configured sink. A full exit
    /// returns the account to `Uninitialized`; unclaimed rewards stay
    /// claimable.
    pub fn withdraw(
        &mut self,
        id: &str,
        amount: U256,
        now: u64,
    ) -> Result<WithdrawOutcome, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount);
        }
        let available = self
            .accounts
            .get(id)
            .map(|a| a.principal)
            .unwrap_or_default();
        if amount > available {
            return Err(PoolError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let (mut pool, mut account) = self.settled_copies(id, now)?;

        // Proportional burn keeps the boost ratio of the remainder intact.
        let shares_burned = mul_div(account.shares, amount, account.principal)?;
        let (amount_returned, penalty_charged) =
            split_withdrawal(amount, pool.penalty_bps, account.is_locked(now))?;

        account.principal = checked_sub(account.principal, amount)?;
        account.shares = checked_sub(account.shares, shares_burned)?;
        pool.total_shares = checked_sub(pool.total_shares, shares_burned)?;
        pool.total_principal = checked_sub(pool.total_principal, amount)?;
        if account.principal.is_zero() {
            account.lock_expiry = 0;
        }

        if !penalty_charged.is_zero() {
            pool.total_penalties_collected =
                checked_add(pool.total_penalties_collected, penalty_charged)?;
            if pool.penalty_sink == PenaltySink::Redistribute {
                // the withdrawer's remaining shares never receive their own penalty
                if pool.distribute_lump_sum(penalty_charged, account.shares)? {
                    account.reward_per_share_checkpoint = pool.acc_reward_per_share;
                } else {
                    log::debug!("no other shares to receive penalty {}; burned", penalty_charged);
                }
            }
        }

        self.commit(id, pool, account);
        log::info!(
            "withdraw {} amount={} returned={} penalty={} shares-{}",
            id,
            amount,
            amount_returned,
            penalty_charged,
            shares_burned
        );
        Ok(WithdrawOutcome {
            amount_returned,
            penalty_charged,
            shares_burned,
        })
    }

    /// Pay out everything pending. Never touches shares or principal.
    pub fn claim(&mut self, id: &str, now: u64) -> Result<ClaimOutcome, PoolError> {
        let (mut pool, mut account) = self.settled_copies(id, now)?;

        let amount_paid = account.pending_rewards;
        if amount_paid.is_zero() {
            return Err(PoolError::NoRewardsAvailable);
        }
        account.pending_rewards = U256::zero();
        account.total_claimed = checked_add(account.total_claimed, amount_paid)?;
        pool.total_rewards_claimed = checked_add(pool.total_rewards_claimed, amount_paid)?;

        self.commit(id, pool, account);
        log::info!("claim {} paid={}", id, amount_paid);
        Ok(ClaimOutcome { amount_paid })
    }

    /// What `claim` would pay if called at `now`. Read-only.
    ///
    /// Runs the exact settlement path of `claim` on copies, so the two
    /// cannot disagree. Unknown accounts preview to zero.
    pub fn preview_pending(&self, id: &str, now: u64) -> Result<U256, PoolError> {
        let (_, account) = self.settled_copies(id, now)?;
        Ok(account.pending_rewards)
    }

    /// Pool summary projected to `now`. Read-only.
    pub fn pool_stats(&self, now: u64) -> Result<PoolStats, PoolError> {
        let p = &self.pool;
        Ok(PoolStats {
            total_shares: p.total_shares,
            acc_reward_per_share: p.projected_acc_reward_per_share(now)?,
            reward_rate_per_second: p.reward_rate_per_second,
            max_lock_seconds: p.max_lock_seconds,
            penalty_bps: p.penalty_bps,
            boost_max_e18: p.boost_max_e18,
            penalty_sink: p.penalty_sink,
            last_update_time: p.last_update_time,
            total_principal: p.total_principal,
            total_rewards_claimed: p.total_rewards_claimed,
            total_penalties_collected: p.total_penalties_collected,
            account_count: self.accounts.len() as u64,
            active_accounts: self.accounts.values().filter(|a| a.is_active()).count() as u64,
        })
    }

    /// Change the emission rate. Everything up to `now` accrues at the
    /// old rate first.
    pub fn set_reward_rate(&mut self, rate: U256, now: u64) -> Result<(), PoolError> {
        let mut pool = self.pool.clone();
        pool.settle(now)?;
        let old = pool.reward_rate_per_second;
        pool.reward_rate_per_second = rate;
        self.pool = pool;
        log::info!("reward rate {} -> {} at t={}", old, rate, now);
        Ok(())
    }

    /// Check the ledger's structural invariants.
    pub fn verify_invariants(&self) -> Result<(), String> {
        let mut shares = U256::zero();
        let mut principal = U256::zero();
        for (id, a) in &self.accounts {
            if a.shares.is_zero() != a.principal.is_zero() {
                return Err(format!(
                    "{}: shares={} but principal={}",
                    id, a.shares, a.principal
                ));
            }
            if a.reward_per_share_checkpoint > self.pool.acc_reward_per_share {
                return Err(format!(
                    "{}: checkpoint {} ahead of index {}",
                    id, a.reward_per_share_checkpoint, self.pool.acc_reward_per_share
                ));
            }
            shares = shares
                .checked_add(a.shares)
                .ok_or_else(|| "share sum overflow".to_string())?;
            principal = principal
                .checked_add(a.principal)
                .ok_or_else(|| "principal sum overflow".to_string())?;
        }
        if shares != self.pool.total_shares {
            return Err(format!(
                "total_shares={} but accounts sum to {}",
                self.pool.total_shares, shares
            ));
        }
        if principal != self.pool.total_principal {
            return Err(format!(
                "total_principal={} but accounts sum to {}",
                self.pool.total_principal, principal
            ));
        }
        Ok(())
    }
}
