// ─────────────────────────────────────────────────────────────────
// Read-only projections for hosts: account view + reward diagnostics
// ─────────────────────────────────────────────────────────────────
// Nothing here is a second source of truth. Every number is derived
// from the same settle/settle_account path that claim() uses.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::fixed_point::{checked_sub, u256_dec, U256};
use crate::ledger::AccountStatus;
use crate::pool::PoolEngine;

/// Below this many seconds since the last settlement, a zero projection is
/// expected rather than suspicious.
pub const RECENT_UPDATE_WINDOW_SECS: u64 = 10;

/// Everything a wallet needs to render one position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub account_id: String,
    #[serde(with = "u256_dec")]
    pub principal: U256,
    #[serde(with = "u256_dec")]
    pub shares: U256,
    /// What claim() would pay right now
    #[serde(with = "u256_dec")]
    pub pending_rewards: U256,
    pub lock_expiry: u64,
    pub is_locked: bool,
    pub lock_remaining_secs: u64,
    pub status: AccountStatus,
    #[serde(with = "u256_dec")]
    pub total_claimed: U256,
}

/// Why an account's pending rewards look the way they do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    /// Something is claimable.
    HasRewards,
    /// No shares and nothing left to claim.
    NoStake,
    /// Stake exists but the pool was settled moments ago.
    RecentlyUpdated,
    /// Stake exists and time has passed, but the share is too small to
    /// survive flooring.
    RoundingToZero,
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Diagnosis::HasRewards => write!(f, "rewards available"),
            Diagnosis::NoStake => write!(f, "no active stake"),
            Diagnosis::RecentlyUpdated => {
                write!(f, "pool settled under {}s ago", RECENT_UPDATE_WINDOW_SECS)
            }
            Diagnosis::RoundingToZero => write!(f, "accrual rounds to zero at this stake size"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RewardDiagnostics {
    pub account_id: String,
    pub now: u64,
    pub last_update_time: u64,
    pub seconds_since_update: u64,
    #[serde(with = "u256_dec")]
    pub acc_reward_per_share: U256,
    #[serde(with = "u256_dec")]
    pub projected_acc_reward_per_share: U256,
    #[serde(with = "u256_dec")]
    pub account_checkpoint: U256,
    /// projected index minus the account's checkpoint
    #[serde(with = "u256_dec")]
    pub index_delta: U256,
    #[serde(with = "u256_dec")]
    pub shares: U256,
    #[serde(with = "u256_dec")]
    pub settled_pending: U256,
    #[serde(with = "u256_dec")]
    pub projected_pending: U256,
    #[serde(with = "u256_dec")]
    pub reward_per_share_per_second: U256,
    pub diagnosis: Diagnosis,
}

impl PoolEngine {
    /// Position summary at `now`. Unknown accounts render as empty.
    pub fn account_view(&self, id: &str, now: u64) -> Result<AccountView, PoolError> {
        let account = self.account(id).cloned().unwrap_or_default();
        let pending_rewards = self.preview_pending(id, now)?;
        Ok(AccountView {
            account_id: id.to_string(),
            principal: account.principal,
            shares: account.shares,
            pending_rewards,
            lock_expiry: account.lock_expiry,
            is_locked: account.is_locked(now),
            lock_remaining_secs: account.lock_remaining_secs(now),
            status: account.status(now),
            total_claimed: account.total_claimed,
        })
    }

    /// Break down where an account's pending rewards come from.
    pub fn diagnose(&self, id: &str, now: u64) -> Result<RewardDiagnostics, PoolError> {
        let pool = self.pool();
        let account = self.account(id).cloned().unwrap_or_default();

        let seconds_since_update = pool.elapsed_since_update(now)?;
        let projected = pool.projected_acc_reward_per_share(now)?;
        let index_delta = checked_sub(projected, account.reward_per_share_checkpoint)?;
        let projected_pending = self.preview_pending(id, now)?;

        let diagnosis = if !projected_pending.is_zero() {
            Diagnosis::HasRewards
        } else if account.shares.is_zero() {
            Diagnosis::NoStake
        } else if seconds_since_update < RECENT_UPDATE_WINDOW_SECS {
            Diagnosis::RecentlyUpdated
        } else {
            Diagnosis::RoundingToZero
        };

        log::debug!(
            "diagnose {} at t={}: delta={} pending={} -> {:?}",
            id,
            now,
            index_delta,
            projected_pending,
            diagnosis
        );

        Ok(RewardDiagnostics {
            account_id: id.to_string(),
            now,
            last_update_time: pool.last_update_time,
            seconds_since_update,
            acc_reward_per_share: pool.acc_reward_per_share,
            projected_acc_reward_per_share: projected,
            account_checkpoint: account.reward_per_share_checkpoint,
            index_delta,
            shares: account.shares,
            settled_pending: account.pending_rewards,
            projected_pending,
            reward_per_share_per_second: pool.reward_per_share_per_second()?,
            diagnosis,
        })
    }
}
