// ─────────────────────────────────────────────────────────────────
// Stake Ledger - per-account records and settlement
// ─────────────────────────────────────────────────────────────────
// An account is checkpointed against the global reward index every
// time it is touched. The ordering rule is absolute: settle first,
// mutate shares afterwards. Settling after a share change would price
// the elapsed interval at the wrong weight.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::fixed_point::{checked_add, checked_sub, mul_div, u256_dec, U256, WAD};

/// Identifier the host uses for a staker (wallet address, user id, ...)
pub type AccountId = String;

/// One staker's position. Created on first deposit, never deleted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Raw deposited token amount
    #[serde(with = "u256_dec")]
    pub principal: U256,
    /// Boosted stake weight
    #[serde(with = "u256_dec")]
    pub shares: U256,
    /// Global index value at this account's last settlement
    #[serde(with = "u256_dec")]
    pub reward_per_share_checkpoint: U256,
    /// Settled but unclaimed rewards
    #[serde(with = "u256_dec")]
    pub pending_rewards: U256,
    /// Withdrawals before this second pay the early-exit penalty
    pub lock_expiry: u64,
    /// Lifetime rewards paid out
    #[serde(with = "u256_dec", default)]
    pub total_claimed: U256,
}

/// Where an account sits in its lifecycle at a given instant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Uninitialized,
    Locked,
    Unlocked,
}

impl Account {
    /// True while the account holds stake (`shares > 0`, equivalently `principal > 0`).
    pub fn is_active(&self) -> bool {
        !self.shares.is_zero()
    }

    pub fn is_locked(&self, now: u64) -> bool {
        now < self.lock_expiry
    }

    pub fn status(&self, now: u64) -> AccountStatus {
        if !self.is_active() {
            AccountStatus::Uninitialized
        } else if self.is_locked(now) {
            AccountStatus::Locked
        } else {
            AccountStatus::Unlocked
        }
    }

    /// Seconds until the lock expires (0 once unlocked).
    pub fn lock_remaining_secs(&self, now: u64) -> u64 {
        self.lock_expiry.saturating_sub(now)
    }

    /// Reward accrued since the checkpoint, priced at the current share weight.
    pub fn accrued_since_checkpoint(&self, acc_reward_per_share: U256) -> Result<U256, PoolError> {
        let delta = checked_sub(acc_reward_per_share, self.reward_per_share_checkpoint)?;
        mul_div(self.shares, delta, WAD)
    }
}

/// Fold everything accrued since the checkpoint into `pending_rewards` and
/// move the checkpoint up to `acc_reward_per_share`.
///
/// Must run before `account.shares` changes.
pub fn settle_account(account: &mut Account, acc_reward_per_share: U256) -> Result<U256, PoolError> {
    let pending_delta = account.accrued_since_checkpoint(acc_reward_per_share)?;
    account.pending_rewards = checked_add(account.pending_rewards, pending_delta)?;
    account.reward_per_share_checkpoint = acc_reward_per_share;
    Ok(pending_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(per_share_tokens: u64) -> U256 {
        // index is WAD-scaled reward per share
        U256::from(per_share_tokens) * WAD
    }

    #[test]
    fn test_settle_accrues_delta() {
        let mut a = Account {
            principal: U256::from(100),
            shares: U256::from(100),
            ..Default::default()
        };
        let delta = settle_account(&mut a, index(3)).unwrap();
        assert_eq!(delta, U256::from(300));
        assert_eq!(a.pending_rewards, U256::from(300));
        assert_eq!(a.reward_per_share_checkpoint, index(3));
    }

    #[test]
    fn test_settle_twice_same_index_is_noop() {
        let mut a = Account {
            principal: U256::from(100),
            shares: U256::from(100),
            ..Default::default()
        };
        settle_account(&mut a, index(2)).unwrap();
        let before = a.clone();
        let delta = settle_account(&mut a, index(2)).unwrap();
        assert!(delta.is_zero());
        assert_eq!(a, before);
    }

    #[test]
    fn test_settle_new_account_only_checkpoints() {
        let mut a = Account::default();
        settle_account(&mut a, index(9)).unwrap();
        assert!(a.pending_rewards.is_zero());
        assert_eq!(a.reward_per_share_checkpoint, index(9));
    }

    #[test]
    fn test_checkpoint_ahead_of_index_rejected() {
        let mut a = Account {
            shares: U256::from(1),
            principal: U256::from(1),
            reward_per_share_checkpoint: index(5),
            ..Default::default()
        };
        assert_eq!(
            settle_account(&mut a, index(4)),
            Err(PoolError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_status_transitions() {
        let mut a = Account::default();
        assert_eq!(a.status(0), AccountStatus::Uninitialized);
        a.principal = U256::from(5);
        a.shares = U256::from(5);
        a.lock_expiry = 100;
        assert_eq!(a.status(99), AccountStatus::Locked);
        assert_eq!(a.status(100), AccountStatus::Unlocked);
        assert_eq!(a.lock_remaining_secs(40), 60);
        assert_eq!(a.lock_remaining_secs(400), 0);
    }
}
