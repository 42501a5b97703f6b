// ─────────────────────────────────────────────────────────────────
// Reward Accumulator - lazily settled global reward index
// ─────────────────────────────────────────────────────────────────
// Rate:    reward_rate_per_second (WAD-scaled tokens/sec), constant
//          between explicit rate changes
// Index:   acc_reward_per_share += rate × elapsed × 1e18 / total_shares
// Empty:   while total_shares == 0 nothing accrues; the drip for that
//          interval is lost, not banked for the next depositor
// Lumps:   a redistributed penalty bumps the index outside time-based
//          accrual, possibly at an already settled timestamp
//
// settle() is the single authoritative derivation of the index.
// projected_acc_reward_per_share() runs the same computation without
// committing it; previews and diagnostics must go through it.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::fixed_point::{checked_add, checked_mul, checked_sub, mul_div, u256_dec, U256, WAD};
use crate::penalty::PenaltySink;

/// Global pool record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    /// Sum of all accounts' shares
    #[serde(with = "u256_dec")]
    pub total_shares: U256,
    /// Cumulative reward per share since genesis (WAD-scaled)
    #[serde(with = "u256_dec")]
    pub acc_reward_per_share: U256,
    /// Second of the last settlement
    pub last_update_time: u64,
    /// Reward minted per second (WAD-scaled tokens)
    #[serde(with = "u256_dec")]
    pub reward_rate_per_second: U256,
    pub max_lock_seconds: u32,
    /// Multiplier at max lock (WAD-scaled)
    #[serde(with = "u256_dec")]
    pub boost_max_e18: U256,
    /// Early-exit penalty, 0..=10000
    pub penalty_bps: u16,
    #[serde(default)]
    pub penalty_sink: PenaltySink,
    /// Sum of all accounts' principal
    #[serde(with = "u256_dec", default)]
    pub total_principal: U256,
    #[serde(with = "u256_dec", default)]
    pub total_rewards_claimed: U256,
    #[serde(with = "u256_dec", default)]
    pub total_penalties_collected: U256,
}

impl PoolState {
    /// Fresh pool with no stake, indexed from `genesis_time`.
    pub fn new(config: &PoolConfig, genesis_time: u64) -> Self {
        Self {
            total_shares: U256::zero(),
            acc_reward_per_share: U256::zero(),
            last_update_time: genesis_time,
            reward_rate_per_second: config.reward_rate_per_second,
            max_lock_seconds: config.max_lock_seconds,
            boost_max_e18: config.boost_max_e18,
            penalty_bps: config.penalty_bps,
            penalty_sink: config.penalty_sink,
            total_principal: U256::zero(),
            total_rewards_claimed: U256::zero(),
            total_penalties_collected: U256::zero(),
        }
    }

    /// Seconds since the last settlement, or `ClockRegression`.
    pub fn elapsed_since_update(&self, now: u64) -> Result<u64, PoolError> {
        now.checked_sub(self.last_update_time)
            .ok_or(PoolError::ClockRegression {
                now,
                last_update: self.last_update_time,
            })
    }

    /// Index increase owed for the interval `[last_update_time, now]`.
    fn pending_index_delta(&self, now: u64) -> Result<U256, PoolError> {
        let elapsed = self.elapsed_since_update(now)?;
        if self.total_shares.is_zero() || elapsed == 0 {
            return Ok(U256::zero());
        }
        let reward_minted = checked_mul(self.reward_rate_per_second, U256::from(elapsed))?;
        mul_div(reward_minted, WAD, self.total_shares)
    }

    /// Index value if the pool were settled at `now`. Read-only.
    pub fn projected_acc_reward_per_share(&self, now: u64) -> Result<U256, PoolError> {
        checked_add(self.acc_reward_per_share, self.pending_index_delta(now)?)
    }

    /// Advance the index to `now`. Idempotent for a repeated `now`.
    /// Returns the index increase.
    pub fn settle(&mut self, now: u64) -> Result<U256, PoolError> {
        let delta = match self.pending_index_delta(now) {
            Ok(d) => d,
            Err(e) => {
                if let PoolError::ClockRegression { .. } = e {
                    log::warn!(
                        "settle rejected: now={} < last_update={}",
                        now,
                        self.last_update_time
                    );
                }
                return Err(e);
            }
        };
        self.acc_reward_per_share = checked_add(self.acc_reward_per_share, delta)?;
        if !delta.is_zero() {
            log::trace!(
                "settled {}s: index +{} -> {}",
                now - self.last_update_time,
                delta,
                self.acc_reward_per_share
            );
        }
        self.last_update_time = now;
        Ok(delta)
    }

    /// Spread a lump sum over every share except `excluded_shares`
    /// (penalty redistribution). Returns false, leaving the index
    /// untouched, if no other shares exist.
    ///
    /// This is the one place the index moves without time passing: it may
    /// bump the index at a timestamp `settle` has already processed. The
    /// caller must raise the excluded holder's checkpoint to the new index
    /// so those shares do not collect the sum.
    pub fn distribute_lump_sum(
        &mut self,
        amount: U256,
        excluded_shares: U256,
    ) -> Result<bool, PoolError> {
        let receivers = checked_sub(self.total_shares, excluded_shares)?;
        if receivers.is_zero() {
            return Ok(false);
        }
        let delta = mul_div(amount, WAD, receivers)?;
        self.acc_reward_per_share = checked_add(self.acc_reward_per_share, delta)?;
        Ok(true)
    }

    /// Reward issued per share per second at the current rate (WAD-scaled).
    /// Zero for an empty pool.
    pub fn reward_per_share_per_second(&self) -> Result<U256, PoolError> {
        if self.total_shares.is_zero() {
            return Ok(U256::zero());
        }
        mul_div(self.reward_rate_per_second, WAD, self.total_shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_token_per_sec() -> PoolState {
        let config = PoolConfig {
            reward_rate_per_second: WAD,
            ..PoolConfig::default()
        };
        PoolState::new(&config, 0)
    }

    #[test]
    fn test_empty_pool_drip_is_lost() {
        let mut pool = one_token_per_sec();
        let delta = pool.settle(100).unwrap();
        assert!(delta.is_zero());
        assert!(pool.acc_reward_per_share.is_zero());
        assert_eq!(pool.last_update_time, 100);
    }

    #[test]
    fn test_settle_sole_shareholder() {
        let mut pool = one_token_per_sec();
        pool.total_shares = U256::from(100);
        pool.settle(10).unwrap();
        // 10 tokens over 100 shares = 0.1 token per share → 1e17 * 1e18
        assert_eq!(
            pool.acc_reward_per_share,
            U256::from(100_000_000_000_000_000u64) * WAD
        );
    }

    #[test]
    fn test_settle_idempotent_same_now() {
        let mut pool = one_token_per_sec();
        pool.total_shares = U256::from(400);
        pool.settle(10).unwrap();
        let snapshot = pool.clone();
        let delta = pool.settle(10).unwrap();
        assert!(delta.is_zero());
        assert_eq!(pool, snapshot);
    }

    #[test]
    fn test_clock_regression() {
        let mut pool = one_token_per_sec();
        pool.settle(50).unwrap();
        let r = pool.settle(49);
        assert_eq!(
            r,
            Err(PoolError::ClockRegression {
                now: 49,
                last_update: 50
            })
        );
        assert_eq!(pool.last_update_time, 50);
    }

    #[test]
    fn test_projection_matches_settle() {
        let mut pool = one_token_per_sec();
        pool.total_shares = U256::from(333);
        pool.settle(7).unwrap();
        let projected = pool.projected_acc_reward_per_share(1_000).unwrap();
        pool.settle(1_000).unwrap();
        assert_eq!(projected, pool.acc_reward_per_share);
    }

    #[test]
    fn test_lump_sum_distribution() {
        let mut pool = one_token_per_sec();
        assert!(!pool.distribute_lump_sum(U256::from(50), U256::zero()).unwrap());
        pool.total_shares = U256::from(100);
        assert!(pool.distribute_lump_sum(U256::from(50), U256::zero()).unwrap());
        assert_eq!(pool.acc_reward_per_share, mul_div(U256::from(50), WAD, U256::from(100)).unwrap());
    }

    #[test]
    fn test_lump_sum_skips_excluded_shares() {
        let mut pool = one_token_per_sec();
        pool.total_shares = U256::from(100);
        // only the excluded holder is left: nothing moves
        assert!(!pool.distribute_lump_sum(U256::from(50), U256::from(100)).unwrap());
        assert!(pool.acc_reward_per_share.is_zero());

        assert!(pool.distribute_lump_sum(U256::from(50), U256::from(75)).unwrap());
        assert_eq!(pool.acc_reward_per_share, mul_div(U256::from(50), WAD, U256::from(25)).unwrap());
        assert_eq!(
            pool.distribute_lump_sum(U256::one(), U256::from(101)),
            Err(PoolError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_reward_rate_overflow_detected() {
        let mut pool = one_token_per_sec();
        pool.reward_rate_per_second = U256::MAX;
        pool.total_shares = U256::one();
        assert_eq!(pool.settle(2), Err(PoolError::ArithmeticOverflow));
        assert_eq!(pool.last_update_time, 0);
    }
}
