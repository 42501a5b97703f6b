// ─────────────────────────────────────────────────────────────────
// Lock Boost - linear reward multiplier for lock commitments
// ─────────────────────────────────────────────────────────────────
// lock = 0                → 1.0× (WAD)
// lock = max_lock_seconds → boost_max_e18
// in between              → straight line, floored
//
// Pure functions of their arguments: shares must be reproducible
// from (principal, lock_seconds) by anyone auditing the pool.
// ─────────────────────────────────────────────────────────────────

use crate::error::PoolError;
use crate::fixed_point::{checked_add, mul_div, U256, WAD};

/// Multiplier (WAD-scaled) earned by locking for `lock_seconds`.
///
/// Locks longer than `max_lock_seconds` are rejected rather than clamped,
/// so a caller can never claim more boost than the pool offers.
pub fn boost_multiplier(
    lock_seconds: u64,
    max_lock_seconds: u32,
    boost_max_e18: U256,
) -> Result<U256, PoolError> {
    if lock_seconds > max_lock_seconds as u64 {
        return Err(PoolError::InvalidLockDuration {
            requested: lock_seconds,
            max: max_lock_seconds,
        });
    }
    if max_lock_seconds == 0 || lock_seconds == 0 {
        return Ok(WAD);
    }
    // A misconfigured boost below 1.0× degrades to no boost.
    let extra = boost_max_e18.saturating_sub(WAD);
    let scaled = mul_div(
        extra,
        U256::from(lock_seconds),
        U256::from(max_lock_seconds),
    )?;
    checked_add(WAD, scaled)
}

/// Shares minted for depositing `principal` with a `lock_seconds` commitment.
pub fn shares_for(
    principal: U256,
    lock_seconds: u64,
    max_lock_seconds: u32,
    boost_max_e18: U256,
) -> Result<U256, PoolError> {
    let boost = boost_multiplier(lock_seconds, max_lock_seconds, boost_max_e18)?;
    mul_div(principal, boost, WAD)
}
