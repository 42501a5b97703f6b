use crate::fixed_point::U256;

/// Every way a pool operation can be rejected.
///
/// A rejected call leaves the pool and all accounts exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Zero amount supplied to deposit or withdraw
    InvalidAmount,
    /// Requested lock is longer than the configured maximum
    InvalidLockDuration { requested: u64, max: u32 },
    /// Withdrawal larger than the account's principal
    InsufficientBalance { requested: U256, available: U256 },
    /// Claim with nothing pending (non-fatal, nothing changed)
    NoRewardsAvailable,
    /// A fixed-point result does not fit in 256 bits
    ArithmeticOverflow,
    /// Host supplied a timestamp earlier than the last settlement.
    /// Integration bug, not user-recoverable.
    ClockRegression { now: u64, last_update: u64 },
    /// Pool configuration rejected at construction or load
    InvalidConfig(String),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PoolError::InvalidAmount => write!(f, "Amount must be greater than zero"),
            PoolError::InvalidLockDuration { requested, max } => write!(
                f,
                "Lock duration {}s exceeds the maximum of {}s",
                requested, max
            ),
            PoolError::InsufficientBalance {
                requested,
                available,
            } => write!(
                f,
                "Insufficient staked balance: requested {}, available {}",
                requested, available
            ),
            PoolError::NoRewardsAvailable => write!(f, "No rewards available to claim"),
            PoolError::ArithmeticOverflow => {
                write!(f, "Arithmetic overflow in fixed-point calculation")
            }
            PoolError::ClockRegression { now, last_update } => write!(
                f,
                "Clock regression: now={} is earlier than last update {}",
                now, last_update
            ),
            PoolError::InvalidConfig(msg) => write!(f, "Invalid pool configuration: {}", msg),
        }
    }
}

impl std::error::Error for PoolError {}
