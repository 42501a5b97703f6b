// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COMMUNITY YIELD POOL (CYP) - CORE ENGINE
//
// Time-weighted staking reward accrual: a lazily settled global reward
// index, per-account checkpoints, lock-duration boost and early-exit
// penalty. All arithmetic is 256-bit fixed point (1e18 = 1.0), floored.
// The engine never reads a clock and never moves tokens: the host passes
// `now` on every call and executes the transfers the outcomes authorize.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod accumulator;
pub mod boost;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fixed_point;
pub mod ledger;
pub mod penalty;
pub mod pool;
pub mod shared;
pub mod snapshot;

pub use accumulator::PoolState;
pub use boost::{boost_multiplier, shares_for};
pub use config::PoolConfig;
pub use diagnostics::{AccountView, Diagnosis, RewardDiagnostics};
pub use error::PoolError;
pub use fixed_point::{format_units, mul_div, parse_units, U256, WAD, WAD_DECIMALS};
pub use ledger::{Account, AccountId, AccountStatus};
pub use penalty::{early_exit_penalty, PenaltySink, BPS_DENOMINATOR};
pub use pool::{ClaimOutcome, DepositOutcome, PoolEngine, PoolStats, WithdrawOutcome};
pub use shared::SharedPool;
pub use snapshot::{PoolSnapshot, SNAPSHOT_VERSION};

/// Token decimals assumed by hosts when rendering amounts (18, like WAD)
pub const TOKEN_DECIMALS: usize = WAD_DECIMALS;

/// Whole tokens to raw 18-decimal units.
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * WAD
}
