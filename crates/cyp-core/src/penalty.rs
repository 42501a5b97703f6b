use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::fixed_point::{checked_sub, mul_div, U256};

/// Basis points denominator (100% = 10000 basis points)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Where an early-exit penalty goes once it is taken from a withdrawal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySink {
    /// Removed from circulation; only the running total is kept.
    #[default]
    Burn,
    /// Paid to the remaining stakers through the reward index.
    /// Assumes the staking token and the reward token are the same asset.
    Redistribute,
}

impl std::str::FromStr for PenaltySink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "burn" => Ok(PenaltySink::Burn),
            "redistribute" => Ok(PenaltySink::Redistribute),
            other => Err(format!(
                "unknown penalty sink '{}' (expected burn or redistribute)",
                other
            )),
        }
    }
}

impl std::fmt::Display for PenaltySink {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PenaltySink::Burn => write!(f, "burn"),
            PenaltySink::Redistribute => write!(f, "redistribute"),
        }
    }
}

/// `amount * penalty_bps / 10000`, floored.
pub fn early_exit_penalty(amount: U256, penalty_bps: u16) -> Result<U256, PoolError> {
    mul_div(
        amount,
        U256::from(penalty_bps),
        U256::from(BPS_DENOMINATOR),
    )
}

/// Split a withdrawal into (amount returned to the caller, penalty).
/// No penalty once the lock has expired.
pub fn split_withdrawal(
    amount: U256,
    penalty_bps: u16,
    locked: bool,
) -> Result<(U256, U256), PoolError> {
    if !locked || penalty_bps == 0 {
        return Ok((amount, U256::zero()));
    }
    let penalty = early_exit_penalty(amount, penalty_bps)?;
    Ok((checked_sub(amount, penalty)?, penalty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_five_percent() {
        let p = early_exit_penalty(U256::from(1_000), 500).unwrap();
        assert_eq!(p, U256::from(50));
    }

    #[test]
    fn test_penalty_floors() {
        // 5% of 19 = 0.95 → 0
        assert_eq!(early_exit_penalty(U256::from(19), 500).unwrap(), U256::zero());
    }

    #[test]
    fn test_full_penalty() {
        let (returned, penalty) = split_withdrawal(U256::from(77), 10_000, true).unwrap();
        assert_eq!(returned, U256::zero());
        assert_eq!(penalty, U256::from(77));
    }

    #[test]
    fn test_unlocked_no_penalty() {
        let (returned, penalty) = split_withdrawal(U256::from(1_000), 500, false).unwrap();
        assert_eq!(returned, U256::from(1_000));
        assert!(penalty.is_zero());
    }

    #[test]
    fn test_sink_parsing() {
        assert_eq!("burn".parse::<PenaltySink>().unwrap(), PenaltySink::Burn);
        assert_eq!(
            " Redistribute ".parse::<PenaltySink>().unwrap(),
            PenaltySink::Redistribute
        );
        assert!("treasury".parse::<PenaltySink>().is_err());
        assert_eq!(PenaltySink::default(), PenaltySink::Burn);
    }
}
