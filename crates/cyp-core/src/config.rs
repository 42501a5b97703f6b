use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::fixed_point::{u256_dec, U256, WAD};
use crate::penalty::{PenaltySink, BPS_DENOMINATOR};

/// Default reward rate: 0.1 token per second
pub const DEFAULT_REWARD_RATE_PER_SECOND: U256 = U256([100_000_000_000_000_000, 0, 0, 0]);

/// Default maximum lock: 30 days in seconds
pub const DEFAULT_MAX_LOCK_SECONDS: u32 = 30 * 24 * 60 * 60; // 2,592,000

/// Default multiplier at max lock: 2.0×
pub const DEFAULT_BOOST_MAX_E18: U256 = U256([2_000_000_000_000_000_000, 0, 0, 0]);

/// Default early-exit penalty: 5% (500 basis points)
pub const DEFAULT_PENALTY_BPS: u16 = 500;

/// Pool parameters fixed at construction (the reward rate can later be
/// changed through `PoolEngine::set_reward_rate`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolConfig {
    #[serde(with = "u256_dec")]
    pub reward_rate_per_second: U256,
    pub max_lock_seconds: u32,
    #[serde(with = "u256_dec")]
    pub boost_max_e18: U256,
    pub penalty_bps: u16,
    #[serde(default)]
    pub penalty_sink: PenaltySink,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            reward_rate_per_second: DEFAULT_REWARD_RATE_PER_SECOND,
            max_lock_seconds: DEFAULT_MAX_LOCK_SECONDS,
            boost_max_e18: DEFAULT_BOOST_MAX_E18,
            penalty_bps: DEFAULT_PENALTY_BPS,
            penalty_sink: PenaltySink::Burn,
        }
    }
}

impl PoolConfig {
    /// Load pool config from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: PoolConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load pool config from environment variables.
    /// Unset variables fall back to the defaults.
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        let reward_rate_per_second = match std::env::var("CYP_REWARD_RATE") {
            Ok(v) => U256::from_dec_str(v.trim())
                .map_err(|e| format!("CYP_REWARD_RATE: {:?}", e))?,
            Err(_) => defaults.reward_rate_per_second,
        };

        let max_lock_seconds: u32 = match std::env::var("CYP_MAX_LOCK") {
            Ok(v) => v.trim().parse()?,
            Err(_) => defaults.max_lock_seconds,
        };

        let boost_max_e18 = match std::env::var("CYP_BOOST_MAX_E18") {
            Ok(v) => U256::from_dec_str(v.trim())
                .map_err(|e| format!("CYP_BOOST_MAX_E18: {:?}", e))?,
            Err(_) => defaults.boost_max_e18,
        };

        let penalty_bps: u16 = match std::env::var("CYP_PENALTY_BPS") {
            Ok(v) => v.trim().parse()?,
            Err(_) => defaults.penalty_bps,
        };

        let penalty_sink: PenaltySink = match std::env::var("CYP_PENALTY_SINK") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.penalty_sink,
        };

        let config = Self {
            reward_rate_per_second,
            max_lock_seconds,
            boost_max_e18,
            penalty_bps,
            penalty_sink,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save pool config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.penalty_bps as u64 > BPS_DENOMINATOR {
            return Err(format!(
                "penalty_bps must be <= {} (got {})",
                BPS_DENOMINATOR, self.penalty_bps
            ));
        }

        if self.boost_max_e18 < WAD {
            return Err(format!(
                "boost_max_e18 must be >= 1e18 (got {})",
                self.boost_max_e18
            ));
        }

        Ok(())
    }
}
