// ─────────────────────────────────────────────────────────────────
// Snapshot persistence + state root
// ─────────────────────────────────────────────────────────────────
// The persisted layout is exactly the pool record and the account
// records. The pool record already carries the pool parameters, so
// there is no separate config block that could drift from it.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::accumulator::PoolState;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::ledger::{Account, AccountId};
use crate::pool::PoolEngine;

/// Bumped whenever the persisted layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub version: u32,
    pub pool: PoolState,
    pub accounts: BTreeMap<AccountId, Account>,
}

impl PoolSnapshot {
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let snapshot: PoolSnapshot = serde_json::from_str(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )
            .into());
        }
        Ok(snapshot)
    }
}

/// SHA3-256 over the pool record and every account, in key order.
fn compute_state_root(pool: &PoolState, accounts: &BTreeMap<AccountId, Account>) -> String {
    let mut hasher = Sha3_256::new();
    let mut put = |x: &crate::fixed_point::U256| {
        for word in x.0.iter() {
            hasher.update(word.to_le_bytes());
        }
    };
    put(&pool.total_shares);
    put(&pool.acc_reward_per_share);
    put(&pool.reward_rate_per_second);
    put(&pool.boost_max_e18);
    put(&pool.total_principal);
    put(&pool.total_rewards_claimed);
    put(&pool.total_penalties_collected);
    hasher.update(pool.last_update_time.to_le_bytes());
    hasher.update(pool.max_lock_seconds.to_le_bytes());
    hasher.update(pool.penalty_bps.to_le_bytes());
    hasher.update([pool.penalty_sink as u8]);

    // BTreeMap iterates in sorted key order, so the root is deterministic
    for (id, a) in accounts {
        hasher.update((id.len() as u64).to_le_bytes());
        hasher.update(id.as_bytes());
        for x in [
            &a.principal,
            &a.shares,
            &a.reward_per_share_checkpoint,
            &a.pending_rewards,
            &a.total_claimed,
        ] {
            for word in x.0.iter() {
                hasher.update(word.to_le_bytes());
            }
        }
        hasher.update(a.lock_expiry.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

impl PoolEngine {
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            version: SNAPSHOT_VERSION,
            pool: self.pool.clone(),
            accounts: self.accounts.clone(),
        }
    }

    /// Rebuild an engine from persisted state. The pool parameters are
    /// validated and the ledger totals cross-checked before accepting it.
    pub fn from_snapshot(snapshot: PoolSnapshot) -> Result<Self, PoolError> {
        let p = &snapshot.pool;
        PoolConfig {
            reward_rate_per_second: p.reward_rate_per_second,
            max_lock_seconds: p.max_lock_seconds,
            boost_max_e18: p.boost_max_e18,
            penalty_bps: p.penalty_bps,
            penalty_sink: p.penalty_sink,
        }
        .validate()
        .map_err(PoolError::InvalidConfig)?;

        let engine = Self {
            pool: snapshot.pool,
            accounts: snapshot.accounts,
        };
        engine
            .verify_invariants()
            .map_err(|e| PoolError::InvalidConfig(format!("inconsistent snapshot: {}", e)))?;
        log::debug!(
            "restored pool: {} accounts, last_update={}",
            engine.accounts.len(),
            engine.pool.last_update_time
        );
        Ok(engine)
    }

    /// Hex-encoded SHA3-256 commitment to the full engine state.
    pub fn state_root(&self) -> String {
        compute_state_root(&self.pool, &self.accounts)
    }
}
