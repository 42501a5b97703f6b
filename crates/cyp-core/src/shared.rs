// ─────────────────────────────────────────────────────────────────
// SharedPool - thread-safe handle for multi-threaded hosts
// ─────────────────────────────────────────────────────────────────
// Mutations take the write lock, so they are serialized. Previews
// take the read lock and may run together; each sees one consistent
// (pool, account) pair.
// ─────────────────────────────────────────────────────────────────

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::diagnostics::{AccountView, RewardDiagnostics};
use crate::error::PoolError;
use crate::fixed_point::U256;
use crate::pool::{ClaimOutcome, DepositOutcome, PoolEngine, PoolStats, WithdrawOutcome};
use crate::snapshot::PoolSnapshot;

/// Recover from poisoned lock instead of panicking
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Clone)]
pub struct SharedPool {
    inner: Arc<RwLock<PoolEngine>>,
}

impl SharedPool {
    pub fn new(engine: PoolEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn deposit(
        &self,
        id: &str,
        amount: U256,
        lock_seconds: u64,
        now: u64,
    ) -> Result<DepositOutcome, PoolError> {
        write_lock(&self.inner).deposit(id, amount, lock_seconds, now)
    }

    pub fn withdraw(&self, id: &str, amount: U256, now: u64) -> Result<WithdrawOutcome, PoolError> {
        write_lock(&self.inner).withdraw(id, amount, now)
    }

    pub fn claim(&self, id: &str, now: u64) -> Result<ClaimOutcome, PoolError> {
        write_lock(&self.inner).claim(id, now)
    }

    pub fn set_reward_rate(&self, rate: U256, now: u64) -> Result<(), PoolError> {
        write_lock(&self.inner).set_reward_rate(rate, now)
    }

    pub fn preview_pending(&self, id: &str, now: u64) -> Result<U256, PoolError> {
        read_lock(&self.inner).preview_pending(id, now)
    }

    pub fn pool_stats(&self, now: u64) -> Result<PoolStats, PoolError> {
        read_lock(&self.inner).pool_stats(now)
    }

    pub fn account_view(&self, id: &str, now: u64) -> Result<AccountView, PoolError> {
        read_lock(&self.inner).account_view(id, now)
    }

    pub fn diagnose(&self, id: &str, now: u64) -> Result<RewardDiagnostics, PoolError> {
        read_lock(&self.inner).diagnose(id, now)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        read_lock(&self.inner).snapshot()
    }

    pub fn state_root(&self) -> String {
        read_lock(&self.inner).state_root()
    }

    /// Run `f` against the engine under the read lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&PoolEngine) -> R) -> R {
        f(&read_lock(&self.inner))
    }
}
