//! Fuzz target: snapshot decoding robustness
//!
//! Feeds arbitrary bytes through the snapshot JSON decoder and
//! PoolEngine::from_snapshot(). Anything accepted must satisfy the ledger
//! invariants and answer queries without panicking.
//!
//! Run: cargo +nightly fuzz run fuzz_snapshot_deserialize

#![no_main]
use cyp_core::{PoolEngine, PoolSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = serde_json::from_slice::<PoolSnapshot>(data) else {
        return;
    };
    let Ok(engine) = PoolEngine::from_snapshot(snapshot) else {
        return;
    };
    assert!(engine.verify_invariants().is_ok());

    let now = engine.pool().last_update_time;
    let _ = engine.pool_stats(now);
    let _ = engine.state_root();
    let ids: Vec<String> = engine.accounts().map(|(id, _)| id.clone()).take(8).collect();
    for id in ids {
        let _ = engine.preview_pending(&id, now);
        let _ = engine.diagnose(&id, now.saturating_add(60));
    }
});
