//! Fuzz target: random operation sequences against PoolEngine
//!
//! Drives deposits, withdrawals, claims, rate changes and clock moves
//! (including backwards) with arbitrary parameters. Verifies the engine
//! never panics, rejected calls change nothing, and the ledger
//! invariants hold after every step.
//!
//! Run: cargo +nightly fuzz run fuzz_pool_ops

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cyp_core::{PenaltySink, PoolConfig, PoolEngine, U256, WAD};

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Deposit { who: u8, amount: u128, lock: u32 },
    Withdraw { who: u8, amount: u128 },
    Claim { who: u8 },
    SetRate { rate: u64 },
    Advance { secs: u16 },
    Rewind { secs: u8 },
}

#[derive(Arbitrary, Debug)]
struct FuzzPoolInput {
    rate: u64,
    max_lock: u16,
    boost_extra_pct: u8,
    penalty_bps: u16,
    redistribute: bool,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzPoolInput| {
    let config = PoolConfig {
        reward_rate_per_second: U256::from(input.rate),
        max_lock_seconds: input.max_lock as u32,
        boost_max_e18: WAD + WAD * U256::from(input.boost_extra_pct) / U256::from(100u64),
        penalty_bps: input.penalty_bps % 10_001,
        penalty_sink: if input.redistribute {
            PenaltySink::Redistribute
        } else {
            PenaltySink::Burn
        },
    };
    let Ok(mut engine) = PoolEngine::new(config, 1_000) else {
        return;
    };
    let mut now = 1_000u64;

    // Cap sequence length (prevent timeouts on huge vectors)
    for op in input.ops.iter().take(256) {
        let before = engine.clone();
        let result = match *op {
            FuzzOp::Deposit { who, amount, lock } => engine
                .deposit(&format!("a{}", who % 8), U256::from(amount), lock as u64, now)
                .map(|_| ()),
            FuzzOp::Withdraw { who, amount } => engine
                .withdraw(&format!("a{}", who % 8), U256::from(amount), now)
                .map(|_| ()),
            FuzzOp::Claim { who } => engine.claim(&format!("a{}", who % 8), now).map(|_| ()),
            FuzzOp::SetRate { rate } => engine.set_reward_rate(U256::from(rate), now),
            FuzzOp::Advance { secs } => {
                now += secs as u64;
                Ok(())
            }
            FuzzOp::Rewind { secs } => {
                now = now.saturating_sub(secs as u64);
                Ok(())
            }
        };
        if result.is_err() {
            assert_eq!(engine, before, "rejected {:?} mutated state", op);
        }
        assert!(engine.verify_invariants().is_ok());
    }
});
