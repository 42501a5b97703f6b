// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK SUITE - cyp-core
//
// Every pool operation is O(1) in the number of stakers; these numbers
// should stay flat as the account count grows. state_root is the only
// O(n) path.
// Run: cargo bench -p cyp-core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cyp_core::{mul_div, tokens, PoolConfig, PoolEngine, U256, WAD};

fn populated(num_accounts: u64) -> PoolEngine {
    let mut e = PoolEngine::new(PoolConfig::default(), 0).unwrap();
    for i in 0..num_accounts {
        e.deposit(&format!("staker{:08}", i), tokens(i + 1), i % 86_400, i)
            .unwrap();
    }
    e
}

// ─────────────────────────────────────────────────────────────────
// FIXED-POINT MATH
// ─────────────────────────────────────────────────────────────────

fn bench_mul_div(c: &mut Criterion) {
    let a = U256::MAX / U256::from(3);
    let b = WAD * U256::from(7);
    let d = WAD * U256::from(9);
    c.bench_function("math/mul_div_wide", |bench| {
        bench.iter(|| black_box(mul_div(black_box(a), black_box(b), black_box(d))))
    });
}

// ─────────────────────────────────────────────────────────────────
// POOL OPERATIONS (must not scale with account count)
// ─────────────────────────────────────────────────────────────────

fn bench_deposit(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/deposit");
    for num_accounts in [10u64, 1_000, 10_000] {
        let base = populated(num_accounts);
        group.bench_with_input(
            BenchmarkId::new("accounts", num_accounts),
            &num_accounts,
            |b, &n| {
                let mut e = base.clone();
                let mut now = n;
                b.iter(|| {
                    now += 1;
                    black_box(e.deposit("bench", tokens(1), 3_600, now))
                })
            },
        );
    }
    group.finish();
}

fn bench_preview_pending(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/preview_pending");
    for num_accounts in [10u64, 1_000, 10_000] {
        let e = populated(num_accounts);
        group.bench_with_input(
            BenchmarkId::new("accounts", num_accounts),
            &num_accounts,
            |b, &n| b.iter(|| black_box(e.preview_pending("staker00000000", n + 3_600))),
        );
    }
    group.finish();
}

fn bench_settle(c: &mut Criterion) {
    let e = populated(100);
    c.bench_function("pool/settle", |b| {
        let mut e = e.clone();
        let mut now = 100u64;
        b.iter(|| {
            now += 12;
            black_box(e.settle(now))
        })
    });
}

// ─────────────────────────────────────────────────────────────────
// STATE ROOT
// ─────────────────────────────────────────────────────────────────

fn bench_state_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/state_root");
    for num_accounts in [100u64, 1_000, 10_000] {
        let e = populated(num_accounts);
        group.bench_with_input(
            BenchmarkId::new("accounts", num_accounts),
            &num_accounts,
            |b, _| b.iter(|| black_box(e.state_root())),
        );
    }
    group.finish();
}

// ─────────────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_mul_div,
    bench_deposit,
    bench_preview_pending,
    bench_settle,
    bench_state_root,
);
criterion_main!(benches);
