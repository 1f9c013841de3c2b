use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ownership_engine::engine::compress::compress;
use ownership_engine::engine::densify::{densify, DensifiedLedger};
use ownership_engine::engine::resolve::resolve;
use ownership_engine::engine::validate::{validate, ValidationMode};
use ownership_engine::simulation::generator::{generate_random_ledger, LedgerConfig};

fn prepared_ledger(account_count: usize, snapshot_count: usize) -> DensifiedLedger {
    let config = LedgerConfig {
        account_count,
        snapshot_count,
        ..Default::default()
    };
    let ledger = generate_random_ledger(&config);
    let validated = validate(&ledger, ValidationMode::Strict).unwrap();
    densify(&validated)
}

fn bench_resolve_50_accounts(c: &mut Criterion) {
    let densified = prepared_ledger(50, 3);
    let as_of = *densified.ledger().dates().last().unwrap();

    c.bench_function("resolve_50_accounts", |b| {
        b.iter(|| resolve(black_box(&densified), black_box(as_of)))
    });
}

fn bench_resolve_500_accounts(c: &mut Criterion) {
    let densified = prepared_ledger(500, 3);
    let as_of = *densified.ledger().dates().last().unwrap();

    c.bench_function("resolve_500_accounts", |b| {
        b.iter(|| resolve(black_box(&densified), black_box(as_of)))
    });
}

fn bench_timeline_100_accounts_12_snapshots(c: &mut Criterion) {
    let densified = prepared_ledger(100, 12);

    c.bench_function("timeline_100_accounts_12_snapshots", |b| {
        b.iter(|| compress(black_box(&densified)))
    });
}

criterion_group!(
    benches,
    bench_resolve_50_accounts,
    bench_resolve_500_accounts,
    bench_timeline_100_accounts_12_snapshots
);
criterion_main!(benches);
