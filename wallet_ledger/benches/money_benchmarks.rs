use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use wallet_ledger::{
    Money, WalletOperation, WalletProcessor,
    db::MemoryWalletLedger,
};

/// Benchmark parsing of common amount shapes
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("money_parse");
    for input in ["1500.00", "0.005", "-12.3456789", "1.5e2", "2/3"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, s| {
            b.iter(|| black_box(s).parse::<Money>());
        });
    }
    group.finish();
}

/// Benchmark formatting a balance
fn bench_format(c: &mut Criterion) {
    let amount = Money::from_minor(123_456_789);
    c.bench_function("money_format", |b| {
        b.iter(|| black_box(amount).to_string());
    });
}

/// Benchmark a deposit through the processor with an in-memory ledger
fn bench_apply_deposit(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let processor = WalletProcessor::new(Arc::new(MemoryWalletLedger::new()));
    let operation = WalletOperation::deposit(uuid::Uuid::new_v4(), Money::from_minor(100));

    c.bench_function("apply_deposit", |b| {
        b.iter(|| runtime.block_on(processor.apply(black_box(&operation))));
    });
}

criterion_group!(money, bench_parse, bench_format);

criterion_group!(processing, bench_apply_deposit);

criterion_main!(money, processing);
