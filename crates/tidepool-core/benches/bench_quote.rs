use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tidepool_core::quote::{required_token_deposit, withdrawal_amounts};
use tidepool_core::{coins, parse_amount};

fn bench_required_token_deposit(c: &mut Criterion) {
    let input = coins(10);
    let native_reserve = coins(100_000_000);
    let token_reserve = coins(500_000_000);

    c.bench_function("required_token_deposit", |b| {
        b.iter(|| {
            required_token_deposit(
                black_box(input),
                black_box(native_reserve),
                black_box(token_reserve),
            )
        })
    });
}

fn bench_withdrawal_amounts(c: &mut Criterion) {
    let burn = coins(333);
    let supply = coins(1_000_000);
    let native_reserve = coins(200_000_000);
    let token_reserve = coins(800_000_000);

    c.bench_function("withdrawal_amounts", |b| {
        b.iter(|| {
            withdrawal_amounts(
                black_box(burn),
                black_box(supply),
                black_box(native_reserve),
                black_box(token_reserve),
            )
        })
    });
}

fn bench_parse_amount(c: &mut Criterion) {
    c.bench_function("parse_amount", |b| {
        b.iter(|| parse_amount(black_box("123456.789012345678901234")))
    });
}

criterion_group!(
    benches,
    bench_required_token_deposit,
    bench_withdrawal_amounts,
    bench_parse_amount
);
criterion_main!(benches);
