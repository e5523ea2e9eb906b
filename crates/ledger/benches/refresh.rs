use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ledger::{Direction, Ledger, LedgerConfig, SeededRandomSource};

const POSITION_COUNT: usize = 64;

fn populated_ledger() -> Ledger {
    let config = LedgerConfig {
        starting_balance: 1_000_000.0,
        ..LedgerConfig::default()
    };
    let mut ledger =
        Ledger::with_default_watchlist(config, Box::new(SeededRandomSource::new(7)));

    for index in 0..POSITION_COUNT {
        let direction = if index % 2 == 0 {
            Direction::Long
        } else {
            Direction::Short
        };
        ledger
            .place_order("AAPL", direction, 1_000.0, 5, false)
            .expect("bench ledger should have capital for every order");
    }

    ledger
}

fn bench_refresh_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_refresh");
    group.throughput(Throughput::Elements(POSITION_COUNT as u64));

    group.bench_function("refresh_prices_64_positions", |b| {
        let mut ledger = populated_ledger();
        b.iter(|| black_box(ledger.refresh_prices()));
    });

    group.finish();
}

fn bench_floating_pnl(c: &mut Criterion) {
    c.bench_function("floating_pnl_64_positions", |b| {
        let ledger = populated_ledger();
        b.iter(|| black_box(ledger.floating_pnl()));
    });
}

criterion_group!(benches, bench_refresh_prices, bench_floating_pnl);
criterion_main!(benches);
