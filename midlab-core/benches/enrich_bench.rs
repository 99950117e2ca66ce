//! Criterion benchmarks for the engine hot paths.
//!
//! Benchmarks:
//! 1. Full enrichment pipeline at several series lengths
//! 2. Channel backtest walk
//! 3. Alert check over the latest bar

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use midlab_core::domain::Bar;
use midlab_core::engine::{
    enrich, generate_alerts, run_channel_backtest, AlertConfig, BacktestParams, EngineConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            let high = close + 1.5;
            let low = close - 1.5;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
                amount: Some(close * 1_000_000.0),
            }
        })
        .collect()
}

// ── 1. Enrichment pipeline ───────────────────────────────────────────

fn bench_enrich(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    let mut group = c.benchmark_group("enrich");
    for n in [250_usize, 1_000, 5_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| enrich(black_box(bars), black_box(&cfg)).unwrap());
        });
    }
    group.finish();
}

// ── 2. Channel backtest ──────────────────────────────────────────────

fn bench_backtest(c: &mut Criterion) {
    let params = BacktestParams::default();
    let bars = make_bars(1_000);
    c.bench_function("channel_backtest_1000_bars", |b| {
        b.iter(|| run_channel_backtest(black_box(&bars), black_box(&params)).unwrap());
    });
}

// ── 3. Alert check ───────────────────────────────────────────────────

fn bench_alerts(c: &mut Criterion) {
    let cfg = AlertConfig::default();
    let bars = make_bars(250);
    c.bench_function("generate_alerts_250_bars", |b| {
        b.iter(|| generate_alerts(black_box(&bars), black_box(&cfg)).unwrap());
    });
}

criterion_group!(benches, bench_enrich, bench_backtest, bench_alerts);
criterion_main!(benches);
