use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rusty_fx::fx::{FxPriceRepository, InMemorySeriesStore, NeverSpike, PriceSeries};

/// Ten years of daily observations, skipping every seventh day
fn daily_series(start_rate: f64, drift: f64) -> PriceSeries {
    let origin = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
    let observations: Vec<_> = (0..3650)
        .filter(|i| i % 7 != 0)
        .map(|i| (origin + Duration::days(i), start_rate + drift * i as f64))
        .collect();
    PriceSeries::from_observations(observations).unwrap()
}

fn benchmark_resolve(c: &mut Criterion) {
    let store = InMemorySeriesStore::new()
        .with_series("EURUSD", daily_series(1.10, 0.00001))
        .with_series("GBPUSD", daily_series(1.30, -0.00001));
    let repo = FxPriceRepository::new(store);

    c.bench_function("resolve_direct_10y", |b| {
        b.iter(|| repo.get(black_box("EURUSD")).unwrap())
    });

    c.bench_function("resolve_inverse_10y", |b| {
        b.iter(|| repo.get(black_box("USDEUR")).unwrap())
    });

    c.bench_function("resolve_cross_10y", |b| {
        b.iter(|| repo.get(black_box("EURGBP")).unwrap())
    });
}

fn benchmark_update(c: &mut Criterion) {
    c.bench_function("update_append_250", |b| {
        let history = daily_series(1.10, 0.00001);
        let last = history.last_timestamp().unwrap();
        let batch = PriceSeries::from_observations(
            (1..=250).map(|i| (last + Duration::days(i), 1.2)),
        )
        .unwrap();

        b.iter(|| {
            let store = InMemorySeriesStore::new().with_series("EURUSD", history.clone());
            let mut repo = FxPriceRepository::new(store).with_spike_detector(NeverSpike);
            repo.update("EURUSD", black_box(&batch), true).unwrap()
        });
    });
}

criterion_group!(benches, benchmark_resolve, benchmark_update);
criterion_main!(benches);
