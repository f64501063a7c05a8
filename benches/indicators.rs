#[path = "../tests/fixtures/mod.rs"]
mod fixtures;

use crate::fixtures::load_reference_series;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use indicator_engine::{
    Adx, AdxConfig, Bb, BbConfig, Engine, IndicatorConfig, IndicatorConfigBuilder, Ichimoku,
    IchimokuConfig, Macd, MacdConfig, Psar, PsarConfig, Rsi, RsiConfig, Selection, Settings, Sma,
    SmaConfig, SuperTrend, SuperTrendConfig,
};
use std::{hint::black_box, num::NonZero, time::Duration};

fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

fn compute_benchmarks(c: &mut Criterion) {
    let series = load_reference_series();
    let mut group = c.benchmark_group("compute");
    group.throughput(Throughput::Elements(series.len() as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    macro_rules! compute_bench {
        ($name:expr, $ind_type:ty, $config:expr) => {
            let ind = <$ind_type>::new($config);
            group.bench_function($name, |b| {
                b.iter(|| black_box(ind.compute(black_box(&series))));
            });
        };
    }

    compute_bench!("sma20", Sma, SmaConfig::close(nz(20)));
    compute_bench!("sma200", Sma, SmaConfig::close(nz(200)));
    compute_bench!("rsi14", Rsi, RsiConfig::close(nz(14)));
    compute_bench!("macd", Macd, MacdConfig::builder().build().unwrap());
    compute_bench!("bb20", Bb, BbConfig::builder().build().unwrap());
    compute_bench!("adx14", Adx, AdxConfig::new(nz(14)));
    compute_bench!(
        "supertrend",
        SuperTrend,
        SuperTrendConfig::builder().build().unwrap()
    );
    compute_bench!("ichimoku", Ichimoku, IchimokuConfig::builder().build().unwrap());
    compute_bench!("psar", Psar, PsarConfig::builder().build().unwrap());

    group.finish();
}

fn selection_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    group.bench_function("parse", |b| {
        b.iter(|| black_box("macd:12,26,9").parse::<Selection>());
    });

    group.finish();
}

fn engine_benchmarks(c: &mut Criterion) {
    let series = load_reference_series();
    let selections = [
        "rsi:14",
        "stochrsi",
        "macd",
        "adx",
        "aroon",
        "bollinger",
        "supertrend",
        "ichimoku",
        "psar",
        "sma:20,50,200",
    ];
    let mut group = c.benchmark_group("engine");
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    for parallel in [false, true] {
        let engine = Engine::new(Settings {
            parallel,
            ..Settings::default()
        });
        let name = if parallel { "all_parallel" } else { "all_sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine.evaluate_all(&selections, &series)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    compute_benchmarks,
    selection_benchmarks,
    engine_benchmarks
);
criterion_main!(benches);
