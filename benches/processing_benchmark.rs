use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sst_processor::models::{AggregatedSeries, CleanedSeries, SamplingClass};
use sst_processor::processors::{detect_sampling, DataMerger, QuarterHourAggregator};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// One month of minute samples, across the spring-forward
fn minute_series(column: &str, days: i64) -> CleanedSeries {
    let samples = (0..days * 24 * 60)
        .map(|i| (start() + TimeDelta::minutes(i), (i % 97) as f64 * 0.5))
        .collect();
    CleanedSeries::new(format!("{}.csv", column), column.to_string(), samples)
}

fn benchmark_aggregation(c: &mut Criterion) {
    let series = minute_series("Temp", 31);
    let aggregator = QuarterHourAggregator::new();

    c.bench_function("detect_sampling_minute", |b| {
        b.iter(|| detect_sampling(black_box(&series)))
    });

    c.bench_function("aggregate_minute_month", |b| {
        b.iter(|| aggregator.aggregate(black_box(&series), SamplingClass::Minute))
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let aggregator = QuarterHourAggregator::new();
    let mut group = c.benchmark_group("merge");

    for columns in [10, 50] {
        let series: Vec<AggregatedSeries> = (0..columns)
            .filter_map(|i| {
                aggregator.aggregate(&minute_series(&format!("SST{}", i), 31), SamplingClass::Minute)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("columns", columns), &series, |b, series| {
            let merger = DataMerger::new();
            b.iter(|| merger.merge(black_box(series)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_aggregation, benchmark_merge);
criterion_main!(benches);
