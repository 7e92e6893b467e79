use crate::models::{CleanedSeries, SamplingClass};
use crate::utils::constants::{HOUR_MAX_GAP_MIN, MINUTE_MAX_GAP_MIN, QUARTER_HOUR_MAX_GAP_MIN};
use chrono::NaiveDateTime;

/// Median gap between consecutive sorted timestamps, in minutes
pub fn median_gap_minutes<I>(timestamps: I) -> Option<f64>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut sorted: Vec<NaiveDateTime> = timestamps.into_iter().collect();
    if sorted.len() < 2 {
        return None;
    }
    sorted.sort_unstable();

    let mut gaps: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_milliseconds() as f64 / 60_000.0)
        .collect();
    gaps.sort_by(f64::total_cmp);

    let mid = gaps.len() / 2;
    let median = if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    } else {
        gaps[mid]
    };
    Some(median)
}

/// Classify a median gap; thresholds are inclusive upper bounds
pub fn classify_gap(minutes: f64) -> SamplingClass {
    if minutes <= MINUTE_MAX_GAP_MIN {
        SamplingClass::Minute
    } else if minutes <= QUARTER_HOUR_MAX_GAP_MIN {
        SamplingClass::QuarterHour
    } else if minutes <= HOUR_MAX_GAP_MIN {
        SamplingClass::Hour
    } else {
        SamplingClass::Coarser
    }
}

/// Dominant cadence of a series; fewer than two samples is `Coarser`
pub fn detect_sampling(series: &CleanedSeries) -> SamplingClass {
    median_gap_minutes(series.timestamps())
        .map(classify_gap)
        .unwrap_or(SamplingClass::Coarser)
}
