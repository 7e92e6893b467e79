use crate::models::{AggregatedSeries, CleanedSeries, SamplingClass};
use crate::utils::time::{ceil_to_quarter, floor_to_quarter};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Resamples cleaned series onto the local 15-minute grid.
pub struct QuarterHourAggregator;

impl QuarterHourAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` for cadences of an hour or coarser.
    ///
    /// Zeroed (bad-flag) samples are part of the mean as 0.0.
    pub fn aggregate(
        &self,
        series: &CleanedSeries,
        sampling: SamplingClass,
    ) -> Option<AggregatedSeries> {
        let label: fn(NaiveDateTime) -> NaiveDateTime = match sampling {
            // (T-15, T] belongs to T
            SamplingClass::Minute => ceil_to_quarter,
            // [T, T+15) belongs to T
            SamplingClass::QuarterHour => floor_to_quarter,
            SamplingClass::Hour | SamplingClass::Coarser => return None,
        };

        let mut sums: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
        for (ts, value) in &series.samples {
            let entry = sums.entry(label(*ts)).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let values = sums
            .iter()
            .map(|(ts, (sum, count))| (*ts, sum / *count as f64))
            .collect();
        let counts = sums
            .into_iter()
            .map(|(ts, (_, count))| (ts, count))
            .collect();

        Some(
            AggregatedSeries::new(series.source_file.clone(), series.column.clone(), values)
                .with_counts(counts),
        )
    }
}

impl Default for QuarterHourAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::value_reader::parse_sample;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn series(samples: Vec<(NaiveDateTime, f64)>) -> CleanedSeries {
        CleanedSeries::new("s.csv".to_string(), "Temp".to_string(), samples)
    }

    fn values(agg: &AggregatedSeries) -> Vec<(NaiveDateTime, f64)> {
        agg.values.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_quarter_hour_mean_not_sum() {
        let s = series(vec![(at(10, 1), 10.0), (at(10, 14), 20.0), (at(10, 16), 5.0)]);
        let agg = QuarterHourAggregator::new()
            .aggregate(&s, SamplingClass::QuarterHour)
            .unwrap();
        assert_eq!(values(&agg), vec![(at(10, 0), 15.0), (at(10, 15), 5.0)]);
    }

    #[test]
    fn test_minute_right_closed_right_labeled() {
        let s = series(vec![
            (at(10, 0), 1.0),
            (at(10, 1), 2.0),
            (at(10, 15), 4.0),
            (at(10, 16), 8.0),
        ]);
        let agg = QuarterHourAggregator::new()
            .aggregate(&s, SamplingClass::Minute)
            .unwrap();
        assert_eq!(
            values(&agg),
            vec![(at(10, 0), 1.0), (at(10, 15), 3.0), (at(10, 30), 8.0)]
        );
        assert_eq!(agg.weighted(&at(10, 15)), Some((3.0, 2)));
    }

    #[test]
    fn test_minute_empty_windows_have_no_entry() {
        let s = series(vec![(at(10, 1), 1.0), (at(11, 1), 3.0)]);
        let agg = QuarterHourAggregator::new()
            .aggregate(&s, SamplingClass::Minute)
            .unwrap();
        assert_eq!(values(&agg), vec![(at(10, 15), 1.0), (at(11, 15), 3.0)]);
    }

    #[test]
    fn test_coarse_cadence_declined() {
        let s = series(vec![(at(10, 0), 1.0), (at(11, 0), 2.0)]);
        let aggregator = QuarterHourAggregator::new();
        assert!(aggregator.aggregate(&s, SamplingClass::Hour).is_none());
        assert!(aggregator.aggregate(&s, SamplingClass::Coarser).is_none());
    }

    // Bad-flag samples are zeroed but still counted in the mean. This treats
    // an invalid reading as a true 0.0; excluding them instead would give 20.0.
    #[test]
    fn test_flagged_sample_counts_as_zero_in_mean() {
        let samples = vec![
            parse_sample("05/01/2026 10:05", "10.0", "1").unwrap(),
            parse_sample("05/01/2026 10:10", "20.0", "0").unwrap(),
        ];
        let agg = QuarterHourAggregator::new()
            .aggregate(&series(samples), SamplingClass::Minute)
            .unwrap();
        assert_eq!(values(&agg), vec![(at(10, 15), 10.0)]);
    }
}
