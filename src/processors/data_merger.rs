use crate::models::{AggregatedSeries, SensorColumn, UnifiedTable};
use crate::processors::civil_time::CivilTimeReconciler;
use crate::readers::weather_client::{expand_to_grid, HourlyTemperature};
use crate::utils::time::{ceil_to_quarter, floor_to_quarter, quarter_hour};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

/// Sensor columns joined onto one contiguous UTC grid
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGrid {
    pub index: Vec<DateTime<Utc>>,
    pub sensors: Vec<SensorColumn>,
}

impl MergedGrid {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.index.first().copied()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.index.last().copied()
    }
}

pub struct DataMerger {
    reconciler: CivilTimeReconciler,
}

impl DataMerger {
    pub fn new() -> Self {
        Self {
            reconciler: CivilTimeReconciler::new(),
        }
    }

    /// Local span over all series, floored/ceiled to quarter-hour boundaries
    pub fn local_span(&self, series: &[AggregatedSeries]) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = series.iter().filter_map(|s| s.first_key()).min()?;
        let max = series.iter().filter_map(|s| s.last_key()).max()?;
        Some((floor_to_quarter(min), ceil_to_quarter(max)))
    }

    /// Outer-join every series onto the full grid; cells without data are 0.0.
    ///
    /// Series are joined on their local keys, then every local key is placed
    /// at its reconciled UTC slot. The UTC index is contiguous, so the
    /// repeated autumn hour shows up as rows no local key maps to (all 0.0).
    /// A local time inside the spring gap is moved forward onto the slot of
    /// a later genuine local time. When one series has values at both keys
    /// they cover the same absolute quarter hour and are combined as a mean
    /// weighted by sample count. Gap keys without data never widen the grid.
    pub fn merge(&self, series: &[AggregatedSeries]) -> Option<MergedGrid> {
        let (start, end) = self.local_span(series)?;
        let step = quarter_hour();

        let mut local_grid = Vec::new();
        let mut ts = start;
        while ts <= end {
            local_grid.push(ts);
            ts += step;
        }

        let reconciled = self.reconciler.reconcile_all(&local_grid);
        let has_data = |local: &NaiveDateTime| series.iter().any(|s| s.values.contains_key(local));
        let bounding = || {
            local_grid
                .iter()
                .zip(&reconciled)
                .filter(|(local, r)| !r.shifted || has_data(local))
                .map(|(_, r)| r.instant)
        };
        let first = bounding().min()?;
        let last = bounding().max()?;

        let slot_count = ((last - first).num_seconds() / step.num_seconds()) as usize + 1;
        let index: Vec<DateTime<Utc>> = (0..slot_count)
            .map(|i| first + step * i as i32)
            .collect();

        let slots: Vec<Option<usize>> = reconciled
            .iter()
            .map(|r| {
                (first..=last)
                    .contains(&r.instant)
                    .then(|| ((r.instant - first).num_seconds() / step.num_seconds()) as usize)
            })
            .collect();

        let sensors = series
            .iter()
            .map(|s| {
                // (weighted sum, samples) per slot
                let mut cells = vec![(0.0, 0usize); slot_count];
                for (local, slot) in local_grid.iter().zip(&slots) {
                    if let (Some(slot), Some((value, count))) = (slot, s.weighted(local)) {
                        let cell = &mut cells[*slot];
                        cell.0 += value * count as f64;
                        cell.1 += count;
                    }
                }
                let values = cells
                    .into_iter()
                    .map(|(sum, count)| if count == 0 { 0.0 } else { sum / count as f64 })
                    .collect();
                SensorColumn::new(s.column.clone(), values)
            })
            .collect();

        debug!(
            local_points = local_grid.len(),
            rows = slot_count,
            columns = series.len(),
            "Merged series onto grid"
        );

        Some(MergedGrid { index, sensors })
    }

    /// Attach local time and outside temperature to a merged grid
    pub fn assemble(&self, grid: MergedGrid, readings: &[HourlyTemperature]) -> UnifiedTable {
        let temp_ext_api = expand_to_grid(readings, &grid.index);
        let timestamp_loc = grid
            .index
            .iter()
            .map(|t| self.reconciler.to_local(*t))
            .collect();

        UnifiedTable {
            index: grid.index,
            timestamp_loc,
            temp_ext_api,
            sensors: grid.sensors,
        }
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}
