use crate::utils::constants::{COL_TEMP_EXT, COL_TIMESTAMP_LOC};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq)]
pub struct SensorColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl SensorColumn {
    pub fn new(name: String, values: Vec<f64>) -> Self {
        Self { name, values }
    }
}

/// The merged wide table, stored column-wise.
///
/// Every column has exactly `index.len()` entries. `index` is strictly
/// increasing with a uniform 15-minute step.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedTable {
    pub index: Vec<DateTime<Utc>>,
    pub timestamp_loc: Vec<DateTime<Tz>>,
    pub temp_ext_api: Vec<f64>,
    pub sensors: Vec<SensorColumn>,
}

/// A borrowed view of a single row
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow<'a> {
    pub timestamp_utc: DateTime<Utc>,
    pub timestamp_loc: DateTime<Tz>,
    pub temp_ext_api: f64,
    pub values: Vec<(&'a str, f64)>,
}

impl UnifiedTable {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column names in output order, excluding the `timestamp_utc` index
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.sensors.len() + 2);
        names.push(COL_TIMESTAMP_LOC);
        names.push(COL_TEMP_EXT);
        names.extend(self.sensors.iter().map(|c| c.name.as_str()));
        names
    }

    pub fn sensor_column(&self, name: &str) -> Option<&SensorColumn> {
        self.sensors.iter().find(|c| c.name == name)
    }

    pub fn position(&self, instant: DateTime<Utc>) -> Option<usize> {
        self.index.binary_search(&instant).ok()
    }

    pub fn row(&self, i: usize) -> Option<UnifiedRow<'_>> {
        let timestamp_utc = *self.index.get(i)?;
        Some(UnifiedRow {
            timestamp_utc,
            timestamp_loc: self.timestamp_loc[i],
            temp_ext_api: self.temp_ext_api[i],
            values: self
                .sensors
                .iter()
                .map(|c| (c.name.as_str(), c.values[i]))
                .collect(),
        })
    }

    pub fn summary(&self) -> String {
        match (self.index.first(), self.index.last()) {
            (Some(first), Some(last)) => format!(
                "Unified table: {} rows x {} columns ({} sensors), {} -> {}",
                self.len(),
                self.sensors.len() + 2,
                self.sensors.len(),
                first.format("%Y-%m-%d %H:%M UTC"),
                last.format("%Y-%m-%d %H:%M UTC"),
            ),
            _ => "Unified table: empty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::CIVIL_TZ;
    use chrono::TimeZone;

    fn sample_table() -> UnifiedTable {
        let index: Vec<DateTime<Utc>> = (0..3)
            .map(|i| Utc.with_ymd_and_hms(2024, 1, 10, 9, 15 * i, 0).unwrap())
            .collect();
        UnifiedTable {
            timestamp_loc: index.iter().map(|t| t.with_timezone(&CIVIL_TZ)).collect(),
            temp_ext_api: vec![1.5, 1.5, 2.0],
            sensors: vec![SensorColumn::new("Temp".to_string(), vec![10.0, 0.0, 12.0])],
            index,
        }
    }

    #[test]
    fn test_column_order() {
        let table = sample_table();
        assert_eq!(
            table.column_names(),
            vec!["timestamp_loc", "temp_ext_api", "Temp"]
        );
    }

    #[test]
    fn test_row_access() {
        let table = sample_table();
        let row = table.row(2).unwrap();
        assert_eq!(row.temp_ext_api, 2.0);
        assert_eq!(row.values, vec![("Temp", 12.0)]);
        assert_eq!(row.timestamp_loc.format("%H:%M").to_string(), "10:30");
        assert!(table.row(3).is_none());
        assert_eq!(
            table.position(Utc.with_ymd_and_hms(2024, 1, 10, 9, 15, 0).unwrap()),
            Some(1)
        );
    }
}
