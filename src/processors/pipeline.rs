use crate::error::{ProcessingError, Result};
use crate::models::{AggregatedSeries, UnifiedTable};
use crate::processors::aggregator::QuarterHourAggregator;
use crate::processors::column_registry::ColumnRegistry;
use crate::processors::data_merger::DataMerger;
use crate::processors::sampling::detect_sampling;
use crate::readers::value_reader::ValueReader;
use crate::readers::weather_client::{fetch_or_empty, TemperatureSource};
use crate::utils::constants::RAW_FILE_EXTENSION;
use crate::utils::progress::ProgressReporter;
use crate::writers::run_log::RunLog;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What happened to every input file of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub files_seen: usize,
    pub accepted: Vec<String>,
    pub rejected: Vec<(String, String)>,
    pub excluded_coarse: Vec<String>,
    pub renames: Vec<(String, String)>,
    pub rows: usize,
}

impl RunReport {
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== SST Build Report ===\n");
        summary.push_str(&format!("Files seen: {}\n", self.files_seen));
        summary.push_str(&format!("Accepted: {}\n", self.accepted.len()));
        summary.push_str(&format!(
            "Excluded (hourly or coarser): {}\n",
            self.excluded_coarse.len()
        ));
        summary.push_str(&format!("Rejected: {}\n", self.rejected.len()));
        summary.push_str(&format!("Renamed columns: {}\n", self.renames.len()));
        summary.push_str(&format!("Rows: {}\n", self.rows));

        if !self.rejected.is_empty() {
            summary.push_str("\nRejected files:\n");
            for (file, reason) in &self.rejected {
                summary.push_str(&format!("  {}: {}\n", file, reason));
            }
        }

        if !self.renames.is_empty() {
            summary.push_str("\nRenamed columns:\n");
            for (original, renamed) in &self.renames {
                summary.push_str(&format!("  {} -> {}\n", original, renamed));
            }
        }

        summary
    }
}

/// Raw export files of a directory, sorted by file name
pub fn collect_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ProcessingError::MissingInputDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RAW_FILE_EXTENSION));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Turns a directory of raw exports into the unified 15-minute table
pub struct UnifiedTableBuilder<S: TemperatureSource> {
    reader: ValueReader,
    aggregator: QuarterHourAggregator,
    merger: DataMerger,
    source: S,
    run_log: RunLog,
}

impl<S: TemperatureSource> UnifiedTableBuilder<S> {
    pub fn new(source: S, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            reader: ValueReader::new(),
            aggregator: QuarterHourAggregator::new(),
            merger: DataMerger::new(),
            source,
            run_log: RunLog::new(log_dir),
        }
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Build the table; `None` when no file was usable.
    ///
    /// Only a missing input directory fails the run. Rejected files are
    /// recorded in the report, log sink failures are logged and ignored.
    pub async fn build_unified_table(
        &self,
        input_dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Option<UnifiedTable>, RunReport)> {
        let files = collect_csv_files(input_dir)?;
        info!(
            "Found {} raw files in {}",
            files.len(),
            input_dir.display()
        );

        if let Err(e) = self.run_log.reset() {
            error!("Could not reset logs in {}: {}", self.run_log.dir().display(), e);
        }

        let mut report = RunReport {
            files_seen: files.len(),
            ..RunReport::default()
        };
        let mut registry = ColumnRegistry::new();
        let mut series: Vec<AggregatedSeries> = Vec::new();

        for (i, path) in files.iter().enumerate() {
            let name = display_name(path);
            if let Some(p) = progress {
                p.set_message(&format!("[{}/{}] {}", i + 1, files.len(), name));
            }

            if let Some(aggregated) = self.process_file(path, &name, &mut report) {
                let claimed = registry.claim(&aggregated.column);
                if let Some(original) = &claimed.renamed_from {
                    info!("Duplicate column {} in {} renamed to {}", original, name, claimed.name);
                    if let Err(e) = self.run_log.log_duplicate_column(original, &claimed.name) {
                        error!("Could not write duplicate log: {}", e);
                    }
                    report.renames.push((original.clone(), claimed.name.clone()));
                }
                series.push(aggregated.renamed(claimed.name));
                report.accepted.push(name);
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        let Some(grid) = self.merger.merge(&series) else {
            warn!("No usable series in {}", input_dir.display());
            return Ok((None, report));
        };

        // merge() never yields an empty grid
        let readings = match (grid.start(), grid.end()) {
            (Some(start), Some(end)) => {
                if let Some(p) = progress {
                    p.set_message("Fetching outside temperature...");
                }
                fetch_or_empty(&self.source, start, end).await
            }
            _ => Vec::new(),
        };
        debug!("{} hourly temperature readings", readings.len());

        let table = self.merger.assemble(grid, &readings);
        report.rows = table.len();
        info!(
            "Unified table: {} rows, {} sensor columns",
            table.len(),
            table.sensors.len()
        );

        Ok((Some(table), report))
    }

    /// Load, classify and aggregate one file; `None` if it contributes no column
    fn process_file(
        &self,
        path: &Path,
        name: &str,
        report: &mut RunReport,
    ) -> Option<AggregatedSeries> {
        let cleaned = match self.reader.read_series(path) {
            Ok(cleaned) => cleaned,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.rejected.push((name.to_string(), e.to_string()));
                return None;
            }
        };

        let sampling = detect_sampling(&cleaned);
        debug!(file = name, samples = cleaned.len(), %sampling, "Detected sampling");

        match self.aggregator.aggregate(&cleaned, sampling) {
            Some(aggregated) => Some(aggregated),
            None => {
                info!("Excluding {}: {} sampling", name, sampling);
                if let Err(e) = self.run_log.log_coarse_file(name) {
                    error!("Could not write excluded-file log: {}", e);
                }
                report.excluded_coarse.push(name.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::weather_client::{HourlyTemperature, NoTemperatureSource};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct FixedSource(Vec<HourlyTemperature>);

    impl TemperatureSource for FixedSource {
        async fn fetch_hourly(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<HourlyTemperature>> {
            Ok(self.0.clone())
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn quarter_file(column: &str, value: f64) -> String {
        let mut content = format!("Date;{};Flag\n", column);
        for m in [0, 15, 30, 45] {
            content.push_str(&format!("05/01/2026 10:{:02};{};0\n", m, value));
        }
        content
    }

    #[test]
    fn test_collect_csv_files_sorted() -> Result<()> {
        let dir = TempDir::new()?;
        write(dir.path(), "b.csv", "");
        write(dir.path(), "a.CSV", "");
        write(dir.path(), "notes.txt", "");
        fs::create_dir(dir.path().join("sub.csv"))?;

        let files = collect_csv_files(dir.path())?;
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
        Ok(())
    }

    #[test]
    fn test_missing_input_directory_is_fatal() {
        let result = collect_csv_files(Path::new("/nonexistent/sst/raw"));
        assert!(matches!(result, Err(ProcessingError::MissingInputDirectory(_))));
    }

    #[tokio::test]
    async fn test_build_accepts_rejects_and_excludes() -> Result<()> {
        let input = TempDir::new()?;
        let logs = TempDir::new()?;
        write(input.path(), "01_temp.csv", &quarter_file("Temp", 20.0));
        write(input.path(), "02_temp.csv", &quarter_file("Temp", 30.0));
        write(input.path(), "03_empty.csv", "");
        write(
            input.path(),
            "04_hourly.csv",
            "Date;Energy;Flag\n05/01/2026 08:00;1;0\n05/01/2026 09:00;2;0\n05/01/2026 10:00;3;0\n",
        );

        let source = FixedSource(vec![HourlyTemperature {
            time: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            value: Some(-3.0),
        }]);
        let builder = UnifiedTableBuilder::new(source, logs.path());
        let (table, report) = builder.build_unified_table(input.path(), None).await?;
        let table = table.unwrap();

        assert_eq!(report.files_seen, 4);
        assert_eq!(report.accepted, vec!["01_temp.csv", "02_temp.csv"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, "03_empty.csv");
        assert_eq!(report.excluded_coarse, vec!["04_hourly.csv"]);
        assert_eq!(report.renames, vec![("Temp".to_string(), "Temp_1".to_string())]);

        assert_eq!(
            table.column_names(),
            vec!["timestamp_loc", "temp_ext_api", "Temp", "Temp_1"]
        );
        assert_eq!(table.len(), 4);
        assert_eq!(report.rows, 4);
        assert_eq!(table.sensor_column("Temp_1").unwrap().values, vec![30.0; 4]);
        assert_eq!(table.temp_ext_api, vec![-3.0; 4]);

        assert_eq!(
            fs::read_to_string(builder.run_log().coarse_path())?,
            "04_hourly.csv\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_build_without_usable_files() -> Result<()> {
        let input = TempDir::new()?;
        let logs = TempDir::new()?;
        write(input.path(), "only.csv", "Date;Value\n05/01/2026 10:00;1\n");

        let builder = UnifiedTableBuilder::new(NoTemperatureSource, logs.path());
        let (table, report) = builder.build_unified_table(input.path(), None).await?;
        assert!(table.is_none());
        assert_eq!(report.rejected.len(), 1);
        assert!(report.generate_summary().contains("only.csv"));
        Ok(())
    }
}
