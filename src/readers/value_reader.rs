use crate::error::LoadError;
use crate::models::CleanedSeries;
use crate::utils::constants::{MIN_RAW_COLUMNS, RAW_DELIMITER, RAW_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loads one raw per-sensor export (timestamp; value; quality flag).
pub struct ValueReader {
    delimiter: u8,
}

impl ValueReader {
    pub fn new() -> Self {
        Self {
            delimiter: RAW_DELIMITER,
        }
    }

    /// Read a sensor file into a cleaned series named after its value column
    pub fn read_series(&self, path: &Path) -> Result<CleanedSeries, LoadError> {
        let bytes = std::fs::read(path)?;
        let source_file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.parse_bytes(&source_file, &bytes)
    }

    /// Parse raw file content; `source_file` is only used for diagnostics
    pub fn parse_bytes(&self, source_file: &str, bytes: &[u8]) -> Result<CleanedSeries, LoadError> {
        let text = decode(bytes)?;
        if text.trim().is_empty() {
            return Err(LoadError::EmptyFile);
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .clone();
        if headers.len() < MIN_RAW_COLUMNS {
            return Err(LoadError::TooFewColumns {
                found: headers.len(),
            });
        }
        let column = headers.get(1).unwrap_or_default().to_string();

        let mut samples = Vec::new();
        let mut dropped = 0usize;
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| LoadError::Parse(e.to_string()))?;

            if record.len() > headers.len() {
                warn!(
                    file = source_file,
                    line = line + 2,
                    fields = record.len(),
                    "Skipping malformed line"
                );
                continue;
            }

            let field = |i: usize| record.get(i).unwrap_or_default();
            match parse_sample(field(0), field(1), field(2)) {
                Some(sample) => samples.push(sample),
                None => dropped += 1,
            }
        }

        if samples.is_empty() {
            return Err(LoadError::NoValidRows);
        }

        debug!(
            file = source_file,
            column = %column,
            rows = samples.len(),
            dropped,
            "Loaded sensor file"
        );

        Ok(CleanedSeries::new(source_file.to_string(), column, samples))
    }
}

impl Default for ValueReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes Windows-1252 leaves unassigned; encoding_rs maps them to C1 controls
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// UTF-8 first, Windows-1252 as the fallback the exporter uses on older stations
fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return Ok(text);
    }
    if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
        return Err(LoadError::Encoding);
    }
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(LoadError::Encoding)
}

/// A number, or `None` for empty, unparseable or NaN text
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Any non-zero flag invalidates the sample; an unreadable flag counts as valid
pub fn is_flagged_invalid(flag: &str) -> bool {
    parse_number(flag).is_some_and(|f| f != 0.0)
}

/// Returns `None` only when the timestamp cannot be parsed
pub fn parse_sample(timestamp: &str, value: &str, flag: &str) -> Option<(NaiveDateTime, f64)> {
    let ts = NaiveDateTime::parse_from_str(timestamp.trim(), RAW_TIMESTAMP_FORMAT).ok()?;
    let value = if is_flagged_invalid(flag) {
        0.0
    } else {
        parse_number(value).unwrap_or(0.0)
    };
    Some((ts, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_sample() {
        assert_eq!(parse_sample("01/02/2026 10:05", "12.5", "0"), Some((at(10, 5), 12.5)));
        assert_eq!(parse_sample(" 01/02/2026 10:05 ", " 7 ", ""), Some((at(10, 5), 7.0)));
        assert_eq!(parse_sample("2026-02-01 10:05", "12.5", "0"), None);
    }

    #[test]
    fn test_nonzero_flag_forces_zero() {
        for flag in ["1", "2", "-1", "0.5", "9"] {
            assert_eq!(
                parse_sample("01/02/2026 10:00", "42.0", flag),
                Some((at(10, 0), 0.0)),
                "flag {flag}"
            );
        }
    }

    #[test]
    fn test_unparseable_flag_is_valid() {
        for flag in ["", "abc", "nan"] {
            assert_eq!(
                parse_sample("01/02/2026 10:00", "42.0", flag),
                Some((at(10, 0), 42.0)),
                "flag {flag:?}"
            );
        }
    }

    #[test]
    fn test_unparseable_value_defaults_to_zero() {
        assert_eq!(parse_sample("01/02/2026 10:00", "12,5", "0"), Some((at(10, 0), 0.0)));
        assert_eq!(parse_sample("01/02/2026 10:00", "", "0"), Some((at(10, 0), 0.0)));
    }

    #[test]
    fn test_read_sensor_file() -> Result<(), LoadError> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "date;SST1234_TempRet;inv")?;
        writeln!(file, "01/02/2026 10:00;41.5;0")?;
        writeln!(file, "01/02/2026 10:15;99.9;1")?;
        writeln!(file, "not a date;40.0;0")?;
        writeln!(file, "01/02/2026 10:30;40.5;0;extra;fields")?;
        writeln!(file, "01/02/2026 10:45;39.0")?;

        let series = ValueReader::new().read_series(file.path())?;
        assert_eq!(series.column, "SST1234_TempRet");
        assert_eq!(
            series.samples,
            vec![(at(10, 0), 41.5), (at(10, 15), 0.0), (at(10, 45), 39.0)]
        );
        Ok(())
    }

    #[test]
    fn test_windows_1252_fallback() {
        let mut bytes = b"date;Temp\xE9rature;inv\n".to_vec();
        bytes.extend_from_slice(b"01/02/2026 10:00;1.0;0\n");

        let series = ValueReader::new().parse_bytes("legacy.csv", &bytes).unwrap();
        assert_eq!(series.column, "Température");
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFdate;Temp;inv\n01/02/2026 10:00;1.0;0\n";
        let series = ValueReader::new().parse_bytes("bom.csv", bytes).unwrap();
        assert_eq!(series.column, "Temp");
    }

    #[test]
    fn test_undecodable_bytes_rejected() {
        // 0x9D is neither UTF-8 nor assigned in Windows-1252
        let bytes = b"date;Temp\x9D;inv\n01/02/2026 10:00;1.0;0\n";
        assert!(matches!(
            ValueReader::new().parse_bytes("garbled.csv", bytes),
            Err(LoadError::Encoding)
        ));
    }

    #[test]
    fn test_rejected_files() {
        let reader = ValueReader::new();
        assert!(matches!(
            reader.parse_bytes("empty.csv", b""),
            Err(LoadError::EmptyFile)
        ));
        assert!(matches!(
            reader.parse_bytes("narrow.csv", b"date;Temp\n01/02/2026 10:00;1.0\n"),
            Err(LoadError::TooFewColumns { found: 2 })
        ));
        assert!(matches!(
            reader.parse_bytes("nodates.csv", b"date;Temp;inv\nxx;1.0;0\n"),
            Err(LoadError::NoValidRows)
        ));
        assert!(matches!(
            reader.parse_bytes("header.csv", b"date;Temp;inv\n"),
            Err(LoadError::NoValidRows)
        ));
    }
}
