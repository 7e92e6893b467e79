/// Raw sensor export layout
pub const RAW_DELIMITER: u8 = b';';
pub const RAW_FILE_EXTENSION: &str = "csv";
pub const RAW_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const MIN_RAW_COLUMNS: usize = 3;

/// Canonical grid step
pub const QUARTER_HOUR_SECS: i64 = 15 * 60;

/// Sampling classification thresholds, median gap in minutes (inclusive)
pub const MINUTE_MAX_GAP_MIN: f64 = 2.0;
pub const QUARTER_HOUR_MAX_GAP_MIN: f64 = 20.0;
pub const HOUR_MAX_GAP_MIN: f64 = 90.0;

/// Output column names
pub const COL_TIMESTAMP_UTC: &str = "timestamp_utc";
pub const COL_TIMESTAMP_LOC: &str = "timestamp_loc";
pub const COL_TEMP_EXT: &str = "temp_ext_api";

/// Run log file names
pub const LOG_FILE_COARSE: &str = "fichiers_echantillon_horaire_ou_plus.txt";
pub const LOG_FILE_DUPLICATES: &str = "colonnes_dupliquees.txt";

/// Default paths
pub const DEFAULT_CONFIG_FILE: &str = "sst-processor.toml";
pub const DEFAULT_INPUT_DIR: &str = "data/raw/export_sst";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_OUTPUT_FILE: &str = "data/structured/sst_unified.parquet";

/// Bulle (CH), 46° 37′ 03″ N, 7° 03′ 29″ E
pub const BULLE_LAT: f64 = 46.6175;
pub const BULLE_LON: f64 = 7.0581;

/// Open-Meteo historical archive
pub const WEATHER_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const WEATHER_HOURLY_VARIABLE: &str = "temperature_2m";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 30;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Equipment filter export
pub const CONFIG_EXPORT_DELIMITER: u8 = b';';
pub const CONFIG_EXPORT_SAMPLE_COUNT: u32 = 120;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
