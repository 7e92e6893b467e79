pub mod config_export;
pub mod parquet_writer;
pub mod run_log;

pub use config_export::ConfigExportWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use run_log::RunLog;
