use crate::error::{ProcessingError, Result};
use crate::models::UnifiedTable;
use crate::utils::constants::{
    COL_TEMP_EXT, COL_TIMESTAMP_LOC, COL_TIMESTAMP_UTC, COMPRESSION_GZIP, COMPRESSION_LZ4,
    COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD, DEFAULT_ROW_GROUP_SIZE,
};
use crate::utils::time::CIVIL_TZ;
use arrow::array::{ArrayRef, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Schema metadata key naming the index column
pub const INDEX_METADATA_KEY: &str = "index";

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the unified table, `timestamp_utc` first
    pub fn write_table(&self, table: &UnifiedTable, path: &Path) -> Result<()> {
        let schema = self.create_schema(table);
        let batch = self.table_to_batch(table, schema.clone())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self, table: &UnifiedTable) -> SchemaRef {
        let mut fields = vec![
            Field::new(
                COL_TIMESTAMP_UTC,
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new(
                COL_TIMESTAMP_LOC,
                DataType::Timestamp(TimeUnit::Microsecond, Some(CIVIL_TZ.name().into())),
                false,
            ),
            Field::new(COL_TEMP_EXT, DataType::Float64, false),
        ];
        fields.extend(
            table
                .sensors
                .iter()
                .map(|c| Field::new(c.name.as_str(), DataType::Float64, false)),
        );

        let metadata = HashMap::from([(
            INDEX_METADATA_KEY.to_string(),
            COL_TIMESTAMP_UTC.to_string(),
        )]);
        Arc::new(Schema::new_with_metadata(fields, metadata))
    }

    fn table_to_batch(&self, table: &UnifiedTable, schema: SchemaRef) -> Result<RecordBatch> {
        // Both timestamp columns hold the same instants; only the zone differs
        let micros: Vec<i64> = table.index.iter().map(|t| t.timestamp_micros()).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(TimestampMicrosecondArray::from(micros.clone()).with_timezone("UTC")),
            Arc::new(TimestampMicrosecondArray::from(micros).with_timezone(CIVIL_TZ.name())),
            Arc::new(Float64Array::from(table.temp_ext_api.clone())),
        ];
        columns.extend(
            table
                .sensors
                .iter()
                .map(|c| Arc::new(Float64Array::from(c.values.clone())) as ArrayRef),
        );

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
        }

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            self.compression
        };

        let columns = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}\n\
            - Columns ({}): {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
            self.total_rows as f64 / self.row_groups.max(1) as f64,
            self.columns.len(),
            self.columns.join(", ")
        )
    }
}
