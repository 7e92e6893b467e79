use crate::error::{ProcessingError, Result};
use crate::models::TechantRecord;
use csv::StringRecord;
use std::fs::File;
use std::path::Path;

pub const EGID_COLUMN: &str = "U_NO_EGID";
pub const TECHANT_COLUMNS: [&str; 6] = [
    "ref_techant",
    "ouvrage",
    "champ",
    "libelle_2",
    "frequence",
    "type",
];

/// Reads the CAD transmission point list and the techant master list.
pub struct EquipmentReader {
    delimiter: u8,
}

impl EquipmentReader {
    pub fn new() -> Self {
        Self { delimiter: b';' }
    }

    fn open(&self, path: &Path) -> Result<csv::Reader<File>> {
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_path(path)?)
    }

    /// EGID of every CAD point, in file order; blank cells are skipped
    pub fn read_egids(&self, path: &Path) -> Result<Vec<String>> {
        let mut reader = self.open(path)?;
        let headers = reader.headers()?.clone();
        let position = column_position(&headers, EGID_COLUMN).ok_or_else(|| {
            ProcessingError::MissingData(format!(
                "Column {} missing in {}",
                EGID_COLUMN,
                path.display()
            ))
        })?;

        let mut egids = Vec::new();
        for result in reader.records() {
            let record = result?;
            let egid = record.get(position).unwrap_or_default().trim();
            if !egid.is_empty() {
                egids.push(egid.to_string());
            }
        }
        Ok(egids)
    }

    /// Techant rows with every field trimmed
    pub fn read_techant(&self, path: &Path) -> Result<Vec<TechantRecord>> {
        let mut reader = self.open(path)?;
        let headers = reader.headers()?.clone();
        for column in TECHANT_COLUMNS {
            if column_position(&headers, column).is_none() {
                return Err(ProcessingError::MissingData(format!(
                    "Column {} missing in {}",
                    column,
                    path.display()
                )));
            }
        }

        let mut records = Vec::new();
        for result in reader.deserialize::<TechantRecord>() {
            records.push(result?.trimmed());
        }
        Ok(records)
    }
}

impl Default for EquipmentReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column_position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
