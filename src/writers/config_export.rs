use crate::error::Result;
use crate::models::ConfigExportRow;
use crate::utils::constants::CONFIG_EXPORT_DELIMITER;
use csv::WriterBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes acquisition configuration files, one per category
pub struct ConfigExportWriter {
    delimiter: u8,
}

impl ConfigExportWriter {
    pub fn new() -> Self {
        Self {
            delimiter: CONFIG_EXPORT_DELIMITER,
        }
    }

    pub fn file_name(category: &str) -> String {
        format!("config_export_{}.csv", category)
    }

    pub fn write_category(&self, rows: &[ConfigExportRow], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_path(path)?;

        writer.write_record(["Nom", "Table", "nbr"])?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Returns the written paths in category order
    pub fn write_all(
        &self,
        exports: &BTreeMap<String, Vec<ConfigExportRow>>,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(exports.len());
        for (category, rows) in exports {
            let path = output_dir.join(Self::file_name(category));
            self.write_category(rows, &path)?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for ConfigExportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_all() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exports = BTreeMap::new();
        exports.insert(
            "controlCAD".to_string(),
            vec![
                ConfigExportRow {
                    nom: "1001_TempRet".to_string(),
                    table: "techant10".to_string(),
                    nbr: 120,
                },
                ConfigExportRow {
                    nom: "1001_PosVan".to_string(),
                    table: "techant11".to_string(),
                    nbr: 120,
                },
            ],
        );

        let written = ConfigExportWriter::new().write_all(&exports, dir.path())?;
        assert_eq!(written, vec![dir.path().join("config_export_controlCAD.csv")]);
        assert_eq!(
            fs::read_to_string(&written[0])?,
            "Nom;Table;nbr\n1001_TempRet;techant10;120\n1001_PosVan;techant11;120\n"
        );
        Ok(())
    }

    #[test]
    fn test_empty_category_still_has_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out").join("config_export_x.csv");
        ConfigExportWriter::new().write_category(&[], &path)?;
        assert_eq!(fs::read_to_string(&path)?, "Nom;Table;nbr\n");
        Ok(())
    }
}
