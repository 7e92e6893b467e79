use crate::error::Result;
use crate::utils::constants::{LOG_FILE_COARSE, LOG_FILE_DUPLICATES};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Plain-text, append-only logs consumed by the people curating the exports:
/// excluded (too coarse) files and renamed duplicate columns.
pub struct RunLog {
    dir: PathBuf,
}

impl RunLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn coarse_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_COARSE)
    }

    pub fn duplicates_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_DUPLICATES)
    }

    /// Create the log directory and drop logs left by a previous run
    pub fn reset(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        for path in [self.coarse_path(), self.duplicates_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn log_coarse_file(&self, file_name: &str) -> Result<()> {
        append_line(&self.coarse_path(), file_name)
    }

    pub fn log_duplicate_column(&self, original: &str, renamed: &str) -> Result<()> {
        append_line(
            &self.duplicates_path(),
            &format!("{} -> {}", original, renamed),
        )
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}
