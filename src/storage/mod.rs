pub mod table;
pub mod csv;
pub mod parquet;

pub use table::{COLUMNS, Table, validate_schema};

use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;

/// On-disk encoding of the daily table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// One table file per capture date under `data_dir`.
#[derive(Debug, Clone)]
pub struct TableStore {
    data_dir: PathBuf,
    format: TableFormat,
}

impl TableStore {
    pub fn new(data_dir: impl Into<PathBuf>, format: TableFormat) -> Self {
        Self { data_dir: data_dir.into(), format }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(date.format("%Y-%m-%d").to_string())
            .with_extension(self.format.extension())
    }

    /// Load and validate `path`, or start an empty table if it does not exist.
    pub fn load_or_new(&self, path: &Path) -> Result<Table> {
        if !path.exists() {
            debug!(path = ?path, "No table yet, starting empty");
            return Ok(Table::new());
        }

        let table = match self.format {
            TableFormat::Csv => csv::load(path)?,
            TableFormat::Parquet => parquet::load(path)?,
        };
        info!(path = ?path, rows = table.len(), "Loaded table");
        Ok(table)
    }

    pub fn save(&self, table: &Table, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match self.format {
            TableFormat::Csv => csv::save(table, path)?,
            TableFormat::Parquet => parquet::save(table, path)?,
        }
        info!(path = ?path, rows = table.len(), "Data is saved");
        Ok(())
    }
}
