use std::fs::File;
use std::path::Path;
use arrow::error::ArrowError;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::error::Result;
use crate::storage::table::{Table, validate_schema};

pub fn load(path: &Path) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    validate_schema(builder.schema())?;

    let batches = builder
        .build()?
        .collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    debug!(path = ?path, batches = batches.len(), "Read parquet table");
    Table::from_batches(&batches)
}

pub fn save(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, table.batch().schema(), None)?;
    writer.write(table.batch())?;
    writer.close()?;
    Ok(())
}
