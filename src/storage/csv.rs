use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::error::ArrowError;

use crate::error::Result;
use crate::storage::table::{Table, schema, validate_schema};

/// Read a table from CSV, rejecting any header other than the table columns.
pub fn read_table<R: Read + Seek>(mut reader: R) -> Result<Table> {
    let format = Format::default().with_header(true);

    let (header, _) = format.infer_schema(&mut reader, Some(0))?;
    validate_schema(&header)?;
    reader.rewind()?;

    let batches = ReaderBuilder::new(schema())
        .with_format(format)
        .build(reader)?
        .collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    Table::from_batches(&batches)
}

/// Write a table as CSV with a header row, even when it has no rows.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(writer);
    writer.write(table.batch())?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Table> {
    read_table(File::open(path)?)
}

pub fn save(table: &Table, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    write_table(table, &mut file)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::error::{Error, FormatError};
    use crate::models::TableRow;

    fn row(id: &str, title: &str) -> TableRow {
        TableRow {
            auction_id: id.to_string(),
            title: title.to_string(),
            datetime: "2021-01-01T00:00:00".to_string(),
            access: 10,
            watch: 3,
            bid: 1,
        }
    }

    #[test]
    fn empty_table_writes_header_only() {
        let mut out = Vec::new();
        write_table(&Table::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), "aID,title,datetime,access,watch,bid");
    }

    #[test]
    fn reads_back_written_rows() {
        let table = Table::new()
            .append_row(&row("1000000000", "plain"))
            .and_then(|t| t.append_row(&row("1000000001", "with, comma")))
            .unwrap();

        let mut out = Vec::new();
        write_table(&table, &mut out).unwrap();
        let loaded = read_table(Cursor::new(out)).unwrap();

        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn drifted_header_is_rejected() {
        let csv = "aID,title,datetime,access,bid\n1,t,2021-01-01T00:00:00,1,2\n";
        let err = read_table(Cursor::new(csv)).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError { index: 4, ref expected, ref actual })
                if expected == "watch" && actual == "bid"
        ));
    }

    #[test]
    fn header_only_file_loads_as_empty_table() {
        let csv = "aID,title,datetime,access,watch,bid\n";
        let table = read_table(Cursor::new(csv)).unwrap();
        assert!(table.is_empty());
    }
}
