//! The daily snapshot table.
//!
//! A [`Table`] always has exactly the columns in [`COLUMNS`], in that order.
//! Every way of building one checks this first, so appending never needs to.

use std::sync::{Arc, LazyLock};
use arrow::array::{Array, ArrayRef, AsArray, Int64Array, StringArray};
use arrow::compute::{CastOptions, cast_with_options, concat_batches};
use arrow::datatypes::{DataType, Field, Int64Type, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;

use crate::error::{FormatError, Result};
use crate::models::{ListingSnapshot, TableRow};

/// Column names, in on-disk order.
pub const COLUMNS: [&str; 6] = ["aID", "title", "datetime", "access", "watch", "bid"];

const MISSING_COLUMN: &str = "<missing>";
const NO_COLUMN: &str = "<none>";

static SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(COLUMNS[0], DataType::Utf8, true),
        Field::new(COLUMNS[1], DataType::Utf8, true),
        Field::new(COLUMNS[2], DataType::Utf8, true),
        Field::new(COLUMNS[3], DataType::Int64, true),
        Field::new(COLUMNS[4], DataType::Int64, true),
        Field::new(COLUMNS[5], DataType::Int64, true),
    ]))
});

pub fn schema() -> SchemaRef {
    Arc::clone(&SCHEMA)
}

/// Check that `schema` has exactly the table columns, in order.
pub fn validate_schema(schema: &Schema) -> std::result::Result<(), FormatError> {
    let fields = schema.fields();
    for index in 0..COLUMNS.len().max(fields.len()) {
        let expected = COLUMNS.get(index).copied().unwrap_or(NO_COLUMN);
        let actual = fields
            .get(index)
            .map(|field| field.name().as_str())
            .unwrap_or(MISSING_COLUMN);

        if expected != actual {
            return Err(FormatError {
                index,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// An empty table.
    pub fn new() -> Self {
        Self { batch: RecordBatch::new_empty(schema()) }
    }

    /// Adopt `batch` after checking its columns. Column types are cast to
    /// the table's types; a value that does not cast is an error, not a null.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        validate_schema(&batch.schema())?;

        let options = CastOptions { safe: false, ..Default::default() };
        let columns = batch
            .columns()
            .iter()
            .zip(SCHEMA.fields().iter())
            .map(|(column, field)| cast_with_options(column, field.data_type(), &options))
            .collect::<std::result::Result<Vec<_>, ArrowError>>()?;

        let batch = RecordBatch::try_new(schema(), columns)?;
        Ok(Self { batch })
    }

    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let tables = batches
            .iter()
            .cloned()
            .map(Table::try_new)
            .collect::<Result<Vec<_>>>()?;

        let batch = concat_batches(&schema(), tables.iter().map(|t| &t.batch))?;
        Ok(Self { batch })
    }

    /// A new table with `listing` captured at `captured_at` as its last row.
    pub fn append(&self, listing: &ListingSnapshot, captured_at: NaiveDateTime) -> Result<Self> {
        self.append_row(&TableRow::from_listing(listing, captured_at))
    }

    pub fn append_row(&self, row: &TableRow) -> Result<Self> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![row.auction_id.as_str()])),
            Arc::new(StringArray::from(vec![row.title.as_str()])),
            Arc::new(StringArray::from(vec![row.datetime.as_str()])),
            Arc::new(Int64Array::from(vec![row.access])),
            Arc::new(Int64Array::from(vec![row.watch])),
            Arc::new(Int64Array::from(vec![row.bid])),
        ];
        let row_batch = RecordBatch::try_new(schema(), columns)?;

        let batch = concat_batches(&schema(), [&self.batch, &row_batch])?;
        Ok(Self { batch })
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    pub fn row(&self, index: usize) -> Option<TableRow> {
        if index >= self.len() {
            return None;
        }

        let text = |column: usize| {
            let array = self.batch.column(column).as_string::<i32>();
            if array.is_valid(index) { array.value(index).to_string() } else { String::new() }
        };
        let number = |column: usize| {
            let array = self.batch.column(column).as_primitive::<Int64Type>();
            if array.is_valid(index) { array.value(index) } else { 0 }
        };

        Some(TableRow {
            auction_id: text(0),
            title: text(1),
            datetime: text(2),
            access: number(3),
            watch: number(4),
            bid: number(5),
        })
    }

    pub fn rows(&self) -> Vec<TableRow> {
        (0..self.len()).filter_map(|index| self.row(index)).collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::error::Error;

    fn listing() -> ListingSnapshot {
        ListingSnapshot {
            auction_id: "10000000".to_string(),
            title: "title".to_string(),
            access_count: 10,
            watch_count: 3,
            bid_count: 1,
            ..ListingSnapshot::default()
        }
    }

    fn captured_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn schema_without(column: &str) -> Schema {
        let fields: Vec<Field> = SCHEMA
            .fields()
            .iter()
            .filter(|field| field.name() != column)
            .map(|field| Field::clone(field))
            .collect();
        Schema::new(fields)
    }

    #[test]
    fn new_table_has_fixed_columns() {
        let table = Table::new();
        assert_eq!(table.column_names(), COLUMNS);
        assert!(table.is_empty());
        assert!(validate_schema(&table.batch().schema()).is_ok());
    }

    #[test]
    fn deleting_any_column_fails_validation() {
        for (index, column) in COLUMNS.iter().enumerate() {
            let err = validate_schema(&schema_without(column)).unwrap_err();
            assert_eq!(err.index, index, "deleting {column}");
            assert_eq!(err.expected, *column);
        }
    }

    #[test]
    fn renaming_any_column_fails_validation() {
        for (index, column) in COLUMNS.iter().enumerate() {
            let fields: Vec<Field> = SCHEMA
                .fields()
                .iter()
                .map(|field| {
                    if field.name() == column {
                        Field::new("foo", field.data_type().clone(), true)
                    } else {
                        Field::clone(field)
                    }
                })
                .collect();
            let err = validate_schema(&Schema::new(fields)).unwrap_err();
            assert_eq!(
                err,
                FormatError { index, expected: column.to_string(), actual: "foo".to_string() }
            );
        }
    }

    #[test]
    fn replacing_last_column_reports_both_names() {
        let mut fields: Vec<Field> = schema_without("bid").fields().iter().map(|f| Field::clone(f)).collect();
        fields.push(Field::new("foo", DataType::Utf8, true));
        let err = validate_schema(&Schema::new(fields)).unwrap_err();
        assert_eq!(err.index, 5);
        assert_eq!(err.expected, "bid");
        assert_eq!(err.actual, "foo");
    }

    #[test]
    fn missing_and_extra_columns_are_named() {
        let err = validate_schema(&schema_without("bid")).unwrap_err();
        assert_eq!(err.actual, MISSING_COLUMN);

        let mut fields: Vec<Field> = SCHEMA.fields().iter().map(|f| Field::clone(f)).collect();
        fields.push(Field::new("extra", DataType::Utf8, true));
        let err = validate_schema(&Schema::new(fields)).unwrap_err();
        assert_eq!(err, FormatError { index: 6, expected: NO_COLUMN.to_string(), actual: "extra".to_string() });
    }

    #[test]
    fn reordered_columns_fail_validation() {
        let mut fields: Vec<Field> = SCHEMA.fields().iter().map(|f| Field::clone(f)).collect();
        fields.swap(3, 4);
        let err = validate_schema(&Schema::new(fields)).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.actual, "watch");
    }

    #[test]
    fn append_to_empty_table() {
        let table = Table::new();
        let appended = table.append(&listing(), captured_at()).unwrap();

        assert!(table.is_empty());
        assert_eq!(appended.len(), 1);
        assert_eq!(
            appended.row(0).unwrap(),
            TableRow {
                auction_id: "10000000".to_string(),
                title: "title".to_string(),
                datetime: "2021-01-01T00:00:00".to_string(),
                access: 10,
                watch: 3,
                bid: 1,
            }
        );
        assert_eq!(appended.row(1), None);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let first = listing();
        let second = ListingSnapshot { auction_id: "20000000".to_string(), ..listing() };
        let table = Table::new()
            .append(&first, captured_at())
            .and_then(|t| t.append(&second, captured_at()))
            .unwrap();

        let ids: Vec<String> = table.rows().into_iter().map(|row| row.auction_id).collect();
        assert_eq!(ids, vec!["10000000", "20000000"]);
    }

    #[test]
    fn try_new_rejects_drifted_batch() {
        let schema = Arc::new(schema_without("title"));
        let batch = RecordBatch::new_empty(schema);
        let err = Table::try_new(batch).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError { index: 1, .. })));
    }

    #[test]
    fn try_new_casts_column_types() {
        let fields: Vec<Field> = COLUMNS.iter().map(|name| Field::new(*name, DataType::Utf8, true)).collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["1"])),
            Arc::new(StringArray::from(vec!["t"])),
            Arc::new(StringArray::from(vec!["2021-01-01T00:00:00"])),
            Arc::new(StringArray::from(vec!["7"])),
            Arc::new(StringArray::from(vec!["8"])),
            Arc::new(StringArray::from(vec!["9"])),
        ];
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

        let table = Table::try_new(batch).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!((row.access, row.watch, row.bid), (7, 8, 9));
    }

    #[test]
    fn try_new_rejects_non_numeric_counter() {
        let fields: Vec<Field> = COLUMNS.iter().map(|name| Field::new(*name, DataType::Utf8, true)).collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["1", "2"])),
            Arc::new(StringArray::from(vec!["t", "u"])),
            Arc::new(StringArray::from(vec!["2021-01-01T00:00:00", "2021-01-01T00:00:00"])),
            Arc::new(StringArray::from(vec!["7", "abc"])),
            Arc::new(StringArray::from(vec!["8", "8"])),
            Arc::new(StringArray::from(vec!["9", "9"])),
        ];
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

        let err = Table::try_new(batch).unwrap_err();
        assert!(matches!(err, Error::Arrow(_)));
    }

    #[test]
    fn try_new_keeps_missing_counters_null() {
        let fields: Vec<Field> = COLUMNS.iter().map(|name| Field::new(*name, DataType::Utf8, true)).collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("1")])),
            Arc::new(StringArray::from(vec![Some("t")])),
            Arc::new(StringArray::from(vec![Some("2021-01-01T00:00:00")])),
            Arc::new(StringArray::from(vec![None::<&str>])),
            Arc::new(StringArray::from(vec![Some("8")])),
            Arc::new(StringArray::from(vec![Some("9")])),
        ];
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap();

        let table = Table::try_new(batch).unwrap();
        assert!(table.batch().column(3).is_null(0));
        assert_eq!(table.row(0).unwrap().watch, 8);
    }
}
