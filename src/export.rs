//! Arrow/Parquet export of chart tables
//!
//! Chart rows map onto a columnar batch one-to-one: the key column
//! (`epoch: Int64` or `subject: Utf8`) is non-nullable, and every data
//! column is a nullable `Float64`. A row without a point for a column
//! becomes a null, never a 0.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use tracing::info;

use crate::radar::RadarRow;
use crate::series::{column_names, ChartRow};
use crate::{Error, Result};

/// Convert line-chart rows into a record batch.
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the batch cannot be assembled.
pub fn chart_to_record_batch(rows: &[ChartRow]) -> Result<RecordBatch> {
    let columns = column_names(rows);

    let mut fields = Vec::with_capacity(columns.len() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len() + 1);

    fields.push(Field::new("epoch", DataType::Int64, false));
    arrays.push(Arc::new(Int64Array::from_iter_values(
        rows.iter().map(|row| row.epoch),
    )));

    for column in &columns {
        fields.push(Field::new(column, DataType::Float64, true));
        arrays.push(Arc::new(
            rows.iter().map(|row| row.get(column)).collect::<Float64Array>(),
        ));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Convert radar rows into a record batch.
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the batch cannot be assembled.
pub fn radar_to_record_batch(rows: &[RadarRow]) -> Result<RecordBatch> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for column in row.values.keys() {
            if !columns.contains(&column.as_str()) {
                columns.push(column);
            }
        }
    }

    let mut fields = Vec::with_capacity(columns.len() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len() + 1);

    fields.push(Field::new("subject", DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|row| row.subject.as_str()),
    )));

    for column in columns {
        fields.push(Field::new(column, DataType::Float64, true));
        arrays.push(Arc::new(
            rows.iter().map(|row| row.get(column)).collect::<Float64Array>(),
        ));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Write one batch to a Parquet file.
///
/// # Errors
///
/// Returns [`Error::StorageError`] if the file cannot be created or written.
pub fn write_parquet<P: AsRef<Path>>(path: P, batch: &RecordBatch) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet file: {e}")))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(batch)
        .map_err(|e| Error::StorageError(format!("Failed to write record batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::StorageError(format!("Failed to finalize Parquet file: {e}")))?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet export");
    Ok(())
}

/// Read every batch of a Parquet file.
///
/// # Errors
///
/// Returns [`Error::StorageError`] if the file cannot be read or parsed.
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Vec<RecordBatch>> {
    let file = File::open(path.as_ref())
        .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;

    let reader = builder
        .build()
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch =
            batch.map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
        batches.push(batch);
    }
    Ok(batches)
}
