//! Integration tests for Arrow/Parquet export

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use metrics_board::export::{
    chart_to_record_batch, radar_to_record_batch, read_parquet, write_parquet,
};
use metrics_board::radar::{RadarProfile, RadarRow};
use metrics_board::series::merge_columns;
use metrics_board::Error;

#[test]
fn test_chart_parquet_round_trip() {
    let rows = merge_columns([
        ("ti-64-8", &[1_i64, 2, 3][..], &[0.5, 0.4, 0.3][..]),
        ("s-64-8", &[2_i64, 3, 4][..], &[0.6, 0.5, 0.45][..]),
    ]);
    let batch = chart_to_record_batch(&rows).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("valid_rmse.parquet");
    write_parquet(&path, &batch).unwrap();

    let batches = read_parquet(&path).unwrap();
    assert_eq!(batches.len(), 1);
    let loaded = &batches[0];
    assert_eq!(loaded.num_rows(), 4);

    let schema = loaded.schema();
    assert_eq!(schema.field(0).name(), "epoch");
    assert_eq!(schema.field(0).data_type(), &DataType::Int64);
    assert!(!schema.field(0).is_nullable());
    assert_eq!(schema.field(1).name(), "ti-64-8");
    assert_eq!(schema.field(2).name(), "s-64-8");
    assert!(schema.field(1).is_nullable());

    let epochs = loaded.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(epochs.values().to_vec(), vec![1, 2, 3, 4]);

    let ti = loaded
        .column_by_name("ti-64-8")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(ti.null_count(), 1);
    assert!(ti.is_null(3));
    assert!((ti.value(2) - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_radar_parquet_round_trip() {
    let rows = vec![
        RadarRow {
            subject: "Train RMSE".to_string(),
            values: [("a".to_string(), 0.1), ("b".to_string(), 0.2)].into(),
        },
        RadarRow {
            subject: "Valid RMSE".to_string(),
            values: [("b".to_string(), 0.3)].into(),
        },
    ];
    let batch = radar_to_record_batch(&rows).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("radar.parquet");
    write_parquet(&path, &batch).unwrap();

    let loaded = &read_parquet(&path).unwrap()[0];
    let subjects = loaded.column(0).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(subjects.value(0), "Train RMSE");
    assert_eq!(subjects.value(1), "Valid RMSE");

    let a = loaded
        .column_by_name("a")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert!(a.is_null(1));
}

#[test]
fn test_default_radar_table_exports() {
    let rows = metrics_board::radar::default_table(&RadarProfile::Full.subjects());
    let batch = radar_to_record_batch(&rows).unwrap();
    assert_eq!(batch.num_rows(), 19);
    assert_eq!(batch.num_columns(), 2);
}

#[test]
fn test_read_missing_file_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_parquet(dir.path().join("absent.parquet")).unwrap_err();
    assert!(matches!(err, Error::StorageError(_)));
    assert!(err.to_string().contains("Failed to open Parquet file"));
}

#[test]
fn test_write_into_missing_directory_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let batch = chart_to_record_batch(&merge_columns([("a", &[1_i64][..], &[1.0][..])])).unwrap();
    let err = write_parquet(dir.path().join("no/such/dir.parquet"), &batch).unwrap_err();
    assert!(matches!(err, Error::StorageError(_)));
}
