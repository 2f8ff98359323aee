use once_cell::sync::Lazy;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter_vec, HistogramVec,
    IntCounterVec,
};

pub static GET_ROW_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "wide_column_store_get_row_latency_seconds",
        "get_row latency in seconds",
        &["dataset"],
        exponential_buckets(1e-6, 2.0, 22).unwrap(),
    )
    .unwrap()
});

pub static CELL_ITER_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "wide_column_store_cell_iter_latency_seconds",
        "per-cell prefix iteration latency in seconds",
        &["dataset"],
        exponential_buckets(1e-6, 2.0, 22).unwrap(),
    )
    .unwrap()
});

pub static KEYS_READ: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "wide_column_store_keys_read",
        "number of keys read while serving get_row",
        &["dataset"]
    )
    .unwrap()
});

pub static BATCH_COMMIT_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "wide_column_store_batch_commit_latency_seconds",
        "put_row/delete_row batch commit latency in seconds",
        &["dataset"],
        exponential_buckets(1e-4, 2.0, 20).unwrap(),
    )
    .unwrap()
});

pub static BATCH_COMMIT_BYTES: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "wide_column_store_batch_commit_bytes",
        "put_row/delete_row batch commit size in bytes",
        &["dataset"],
        exponential_buckets(16.0, 4.0, 16).unwrap(),
    )
    .unwrap()
});

pub static DESERIALIZE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "wide_column_store_deserialize_failures",
        "number of stored values skipped because the active serializer could not decode them",
        &["dataset"]
    )
    .unwrap()
});
