//! Passthrough RocksDB engine options, applied uniformly to every column
//! family at open time.

use rocksdb::Options;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub max_open_files: i32,
    pub max_total_wal_size: u64,
    pub max_background_jobs: i32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_open_files: 5_000,
            max_total_wal_size: 1 << 30,
            max_background_jobs: 16,
        }
    }
}

pub(crate) fn gen_rocksdb_options(config: &StoreOptions) -> Options {
    let mut db_opts = Options::default();
    db_opts.create_if_missing(true);
    db_opts.create_missing_column_families(true);
    db_opts.set_max_open_files(config.max_open_files);
    db_opts.set_max_total_wal_size(config.max_total_wal_size);
    db_opts.set_max_background_jobs(config.max_background_jobs);
    db_opts.set_atomic_flush(true);
    db_opts
}
