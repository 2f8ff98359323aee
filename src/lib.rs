//! A Bigtable-style wide-column store layered on top of RocksDB column
//! families.
//!
//! Data model: a *dataset* is a tenant namespace backed by one column
//! family. Within a dataset, a *row* holds any number of *columns*, and
//! each column holds any number of timestamped *versions*. Every read is
//! served by a single bounded forward prefix scan; see [`key_codec`] for
//! the byte layout that makes that possible.
//!
//! The active [`key_codec::KeyCodec`] and [`value::ValueSerializer`] are
//! chosen once, at [`Database::open`], and captured by value in the engine
//! structs: there is no dynamic dispatch on the read/write hot path.

mod clock;
mod columns;
mod dataset;
mod error;
mod iterator;
pub mod key_codec;
mod metrics;
mod read;
mod rocksdb_options;
mod store;
pub mod value;
mod write;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

pub use clock::{Clock, DynClock, FixedClock, SystemClock};
pub use columns::IntoColumnNames;
pub use dataset::DEFAULT_DATASET;
pub use error::{CodecError, Error, Result};
pub use key_codec::{KeyCodec, LengthPrefixedKeyCodec, SeparatorKeyCodec};
pub use rocksdb_options::StoreOptions;
pub use value::{JsonValueSerializer, Utf8ValueSerializer, ValueSerializer};
pub use write::PutItem;

use dataset::DatasetManager;
use read::ReadEngine;
use write::WriteEngine;

/// The default cap on versions returned by `get_row` when the caller does
/// not specify one.
pub const DEFAULT_NUM_VERSIONS: u32 = 1;

/// Options governing how a [`Database`] opens its underlying store.
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptions {
    pub store: StoreOptions,
}

struct Inner<K, V: ValueSerializer> {
    datasets: DatasetManager,
    write_engine: WriteEngine<K, V>,
    read_engine: ReadEngine<K, V>,
}

/// The wide-column store facade. `K` selects the key encoding
/// ([`SeparatorKeyCodec`] or [`LengthPrefixedKeyCodec`]); `V` selects the
/// value (de)serialization ([`Utf8ValueSerializer`], [`JsonValueSerializer`],
/// or a custom [`ValueSerializer`]).
///
/// A single `Database` instance is safe to share across threads: `open`ing
/// and `close`ing mutate a small guarded lifecycle flag, while `put_row` /
/// `delete_row` / `get_row` only ever touch the shared, immutable store
/// handle underneath.
pub struct Database<K, V: ValueSerializer> {
    state: RwLock<Option<Arc<Inner<K, V>>>>,
}

impl<K, V> Database<K, V>
where
    K: KeyCodec + Clone,
    V: ValueSerializer + Clone,
{
    /// Opens (creating if absent) a database at `path`, declaring the set of
    /// datasets that may be addressed besides [`DEFAULT_DATASET`]. Uses the
    /// system wall clock for default write timestamps.
    pub fn open<I, S>(
        path: impl AsRef<Path>,
        declared_datasets: I,
        codec: K,
        serializer: V,
        options: DatabaseOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open_with_clock(
            path,
            declared_datasets,
            codec,
            serializer,
            options,
            Arc::new(SystemClock),
        )
    }

    /// Like [`Database::open`], but with an injected [`Clock`], used by
    /// tests that need deterministic version timestamps.
    pub fn open_with_clock<I, S>(
        path: impl AsRef<Path>,
        declared_datasets: I,
        codec: K,
        serializer: V,
        options: DatabaseOptions,
        clock: DynClock,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: Vec<String> = declared_datasets.into_iter().map(Into::into).collect();
        let datasets = DatasetManager::open(path, &declared, &options.store)?;
        let store = datasets.store();
        let write_engine = WriteEngine::new(store.clone(), codec.clone(), serializer.clone(), clock);
        let read_engine = ReadEngine::new(store, codec, serializer);

        tracing::info!(datasets = declared.len(), "opened wide-column database");
        Ok(Self {
            state: RwLock::new(Some(Arc::new(Inner {
                datasets,
                write_engine,
                read_engine,
            }))),
        })
    }

    /// Flushes every dataset's column family and releases the store handle.
    /// Subsequent operations return [`Error::NotOpen`].
    pub fn close(&self) -> Result<()> {
        let inner = {
            let mut guard = self.state.write().expect("lock poisoned");
            guard.take().ok_or(Error::NotOpen)?
        };
        inner.flush_all()?;
        tracing::info!("closed wide-column database");
        Ok(())
    }

    fn inner(&self) -> Result<Arc<Inner<K, V>>> {
        self.state
            .read()
            .expect("lock poisoned")
            .clone()
            .ok_or(Error::NotOpen)
    }

    /// Writes one or more column versions to `row`, atomically. Dataset
    /// `None` targets [`DEFAULT_DATASET`].
    pub fn put_row(
        &self,
        row: &str,
        items: Vec<PutItem<V::Value>>,
        dataset: Option<&str>,
    ) -> Result<()> {
        let inner = self.inner()?;
        let cf = inner.datasets.resolve(dataset)?;
        inner.write_engine.put_row(cf, row, &items)
    }

    /// Deletes from `row`, atomically. See the module documentation for how
    /// `column_names` and `specific_timestamps_ms` combine.
    ///
    /// - `column_names: None`, `specific_timestamps_ms: None`: delete the
    ///   whole row.
    /// - `column_names: Some(_)`, `specific_timestamps_ms: None`: delete
    ///   every version of the named columns.
    /// - `column_names: Some(_)`, `specific_timestamps_ms: Some(_)`:
    ///   delete only the named timestamps of the named columns.
    pub fn delete_row(
        &self,
        row: &str,
        column_names: Option<impl IntoColumnNames>,
        specific_timestamps_ms: Option<Vec<u64>>,
        dataset: Option<&str>,
    ) -> Result<()> {
        let inner = self.inner()?;
        let cf = inner.datasets.resolve(dataset)?;
        let columns = column_names.map(IntoColumnNames::into_column_names);
        inner.write_engine.delete_row(
            cf,
            row,
            columns.as_deref(),
            specific_timestamps_ms.as_deref(),
        )
    }

    /// Reads `row`, returning a map of column name to its versions, newest
    /// first. `column_names: None` reads every column; `Some([])` reads
    /// none. `num_versions` caps each column's result length after any
    /// `start_ts_ms`/`end_ts_ms` filtering; it must be positive.
    #[allow(clippy::too_many_arguments)]
    pub fn get_row(
        &self,
        row: &str,
        column_names: Option<impl IntoColumnNames>,
        num_versions: u32,
        start_ts_ms: Option<u64>,
        end_ts_ms: Option<u64>,
        dataset: Option<&str>,
    ) -> Result<HashMap<String, Vec<(u64, V::Value)>>> {
        let inner = self.inner()?;
        let cf = inner.datasets.resolve(dataset)?;
        let columns = column_names.map(IntoColumnNames::into_column_names);
        inner
            .read_engine
            .get_row(cf, row, columns.as_deref(), num_versions, start_ts_ms, end_ts_ms)
    }

    /// Convenience wrapper over [`Database::get_row`] for the common case of
    /// reading only the latest version of each requested column.
    pub fn get_row_latest(
        &self,
        row: &str,
        column_names: Option<impl IntoColumnNames>,
        dataset: Option<&str>,
    ) -> Result<HashMap<String, Vec<(u64, V::Value)>>> {
        self.get_row(row, column_names, DEFAULT_NUM_VERSIONS, None, None, dataset)
    }
}

impl<K, V: ValueSerializer> Inner<K, V> {
    fn flush_all(&self) -> Result<()> {
        let store = self.datasets.store();
        for name in self.datasets.names() {
            let handle = store.cf_handle(name)?;
            store.flush_cf(handle)?;
        }
        Ok(())
    }
}
