//! Translates `put_row` / `delete_row` requests into a single atomic write
//! batch against the shared [`Store`].

use std::sync::Arc;

use rocksdb::{ColumnFamily, WriteBatch};

use crate::clock::DynClock;
use crate::error::{Error, Result};
use crate::key_codec::{prefix_successor, KeyCodec};
use crate::metrics;
use crate::store::Store;
use crate::value::ValueSerializer;

/// One `(column, value, timestamp)` entry of a `put_row` call.
/// `timestamp_ms: None` requests the current wall-clock time.
#[derive(Debug, Clone)]
pub struct PutItem<V> {
    pub column: String,
    pub value: V,
    pub timestamp_ms: Option<u64>,
}

impl<V> PutItem<V> {
    pub fn new(column: impl Into<String>, value: V, timestamp_ms: Option<u64>) -> Self {
        Self {
            column: column.into(),
            value,
            timestamp_ms,
        }
    }
}

pub(crate) struct WriteEngine<K, V> {
    store: Arc<Store>,
    codec: K,
    serializer: V,
    clock: DynClock,
}

impl<K: KeyCodec, V: ValueSerializer> WriteEngine<K, V> {
    pub(crate) fn new(store: Arc<Store>, codec: K, serializer: V, clock: DynClock) -> Self {
        Self {
            store,
            codec,
            serializer,
            clock,
        }
    }

    pub(crate) fn put_row(&self, dataset: &str, row: &str, items: &[PutItem<V::Value>]) -> Result<()> {
        if row.is_empty() {
            return Err(Error::InvalidRequest("row key must not be empty".into()));
        }
        if items.is_empty() {
            return Err(Error::InvalidRequest(
                "put_row requires at least one item".into(),
            ));
        }

        let handle = self.store.cf_handle(dataset)?;
        let mut batch = WriteBatch::default();
        let mut batch_bytes = 0usize;
        for item in items {
            if item.column.is_empty() {
                return Err(Error::InvalidRequest("column name must not be empty".into()));
            }
            let timestamp_ms = item.timestamp_ms.unwrap_or_else(|| self.clock.now_ms());
            let key = self
                .codec
                .encode(row, &item.column, timestamp_ms)
                .map_err(Error::invalid)?;
            let value = self.serializer.serialize(&item.value).map_err(Error::invalid)?;
            batch_bytes += key.len() + value.len();
            batch.put_cf(handle, key, value);
        }

        let _timer = metrics::BATCH_COMMIT_LATENCY_SECONDS
            .with_label_values(&[dataset])
            .start_timer();
        self.store.write(batch)?;
        metrics::BATCH_COMMIT_BYTES
            .with_label_values(&[dataset])
            .observe(batch_bytes as f64);
        Ok(())
    }

    pub(crate) fn delete_row(
        &self,
        dataset: &str,
        row: &str,
        columns: Option<&[String]>,
        specific_timestamps_ms: Option<&[u64]>,
    ) -> Result<()> {
        if row.is_empty() {
            return Err(Error::InvalidRequest("row key must not be empty".into()));
        }
        if columns.is_none() && specific_timestamps_ms.is_some() {
            return Err(Error::InvalidRequest(
                "specific_timestamps_ms requires column_names to be present".into(),
            ));
        }
        if let Some(cols) = columns {
            if cols.iter().any(String::is_empty) {
                return Err(Error::InvalidRequest("column name must not be empty".into()));
            }
        }

        let handle = self.store.cf_handle(dataset)?;
        let mut batch = WriteBatch::default();

        match (columns, specific_timestamps_ms) {
            (None, None) => {
                let prefix = self.codec.row_prefix(row).map_err(Error::invalid)?;
                self.delete_prefix(&mut batch, handle, &prefix)?;
            }
            (Some(cols), None) => {
                for column in cols {
                    let prefix = self
                        .codec
                        .cell_prefix(row, column)
                        .map_err(Error::invalid)?;
                    self.delete_prefix(&mut batch, handle, &prefix)?;
                }
            }
            (Some(cols), Some(timestamps)) => {
                for column in cols {
                    for &timestamp_ms in timestamps {
                        let key = self
                            .codec
                            .encode(row, column, timestamp_ms)
                            .map_err(Error::invalid)?;
                        batch.delete_cf(handle, key);
                    }
                }
            }
            (None, Some(_)) => unreachable!("rejected above"),
        }

        let _timer = metrics::BATCH_COMMIT_LATENCY_SECONDS
            .with_label_values(&[dataset])
            .start_timer();
        self.store.write(batch)?;
        Ok(())
    }

    /// Deletes every key sharing `prefix`, preferring a single range-delete
    /// and falling back to a bounded iteration when `prefix` has no
    /// representable successor (only possible for all-`0xFF` prefixes).
    fn delete_prefix(
        &self,
        batch: &mut WriteBatch,
        handle: &ColumnFamily,
        prefix: &[u8],
    ) -> Result<()> {
        match prefix_successor(prefix) {
            Some(end) => {
                batch.delete_range_cf(handle, prefix, end);
            }
            None => {
                let mut iter = self.store.raw_iterator(handle);
                iter.seek(prefix);
                while iter.valid() {
                    let key = iter.key().expect("iterator validity checked above");
                    if !key.starts_with(prefix) {
                        break;
                    }
                    batch.delete_cf(handle, key.to_vec());
                    iter.next();
                }
                if let Err(e) = iter.status() {
                    return Err(Error::from(e));
                }
            }
        }
        Ok(())
    }
}
