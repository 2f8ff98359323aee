//! Serves `get_row` by decoding the output of a single bounded forward
//! prefix iteration: one scan under `row_prefix(row)` when no columns are
//! named, or one scan under `cell_prefix(row, column)` per named column.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::iterator::PrefixIterator;
use crate::key_codec::KeyCodec;
use crate::metrics;
use crate::store::Store;
use crate::value::ValueSerializer;

pub(crate) struct ReadEngine<K, V> {
    store: Arc<Store>,
    codec: K,
    serializer: V,
}

impl<K: KeyCodec, V: ValueSerializer> ReadEngine<K, V> {
    pub(crate) fn new(store: Arc<Store>, codec: K, serializer: V) -> Self {
        Self {
            store,
            codec,
            serializer,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn get_row(
        &self,
        dataset: &str,
        row: &str,
        columns: Option<&[String]>,
        num_versions: u32,
        start_ts_ms: Option<u64>,
        end_ts_ms: Option<u64>,
    ) -> Result<HashMap<String, Vec<(u64, V::Value)>>> {
        if row.is_empty() {
            return Err(Error::InvalidRequest("row key must not be empty".into()));
        }
        if num_versions == 0 {
            return Err(Error::InvalidRequest("num_versions must be positive".into()));
        }
        if let (Some(start), Some(end)) = (start_ts_ms, end_ts_ms) {
            if start > end {
                return Ok(HashMap::new());
            }
        }
        if let Some(cols) = columns {
            if cols.iter().any(String::is_empty) {
                return Err(Error::InvalidRequest("column name must not be empty".into()));
            }
            if cols.is_empty() {
                // An explicit empty column list asks for nothing.
                return Ok(HashMap::new());
            }
        }

        let _timer = metrics::GET_ROW_LATENCY_SECONDS
            .with_label_values(&[dataset])
            .start_timer();
        let handle = self.store.cf_handle(dataset)?;

        let out = match columns {
            None => {
                let prefix = self.codec.row_prefix(row).map_err(Error::invalid)?;
                let raw = self.store.raw_iterator(handle);
                let iter = PrefixIterator::new(raw, prefix.clone(), &prefix);
                self.collect_by_column(dataset, iter, num_versions, start_ts_ms, end_ts_ms)?
            }
            Some(cols) => {
                let mut out = HashMap::with_capacity(cols.len());
                for column in cols {
                    let prefix = self
                        .codec
                        .cell_prefix(row, column)
                        .map_err(Error::invalid)?;
                    let seek_key = match end_ts_ms {
                        Some(end_ts) => self
                            .codec
                            .encode(row, column, end_ts)
                            .map_err(Error::invalid)?,
                        None => prefix.clone(),
                    };
                    let raw = self.store.raw_iterator(handle);
                    let iter = PrefixIterator::new(raw, prefix, &seek_key);
                    let versions = self.collect_cell(dataset, iter, num_versions, start_ts_ms)?;
                    if !versions.is_empty() {
                        out.insert(column.clone(), versions);
                    }
                }
                out
            }
        };

        Ok(out)
    }

    /// Collects one column's decoded versions from an iterator already
    /// bounded to that cell, newest first, stopping as soon as either bound
    /// is hit: `num_versions` is collected, or a timestamp older than
    /// `start_ts_ms` is seen.
    fn collect_cell<'a>(
        &self,
        dataset: &str,
        iter: PrefixIterator<'a>,
        num_versions: u32,
        start_ts_ms: Option<u64>,
    ) -> Result<Vec<(u64, V::Value)>> {
        let _timer = metrics::CELL_ITER_LATENCY_SECONDS
            .with_label_values(&[dataset])
            .start_timer();
        let mut out = Vec::new();
        let mut keys_read = 0u64;
        for item in iter {
            keys_read += 1;
            let (key, value) = item?;
            let (_, _, timestamp_ms) = self.codec.decode(&key).map_err(Error::Serialization)?;
            if let Some(start) = start_ts_ms {
                if timestamp_ms < start {
                    break;
                }
            }
            match self.serializer.deserialize(&value) {
                Ok(decoded) => out.push((timestamp_ms, decoded)),
                Err(e) => {
                    metrics::DESERIALIZE_FAILURES
                        .with_label_values(&[dataset])
                        .inc();
                    tracing::warn!(error = %e, "skipping cell version that failed to deserialize");
                }
            }
            if out.len() as u32 >= num_versions {
                break;
            }
        }
        metrics::KEYS_READ
            .with_label_values(&[dataset])
            .inc_by(keys_read);
        Ok(out)
    }

    /// Same decode/filter/truncate logic as [`Self::collect_cell`], but
    /// applied across one forward pass over an entire row: keys for a given
    /// column are contiguous and newest-first, so grouping falls out of the
    /// scan order.
    fn collect_by_column<'a>(
        &self,
        dataset: &str,
        iter: PrefixIterator<'a>,
        num_versions: u32,
        start_ts_ms: Option<u64>,
        end_ts_ms: Option<u64>,
    ) -> Result<HashMap<String, Vec<(u64, V::Value)>>> {
        let mut out: HashMap<String, Vec<(u64, V::Value)>> = HashMap::new();
        let mut keys_read = 0u64;
        for item in iter {
            keys_read += 1;
            let (key, value) = item?;
            let (_, column, timestamp_ms) =
                self.codec.decode(&key).map_err(Error::Serialization)?;
            if let Some(start) = start_ts_ms {
                if timestamp_ms < start {
                    continue;
                }
            }
            if let Some(end) = end_ts_ms {
                if timestamp_ms > end {
                    continue;
                }
            }
            let entry = out.entry(column).or_default();
            if (entry.len() as u32) < num_versions {
                match self.serializer.deserialize(&value) {
                    Ok(decoded) => entry.push((timestamp_ms, decoded)),
                    Err(e) => {
                        metrics::DESERIALIZE_FAILURES
                            .with_label_values(&[dataset])
                            .inc();
                        tracing::warn!(error = %e, "skipping cell version that failed to deserialize");
                    }
                }
            }
        }
        out.retain(|_, versions| !versions.is_empty());
        metrics::KEYS_READ
            .with_label_values(&[dataset])
            .inc_by(keys_read);
        Ok(out)
    }
}
