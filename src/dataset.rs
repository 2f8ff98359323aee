//! Resolves a dataset name to a column family on the shared [`Store`], and
//! owns the store handle every engine operates through.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::rocksdb_options::{gen_rocksdb_options, StoreOptions};
use crate::store::Store;

/// The implicit dataset used whenever a caller does not name one.
pub const DEFAULT_DATASET: &str = "default";

const DB_NAME: &str = "wide-column-store";

#[derive(Debug)]
pub(crate) struct DatasetManager {
    store: Arc<Store>,
    declared: HashSet<String>,
}

impl DatasetManager {
    pub(crate) fn open(
        path: impl AsRef<Path>,
        declared_datasets: &[String],
        options: &StoreOptions,
    ) -> Result<Self> {
        let mut declared: HashSet<String> = declared_datasets.iter().cloned().collect();
        declared.insert(DEFAULT_DATASET.to_string());

        let db_opts = gen_rocksdb_options(options);
        let store = Store::open(path, DB_NAME, declared.iter().cloned(), &db_opts)?;

        Ok(Self {
            store: Arc::new(store),
            declared,
        })
    }

    pub(crate) fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(String::as_str)
    }

    /// Resolves an optional dataset name to the column family that serves
    /// it. `None` resolves to [`DEFAULT_DATASET`].
    pub(crate) fn resolve<'a>(&'a self, dataset: Option<&'a str>) -> Result<&'a str> {
        match dataset {
            None => Ok(DEFAULT_DATASET),
            Some(name) => {
                if self.declared.contains(name) {
                    Ok(name)
                } else {
                    Err(Error::UnknownDataset(name.to_string()))
                }
            }
        }
    }
}
