//! A thin, byte-oriented wrapper around a RocksDB instance opened with a
//! fixed set of column families, one per dataset. [`Store`] knows nothing
//! about rows, columns or timestamps; that encoding lives one layer up, in
//! [`crate::key_codec`] and [`crate::value`].

use std::path::Path;

use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DBRawIterator, Options, WriteBatch, DB};

use crate::error::Result;

pub struct Store {
    name: &'static str,
    db: DB,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("name", &self.name).finish()
    }
}

impl Store {
    pub(crate) fn open(
        path: impl AsRef<Path>,
        name: &'static str,
        column_families: impl IntoIterator<Item = String>,
        db_opts: &Options,
    ) -> Result<Self> {
        let descriptors: Vec<ColumnFamilyDescriptor> = column_families
            .into_iter()
            .map(|cf| ColumnFamilyDescriptor::new(cf, Options::default()))
            .collect();
        let db = DB::open_cf_descriptors(db_opts, path, descriptors).map_err(|e| {
            crate::error::Error::Storage(anyhow::anyhow!("failed to open store {name}: {e}"))
        })?;
        Ok(Self { name, db })
    }

    pub(crate) fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            crate::error::Error::Storage(anyhow::anyhow!(
                "column family {name} is not open on store {}",
                self.name
            ))
        })
    }

    pub(crate) fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db.write(batch)?;
        Ok(())
    }

    pub(crate) fn raw_iterator<'a>(&'a self, handle: &'a ColumnFamily) -> DBRawIterator<'a> {
        self.db.raw_iterator_cf(handle)
    }

    pub(crate) fn flush_cf(&self, handle: &ColumnFamily) -> Result<()> {
        Ok(self.db.flush_cf(handle)?)
    }
}
