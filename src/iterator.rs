//! Bounded forward iteration over a single key prefix, the one read
//! primitive every higher-level read is built from.

use rocksdb::DBRawIterator;

use crate::error::{Error, Result};

/// Forward-iterates a column family starting at `seek_key`, yielding raw
/// `(key, value)` pairs until the first key that does not start with
/// `prefix`, or the end of the column family.
pub(crate) struct PrefixIterator<'a> {
    inner: DBRawIterator<'a>,
    prefix: Vec<u8>,
    done: bool,
}

impl<'a> PrefixIterator<'a> {
    pub(crate) fn new(mut inner: DBRawIterator<'a>, prefix: Vec<u8>, seek_key: &[u8]) -> Self {
        inner.seek(seek_key);
        Self {
            inner,
            prefix,
            done: false,
        }
    }
}

impl<'a> Iterator for PrefixIterator<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.inner.valid() {
            self.done = true;
            return self.inner.status().err().map(|e| Err(Error::from(e)));
        }
        let key = self.inner.key().expect("iterator validity checked above");
        if !key.starts_with(&self.prefix) {
            self.done = true;
            return None;
        }
        let key = key.to_vec();
        let value = self
            .inner
            .value()
            .expect("iterator validity checked above")
            .to_vec();
        self.inner.next();
        Some(Ok((key, value)))
    }
}

impl<'a> std::iter::FusedIterator for PrefixIterator<'a> {}
