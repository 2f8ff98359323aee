//! Error types surfaced by the wide-column store.

use thiserror::Error;

/// Errors raised while encoding or decoding a key or a value.
///
/// This is an internal detail of [`crate::key_codec`] and [`crate::value`];
/// callers only ever see it wrapped inside [`Error`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid key length: expected at least {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("row and column names must not contain the key separator byte")]
    SeparatorByteInContent,
    #[error("{0}")]
    Wrapped(#[from] anyhow::Error),
}

/// Top level error type for the wide-column store.
#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is malformed: empty row/column, non-positive
    /// `num_versions`, `specific_timestamps_ms` without `column_names`, a
    /// separator byte rejected by the active [`crate::key_codec::KeyCodec`],
    /// or a value rejected by the active [`crate::value::ValueSerializer`].
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The named dataset was never declared at `open` time.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// The database handle has been closed.
    #[error("database is not open")]
    NotOpen,

    /// A key failed to decode, or a deserializer failed on read.
    #[error("serialization error: {0}")]
    Serialization(#[from] CodecError),

    /// The underlying storage engine reported a failure.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// Wraps a codec failure that occurred while encoding an outbound
    /// request (a key to write, or a value handed to the serializer) as an
    /// [`Error::InvalidRequest`]: the caller handed us something that cannot
    /// be represented, not something the store failed to read back.
    pub(crate) fn invalid(e: impl std::fmt::Display) -> Self {
        Error::InvalidRequest(e.to_string())
    }
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
