//! Encodes the `(row, column, timestamp)` triple identifying a cell version
//! into a single ordered byte key.
//!
//! Every key ends in an inverted, big-endian timestamp so that an ascending
//! lexicographic scan over a row or a cell visits versions newest-first,
//! without a reverse iterator.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::CodecError;

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// `INV = (2^64 - 1) - timestamp_ms`.
fn invert_timestamp(timestamp_ms: u64) -> u64 {
    u64::MAX - timestamp_ms
}

fn uninvert_timestamp(inv: u64) -> u64 {
    u64::MAX - inv
}

/// Bidirectional map between a `(row, column, timestamp_ms)` triple and an
/// ordered byte key, plus the prefixes used to bound a scan.
///
/// Implementations must guarantee:
/// - for a fixed `(row, column)`, keys sort by strictly decreasing
///   `timestamp_ms`;
/// - [`KeyCodec::row_prefix`] is a prefix of every key of that row and of no
///   other row;
/// - [`KeyCodec::cell_prefix`] is a prefix of every key of that
///   `(row, column)` and of no other cell.
pub trait KeyCodec: std::fmt::Debug + Send + Sync + 'static {
    fn encode(&self, row: &str, column: &str, timestamp_ms: u64) -> CodecResult<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> CodecResult<(String, String, u64)>;
    fn row_prefix(&self, row: &str) -> CodecResult<Vec<u8>>;
    fn cell_prefix(&self, row: &str, column: &str) -> CodecResult<Vec<u8>>;
}

const SEPARATOR: u8 = 0x00;

/// Key layout: `row || 0x00 || column || 0x00 || be64(INV)`.
///
/// Rows and columns are rejected if they contain the separator byte, since
/// that would make the row/column boundary ambiguous on decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeparatorKeyCodec;

impl SeparatorKeyCodec {
    fn check(s: &str) -> CodecResult<()> {
        if s.as_bytes().contains(&SEPARATOR) {
            return Err(CodecError::SeparatorByteInContent);
        }
        Ok(())
    }
}

impl KeyCodec for SeparatorKeyCodec {
    fn encode(&self, row: &str, column: &str, timestamp_ms: u64) -> CodecResult<Vec<u8>> {
        Self::check(row)?;
        Self::check(column)?;
        let mut out = Vec::with_capacity(row.len() + column.len() + 10);
        out.extend_from_slice(row.as_bytes());
        out.push(SEPARATOR);
        out.extend_from_slice(column.as_bytes());
        out.push(SEPARATOR);
        out.write_u64::<BigEndian>(invert_timestamp(timestamp_ms))
            .expect("writing to a Vec is infallible");
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<(String, String, u64)> {
        if bytes.len() < 8 {
            return Err(CodecError::InvalidKeyLength {
                expected: 8,
                got: bytes.len(),
            });
        }
        let (key_part, ts_part) = bytes.split_at(bytes.len() - 8);
        let row_end = key_part
            .iter()
            .position(|&b| b == SEPARATOR)
            .ok_or_else(|| CodecError::Wrapped(anyhow::anyhow!("key is missing row separator")))?;
        let (row, rest) = (&key_part[..row_end], &key_part[row_end + 1..]);
        let column_end = rest
            .iter()
            .position(|&b| b == SEPARATOR)
            .ok_or_else(|| {
                CodecError::Wrapped(anyhow::anyhow!("key is missing column separator"))
            })?;
        let column = &rest[..column_end];

        let row = String::from_utf8(row.to_vec()).map_err(|e| CodecError::Wrapped(e.into()))?;
        let column =
            String::from_utf8(column.to_vec()).map_err(|e| CodecError::Wrapped(e.into()))?;
        let inv = std::io::Cursor::new(ts_part)
            .read_u64::<BigEndian>()
            .map_err(|e| CodecError::Wrapped(e.into()))?;
        Ok((row, column, uninvert_timestamp(inv)))
    }

    fn row_prefix(&self, row: &str) -> CodecResult<Vec<u8>> {
        Self::check(row)?;
        let mut out = Vec::with_capacity(row.len() + 1);
        out.extend_from_slice(row.as_bytes());
        out.push(SEPARATOR);
        Ok(out)
    }

    fn cell_prefix(&self, row: &str, column: &str) -> CodecResult<Vec<u8>> {
        Self::check(row)?;
        Self::check(column)?;
        let mut out = Vec::with_capacity(row.len() + column.len() + 2);
        out.extend_from_slice(row.as_bytes());
        out.push(SEPARATOR);
        out.extend_from_slice(column.as_bytes());
        out.push(SEPARATOR);
        Ok(out)
    }
}

/// Key layout: `be32(len(row)) || row || be32(len(column)) || column || be64(INV)`.
///
/// Unlike [`SeparatorKeyCodec`], row and column may contain arbitrary bytes,
/// including `0x00`, since the boundary is carried by an explicit length.
#[derive(Debug, Default, Clone, Copy)]
pub struct LengthPrefixedKeyCodec;

impl KeyCodec for LengthPrefixedKeyCodec {
    fn encode(&self, row: &str, column: &str, timestamp_ms: u64) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(row.len() + column.len() + 16);
        out.write_u32::<BigEndian>(row.len() as u32)
            .expect("writing to a Vec is infallible");
        out.extend_from_slice(row.as_bytes());
        out.write_u32::<BigEndian>(column.len() as u32)
            .expect("writing to a Vec is infallible");
        out.extend_from_slice(column.as_bytes());
        out.write_u64::<BigEndian>(invert_timestamp(timestamp_ms))
            .expect("writing to a Vec is infallible");
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<(String, String, u64)> {
        let mut cursor = std::io::Cursor::new(bytes);
        let row_len = cursor
            .read_u32::<BigEndian>()
            .map_err(|e| CodecError::Wrapped(e.into()))? as usize;
        let mut row_buf = vec![0u8; row_len];
        std::io::Read::read_exact(&mut cursor, &mut row_buf)
            .map_err(|e| CodecError::Wrapped(e.into()))?;
        let column_len = cursor
            .read_u32::<BigEndian>()
            .map_err(|e| CodecError::Wrapped(e.into()))? as usize;
        let mut column_buf = vec![0u8; column_len];
        std::io::Read::read_exact(&mut cursor, &mut column_buf)
            .map_err(|e| CodecError::Wrapped(e.into()))?;
        let inv = cursor
            .read_u64::<BigEndian>()
            .map_err(|e| CodecError::Wrapped(e.into()))?;

        let row = String::from_utf8(row_buf).map_err(|e| CodecError::Wrapped(e.into()))?;
        let column = String::from_utf8(column_buf).map_err(|e| CodecError::Wrapped(e.into()))?;
        Ok((row, column, uninvert_timestamp(inv)))
    }

    fn row_prefix(&self, row: &str) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(row.len() + 4);
        out.write_u32::<BigEndian>(row.len() as u32)
            .expect("writing to a Vec is infallible");
        out.extend_from_slice(row.as_bytes());
        Ok(out)
    }

    fn cell_prefix(&self, row: &str, column: &str) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(row.len() + column.len() + 8);
        out.write_u32::<BigEndian>(row.len() as u32)
            .expect("writing to a Vec is infallible");
        out.extend_from_slice(row.as_bytes());
        out.write_u32::<BigEndian>(column.len() as u32)
            .expect("writing to a Vec is infallible");
        out.extend_from_slice(column.as_bytes());
        Ok(out)
    }
}

/// Returns the lexicographically smallest byte string that is strictly
/// greater than every string with `prefix` as a prefix, i.e. the exclusive
/// upper bound for a prefix scan. `None` if `prefix` is all `0xFF` bytes (or
/// empty), in which case no such bound is representable.
pub(crate) fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut out = prefix.to_vec();
    for i in (0..out.len()).rev() {
        if out[i] != 0xFF {
            out[i] += 1;
            out.truncate(i + 1);
            return Some(out);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_codec_round_trips() {
        let codec = SeparatorKeyCodec;
        let key = codec.encode("row-a", "col-b", 1_700_000_000_000).unwrap();
        let (row, column, ts) = codec.decode(&key).unwrap();
        assert_eq!(row, "row-a");
        assert_eq!(column, "col-b");
        assert_eq!(ts, 1_700_000_000_000);
    }

    #[test]
    fn separator_codec_rejects_embedded_separator() {
        let codec = SeparatorKeyCodec;
        assert!(codec.encode("row\0x", "col", 0).is_err());
        assert!(codec.encode("row", "col\0y", 0).is_err());
    }

    #[test]
    fn separator_codec_orders_newest_first() {
        let codec = SeparatorKeyCodec;
        let older = codec.encode("r", "c", 100).unwrap();
        let newer = codec.encode("r", "c", 200).unwrap();
        assert!(newer < older, "higher timestamp must sort first");
    }

    #[test]
    fn separator_codec_bounds_row_prefix() {
        let codec = SeparatorKeyCodec;
        let prefix = codec.row_prefix("row").unwrap();
        let own = codec.encode("row", "col", 5).unwrap();
        let other = codec.encode("rowx", "col", 5).unwrap();
        assert!(own.starts_with(&prefix));
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn length_prefixed_codec_round_trips_binary_content() {
        let codec = LengthPrefixedKeyCodec;
        let row = "row\u{0}with-nul";
        let column = "col\u{0}umn";
        let key = codec.encode(row, column, 42).unwrap();
        let (decoded_row, decoded_column, ts) = codec.decode(&key).unwrap();
        assert_eq!(decoded_row, row);
        assert_eq!(decoded_column, column);
        assert_eq!(ts, 42);
    }

    #[test]
    fn length_prefixed_codec_bounds_cell_prefix() {
        let codec = LengthPrefixedKeyCodec;
        let prefix = codec.cell_prefix("row", "col").unwrap();
        let own = codec.encode("row", "col", 5).unwrap();
        let other_column = codec.encode("row", "colx", 5).unwrap();
        let other_row = codec.encode("rowx", "col", 5).unwrap();
        assert!(own.starts_with(&prefix));
        assert!(!other_column.starts_with(&prefix));
        assert!(!other_row.starts_with(&prefix));
    }

    #[test]
    fn prefix_successor_increments_last_non_ff_byte() {
        assert_eq!(prefix_successor(&[1, 2, 3]), Some(vec![1, 2, 4]));
        assert_eq!(prefix_successor(&[1, 0xFF]), Some(vec![2]));
        assert_eq!(prefix_successor(&[0xFF, 0xFF]), None);
    }
}
