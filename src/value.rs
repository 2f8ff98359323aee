//! Pluggable value (de)serialization, chosen once at [`crate::Database::open`]
//! time and monomorphized into the engine structs.

use crate::error::CodecError;

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Bidirectional map between an application-level value and the byte string
/// stored for a cell version.
///
/// Implementations must reject values that encode to zero bytes: an empty
/// byte string is reserved to distinguish "absent" from "present but empty"
/// at the storage layer.
pub trait ValueSerializer: std::fmt::Debug + Send + Sync + 'static {
    type Value: Clone + std::fmt::Debug + PartialEq + Send + Sync + 'static;

    fn serialize(&self, value: &Self::Value) -> CodecResult<Vec<u8>>;
    fn deserialize(&self, bytes: &[u8]) -> CodecResult<Self::Value>;
}

/// Default serializer: values are UTF-8 strings, stored verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8ValueSerializer;

impl ValueSerializer for Utf8ValueSerializer {
    type Value = String;

    fn serialize(&self, value: &String) -> CodecResult<Vec<u8>> {
        if value.is_empty() {
            return Err(CodecError::Wrapped(anyhow::anyhow!(
                "value must not be empty"
            )));
        }
        Ok(value.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> CodecResult<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::Wrapped(e.into()))
    }
}

/// General-purpose serializer: values are arbitrary [`serde_json::Value`]s,
/// stored as their JSON encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonValueSerializer;

impl ValueSerializer for JsonValueSerializer {
    type Value = serde_json::Value;

    fn serialize(&self, value: &serde_json::Value) -> CodecResult<Vec<u8>> {
        if value.is_null() {
            return Err(CodecError::Wrapped(anyhow::anyhow!(
                "value must not be JSON null"
            )));
        }
        let bytes = serde_json::to_vec(value).map_err(|e| CodecError::Wrapped(e.into()))?;
        if bytes.is_empty() {
            return Err(CodecError::Wrapped(anyhow::anyhow!(
                "value must not be empty"
            )));
        }
        Ok(bytes)
    }

    fn deserialize(&self, bytes: &[u8]) -> CodecResult<serde_json::Value> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Wrapped(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_serializer_round_trips() {
        let s = Utf8ValueSerializer;
        let bytes = s.serialize(&"hello".to_string()).unwrap();
        assert_eq!(s.deserialize(&bytes).unwrap(), "hello");
    }

    #[test]
    fn utf8_serializer_rejects_empty_value() {
        let s = Utf8ValueSerializer;
        assert!(s.serialize(&"".to_string()).is_err());
    }

    #[test]
    fn json_serializer_round_trips() {
        let s = JsonValueSerializer;
        let value = serde_json::json!({"a": 1, "b": [1,2,3]});
        let bytes = s.serialize(&value).unwrap();
        assert_eq!(s.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn json_serializer_rejects_null() {
        let s = JsonValueSerializer;
        assert!(s.serialize(&serde_json::Value::Null).is_err());
    }
}
