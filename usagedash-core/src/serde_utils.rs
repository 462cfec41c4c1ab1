use crate::errors::{Result, UsageDashError};

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| UsageDashError::SerializationError(err.to_string()))
}

/// Deserializes JSON bytes.
pub fn from_json_bytes<T: serde::de::DeserializeOwned>(input: &[u8]) -> Result<T> {
    serde_json::from_slice(input)
        .map_err(|err| UsageDashError::DeserializationError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_output_is_indented() {
        let value = serde_json::json!({"total_events": 3});
        let json = to_pretty_json(&value).expect("serialize");
        assert!(json.contains("\n  \"total_events\": 3"));
    }

    #[test]
    fn malformed_bytes_report_deserialization_error() {
        let err = from_json_bytes::<serde_json::Value>(b"[{\"id\": ").unwrap_err();
        assert!(matches!(err, UsageDashError::DeserializationError(_)));
    }
}
