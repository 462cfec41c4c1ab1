use serde::{Deserialize, Serialize};

/// Wrapper around every non-binary response of the analytics API.
///
/// Only `data` is meaningful to callers; `status` and `message` are kept so
/// the envelope round-trips but are never surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_success_envelope() {
        let raw = json!({"status": "success", "message": "success", "data": {"ok": true}});
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(raw).expect("decode");
        assert_eq!(envelope.into_data(), Some(json!({"ok": true})));
    }

    #[test]
    fn missing_data_decodes_as_none() {
        let raw = json!({"status": "error", "message": "Export failed"});
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(raw).expect("decode");
        assert!(envelope.into_data().is_none());
    }
}
