//! The canonical response envelope returned by every client call.
//!
//! A Harbory backend answers either with a bare JSON payload or with a payload
//! already shaped as `{status, data?, error?}`. [`normalize`] turns both into
//! an [`ApiResponse`], and [`ApiResponse::failure`] turns a pipeline error into
//! one, so callers only ever inspect a single shape.

use crate::error::{Error, ErrorKind, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status string of a successful canonical response.
pub const STATUS_OK: &str = "ok";

/// Status string of a failed canonical response.
pub const STATUS_ERROR: &str = "error";

/// Message used when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

const ENVELOPE_KEYS: [&str; 3] = ["status", "data", "error"];

/// Rule deciding whether a backend payload is already a canonical envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopePolicy {
    /// Any JSON object with a string `status` field is passed through.
    ///
    /// A `status` of any other JSON type (`{"status": 3}`) does not mark an
    /// envelope, so such a body is wrapped as `data`.
    #[default]
    StatusField,
    /// Only objects whose keys are all among `status`, `data` and `error`
    /// are passed through; anything else is wrapped as data.
    Strict,
}

impl EnvelopePolicy {
    /// Returns true if `body` should be returned as-is rather than wrapped.
    #[must_use]
    pub fn is_envelope(self, body: &Value) -> bool {
        let Some(object) = body.as_object() else {
            return false;
        };
        if !object.get("status").is_some_and(Value::is_string) {
            return false;
        }

        match self {
            Self::StatusField => true,
            Self::Strict => object
                .keys()
                .all(|key| ENVELOPE_KEYS.contains(&key.as_str())),
        }
    }
}

/// Canonical `{status, data?, error?}` result of a client call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// `"ok"`, `"error"` or a backend-defined status string.
    pub status: String,

    /// Payload of a successful call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Classification of a pipeline failure; never on the wire.
    #[serde(skip)]
    pub kind: Option<ErrorKind>,

    /// Top-level keys of a passed-through backend payload that are not part
    /// of the envelope.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    /// Build a successful response wrapping `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            data: Some(data),
            error: None,
            kind: None,
            extra: Map::new(),
        }
    }

    /// Build a failed response from a pipeline error.
    #[must_use]
    pub fn failure(error: &Error) -> Self {
        let message = error.to_string();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };

        Self {
            status: STATUS_ERROR.to_string(),
            data: None,
            error: Some(message),
            kind: error.kind(),
            extra: Map::new(),
        }
    }

    /// Returns true if the status is `"ok"` (case-insensitive).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_OK)
    }

    /// Returns true if the status is `"error"` (case-insensitive).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ERROR)
    }

    /// Returns true if the call failed because the session was rejected.
    ///
    /// Hosts use this to route the user back to the login view.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind == Some(ErrorKind::Unauthorized)
    }

    /// Borrow the payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consume the response and return the payload, if any.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Borrow the failure message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Normalize a decoded backend payload into a canonical response.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload (or the `data` of a passed-through
/// envelope) does not match `T`.
pub fn normalize<T>(body: Value, policy: EnvelopePolicy) -> Result<ApiResponse<T>>
where
    T: DeserializeOwned,
{
    if policy.is_envelope(&body) {
        return serde_json::from_value(body).map_err(Error::from);
    }

    let data = serde_json::from_value(body)?;
    Ok(ApiResponse::ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_payload_is_wrapped() {
        let body = json!([{ "Id": "abc" }]);
        let response: ApiResponse<Value> =
            normalize(body.clone(), EnvelopePolicy::default()).unwrap();

        assert_eq!(response.status, "ok");
        assert_eq!(response.data, Some(body));
        assert!(response.error.is_none());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "ok", "data": [{ "Id": "abc" }] })
        );
    }

    #[test]
    fn envelope_passes_through_unchanged() {
        let body = json!({ "status": "Error", "error": "daemon unreachable" });
        let response: ApiResponse<Value> =
            normalize(body.clone(), EnvelopePolicy::StatusField).unwrap();

        assert_eq!(response.status, "Error");
        assert!(response.is_error());
        assert_eq!(response.error_message(), Some("daemon unreachable"));
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }

    #[test]
    fn status_field_policy_keeps_extra_keys() {
        let body = json!({
            "status": "ok",
            "timestamp": "2024-05-01T10:00:00Z",
            "uptime": "1h2m3s"
        });
        let response: ApiResponse<Value> =
            normalize(body.clone(), EnvelopePolicy::StatusField).unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.extra.get("uptime"), Some(&json!("1h2m3s")));
        assert_eq!(serde_json::to_value(&response).unwrap(), body);
    }

    #[test]
    fn strict_policy_wraps_domain_objects() {
        let body = json!({ "status": "ok", "uptime": "5m" });
        let response: ApiResponse<Value> =
            normalize(body.clone(), EnvelopePolicy::Strict).unwrap();

        assert_eq!(response.status, "ok");
        assert_eq!(response.data, Some(body));
    }

    #[test]
    fn strict_policy_still_passes_real_envelopes() {
        let body = json!({ "status": "ok", "data": { "message": "hi" } });
        let response: ApiResponse<Value> = normalize(body, EnvelopePolicy::Strict).unwrap();
        assert_eq!(response.data, Some(json!({ "message": "hi" })));
        assert!(response.extra.is_empty());
    }

    #[test]
    fn envelope_data_decodes_into_type_without_default() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Report {
            uptime: String,
        }

        let body = json!({ "status": "ok", "data": { "uptime": "5m" } });
        let response: ApiResponse<Report> =
            normalize(body, EnvelopePolicy::StatusField).unwrap();
        assert_eq!(
            response.data,
            Some(Report {
                uptime: "5m".to_string()
            })
        );

        let response: ApiResponse<Report> =
            normalize(json!({ "status": "error", "error": "boom" }), EnvelopePolicy::Strict)
                .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.error_message(), Some("boom"));
    }

    #[test]
    fn non_string_status_is_not_an_envelope() {
        assert!(!EnvelopePolicy::StatusField.is_envelope(&json!({ "status": 3 })));
        assert!(!EnvelopePolicy::StatusField.is_envelope(&json!(["status"])));
        assert!(EnvelopePolicy::StatusField.is_envelope(&json!({ "status": "running" })));

        let response: ApiResponse<Value> =
            normalize(json!({ "status": 3 }), EnvelopePolicy::StatusField).unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.data, Some(json!({ "status": 3 })));
    }

    #[test]
    fn payload_type_mismatch_is_decode_error() {
        let err = normalize::<Vec<String>>(json!({ "Id": 1 }), EnvelopePolicy::default())
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Decode));
    }

    #[test]
    fn failure_carries_message_and_kind() {
        let response: ApiResponse<Value> = ApiResponse::failure(&Error::HttpStatus { status: 500 });
        assert!(response.is_error());
        assert_eq!(response.error_message(), Some("HTTP error! status: 500"));
        assert_eq!(response.kind, Some(ErrorKind::HttpStatus(500)));

        let response: ApiResponse<Value> = ApiResponse::failure(&Error::Unauthorized);
        assert!(response.is_unauthorized());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "error", "error": "Unauthorized" })
        );
    }

    #[test]
    fn empty_failure_message_falls_back() {
        let response: ApiResponse<Value> = ApiResponse::failure(&Error::Network(String::new()));
        assert_eq!(response.error_message(), Some(UNKNOWN_ERROR));
        assert_eq!(response.kind, Some(ErrorKind::Network));
    }
}
