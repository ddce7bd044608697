use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure categories surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// No credential stored; nothing was sent.
    Unauthenticated,
    /// Backend rejected the token or role.
    Unauthorized,
    NotFound,
    /// Client-side form check failed before any request.
    Validation,
    /// The request never produced an HTTP response.
    Network,
    /// Non-2xx response not covered above.
    Server,
    /// Response body could not be decoded.
    Decode,
    Storage,
    Config,
}

impl ErrorKind {
    /// Kinds that end the session and send the user back to login.
    pub fn is_session_failure(&self) -> bool {
        matches!(self, ErrorKind::Unauthenticated | ErrorKind::Unauthorized)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation failed",
            ErrorKind::Network => "network error",
            ErrorKind::Server => "server error",
            ErrorKind::Decode => "decode error",
            ErrorKind::Storage => "storage error",
            ErrorKind::Config => "configuration error",
        };
        f.write_str(s)
    }
}

/// The single success/failure shape handed to presentation code.
///
/// Serialises as `{"ok":true,"data":..}` or
/// `{"ok":false,"errorKind":..,"message":..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error_kind: None,
            message: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match (self.ok, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err((
                self.error_kind.unwrap_or(ErrorKind::Server),
                self.message.unwrap_or_else(|| "missing response data".to_string()),
            )),
        }
    }
}

/// Normalise the backend's inconsistent success bodies into the payload.
///
/// `{data: X}`, `{item: X}`, `{message, data: X}` and `{message, item: X}`
/// all yield `X`; anything else is the payload as-is. A body that is only
/// `{message}`, or an empty object, yields `null`.
pub fn unwrap_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            let only_envelope_keys = map.keys().all(|k| matches!(k.as_str(), "message" | "data" | "item"));
            if only_envelope_keys {
                if let Some(data) = map.remove("data") {
                    return data;
                }
                if let Some(item) = map.remove("item") {
                    return item;
                }
                if map.is_empty() || map.contains_key("message") {
                    return Value::Null;
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_shapes() {
        let ok = serde_json::to_value(ApiEnvelope::success(vec![1, 2])).unwrap();
        assert_eq!(ok, json!({"ok": true, "data": [1, 2]}));

        let err = serde_json::to_value(ApiEnvelope::<()>::failure(ErrorKind::NotFound, "child '7' not found")).unwrap();
        assert_eq!(err, json!({"ok": false, "errorKind": "notFound", "message": "child '7' not found"}));
    }

    #[test]
    fn envelope_into_result() {
        assert_eq!(ApiEnvelope::success(3).into_result(), Ok(3));
        assert_eq!(
            ApiEnvelope::<u8>::failure(ErrorKind::Unauthorized, "nope").into_result(),
            Err((ErrorKind::Unauthorized, "nope".to_string()))
        );
    }

    #[test]
    fn unwraps_known_wrappers() {
        assert_eq!(unwrap_payload(json!({"message": "ok", "data": [1]})), json!([1]));
        assert_eq!(unwrap_payload(json!({"message": "created", "item": {"a": 1}})), json!({"a": 1}));
        assert_eq!(unwrap_payload(json!({"data": {"a": 1}})), json!({"a": 1}));
        assert_eq!(unwrap_payload(json!({"message": "deleted"})), Value::Null);
        assert_eq!(unwrap_payload(json!({})), Value::Null);
    }

    #[test]
    fn leaves_raw_bodies_alone() {
        assert_eq!(unwrap_payload(json!([{"childID": "1"}])), json!([{"childID": "1"}]));
        // A record that happens to have a `data` field alongside others is not an envelope
        let record = json!({"childID": "1", "data": "x"});
        assert_eq!(unwrap_payload(record.clone()), record);
        assert_eq!(unwrap_payload(Value::Null), Value::Null);
    }

    #[test]
    fn session_failure_kinds() {
        assert!(ErrorKind::Unauthenticated.is_session_failure());
        assert!(ErrorKind::Unauthorized.is_session_failure());
        assert!(!ErrorKind::NotFound.is_session_failure());
    }
}
