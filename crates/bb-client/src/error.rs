use bb_types::{ApiEnvelope, ErrorKind, FieldErrors, validation::format_errors};
use thiserror::Error;

/// Errors that can occur in client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// No token stored; the request was never sent
    #[error("not signed in")]
    Unauthenticated,

    /// Backend rejected the credential or the role (401/403)
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Backend answered 404
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Client-side form check failed
    #[error("validation failed: {}", format_errors(.0))]
    Validation(FieldErrors),

    /// The request did not produce an HTTP response
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session token decoding failed
    #[error("invalid session token: {0}")]
    Claims(#[from] ClaimsError),

    /// Client-side storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unauthenticated => ErrorKind::Unauthenticated,
            ClientError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Claims(_) => ErrorKind::Unauthenticated,
            ClientError::Storage(_) => ErrorKind::Storage,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the session is gone and the user must log in again.
    pub fn is_session_failure(&self) -> bool {
        self.kind().is_session_failure()
    }

    /// Message suitable for a dismissible notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthenticated | ClientError::Claims(_) => "You are not signed in. Please log in.".to_string(),
            ClientError::Unauthorized { message, .. } if message.trim().is_empty() => {
                "Your session has expired or you lack access. Please log in again.".to_string()
            }
            ClientError::Unauthorized { message, .. } => {
                format!("Your session has expired or you lack access ({}). Please log in again.", message.trim())
            }
            ClientError::NotFound { message } | ClientError::Server { message, .. } => message.clone(),
            ClientError::Validation(errors) => format!("Please fix the form: {}", format_errors(errors)),
            ClientError::Network(_) => "Could not reach the server. Check your connection and try again.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn into_envelope<T>(self) -> ApiEnvelope<T> {
        ApiEnvelope::failure(self.kind(), self.user_message())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(format!("invalid url: {}", err))
    }
}

/// Convert a client result into the envelope shape handed to presentation code.
pub fn envelope<T>(result: ClientResult<T>) -> ApiEnvelope<T> {
    match result {
        Ok(data) => ApiEnvelope::success(data),
        Err(err) => err.into_envelope(),
    }
}

/// Token payload could not be read.
#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token is not in header.payload.signature form")]
    Malformed,

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a JSON claim set: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt storage file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bb_types::ValidationError;

    use super::*;

    #[test]
    fn kinds_and_envelopes() {
        let err = ClientError::NotFound {
            message: "Child not found".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let env: ApiEnvelope<()> = err.into_envelope();
        assert!(!env.ok);
        assert_eq!(env.message.as_deref(), Some("Child not found"));

        assert!(ClientError::Unauthenticated.is_session_failure());
        assert!(
            ClientError::Unauthorized {
                status: 403,
                message: "forbidden".into()
            }
            .is_session_failure()
        );
        assert!(!ClientError::Network("refused".into()).is_session_failure());
    }

    #[test]
    fn validation_message_lists_fields() {
        let mut errors = HashMap::new();
        errors.insert("firstName".to_string(), ValidationError::Required);
        let err = ClientError::Validation(errors);
        assert_eq!(err.to_string(), "validation failed: firstName: This field is required");
        assert_eq!(err.user_message(), "Please fix the form: firstName: This field is required");
    }

    #[test]
    fn unauthorized_message_keeps_backend_reason() {
        let expired = ClientError::Unauthorized {
            status: 401,
            message: "jwt expired".into(),
        };
        let forbidden = ClientError::Unauthorized {
            status: 403,
            message: "Admins only".into(),
        };
        assert!(expired.user_message().contains("jwt expired"));
        assert!(forbidden.user_message().contains("Admins only"));
        assert_ne!(expired.user_message(), forbidden.user_message());

        let bare = ClientError::Unauthorized {
            status: 401,
            message: " ".into(),
        };
        assert_eq!(bare.user_message(), "Your session has expired or you lack access. Please log in again.");
    }

    #[test]
    fn envelope_from_result() {
        assert_eq!(envelope::<u8>(Ok(1)), ApiEnvelope::success(1));
        let env = envelope::<u8>(Err(ClientError::Unauthenticated));
        assert_eq!(env.error_kind, Some(ErrorKind::Unauthenticated));
    }
}
