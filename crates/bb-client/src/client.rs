//! Authenticated request plumbing shared by every resource.

use std::sync::Arc;

use bb_types::envelope::unwrap_payload;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientConfig, error::{ClientError, ClientResult}, session::SessionContext, storage::ClientStorage, transport::{HttpRequest, HttpResponse, Method, RequestBody, ReqwestTransport, Transport}
};

/// Handle on the backend: origin, transport and the injected session.
///
/// Cheap to clone; resources each hold their own copy.
#[derive(Clone)]
pub struct ApiClient {
    origin: Url,
    transport: Arc<dyn Transport>,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(origin: Url, transport: Arc<dyn Transport>, session: SessionContext) -> Self {
        Self {
            origin,
            transport,
            session,
        }
    }

    /// reqwest transport and the configured storage.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        let storage = Arc::new(ClientStorage::new(config.storage.clone()));
        Ok(Self::new(config.origin.clone(), Arc::new(transport), SessionContext::new(storage)))
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// `<origin><path>[/<id>][?query]`. The id is percent-encoded as a single
    /// path segment.
    pub fn url(&self, path: &str, id: Option<&str>, query: &[(&str, &str)]) -> ClientResult<Url> {
        let base = self.origin.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| ClientError::Config(format!("origin cannot carry a path: {}", self.origin)))?
                .pop_if_empty()
                .push(id);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// `Unauthenticated` unless a token is stored. Authenticated calls check
    /// this before any local validation.
    pub fn require_token(&self) -> ClientResult<()> {
        if self.session.has_token() { Ok(()) } else { Err(ClientError::Unauthenticated) }
    }

    /// Send an authenticated request and return the normalised payload.
    ///
    /// Fails with `Unauthenticated` before touching the transport when no
    /// token is stored. A 401/403 clears the stored token.
    pub async fn send(&self, method: Method, url: Url, body: RequestBody) -> ClientResult<Value> {
        let token = self.session.token().ok_or(ClientError::Unauthenticated)?;
        let mut headers = vec![("Authorization".to_string(), format!("Bearer {}", token.expose_secret()))];
        if matches!(body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        self.dispatch(HttpRequest {
            method,
            url,
            headers,
            body,
        })
        .await
    }

    /// Send without a bearer token (login, signup).
    pub async fn send_public(&self, method: Method, url: Url, body: RequestBody) -> ClientResult<Value> {
        let mut headers = Vec::new();
        if matches!(body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        self.dispatch(HttpRequest {
            method,
            url,
            headers,
            body,
        })
        .await
    }

    async fn dispatch(&self, request: HttpRequest) -> ClientResult<Value> {
        let method = request.method;
        let path = request.url.path().to_string();
        let authenticated = request.header("Authorization").is_some();
        debug!(%method, path, "sending request");

        let response = self.transport.send(request).await?;
        debug!(%method, path, status = response.status, "received response");

        match interpret_response(response) {
            Err(ClientError::Unauthorized { status, message }) => {
                if authenticated {
                    warn!(status, path, "backend rejected session; clearing token");
                    self.session.clear();
                }
                Err(ClientError::Unauthorized { status, message })
            }
            other => other,
        }
    }
}

/// Map an HTTP response onto the payload or a typed error.
pub fn interpret_response(response: HttpResponse) -> ClientResult<Value> {
    if response.is_success() {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let body: Value = serde_json::from_slice(&response.body)?;
        return Ok(unwrap_payload(body));
    }

    let status = response.status;
    let message = error_message(&response);
    Err(match status {
        401 | 403 => ClientError::Unauthorized { status, message },
        404 => ClientError::NotFound { message },
        _ => ClientError::Server { status, message },
    })
}

/// Best message from a failure body: JSON `message` or `error`, else the text,
/// else a generic status line.
pub fn error_message(response: &HttpResponse) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(&response.body) {
        for key in ["message", "error"] {
            if let Some(Value::String(s)) = map.get(key)
                && !s.trim().is_empty()
            {
                return s.clone();
            }
        }
    }
    let text = response.text();
    let text = text.trim();
    if text.is_empty() || text.starts_with('{') {
        format!("request failed with status {}", response.status)
    } else {
        text.to_string()
    }
}
