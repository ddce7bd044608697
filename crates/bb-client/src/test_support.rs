//! Test doubles for the transport seam.
//!
//! `MockTransport` replays queued responses and records every request.
//! `FakeBackend` is a small in-memory REST backend for exercising
//! mutate-then-refetch flows end to end.

use std::{
    collections::{BTreeMap, VecDeque}, sync::{Arc, Mutex}
};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use url::Url;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, session::SessionContext, transport::{HttpRequest, HttpResponse, Method, RequestBody, Transport}
};

/// Build an unsigned `header.payload.signature` token carrying `claims`.
pub fn fake_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

/// `ApiClient` for `https://api.test` over the given transport with an
/// in-memory session.
pub fn test_client(transport: Arc<dyn Transport>) -> ApiClient {
    let origin = Url::parse("https://api.test").expect("static test origin");
    ApiClient::new(origin, transport, SessionContext::in_memory())
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ClientResult<HttpResponse>) {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).push_back(response);
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(Ok(HttpResponse::json(status, &body)));
    }

    pub fn push_status(&self, status: u16) {
        self.push_response(Ok(HttpResponse::new(status, "")));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no mock response queued".to_string())))
    }
}

struct Collection {
    id_field: String,
    items: BTreeMap<String, Value>,
}

#[derive(Default)]
struct BackendState {
    collections: BTreeMap<String, Collection>,
    accounts: Vec<(String, String, String)>,
    next_id: u64,
    calls: usize,
}

/// In-memory REST backend.
///
/// Collections answer `GET base`, `GET base/{id}`, `POST base`,
/// `PUT base/{id}`, `DELETE base/{id}`, and filtered lists at
/// `GET base/<anything>?field=value`, which 404 when nothing matches, as the
/// real backend does. `POST /auth/login` checks registered accounts.
/// Every other call requires a bearer token.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, base: &str, id_field: &str) -> Self {
        self.lock().collections.insert(
            base.trim_end_matches('/').to_string(),
            Collection {
                id_field: id_field.to_string(),
                items: BTreeMap::new(),
            },
        );
        self
    }

    pub fn with_account(self, email: &str, password: &str, token: &str) -> Self {
        self.lock()
            .accounts
            .push((email.to_string(), password.to_string(), token.to_string()));
        self
    }

    /// Insert a record directly; returns its id.
    pub fn seed(&self, base: &str, mut record: Value) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let generated = state.next_id.to_string();
        let collection = state.collections.get_mut(base).expect("collection registered");
        let id = match record.get(&collection.id_field).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                record[collection.id_field.as_str()] = Value::String(generated.clone());
                generated
            }
        };
        collection.items.insert(id.clone(), record);
        id
    }

    pub fn len(&self, base: &str) -> usize {
        self.lock().collections.get(base).map_or(0, |c| c.items.len())
    }

    /// Number of requests that reached the backend.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.lock();
        state.calls += 1;
        let path = request.url.path().trim_end_matches('/').to_string();

        if path == "/auth/login" && request.method == Method::Post {
            let RequestBody::Json(body) = &request.body else {
                return HttpResponse::json(400, &json!({"message": "expected json"}));
            };
            let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
            let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
            return match state.accounts.iter().find(|(e, p, _)| e == email && p == password) {
                Some((_, _, token)) => HttpResponse::json(200, &json!({"message": "Login successful", "token": token})),
                None => HttpResponse::json(401, &json!({"message": "Invalid email or password"})),
            };
        }

        let authorized = request
            .header("Authorization")
            .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len());
        if !authorized {
            return HttpResponse::json(401, &json!({"message": "No token provided"}));
        }

        let Some((base, rest)) = state
            .collections
            .keys()
            .filter(|base| path == **base || path.starts_with(&format!("{}/", base)))
            .max_by_key(|base| base.len())
            .map(|base| (base.clone(), path[base.len()..].trim_start_matches('/').to_string()))
        else {
            return HttpResponse::json(404, &json!({"message": format!("Cannot {} {}", request.method, path)}));
        };

        state.next_id += 1;
        let generated = state.next_id.to_string();
        let Some(collection) = state.collections.get_mut(&base) else {
            return HttpResponse::json(500, &json!({"message": "collection vanished"}));
        };
        let filters: Vec<(String, String)> = request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();

        match (request.method, rest.is_empty()) {
            (Method::Get, true) => HttpResponse::json(200, &Value::Array(collection.items.values().cloned().collect())),
            (Method::Get, false) if !filters.is_empty() => {
                let matches: Vec<Value> = collection
                    .items
                    .values()
                    .filter(|item| {
                        filters
                            .iter()
                            .all(|(k, v)| item.get(k).map(value_as_string).as_deref() == Some(v.as_str()))
                    })
                    .cloned()
                    .collect();
                if matches.is_empty() {
                    HttpResponse::json(404, &json!({"message": "No records found"}))
                } else {
                    HttpResponse::json(200, &json!({"message": "ok", "data": matches}))
                }
            }
            (Method::Get, false) => match collection.items.get(&rest) {
                Some(item) => HttpResponse::json(200, item),
                None => HttpResponse::json(404, &json!({"message": "Record not found"})),
            },
            (Method::Post, true) => {
                let mut record = match &request.body {
                    RequestBody::Json(body) => body.clone(),
                    RequestBody::Multipart(form) => {
                        let mut map = serde_json::Map::new();
                        for (k, v) in &form.fields {
                            map.insert(k.clone(), Value::String(v.clone()));
                        }
                        if let Some(file) = &form.file {
                            map.insert("url".into(), Value::String(format!("https://cdn.test/{}", file.file_name)));
                            map.insert("contentType".into(), Value::String(file.content_type.clone()));
                        }
                        Value::Object(map)
                    }
                    RequestBody::Empty => return HttpResponse::json(400, &json!({"message": "missing body"})),
                };
                record[collection.id_field.as_str()] = Value::String(generated.clone());
                record["createdAt"] = Value::String("2024-01-01T00:00:00Z".into());
                collection.items.insert(generated, record.clone());
                HttpResponse::json(201, &json!({"message": "Created", "item": record}))
            }
            (Method::Put, false) => {
                let RequestBody::Json(Value::Object(patch)) = &request.body else {
                    return HttpResponse::json(400, &json!({"message": "expected json object"}));
                };
                let id_field = collection.id_field.clone();
                match collection.items.get_mut(&rest) {
                    Some(Value::Object(existing)) => {
                        for (k, v) in patch {
                            if *k != id_field {
                                existing.insert(k.clone(), v.clone());
                            }
                        }
                        HttpResponse::json(200, &json!({"message": "Updated", "data": existing.clone()}))
                    }
                    _ => HttpResponse::json(404, &json!({"message": "Record not found"})),
                }
            }
            (Method::Delete, false) => match collection.items.remove(&rest) {
                Some(_) => HttpResponse::json(200, &json!({"message": "Deleted"})),
                None => HttpResponse::json(404, &json!({"message": "Record not found"})),
            },
            _ => HttpResponse::json(405, &json!({"message": "Method not allowed"})),
        }
    }
}

fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        Ok(self.handle(&request))
    }
}
