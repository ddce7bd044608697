use bb_types::records::{SuggestionRequest, SuggestionResponse};
use serde_json::Value;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, transport::{Method, RequestBody}
};

pub const GENERATE_PATH: &str = "/suggestions/generate";

/// Activity suggestions generated by the backend from a free-text prompt.
#[derive(Clone)]
pub struct SuggestionsApi {
    client: ApiClient,
}

impl SuggestionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, request: &SuggestionRequest) -> ClientResult<Vec<String>> {
        self.client.require_token()?;
        let errors = bb_types::Validate::validate(request);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }
        let url = self.client.url(GENERATE_PATH, None, &[])?;
        let payload = self
            .client
            .send(Method::Post, url, RequestBody::Json(serde_json::to_value(request)?))
            .await?;
        parse_suggestions(payload)
    }
}

/// Accepts `{suggestions: [..]}`, a bare array, or a single string.
fn parse_suggestions(payload: Value) -> ClientResult<Vec<String>> {
    let suggestions = match payload {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(_) => serde_json::from_value(payload)?,
        other => serde_json::from_value::<SuggestionResponse>(other)?.suggestions,
    };
    Ok(suggestions.into_iter().filter(|s| !s.trim().is_empty()).collect())
}
