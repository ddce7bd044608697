use bb_types::records::EmailRequest;
use tracing::info;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, transport::{Method, RequestBody}
};

pub const SEND_EMAILS_PATH: &str = "/smail/sendEmails";

#[derive(Clone)]
pub struct MailApi {
    client: ApiClient,
}

impl MailApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn send_emails(&self, request: &EmailRequest) -> ClientResult<()> {
        self.client.require_token()?;
        let errors = bb_types::Validate::validate(request);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }
        let url = self.client.url(SEND_EMAILS_PATH, None, &[])?;
        self.client
            .send(Method::Post, url, RequestBody::Json(serde_json::to_value(request)?))
            .await?;
        info!(recipients = request.recipients.len(), "emails queued");
        Ok(())
    }
}
