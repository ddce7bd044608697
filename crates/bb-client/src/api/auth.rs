use bb_types::auth::{LoginRequest, LoginResponse, SignupRequest};
use tracing::{info, warn};

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, session::{Session, SessionIssue, decode_claims}, transport::{Method, RequestBody}
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/signup";

/// Login, signup and logout. The only calls that work without a stored token.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token, persist it and return the session.
    ///
    /// A token whose claims cannot be decoded, or whose account type is not
    /// recognised, is never stored.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate(&request)?;

        let url = self.client.url(LOGIN_PATH, None, &[])?;
        let payload = self
            .client
            .send_public(Method::Post, url, RequestBody::Json(serde_json::to_value(&request)?))
            .await?;
        let response: LoginResponse = serde_json::from_value(payload)?;
        decode_claims(&response.token)?;

        let session = self.client.session();
        session.store_token(&response.token)?;
        match session.current() {
            Ok(current) => {
                info!(user_id = current.user_id(), account_type = %current.account_type(), "logged in");
                Ok(current)
            }
            Err(issue) => {
                warn!(%issue, "discarding token returned by login");
                session.clear();
                Err(match issue {
                    SessionIssue::Undecodable(e) => ClientError::Claims(e),
                    _ => ClientError::Unauthenticated,
                })
            }
        }
    }

    /// Register a new account. Does not sign in.
    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<()> {
        validate(request)?;
        let url = self.client.url(SIGNUP_PATH, None, &[])?;
        self.client
            .send_public(Method::Post, url, RequestBody::Json(serde_json::to_value(request)?))
            .await?;
        info!(email = %request.email, account_type = %request.account_type, "account registered");
        Ok(())
    }

    /// Forget the stored token. Purely local; the backend keeps no session.
    pub fn logout(&self) {
        self.client.session().clear();
        info!("logged out");
    }
}

fn validate(request: &impl bb_types::Validate) -> ClientResult<()> {
    let errors = request.validate();
    if errors.is_empty() { Ok(()) } else { Err(ClientError::Validation(errors)) }
}
