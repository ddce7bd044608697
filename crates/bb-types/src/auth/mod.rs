mod account;
mod claims;

pub use account::AccountType;
pub use claims::SessionClaims;
use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate, ValidationError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Login payload submitted to `/auth/login`.
pub struct LoginRequest {
    pub email: String,
    /// Plaintext password submitted by the client.
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Response returned by `/auth/login` on success.
pub struct LoginResponse {
    /// Bearer token to persist client-side.
    #[serde(alias = "accessToken", alias = "idToken")]
    pub token: String,
    /// Human-readable status message, when the backend sends one.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Registration payload submitted to `/signup`.
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl Validate for LoginRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        crate::validation::require_email(&mut errors, "email", &self.email);
        crate::validation::require(&mut errors, "password", &self.password);
        errors
    }
}

/// Minimum password length accepted by the signup form.
pub const MIN_PASSWORD_LEN: usize = 8;

impl Validate for SignupRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        crate::validation::require_email(&mut errors, "email", &self.email);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                ValidationError::InvalidFormat(format!("must be at least {} characters", MIN_PASSWORD_LEN)),
            );
        }
        crate::validation::require(&mut errors, "firstName", &self.first_name);
        crate::validation::require(&mut errors, "lastName", &self.last_name);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_accepts_token_aliases() {
        let r: LoginResponse = serde_json::from_str(r#"{"token":"abc","message":"ok"}"#).unwrap();
        assert_eq!(r.token, "abc");
        let r: LoginResponse = serde_json::from_str(r#"{"accessToken":"xyz"}"#).unwrap();
        assert_eq!(r.token, "xyz");
        assert_eq!(r.message, None);
    }

    #[test]
    fn signup_validation() {
        let req = SignupRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            first_name: " ".into(),
            last_name: "Doe".into(),
            account_type: AccountType::Parent,
            location_id: None,
        };
        let errors = req.validate();
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
        assert_eq!(errors.get("firstName"), Some(&ValidationError::Required));
        assert!(!errors.contains_key("lastName"));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["accountType"], "Parent");
        assert_eq!(json["firstName"], " ");
        assert!(json.get("locationID").is_none());
    }
}
