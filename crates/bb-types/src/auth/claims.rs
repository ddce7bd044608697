use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AccountType;

/// Claims carried in the payload segment of a session token.
///
/// These are decoded locally without signature verification and must only be
/// used as routing hints; the backend remains the authority on access.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Raw account type as issued; see [`SessionClaims::account_type`].
    #[serde(rename = "accountType", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, deserialize_with = "crate::de::numeric_date", skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Any other claims (email, names, issuer...) preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionClaims {
    /// The parsed account type, if present and one of Admin/Staff/Parent.
    pub fn account_type(&self) -> Option<AccountType> {
        self.account_type.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// A token without `exp` never expires locally; the backend decides.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(secs) => now.timestamp() >= secs,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Look up an extra string claim such as `email` or `firstName`.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
