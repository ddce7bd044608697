//! Session token storage and local claim decoding.
//!
//! The token is decoded without verifying its signature. Claims read here are
//! routing hints for the UI; the backend enforces access on every request.

use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use bb_types::auth::{AccountType, SessionClaims};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::{
    error::{ClaimsError, ClientResult}, storage::ClientStorage
};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Decode the payload segment of a `header.payload.signature` token.
pub fn decode_claims(token: &str) -> Result<SessionClaims, ClaimsError> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(ClaimsError::Malformed),
    };

    // Tolerate padded and standard-alphabet payloads
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// A stored token together with its decoded claims.
pub struct Session {
    token: SecretString,
    claims: SessionClaims,
    account_type: AccountType,
}

impl Session {
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn user_id(&self) -> Option<&str> {
        self.claims.user_id.as_deref()
    }

    pub fn location_id(&self) -> Option<&str> {
        self.claims.location_id.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.token.expose_secret().to_string()),
            claims: self.claims.clone(),
            account_type: self.account_type,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("account_type", &self.account_type)
            .field("user_id", &self.claims.user_id)
            .field("location_id", &self.claims.location_id)
            .field("exp", &self.claims.exp)
            .finish()
    }
}

/// Why a stored session could not be used.
#[derive(Debug)]
pub enum SessionIssue {
    Missing,
    Undecodable(ClaimsError),
    /// `accountType` absent or not Admin/Staff/Parent.
    UnknownAccountType(Option<String>),
    Expired(DateTime<Utc>),
}

impl fmt::Display for SessionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionIssue::Missing => write!(f, "no stored session"),
            SessionIssue::Undecodable(e) => write!(f, "undecodable token: {}", e),
            SessionIssue::UnknownAccountType(Some(raw)) => write!(f, "unknown account type '{}'", raw),
            SessionIssue::UnknownAccountType(None) => write!(f, "token has no account type"),
            SessionIssue::Expired(at) => write!(f, "token expired at {}", at),
        }
    }
}

/// Shared handle on the stored session, injected into every page controller
/// and resource instead of being looked up globally.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<ClientStorage>,
}

impl SessionContext {
    pub fn new(storage: Arc<ClientStorage>) -> Self {
        Self { storage }
    }

    /// Session backed by throwaway in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(ClientStorage::memory()))
    }

    pub fn storage(&self) -> &Arc<ClientStorage> {
        &self.storage
    }

    /// Raw stored token, if any. Blank values count as absent.
    pub fn token(&self) -> Option<SecretString> {
        self.storage
            .get(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a freshly issued token, replacing any previous session.
    pub fn store_token(&self, token: &str) -> ClientResult<()> {
        self.storage.set(TOKEN_KEY, token.trim())?;
        info!("session token stored");
        Ok(())
    }

    /// Drop the stored token. Failures are logged, never raised: a session
    /// that cannot be cleared is still treated as gone by the caller.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "failed to clear session token");
        }
    }

    /// Decode and validate the stored session as of `now`.
    pub fn current_at(&self, now: DateTime<Utc>) -> Result<Session, SessionIssue> {
        let token = self.token().ok_or(SessionIssue::Missing)?;
        let claims = decode_claims(token.expose_secret()).map_err(SessionIssue::Undecodable)?;
        let account_type = claims
            .account_type()
            .ok_or_else(|| SessionIssue::UnknownAccountType(claims.account_type.clone()))?;
        if claims.is_expired_at(now)
            && let Some(at) = claims.expires_at()
        {
            return Err(SessionIssue::Expired(at));
        }
        Ok(Session {
            token,
            claims,
            account_type,
        })
    }

    pub fn current(&self) -> Result<Session, SessionIssue> {
        self.current_at(Utc::now())
    }

    /// Like [`SessionContext::current`], but clears an unusable stored token.
    pub fn resolve(&self) -> Option<Session> {
        match self.current() {
            Ok(session) => Some(session),
            Err(SessionIssue::Missing) => None,
            Err(issue) => {
                warn!(%issue, "discarding stored session");
                self.clear();
                None
            }
        }
    }
}
