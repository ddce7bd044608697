//! Unit tests for session claim parsing.

use super::*;
use chrono::TimeZone;

#[test]
fn test_claims_wire_names() {
    let claims: SessionClaims = serde_json::from_str(
        r#"{"userID":17,"accountType":"staff","locationID":"loc-3","exp":1700000000,"email":"a@b.c"}"#,
    )
    .unwrap();

    assert_eq!(claims.user_id.as_deref(), Some("17"));
    assert_eq!(claims.location_id.as_deref(), Some("loc-3"));
    assert_eq!(claims.account_type(), Some(AccountType::Staff));
    assert_eq!(claims.extra_str("email"), Some("a@b.c"));
    assert_eq!(claims.expires_at(), Utc.timestamp_opt(1_700_000_000, 0).single());
}

#[test]
fn test_unknown_account_type_is_none() {
    let claims: SessionClaims = serde_json::from_str(r#"{"accountType":"Director"}"#).unwrap();
    assert_eq!(claims.account_type.as_deref(), Some("Director"));
    assert_eq!(claims.account_type(), None);

    let claims: SessionClaims = serde_json::from_str(r#"{}"#).unwrap();
    assert_eq!(claims.account_type(), None);
}

#[test]
fn test_expiry() {
    let now = Utc.timestamp_opt(1_000, 0).unwrap();

    let claims = SessionClaims {
        exp: Some(999),
        ..Default::default()
    };
    assert!(claims.is_expired_at(now));

    let claims = SessionClaims {
        exp: Some(1_000),
        ..Default::default()
    };
    assert!(claims.is_expired_at(now));

    let claims = SessionClaims {
        exp: Some(1_001),
        ..Default::default()
    };
    assert!(!claims.is_expired_at(now));

    // No exp claim: left to the backend
    assert!(!SessionClaims::default().is_expired_at(now));
}

#[test]
fn test_fractional_exp_is_truncated() {
    let claims: SessionClaims = serde_json::from_str(r#"{"accountType":"Admin","exp":1.7e9}"#).unwrap();
    assert_eq!(claims.exp, Some(1_700_000_000));

    let claims: SessionClaims = serde_json::from_str(r#"{"exp":1700000000.75}"#).unwrap();
    assert_eq!(claims.exp, Some(1_700_000_000));

    assert!(serde_json::from_str::<SessionClaims>(r#"{"exp":"soon"}"#).is_err());
}
