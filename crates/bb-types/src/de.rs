//! Serde helpers for loosely-typed backend fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::auth::AccountType;

/// Accept an identifier sent either as a JSON string or a JSON number.
///
/// The backend is inconsistent about id types across resources; callers always
/// see them as strings.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("expected string or number id, got {}", other))),
    }
}

/// JWT `NumericDate`: whole or fractional seconds since the epoch, truncated.
pub fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(secs) => Ok(Some(secs)),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Some(f.trunc() as i64))
                .ok_or_else(|| serde::de::Error::custom(format!("numeric date out of range: {}", n))),
        },
        Some(other) => Err(serde::de::Error::custom(format!("expected numeric date, got {}", other))),
    }
}

/// Account type on a fetched record. Roles outside Admin/Staff/Parent, or
/// non-string values, read as `None` instead of failing the whole payload.
pub fn lenient_account_type<'de, D>(deserializer: D) -> Result<Option<AccountType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}
