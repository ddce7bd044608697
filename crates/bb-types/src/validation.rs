use std::{collections::HashMap, fmt};

/// High-level validation errors raised by client-side form checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Required,
    InvalidFormat(String),
    Other(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required => write!(f, "This field is required"),
            ValidationError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            ValidationError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Field name (wire name) to error.
pub type FieldErrors = HashMap<String, ValidationError>;

/// Client-side required-field checks run before a record is submitted.
///
/// The default implementation accepts everything, which suits records the
/// backend validates on its own.
pub trait Validate {
    fn validate(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

/// Record `Required` when `value` is blank.
pub fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), ValidationError::Required);
    }
}

/// Record `Required` when the optional value is missing or blank.
pub fn require_opt(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    require(errors, field, value.unwrap_or_default());
}

/// Record `Required` or `InvalidFormat` for a malformed email address.
pub fn require_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), ValidationError::Required);
        return;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        errors.insert(field.to_string(), ValidationError::InvalidFormat("expected an email address".to_string()));
    }
}

/// Render a human-readable string from a map of validation errors.
///
/// Fields are sorted so the message is stable.
pub fn format_errors(errors: &FieldErrors) -> String {
    let mut parts: Vec<_> = errors.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    parts.sort();
    parts.join(", ")
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
