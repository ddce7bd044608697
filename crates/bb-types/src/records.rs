//! Backend-owned records.
//!
//! The backend is the only owner of these; the client holds them transiently
//! per page view. Every record keeps unknown fields in `extra` so an
//! update sends back what it received.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    auth::AccountType, report::ReportContent, validation::{FieldErrors, Validate, require, require_email, require_opt}
};

/// A record type served by one REST resource.
pub trait Record: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;

    /// Server-assigned identifier, absent until created.
    fn id(&self) -> Option<&str>;
}

macro_rules! record {
    ($ty:ty, $kind:literal, $id:ident) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Option<&str> {
                self.$id.as_deref()
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    #[serde(rename = "childID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Child, "child", child_id);

impl Validate for Child {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "firstName", &self.first_name);
        require(&mut errors, "lastName", &self.last_name);
        require_opt(&mut errors, "locationID", self.location_id.as_deref());
        errors
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "crate::de::lenient_account_type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(User, "user", user_id);

impl Validate for User {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "firstName", &self.first_name);
        require(&mut errors, "lastName", &self.last_name);
        if self.account_type.is_none() {
            errors.insert("accountType".to_string(), crate::validation::ValidationError::Required);
        }
        errors
    }
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Emergency or pickup contact attached to a child.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "contactID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(rename = "childID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Contact, "contact", contact_id);

impl Validate for Contact {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "childID", self.child_id.as_deref());
        require(&mut errors, "name", &self.name);
        let has_phone = self.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => require_email(&mut errors, "email", email),
            _ if !has_phone => {
                errors.insert(
                    "phone".to_string(),
                    crate::validation::ValidationError::Other("a phone number or email is required".to_string()),
                );
            }
            _ => {}
        }
        errors
    }
}

/// Link between a parent account and a child.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(rename = "relationshipID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub relationship_id: Option<String>,
    #[serde(rename = "parentID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "childID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    /// e.g. "Mother", "Guardian".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Relationship, "relationship", relationship_id);

impl Validate for Relationship {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "parentID", self.parent_id.as_deref());
        require_opt(&mut errors, "childID", self.child_id.as_deref());
        errors
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(rename = "mealPlanID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub meal_plan_id: Option<String>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Day the plan applies to, as sent by the backend (ISO date).
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(MealPlan, "meal plan", meal_plan_id);

impl Validate for MealPlan {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "locationID", self.location_id.as_deref());
        require(&mut errors, "date", &self.date);
        errors
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    #[serde(rename = "newsletterID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub newsletter_id: Option<String>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Newsletter, "newsletter", newsletter_id);

impl Validate for Newsletter {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "locationID", self.location_id.as_deref());
        require(&mut errors, "title", &self.title);
        require(&mut errors, "content", &self.content);
        errors
    }
}

/// Uploaded photo or document metadata. Creation goes through a multipart
/// upload rather than a JSON body.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(rename = "mediaID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(rename = "childID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Media, "media", media_id);

impl Validate for Media {}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    #[serde(rename = "reportID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(rename = "childID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
    #[serde(rename = "authorID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Pipe-delimited sections; see [`ProgressReport::sections`].
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(ProgressReport, "progress report", report_id);

impl ProgressReport {
    pub fn sections(&self) -> ReportContent {
        ReportContent::parse(&self.content)
    }

    pub fn set_sections(&mut self, content: &ReportContent) {
        self.content = content.to_string();
    }
}

impl Validate for ProgressReport {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "childID", self.child_id.as_deref());
        if self.sections().is_empty() {
            errors.insert("content".to_string(), crate::validation::ValidationError::Required);
        }
        errors
    }
}

/// Audit-style entry recorded by the backend; read-only for clients.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    #[serde(rename = "logID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
    #[serde(rename = "userID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "locationID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(ActivityLog, "activity log", log_id);

impl Validate for ActivityLog {}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "messageID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(rename = "senderID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(rename = "recipientID", default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

record!(Message, "message", message_id);

impl Validate for Message {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_opt(&mut errors, "recipientID", self.recipient_id.as_deref());
        require(&mut errors, "body", &self.body);
        errors
    }
}

/// Body for `/smail/sendEmails`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Validate for EmailRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.recipients.is_empty() {
            errors.insert("recipients".to_string(), crate::validation::ValidationError::Required);
        }
        for (i, recipient) in self.recipients.iter().enumerate() {
            require_email(&mut errors, &format!("recipients[{}]", i), recipient);
        }
        require(&mut errors, "subject", &self.subject);
        require(&mut errors, "body", &self.body);
        errors
    }
}

/// Body for `/suggestions/generate`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub prompt: String,
    #[serde(rename = "childID", default, skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
}

impl Validate for SuggestionRequest {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "prompt", &self.prompt);
        errors
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}
