//! Per-entity backend APIs.
//!
//! Plain CRUD entities are [`RestResource`] instances with a few filtered
//! list helpers; media, activity logs, mail and suggestions get their own
//! narrower wrappers.

mod activity_logs;
mod auth;
mod children;
mod contacts;
mod mail;
mod meal_plans;
mod media;
mod messages;
mod newsletters;
mod progress_reports;
mod relationships;
mod suggestions;
mod users;

pub use activity_logs::{ACTIVITY_LOGS_PATH, ActivityLogApi};
pub use auth::{AuthApi, LOGIN_PATH, SIGNUP_PATH};
pub use children::CHILDREN_PATH;
pub use contacts::CONTACTS_PATH;
pub use mail::{MailApi, SEND_EMAILS_PATH};
pub use meal_plans::MEAL_PLANS_PATH;
pub use media::{FILE_FIELD, MEDIA_PATH, MediaApi, MediaUpload};
pub use messages::MESSAGES_PATH;
pub use newsletters::NEWSLETTERS_PATH;
pub use progress_reports::PROGRESS_REPORTS_PATH;
pub use relationships::RELATIONSHIPS_PATH;
pub use suggestions::{GENERATE_PATH, SuggestionsApi};
pub use users::USERS_PATH;

use bb_types::records::{Child, Contact, MealPlan, Message, Newsletter, ProgressReport, Relationship, User};

use crate::{client::ApiClient, resource::RestResource};

impl ApiClient {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn children(&self) -> RestResource<Child> {
        RestResource::children(self.clone())
    }

    pub fn users(&self) -> RestResource<User> {
        RestResource::users(self.clone())
    }

    pub fn contacts(&self) -> RestResource<Contact> {
        RestResource::contacts(self.clone())
    }

    pub fn relationships(&self) -> RestResource<Relationship> {
        RestResource::relationships(self.clone())
    }

    pub fn meal_plans(&self) -> RestResource<MealPlan> {
        RestResource::meal_plans(self.clone())
    }

    pub fn newsletters(&self) -> RestResource<Newsletter> {
        RestResource::newsletters(self.clone())
    }

    pub fn media(&self) -> MediaApi {
        MediaApi::new(self.clone())
    }

    pub fn progress_reports(&self) -> RestResource<ProgressReport> {
        RestResource::progress_reports(self.clone())
    }

    pub fn activity_logs(&self) -> ActivityLogApi {
        ActivityLogApi::new(self.clone())
    }

    pub fn messages(&self) -> RestResource<Message> {
        RestResource::messages(self.clone())
    }

    pub fn mail(&self) -> MailApi {
        MailApi::new(self.clone())
    }

    pub fn suggestions(&self) -> SuggestionsApi {
        SuggestionsApi::new(self.clone())
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
