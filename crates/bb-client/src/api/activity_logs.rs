use bb_types::records::ActivityLog;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const ACTIVITY_LOGS_PATH: &str = "/log";

/// Read-only view of the backend's activity log.
#[derive(Clone)]
pub struct ActivityLogApi {
    resource: RestResource<ActivityLog>,
}

impl ActivityLogApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: RestResource::new(client, ACTIVITY_LOGS_PATH).empty_on_not_found(),
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<ActivityLog>> {
        self.resource.list().await
    }

    pub async fn by_location(&self, location_id: &str) -> ClientResult<Vec<ActivityLog>> {
        self.resource.list_by("by-location", &[("locationID", location_id)]).await
    }

    pub async fn by_user(&self, user_id: &str) -> ClientResult<Vec<ActivityLog>> {
        self.resource.list_by("by-user", &[("userID", user_id)]).await
    }
}
