use bb_types::records::Newsletter;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const NEWSLETTERS_PATH: &str = "/v1/newsletter";

impl RestResource<Newsletter> {
    pub fn newsletters(client: ApiClient) -> Self {
        Self::new(client, NEWSLETTERS_PATH).empty_on_not_found()
    }

    pub async fn by_location(&self, location_id: &str) -> ClientResult<Vec<Newsletter>> {
        self.list_by("location", &[("locationID", location_id)]).await
    }
}
