use bb_types::records::Child;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const CHILDREN_PATH: &str = "/v1/child";

impl RestResource<Child> {
    pub fn children(client: ApiClient) -> Self {
        Self::new(client, CHILDREN_PATH).empty_on_not_found()
    }

    /// `GET /v1/child/location?locationID=`; no children is an empty list.
    pub async fn by_location(&self, location_id: &str) -> ClientResult<Vec<Child>> {
        self.list_by("location", &[("locationID", location_id)]).await
    }
}
