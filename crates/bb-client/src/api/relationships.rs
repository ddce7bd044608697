use bb_types::records::Relationship;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const RELATIONSHIPS_PATH: &str = "/v1/relationship";

impl RestResource<Relationship> {
    pub fn relationships(client: ApiClient) -> Self {
        Self::new(client, RELATIONSHIPS_PATH).empty_on_not_found()
    }

    pub async fn by_child(&self, child_id: &str) -> ClientResult<Vec<Relationship>> {
        self.list_by("child", &[("childID", child_id)]).await
    }

    pub async fn by_parent(&self, parent_id: &str) -> ClientResult<Vec<Relationship>> {
        self.list_by("parent", &[("parentID", parent_id)]).await
    }
}
