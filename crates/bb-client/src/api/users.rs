use bb_types::records::User;
use tracing::warn;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, resource::RestResource
};

pub const USERS_PATH: &str = "/v1/user";

impl RestResource<User> {
    pub fn users(client: ApiClient) -> Self {
        Self::new(client, USERS_PATH).empty_on_not_found()
    }

    pub async fn by_location(&self, location_id: &str) -> ClientResult<Vec<User>> {
        self.list_by("location", &[("locationID", location_id)]).await
    }

    /// The signed-in user, looked up by the `userID` claim.
    pub async fn current(&self) -> ClientResult<User> {
        let session = self.client().session().current().map_err(|issue| {
            warn!(%issue, "no usable session for current user");
            ClientError::Unauthenticated
        })?;
        let user_id = session.user_id().ok_or(ClientError::Unauthenticated)?;
        self.get(user_id).await
    }
}
