use bb_types::records::Message;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const MESSAGES_PATH: &str = "/v1/message";

impl RestResource<Message> {
    pub fn messages(client: ApiClient) -> Self {
        Self::new(client, MESSAGES_PATH).empty_on_not_found()
    }

    /// Messages sent to or by the user.
    pub async fn by_user(&self, user_id: &str) -> ClientResult<Vec<Message>> {
        self.list_by("user", &[("userID", user_id)]).await
    }
}
