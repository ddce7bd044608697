use bb_types::records::Contact;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const CONTACTS_PATH: &str = "/v1/contacts";

impl RestResource<Contact> {
    pub fn contacts(client: ApiClient) -> Self {
        Self::new(client, CONTACTS_PATH).empty_on_not_found()
    }

    /// Emergency and family contacts for one child.
    pub async fn by_child(&self, child_id: &str) -> ClientResult<Vec<Contact>> {
        self.list_by("child", &[("childID", child_id)]).await
    }
}
