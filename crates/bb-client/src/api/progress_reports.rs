use bb_types::records::ProgressReport;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const PROGRESS_REPORTS_PATH: &str = "/v1/progress-report";

impl RestResource<ProgressReport> {
    pub fn progress_reports(client: ApiClient) -> Self {
        Self::new(client, PROGRESS_REPORTS_PATH).empty_on_not_found()
    }

    pub async fn by_child(&self, child_id: &str) -> ClientResult<Vec<ProgressReport>> {
        self.list_by("child", &[("childID", child_id)]).await
    }
}
