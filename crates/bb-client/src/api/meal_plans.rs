use bb_types::records::MealPlan;

use crate::{client::ApiClient, error::ClientResult, resource::RestResource};

pub const MEAL_PLANS_PATH: &str = "/v1/meal-plan";

impl RestResource<MealPlan> {
    pub fn meal_plans(client: ApiClient) -> Self {
        Self::new(client, MEAL_PLANS_PATH).empty_on_not_found()
    }

    pub async fn by_location(&self, location_id: &str) -> ClientResult<Vec<MealPlan>> {
        self.list_by("location", &[("locationID", location_id)]).await
    }
}
