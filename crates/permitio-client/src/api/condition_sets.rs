use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{ConditionSetCreate, ConditionSetRead, ConditionSetUpdate};
use tracing::instrument;

impl PermitClient {
    /// Create a user set or resource set.
    #[instrument(skip(self, body), fields(key = %body.key, set_type = %body.set_type))]
    pub async fn create_condition_set(
        &self,
        body: &ConditionSetCreate,
    ) -> PermitResult<ConditionSetRead> {
        let url = self.scoped_url(Family::Schema, &["condition_sets"]).await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_condition_set(&self, key_or_id: &str) -> PermitResult<ConditionSetRead> {
        let url = self
            .scoped_url(Family::Schema, &["condition_sets", key_or_id])
            .await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_condition_set(
        &self,
        key: &str,
        body: &ConditionSetUpdate,
    ) -> PermitResult<ConditionSetRead> {
        let url = self.scoped_url(Family::Schema, &["condition_sets", key]).await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_condition_set(&self, key: &str) -> PermitResult<()> {
        let url = self.scoped_url(Family::Schema, &["condition_sets", key]).await?;
        self.delete(url).await
    }
}
