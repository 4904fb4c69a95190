use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{ResourceAttributeCreate, ResourceAttributeRead, ResourceAttributeUpdate};
use tracing::instrument;

impl PermitClient {
    /// Declare an attribute on `resource`. User attributes live on `__user`.
    #[instrument(skip(self, body), fields(key = %body.key))]
    pub async fn create_resource_attribute(
        &self,
        resource: &str,
        body: &ResourceAttributeCreate,
    ) -> PermitResult<ResourceAttributeRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "attributes"])
            .await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_resource_attribute(
        &self,
        resource: &str,
        key_or_id: &str,
    ) -> PermitResult<ResourceAttributeRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "attributes", key_or_id])
            .await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_resource_attribute(
        &self,
        resource: &str,
        key: &str,
        body: &ResourceAttributeUpdate,
    ) -> PermitResult<ResourceAttributeRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "attributes", key])
            .await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_resource_attribute(&self, resource: &str, key: &str) -> PermitResult<()> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "attributes", key])
            .await?;
        self.delete(url).await
    }
}
