use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{ResourceCreate, ResourceRead, ResourceUpdate};
use tracing::instrument;

impl PermitClient {
    /// Create a resource (POST /v2/schema/{proj}/{env}/resources).
    #[instrument(skip(self, body), fields(key = %body.key))]
    pub async fn create_resource(&self, body: &ResourceCreate) -> PermitResult<ResourceRead> {
        let url = self.scoped_url(Family::Schema, &["resources"]).await?;
        self.post(url, body).await
    }

    /// Get a resource by key or id.
    #[instrument(skip(self))]
    pub async fn get_resource(&self, key_or_id: &str) -> PermitResult<ResourceRead> {
        let url = self.scoped_url(Family::Schema, &["resources", key_or_id]).await?;
        self.get(url).await
    }

    /// Patch a resource. Actions and attributes in the body replace the stored maps.
    #[instrument(skip(self, body))]
    pub async fn update_resource(
        &self,
        key: &str,
        body: &ResourceUpdate,
    ) -> PermitResult<ResourceRead> {
        let url = self.scoped_url(Family::Schema, &["resources", key]).await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_resource(&self, key: &str) -> PermitResult<()> {
        let url = self.scoped_url(Family::Schema, &["resources", key]).await?;
        self.delete(url).await
    }
}
