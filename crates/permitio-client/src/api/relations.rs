use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{RelationCreate, RelationRead};
use tracing::instrument;

impl PermitClient {
    /// Create a relation whose object is `object_resource`.
    #[instrument(skip(self, body), fields(key = %body.key, subject = %body.subject_resource))]
    pub async fn create_relation(
        &self,
        object_resource: &str,
        body: &RelationCreate,
    ) -> PermitResult<RelationRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", object_resource, "relations"])
            .await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_relation(&self, object_resource: &str, key: &str) -> PermitResult<RelationRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", object_resource, "relations", key])
            .await?;
        self.get(url).await
    }

    #[instrument(skip(self))]
    pub async fn delete_relation(&self, object_resource: &str, key: &str) -> PermitResult<()> {
        let url = self
            .scoped_url(Family::Schema, &["resources", object_resource, "relations", key])
            .await?;
        self.delete(url).await
    }
}
