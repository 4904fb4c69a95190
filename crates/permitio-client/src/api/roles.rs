use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{RoleCreate, RoleRead, RoleUpdate};
use tracing::instrument;

impl PermitClient {
    // ── Global roles ──────────────────────────────────────────────────

    #[instrument(skip(self, body), fields(key = %body.key))]
    pub async fn create_role(&self, body: &RoleCreate) -> PermitResult<RoleRead> {
        let url = self.scoped_url(Family::Schema, &["roles"]).await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_role(&self, key_or_id: &str) -> PermitResult<RoleRead> {
        let url = self.scoped_url(Family::Schema, &["roles", key_or_id]).await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_role(&self, key: &str, body: &RoleUpdate) -> PermitResult<RoleRead> {
        let url = self.scoped_url(Family::Schema, &["roles", key]).await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_role(&self, key: &str) -> PermitResult<()> {
        let url = self.scoped_url(Family::Schema, &["roles", key]).await?;
        self.delete(url).await
    }

    // ── Resource roles ────────────────────────────────────────────────

    #[instrument(skip(self, body), fields(key = %body.key))]
    pub async fn create_resource_role(
        &self,
        resource: &str,
        body: &RoleCreate,
    ) -> PermitResult<RoleRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "roles"])
            .await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_resource_role(&self, resource: &str, key_or_id: &str) -> PermitResult<RoleRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "roles", key_or_id])
            .await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_resource_role(
        &self,
        resource: &str,
        key: &str,
        body: &RoleUpdate,
    ) -> PermitResult<RoleRead> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "roles", key])
            .await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_resource_role(&self, resource: &str, key: &str) -> PermitResult<()> {
        let url = self
            .scoped_url(Family::Schema, &["resources", resource, "roles", key])
            .await?;
        self.delete(url).await
    }
}
