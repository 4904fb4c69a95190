use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{TenantCreate, TenantRead, TenantUpdate};
use tracing::instrument;

impl PermitClient {
    #[instrument(skip(self, body), fields(key = %body.key))]
    pub async fn create_tenant(&self, body: &TenantCreate) -> PermitResult<TenantRead> {
        let url = self.scoped_url(Family::Facts, &["tenants"]).await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_tenant(&self, key_or_id: &str) -> PermitResult<TenantRead> {
        let url = self.scoped_url(Family::Facts, &["tenants", key_or_id]).await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_tenant(&self, key: &str, body: &TenantUpdate) -> PermitResult<TenantRead> {
        let url = self.scoped_url(Family::Facts, &["tenants", key]).await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_tenant(&self, key: &str) -> PermitResult<()> {
        let url = self.scoped_url(Family::Facts, &["tenants", key]).await?;
        self.delete(url).await
    }
}
