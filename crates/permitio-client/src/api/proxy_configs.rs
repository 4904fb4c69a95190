use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{ProxyConfigCreate, ProxyConfigRead, ProxyConfigUpdate};
use tracing::instrument;

impl PermitClient {
    #[instrument(skip(self, body), fields(key = %body.key, auth_mechanism = %body.auth_mechanism))]
    pub async fn create_proxy_config(
        &self,
        body: &ProxyConfigCreate,
    ) -> PermitResult<ProxyConfigRead> {
        let url = self.scoped_url(Family::Facts, &["proxy_configs"]).await?;
        self.post(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn get_proxy_config(&self, key_or_id: &str) -> PermitResult<ProxyConfigRead> {
        let url = self
            .scoped_url(Family::Facts, &["proxy_configs", key_or_id])
            .await?;
        self.get(url).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_proxy_config(
        &self,
        key: &str,
        body: &ProxyConfigUpdate,
    ) -> PermitResult<ProxyConfigRead> {
        let url = self.scoped_url(Family::Facts, &["proxy_configs", key]).await?;
        self.patch(url, body).await
    }

    #[instrument(skip(self))]
    pub async fn delete_proxy_config(&self, key: &str) -> PermitResult<()> {
        let url = self.scoped_url(Family::Facts, &["proxy_configs", key]).await?;
        self.delete(url).await
    }
}
