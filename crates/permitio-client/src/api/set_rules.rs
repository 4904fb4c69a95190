use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::{SetRule, SetRuleRead};
use tracing::instrument;

impl PermitClient {
    /// Grant a user set a permission on a resource set.
    ///
    /// The API answers with the list of rules created.
    #[instrument(skip(self))]
    pub async fn assign_set_permission(&self, rule: &SetRule) -> PermitResult<Vec<SetRuleRead>> {
        let url = self.scoped_url(Family::Facts, &["set_rules"]).await?;
        self.post(url, rule).await
    }

    /// List rules matching the triple.
    #[instrument(skip(self))]
    pub async fn list_set_permissions(&self, rule: &SetRule) -> PermitResult<Vec<SetRuleRead>> {
        let url = self.scoped_url(Family::Facts, &["set_rules"]).await?;
        self.get_with_query(url, rule).await
    }

    #[instrument(skip(self))]
    pub async fn unassign_set_permission(&self, rule: &SetRule) -> PermitResult<()> {
        let url = self.scoped_url(Family::Facts, &["set_rules"]).await?;
        self.delete_with_body(url, rule).await
    }
}
