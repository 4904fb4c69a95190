use crate::client::{Family, PermitClient};
use crate::error::PermitResult;
use crate::models::DerivedRoleRule;
use tracing::instrument;

impl PermitClient {
    /// Derive `to_role` on `resource` from the rule's role.
    #[instrument(skip(self))]
    pub async fn create_implicit_grant(
        &self,
        resource: &str,
        to_role: &str,
        rule: &DerivedRoleRule,
    ) -> PermitResult<DerivedRoleRule> {
        let url = self
            .scoped_url(
                Family::Schema,
                &["resources", resource, "roles", to_role, "implicit_grants"],
            )
            .await?;
        self.post(url, rule).await
    }

    #[instrument(skip(self))]
    pub async fn delete_implicit_grant(
        &self,
        resource: &str,
        to_role: &str,
        rule: &DerivedRoleRule,
    ) -> PermitResult<()> {
        let url = self
            .scoped_url(
                Family::Schema,
                &["resources", resource, "roles", to_role, "implicit_grants"],
            )
            .await?;
        self.delete_with_body(url, rule).await
    }
}
