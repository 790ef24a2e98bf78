//! Port for organization persistence.

use async_trait::async_trait;

use crate::domain::{Organization, OrganizationDependants, OrganizationId};

use super::RepositoryError;

/// Storage for organizations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Insert a new organization; a taken name key yields `Duplicate`.
    async fn insert(&self, organization: &Organization) -> Result<(), RepositoryError>;

    /// Overwrite an existing organization.
    async fn update(&self, organization: &Organization) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError>;

    /// Look up an organization by [`crate::domain::EntityName::key`].
    async fn find_by_name_key(&self, key: &str) -> Result<Option<Organization>, RepositoryError>;

    /// Every organization ordered by name.
    async fn list(&self) -> Result<Vec<Organization>, RepositoryError>;

    /// Count records that still belong to the organization.
    async fn dependants(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDependants, RepositoryError>;

    /// Remove the organization, returning whether a row was deleted.
    async fn delete(&self, id: OrganizationId) -> Result<bool, RepositoryError>;
}
