//! Port for department team persistence.

use async_trait::async_trait;

use crate::domain::{DepartmentId, OrganizationId, Team, TeamId};

use super::RepositoryError;

/// Storage for department teams.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn insert(&self, team: &Team) -> Result<(), RepositoryError>;

    async fn update(&self, team: &Team) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<Option<Team>, RepositoryError>;

    /// Look up a team by name key within one department.
    async fn find_by_name_key(
        &self,
        department_id: DepartmentId,
        key: &str,
    ) -> Result<Option<Team>, RepositoryError>;

    async fn list(
        &self,
        org_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Team>, RepositoryError>;

    /// Delete the team and its assignments; returns assignments removed.
    async fn delete_with_assignments(&self, id: TeamId) -> Result<u64, RepositoryError>;
}
