//! Port for assignment persistence.

use async_trait::async_trait;

use crate::domain::{
    Assignment, AssignmentFilter, AssignmentId, AssignmentLink, OrganizationId,
};

use super::RepositoryError;

/// Storage for assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn insert(&self, assignment: &Assignment) -> Result<(), RepositoryError>;

    async fn update(&self, assignment: &Assignment) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, RepositoryError>;

    /// Assignments of the organization passing `filter`, ordered by start date.
    async fn list(
        &self,
        org_id: OrganizationId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<Assignment>, RepositoryError>;

    /// Every assignment, active or not, joining exactly the same endpoints.
    async fn list_for_link(
        &self,
        link: &AssignmentLink,
    ) -> Result<Vec<Assignment>, RepositoryError>;

    async fn delete(&self, id: AssignmentId) -> Result<bool, RepositoryError>;
}
