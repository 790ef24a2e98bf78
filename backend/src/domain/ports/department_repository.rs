//! Port for department persistence.

use async_trait::async_trait;

use crate::domain::{CascadeReport, Department, DepartmentId, OrganizationId};

use super::RepositoryError;

/// Storage for departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn insert(&self, department: &Department) -> Result<(), RepositoryError>;

    async fn update(&self, department: &Department) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<Option<Department>, RepositoryError>;

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Department>, RepositoryError>;

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Department>, RepositoryError>;

    /// Delete the department, its teams, and every assignment referencing
    /// the department or those teams, atomically.
    async fn delete_cascade(&self, id: DepartmentId) -> Result<CascadeReport, RepositoryError>;
}
