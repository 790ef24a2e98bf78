//! Port for hospital persistence.

use async_trait::async_trait;

use crate::domain::{Hospital, HospitalId, OrganizationId};

use super::RepositoryError;

/// Storage for hospitals, scoped by organization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalRepository: Send + Sync {
    async fn insert(&self, hospital: &Hospital) -> Result<(), RepositoryError>;

    async fn update(&self, hospital: &Hospital) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<Option<Hospital>, RepositoryError>;

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Hospital>, RepositoryError>;

    /// Hospitals of the organization ordered by name.
    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Hospital>, RepositoryError>;

    /// Number of locations inside the hospital.
    async fn count_locations(&self, id: HospitalId) -> Result<u64, RepositoryError>;

    async fn delete(&self, id: HospitalId) -> Result<bool, RepositoryError>;
}
