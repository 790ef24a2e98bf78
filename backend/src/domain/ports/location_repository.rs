//! Port for hospital location persistence.

use async_trait::async_trait;

use crate::domain::{HospitalId, Location, LocationId, OrganizationId};

use super::RepositoryError;

/// Storage for hospital locations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn insert(&self, location: &Location) -> Result<(), RepositoryError>;

    async fn update(&self, location: &Location) -> Result<(), RepositoryError>;

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<Option<Location>, RepositoryError>;

    /// Look up a location by name key within one hospital.
    async fn find_by_name_key(
        &self,
        hospital_id: HospitalId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError>;

    /// Locations of the organization, optionally narrowed to one hospital.
    async fn list(
        &self,
        org_id: OrganizationId,
        hospital_id: Option<HospitalId>,
    ) -> Result<Vec<Location>, RepositoryError>;

    /// Delete the location and every assignment referencing it in one
    /// transaction. Returns the number of assignments removed.
    async fn delete_with_assignments(&self, id: LocationId) -> Result<u64, RepositoryError>;
}
