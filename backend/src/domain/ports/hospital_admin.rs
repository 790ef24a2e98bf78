//! Driving port for hospital use-cases.

use async_trait::async_trait;

use crate::domain::{Actor, EntityName, Error, Hospital, HospitalId, OrganizationId};

/// Input for creating a hospital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHospital {
    pub name: EntityName,
    pub address: Option<String>,
}

/// Partial hospital update. `address: Some(None)` clears the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HospitalPatch {
    pub name: Option<EntityName>,
    pub address: Option<Option<String>>,
    pub active: Option<bool>,
}

/// Hospital administration within one organization.
#[async_trait]
pub trait HospitalAdmin: Send + Sync {
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewHospital,
    ) -> Result<Hospital, Error>;

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<Hospital, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<Hospital>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
        patch: HospitalPatch,
    ) -> Result<Hospital, Error>;

    /// Delete a hospital that no longer has locations.
    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<(), Error>;
}
