//! Driving port for hospital location use-cases.

use async_trait::async_trait;

use crate::domain::{
    Actor, CascadeReport, EntityName, Error, HospitalId, Location, LocationId, LocationKind,
    OrganizationId,
};

/// Input for creating a location inside a hospital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub name: EntityName,
    pub kind: LocationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationPatch {
    pub name: Option<EntityName>,
    pub kind: Option<LocationKind>,
    pub active: Option<bool>,
}

/// Listing criteria for locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationQuery {
    pub hospital_id: Option<HospitalId>,
    pub include_inactive: bool,
}

/// Hospital location administration.
#[async_trait]
pub trait LocationAdmin: Send + Sync {
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        hospital_id: HospitalId,
        input: NewLocation,
    ) -> Result<Location, Error>;

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<Location, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        query: LocationQuery,
    ) -> Result<Vec<Location>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
        patch: LocationPatch,
    ) -> Result<Location, Error>;

    /// Delete a location together with its assignments.
    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<CascadeReport, Error>;
}
