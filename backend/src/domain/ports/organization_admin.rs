//! Driving port for organization use-cases.

use async_trait::async_trait;

use crate::domain::{Actor, EntityName, Error, Organization, OrganizationId};

/// Fields accepted when renaming or (de)activating an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationPatch {
    pub name: Option<EntityName>,
    pub active: Option<bool>,
}

/// Organization administration.
#[async_trait]
pub trait OrganizationAdmin: Send + Sync {
    /// Create an organization. Super admins only.
    async fn create(&self, actor: &Actor, name: EntityName) -> Result<Organization, Error>;

    async fn get(&self, actor: &Actor, id: OrganizationId) -> Result<Organization, Error>;

    /// Super admins see every organization; everyone else sees their own.
    async fn list(&self, actor: &Actor, include_inactive: bool)
    -> Result<Vec<Organization>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        id: OrganizationId,
        patch: OrganizationPatch,
    ) -> Result<Organization, Error>;

    /// Delete an empty organization. Super admins only.
    async fn delete(&self, actor: &Actor, id: OrganizationId) -> Result<(), Error>;
}
