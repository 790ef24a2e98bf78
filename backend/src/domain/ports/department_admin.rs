//! Driving port for department use-cases.

use async_trait::async_trait;

use crate::domain::{
    Actor, CascadeReport, Department, DepartmentId, EntityName, Error, OrganizationId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: EntityName,
    pub description: Option<String>,
}

/// Partial department update. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    pub name: Option<EntityName>,
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}

/// Department administration.
#[async_trait]
pub trait DepartmentAdmin: Send + Sync {
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewDepartment,
    ) -> Result<Department, Error>;

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<Department, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<Department>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
        patch: DepartmentPatch,
    ) -> Result<Department, Error>;

    /// Delete a department with its teams and all related assignments.
    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<CascadeReport, Error>;
}
