//! Driving port for department team use-cases.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, CascadeReport, DepartmentId, EntityName, Error, OrganizationId, Team, TeamId, TeamRota,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub name: Option<EntityName>,
    pub active: Option<bool>,
}

/// Listing criteria for teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamQuery {
    pub department_id: Option<DepartmentId>,
    pub include_inactive: bool,
}

/// Team administration and rota reads.
#[async_trait]
pub trait TeamAdmin: Send + Sync {
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        department_id: DepartmentId,
        name: EntityName,
    ) -> Result<Team, Error>;

    async fn get(&self, actor: &Actor, org_id: OrganizationId, id: TeamId)
    -> Result<Team, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        query: TeamQuery,
    ) -> Result<Vec<Team>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
        patch: TeamPatch,
    ) -> Result<Team, Error>;

    /// Delete a team together with its assignments.
    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<CascadeReport, Error>;

    /// Users rostered onto the team on `on`.
    async fn rota(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
        on: NaiveDate,
    ) -> Result<TeamRota, Error>;
}
