//! Driving port for assignment use-cases.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, Assignment, AssignmentFilter, AssignmentId, AssignmentLink, DateRange, Error,
    OrganizationId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
    pub link: AssignmentLink,
    pub period: DateRange,
    pub active: bool,
}

/// Partial assignment update. `end_date: Some(None)` makes the period open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
}

/// Assignment administration.
#[async_trait]
pub trait AssignmentAdmin: Send + Sync {
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewAssignment,
    ) -> Result<Assignment, Error>;

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<Assignment, Error>;

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        filter: AssignmentFilter,
    ) -> Result<Vec<Assignment>, Error>;

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
        patch: AssignmentPatch,
    ) -> Result<Assignment, Error>;

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<(), Error>;
}
