//! Assignment use-cases.
//!
//! Assignments join two records of the same organization for a date period.
//! Both endpoints are checked on create; overlapping active periods for the
//! same pair of endpoints are refused on create and update.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    AssignmentAdmin, AssignmentPatch, AssignmentRepository, DepartmentRepository,
    LocationRepository, NewAssignment, TeamRepository, UserRepository,
};
use crate::domain::service_support::{invalid_value, not_found};
use crate::domain::{
    Actor, Assignment, AssignmentFilter, AssignmentId, AssignmentLink, Audit, DateRange,
    DepartmentId, Error, LocationId, OrganizationId, TeamId, UserId,
};

/// Repositories an assignment endpoint may live in.
pub struct AssignmentEndpoints<D, L, T, U> {
    pub departments: Arc<D>,
    pub locations: Arc<L>,
    pub teams: Arc<T>,
    pub users: Arc<U>,
}

impl<D, L, T, U> Clone for AssignmentEndpoints<D, L, T, U> {
    fn clone(&self) -> Self {
        Self {
            departments: Arc::clone(&self.departments),
            locations: Arc::clone(&self.locations),
            teams: Arc::clone(&self.teams),
            users: Arc::clone(&self.users),
        }
    }
}

/// Assignment service implementing [`AssignmentAdmin`].
#[derive(Clone)]
pub struct AssignmentService<D, L, T, U, A> {
    endpoints: AssignmentEndpoints<D, L, T, U>,
    assignments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<D, L, T, U, A> AssignmentService<D, L, T, U, A> {
    pub fn new(
        endpoints: AssignmentEndpoints<D, L, T, U>,
        assignments: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            endpoints,
            assignments,
            clock,
        }
    }
}

impl<D, L, T, U, A> AssignmentService<D, L, T, U, A>
where
    D: DepartmentRepository,
    L: LocationRepository,
    T: TeamRepository,
    U: UserRepository,
    A: AssignmentRepository,
{
    async fn ensure_department(&self, org_id: OrganizationId, id: DepartmentId) -> Result<(), Error> {
        match self.endpoints.departments.find_by_id(org_id, id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("department", id)),
        }
    }

    async fn ensure_location(
        &self,
        org_id: OrganizationId,
        id: LocationId,
        must_be_ward: bool,
    ) -> Result<(), Error> {
        let location = self
            .endpoints
            .locations
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("location", id))?;
        if must_be_ward && !location.is_ward() {
            return Err(Error::invalid_request(format!(
                "location {id} is a {}, not a ward",
                location.kind
            ))
            .with_details(json!({ "field": "locationId", "code": "not_a_ward" })));
        }
        Ok(())
    }

    async fn ensure_team(&self, org_id: OrganizationId, id: TeamId) -> Result<(), Error> {
        match self.endpoints.teams.find_by_id(org_id, id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("team", id)),
        }
    }

    async fn ensure_user(&self, org_id: OrganizationId, id: UserId) -> Result<(), Error> {
        match self.endpoints.users.find_by_id(id).await? {
            Some(user) if user.org_id == org_id => Ok(()),
            _ => Err(not_found("user", id)),
        }
    }

    async fn ensure_endpoints(
        &self,
        org_id: OrganizationId,
        link: &AssignmentLink,
    ) -> Result<(), Error> {
        match *link {
            AssignmentLink::DepartmentLocation {
                department_id,
                location_id,
            } => {
                self.ensure_department(org_id, department_id).await?;
                self.ensure_location(org_id, location_id, false).await
            }
            AssignmentLink::DepartmentTeam {
                department_id,
                team_id,
            } => {
                self.ensure_department(org_id, department_id).await?;
                self.ensure_team(org_id, team_id).await
            }
            AssignmentLink::TeamLocation {
                team_id,
                location_id,
            } => {
                self.ensure_team(org_id, team_id).await?;
                self.ensure_location(org_id, location_id, false).await
            }
            AssignmentLink::UserTeam { user_id, team_id } => {
                self.ensure_user(org_id, user_id).await?;
                self.ensure_team(org_id, team_id).await
            }
            AssignmentLink::WardDepartment {
                location_id,
                department_id,
            } => {
                self.ensure_location(org_id, location_id, true).await?;
                self.ensure_department(org_id, department_id).await
            }
        }
    }

    /// Refuse when another active assignment for the same link overlaps `period`.
    async fn ensure_no_overlap(
        &self,
        org_id: OrganizationId,
        link: &AssignmentLink,
        period: &DateRange,
        except: Option<AssignmentId>,
    ) -> Result<(), Error> {
        let clash = self
            .assignments
            .list_for_link(link)
            .await?
            .into_iter()
            .find(|existing| {
                existing.org_id == org_id
                    && existing.active
                    && Some(existing.id) != except
                    && existing.period.overlaps(period)
            });
        match clash {
            Some(existing) => Err(Error::conflict(format!(
                "an active {} assignment already covers part of this period",
                link.kind()
            ))
            .with_details(json!({ "conflictingAssignmentId": existing.id }))),
            None => Ok(()),
        }
    }

    async fn load(&self, org_id: OrganizationId, id: AssignmentId) -> Result<Assignment, Error> {
        self.assignments
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("assignment", id))
    }
}

#[async_trait]
impl<D, L, T, U, A> AssignmentAdmin for AssignmentService<D, L, T, U, A>
where
    D: DepartmentRepository,
    L: LocationRepository,
    T: TeamRepository,
    U: UserRepository,
    A: AssignmentRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewAssignment,
    ) -> Result<Assignment, Error> {
        actor.require_manage(org_id)?;
        self.ensure_endpoints(org_id, &input.link).await?;
        if input.active {
            self.ensure_no_overlap(org_id, &input.link, &input.period, None)
                .await?;
        }
        let assignment = Assignment {
            id: AssignmentId::random(),
            org_id,
            link: input.link,
            period: input.period,
            active: input.active,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.assignments.insert(&assignment).await?;
        Ok(assignment)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<Assignment, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        filter: AssignmentFilter,
    ) -> Result<Vec<Assignment>, Error> {
        actor.require_read(org_id)?;
        Ok(self.assignments.list(org_id, &filter).await?)
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
        patch: AssignmentPatch,
    ) -> Result<Assignment, Error> {
        actor.require_manage(org_id)?;
        let mut assignment = self.load(org_id, id).await?;
        let start = patch.start_date.unwrap_or(assignment.period.start());
        let end = patch.end_date.unwrap_or(assignment.period.end());
        let field = if patch.start_date.is_some() && patch.end_date.is_none() {
            "startDate"
        } else {
            "endDate"
        };
        let period = DateRange::new(start, end).map_err(|err| invalid_value(field, &err))?;
        let active = patch.active.unwrap_or(assignment.active);
        if active {
            self.ensure_no_overlap(org_id, &assignment.link, &period, Some(id))
                .await?;
        }
        assignment.period = period;
        assignment.active = active;
        assignment.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.assignments.update(&assignment).await?;
        Ok(assignment)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<(), Error> {
        actor.require_manage(org_id)?;
        self.load(org_id, id).await?;
        if !self.assignments.delete(id).await? {
            return Err(not_found("assignment", id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "assignment_service_tests.rs"]
mod tests;
