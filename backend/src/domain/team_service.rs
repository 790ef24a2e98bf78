//! Department team use-cases, including the daily rota.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;

use crate::domain::ports::{
    AssignmentRepository, DepartmentRepository, TeamAdmin, TeamPatch, TeamQuery, TeamRepository,
    UserRepository,
};
use crate::domain::service_support::{name_taken, not_found, retain_active};
use crate::domain::{
    Actor, AssignmentFilter, AssignmentKind, Audit, CascadeReport, DepartmentId, EntityName,
    Error, OrganizationId, Team, TeamId, TeamRota, UserId,
};

/// Team service implementing [`TeamAdmin`].
#[derive(Clone)]
pub struct TeamService<D, T, A, U> {
    departments: Arc<D>,
    teams: Arc<T>,
    assignments: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<D, T, A, U> TeamService<D, T, A, U> {
    pub fn new(
        departments: Arc<D>,
        teams: Arc<T>,
        assignments: Arc<A>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            departments,
            teams,
            assignments,
            users,
            clock,
        }
    }
}

impl<D, T, A, U> TeamService<D, T, A, U>
where
    D: DepartmentRepository,
    T: TeamRepository,
{
    async fn ensure_department(
        &self,
        org_id: OrganizationId,
        department_id: DepartmentId,
    ) -> Result<(), Error> {
        match self.departments.find_by_id(org_id, department_id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("department", department_id)),
        }
    }

    async fn load(&self, org_id: OrganizationId, id: TeamId) -> Result<Team, Error> {
        self.teams
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("team", id))
    }

    async fn ensure_name_free(
        &self,
        department_id: DepartmentId,
        name: &EntityName,
        except: Option<TeamId>,
    ) -> Result<(), Error> {
        match self.teams.find_by_name_key(department_id, &name.key()).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(name_taken("team", name, "in this department"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<D, T, A, U> TeamAdmin for TeamService<D, T, A, U>
where
    D: DepartmentRepository,
    T: TeamRepository,
    A: AssignmentRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        department_id: DepartmentId,
        name: EntityName,
    ) -> Result<Team, Error> {
        actor.require_manage(org_id)?;
        self.ensure_department(org_id, department_id).await?;
        self.ensure_name_free(department_id, &name, None).await?;
        let team = Team {
            id: TeamId::random(),
            org_id,
            department_id,
            name,
            active: true,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.teams.insert(&team).await?;
        Ok(team)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<Team, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        query: TeamQuery,
    ) -> Result<Vec<Team>, Error> {
        actor.require_read(org_id)?;
        if let Some(department_id) = query.department_id {
            self.ensure_department(org_id, department_id).await?;
        }
        let teams = self.teams.list(org_id, query.department_id).await?;
        Ok(retain_active(teams, query.include_inactive, |t| t.active))
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
        patch: TeamPatch,
    ) -> Result<Team, Error> {
        actor.require_manage(org_id)?;
        let mut team = self.load(org_id, id).await?;
        if let Some(name) = patch.name {
            self.ensure_name_free(team.department_id, &name, Some(id))
                .await?;
            team.name = name;
        }
        if let Some(active) = patch.active {
            team.active = active;
        }
        team.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.teams.update(&team).await?;
        Ok(team)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<CascadeReport, Error> {
        actor.require_manage(org_id)?;
        self.load(org_id, id).await?;
        let removed = self.teams.delete_with_assignments(id).await?;
        tracing::info!(team_id = %id, assignments = removed, "team deleted");
        Ok(CascadeReport::assignments(removed))
    }

    async fn rota(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: TeamId,
        on: NaiveDate,
    ) -> Result<TeamRota, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await?;
        let filter = AssignmentFilter {
            kind: Some(AssignmentKind::UserTeam),
            team_id: Some(id),
            active_on: Some(on),
            ..AssignmentFilter::default()
        };
        let mut user_ids: Vec<UserId> = self
            .assignments
            .list(org_id, &filter)
            .await?
            .iter()
            .filter_map(|assignment| assignment.link.user_id())
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let mut members = if user_ids.is_empty() {
            Vec::new()
        } else {
            self.users.find_many(org_id, &user_ids).await?
        };
        members.retain(|user| user.active);
        members.sort_by(|a, b| {
            a.display_name
                .as_ref()
                .to_lowercase()
                .cmp(&b.display_name.as_ref().to_lowercase())
        });
        Ok(TeamRota {
            team_id: id,
            on,
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAssignmentRepository, MockDepartmentRepository, MockTeamRepository,
        MockUserRepository,
    };
    use crate::domain::test_support::{
        actor, clock, day, department, fixed_now, name, period, team, user,
    };
    use crate::domain::{
        Assignment, AssignmentId, AssignmentLink, DisplayName, ErrorCode, UserRole,
    };
    use rstest::rstest;

    type Service = TeamService<
        MockDepartmentRepository,
        MockTeamRepository,
        MockAssignmentRepository,
        MockUserRepository,
    >;

    fn service(
        departments: MockDepartmentRepository,
        teams: MockTeamRepository,
        assignments: MockAssignmentRepository,
        users: MockUserRepository,
    ) -> Service {
        TeamService::new(
            Arc::new(departments),
            Arc::new(teams),
            Arc::new(assignments),
            Arc::new(users),
            clock(),
        )
    }

    fn membership(org_id: OrganizationId, user_id: UserId, team_id: TeamId) -> Assignment {
        Assignment {
            id: AssignmentId::random(),
            org_id,
            link: AssignmentLink::UserTeam { user_id, team_id },
            period: period(day(6, 1), Some(day(6, 30))),
            active: true,
            audit: Audit::created(fixed_now(), None),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_department_in_org() {
        let mut departments = MockDepartmentRepository::new();
        departments.expect_find_by_id().return_once(|_, _| Ok(None));
        let mut teams = MockTeamRepository::new();
        teams.expect_insert().times(0);
        let org_id = OrganizationId::random();

        let err = service(
            departments,
            teams,
            MockAssignmentRepository::new(),
            MockUserRepository::new(),
        )
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            DepartmentId::random(),
            name("Night shift"),
        )
        .await
        .expect_err("missing department");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn same_team_name_is_allowed_in_other_departments() {
        let org_id = OrganizationId::random();
        let dept = department(org_id, "Surgery");
        let dept_id = dept.id;
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_find_by_id()
            .return_once(move |_, _| Ok(Some(dept)));
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_name_key()
            .withf(move |department, key| *department == dept_id && key == "night shift")
            .return_once(|_, _| Ok(None));
        teams.expect_insert().times(1).return_once(|_| Ok(()));

        let created = service(
            departments,
            teams,
            MockAssignmentRepository::new(),
            MockUserRepository::new(),
        )
        .create(
            &actor(UserRole::OrgAdmin, org_id),
            org_id,
            dept_id,
            name("Night shift"),
        )
        .await
        .expect("create succeeds");
        assert_eq!(created.department_id, dept_id);
    }

    #[rstest]
    #[tokio::test]
    async fn rota_lists_active_members_by_display_name() {
        let org_id = OrganizationId::random();
        let dept = department(org_id, "Surgery");
        let crew = team(&dept, "Day");
        let team_id = crew.id;
        let mut zoe = user(org_id, "zoe@example.org", UserRole::Staff);
        zoe.display_name = DisplayName::new("Zoe").expect("valid");
        let mut amir = user(org_id, "amir@example.org", UserRole::Staff);
        amir.display_name = DisplayName::new("amir").expect("valid");
        let mut gone = user(org_id, "gone@example.org", UserRole::Staff);
        gone.active = false;
        let rows = vec![
            membership(org_id, zoe.id, team_id),
            membership(org_id, amir.id, team_id),
            membership(org_id, amir.id, team_id),
            membership(org_id, gone.id, team_id),
        ];
        let found = vec![zoe.clone(), gone, amir.clone()];

        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .return_once(move |_, _| Ok(Some(crew)));
        let mut assignments = MockAssignmentRepository::new();
        assignments
            .expect_list()
            .withf(move |_, filter| {
                filter.kind == Some(AssignmentKind::UserTeam)
                    && filter.team_id == Some(team_id)
                    && filter.active_on == Some(day(6, 15))
                    && !filter.include_inactive
            })
            .return_once(move |_, _| Ok(rows));
        let mut users = MockUserRepository::new();
        users
            .expect_find_many()
            .withf(|_, ids| ids.len() == 3)
            .return_once(move |_, _| Ok(found));

        let rota = service(MockDepartmentRepository::new(), teams, assignments, users)
            .rota(&actor(UserRole::Staff, org_id), org_id, team_id, day(6, 15))
            .await
            .expect("rota succeeds");
        let names: Vec<_> = rota
            .members
            .iter()
            .map(|member| member.display_name.as_ref())
            .collect();
        assert_eq!(names, vec!["amir", "Zoe"]);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_rota_skips_user_lookup() {
        let org_id = OrganizationId::random();
        let crew = team(&department(org_id, "Surgery"), "Day");
        let team_id = crew.id;
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .return_once(move |_, _| Ok(Some(crew)));
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_list().return_once(|_, _| Ok(Vec::new()));
        let mut users = MockUserRepository::new();
        users.expect_find_many().times(0);

        let rota = service(MockDepartmentRepository::new(), teams, assignments, users)
            .rota(&actor(UserRole::Staff, org_id), org_id, team_id, day(6, 15))
            .await
            .expect("rota succeeds");
        assert!(rota.members.is_empty());
    }
}
