//! Department use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    DepartmentAdmin, DepartmentPatch, DepartmentRepository, NewDepartment, OrganizationRepository,
};
use crate::domain::service_support::{name_taken, normalise_text, not_found, retain_active};
use crate::domain::{
    Actor, Audit, CascadeReport, Department, DepartmentId, EntityName, Error, OrganizationId,
};

/// Department service implementing [`DepartmentAdmin`].
#[derive(Clone)]
pub struct DepartmentService<O, D> {
    organizations: Arc<O>,
    departments: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<O, D> DepartmentService<O, D> {
    pub fn new(organizations: Arc<O>, departments: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            organizations,
            departments,
            clock,
        }
    }
}

impl<O, D> DepartmentService<O, D>
where
    O: OrganizationRepository,
    D: DepartmentRepository,
{
    async fn ensure_organization(&self, org_id: OrganizationId) -> Result<(), Error> {
        match self.organizations.find_by_id(org_id).await? {
            Some(_) => Ok(()),
            None => Err(not_found("organization", org_id)),
        }
    }

    async fn load(&self, org_id: OrganizationId, id: DepartmentId) -> Result<Department, Error> {
        self.departments
            .find_by_id(org_id, id)
            .await?
            .ok_or_else(|| not_found("department", id))
    }

    async fn ensure_name_free(
        &self,
        org_id: OrganizationId,
        name: &EntityName,
        except: Option<DepartmentId>,
    ) -> Result<(), Error> {
        match self.departments.find_by_name_key(org_id, &name.key()).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(name_taken("department", name, "in this organization"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<O, D> DepartmentAdmin for DepartmentService<O, D>
where
    O: OrganizationRepository,
    D: DepartmentRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        input: NewDepartment,
    ) -> Result<Department, Error> {
        actor.require_manage(org_id)?;
        self.ensure_organization(org_id).await?;
        self.ensure_name_free(org_id, &input.name, None).await?;
        let department = Department {
            id: DepartmentId::random(),
            org_id,
            name: input.name,
            description: normalise_text(input.description),
            active: true,
            audit: Audit::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.departments.insert(&department).await?;
        Ok(department)
    }

    async fn get(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<Department, Error> {
        actor.require_read(org_id)?;
        self.load(org_id, id).await
    }

    async fn list(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        include_inactive: bool,
    ) -> Result<Vec<Department>, Error> {
        actor.require_read(org_id)?;
        self.ensure_organization(org_id).await?;
        let departments = self.departments.list(org_id).await?;
        Ok(retain_active(departments, include_inactive, |d| d.active))
    }

    async fn update(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
        patch: DepartmentPatch,
    ) -> Result<Department, Error> {
        actor.require_manage(org_id)?;
        let mut department = self.load(org_id, id).await?;
        if let Some(name) = patch.name {
            self.ensure_name_free(org_id, &name, Some(id)).await?;
            department.name = name;
        }
        if let Some(description) = patch.description {
            department.description = normalise_text(description);
        }
        if let Some(active) = patch.active {
            department.active = active;
        }
        department.audit.touch(self.clock.utc(), Some(actor.user_id));
        self.departments.update(&department).await?;
        Ok(department)
    }

    async fn delete(
        &self,
        actor: &Actor,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<CascadeReport, Error> {
        actor.require_manage(org_id)?;
        self.load(org_id, id).await?;
        let report = self.departments.delete_cascade(id).await?;
        tracing::info!(
            department_id = %id,
            teams = report.teams,
            assignments = report.assignments,
            "department deleted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockDepartmentRepository, MockOrganizationRepository, RepositoryError,
    };
    use crate::domain::test_support::{actor, clock, department, name, organization};
    use crate::domain::{ErrorCode, UserRole};
    use rstest::rstest;

    fn service(
        orgs: MockOrganizationRepository,
        departments: MockDepartmentRepository,
    ) -> DepartmentService<MockOrganizationRepository, MockDepartmentRepository> {
        DepartmentService::new(Arc::new(orgs), Arc::new(departments), clock())
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_duplicate_name_in_org() {
        let org = organization("Trust");
        let org_id = org.id;
        let taken = department(org_id, "Cardiology");
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id().return_once(move |_| Ok(Some(org)));
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_find_by_name_key()
            .return_once(move |_, _| Ok(Some(taken)));
        departments.expect_insert().times(0);

        let err = service(orgs, departments)
            .create(
                &actor(UserRole::OrgAdmin, org_id),
                org_id,
                NewDepartment {
                    name: name("cardiology"),
                    description: None,
                },
            )
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_returns_cascade_report() {
        let org_id = OrganizationId::random();
        let existing = department(org_id, "Surgery");
        let id = existing.id;
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_find_by_id()
            .return_once(move |_, _| Ok(Some(existing)));
        departments
            .expect_delete_cascade()
            .withf(move |target| *target == id)
            .return_once(|_| {
                Ok(CascadeReport {
                    teams: 2,
                    assignments: 7,
                })
            });

        let report = service(MockOrganizationRepository::new(), departments)
            .delete(&actor(UserRole::OrgAdmin, org_id), org_id, id)
            .await
            .expect("delete succeeds");
        assert_eq!(report.teams, 2);
        assert_eq!(report.assignments, 7);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_cascade_is_reported_as_internal_error() {
        let org_id = OrganizationId::random();
        let existing = department(org_id, "Surgery");
        let id = existing.id;
        let mut departments = MockDepartmentRepository::new();
        departments
            .expect_find_by_id()
            .return_once(move |_, _| Ok(Some(existing)));
        departments
            .expect_delete_cascade()
            .return_once(|_| Err(RepositoryError::query("transaction aborted")));

        let err = service(MockOrganizationRepository::new(), departments)
            .delete(&actor(UserRole::OrgAdmin, org_id), org_id, id)
            .await
            .expect_err("failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn other_org_admins_cannot_read() {
        let err = service(MockOrganizationRepository::new(), MockDepartmentRepository::new())
            .get(
                &actor(UserRole::OrgAdmin, OrganizationId::random()),
                OrganizationId::random(),
                DepartmentId::random(),
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
