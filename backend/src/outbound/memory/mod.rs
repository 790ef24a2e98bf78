//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. It enforces the same unique keys and cascades as the PostgreSQL
//! schema so both adapters behave alike behind the ports.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    AssignmentRepository, DepartmentRepository, HospitalRepository, LocationRepository,
    OrganizationRepository, RepositoryError, TeamRepository, UserRepository,
};
use crate::domain::{
    Assignment, AssignmentFilter, AssignmentId, AssignmentLink, CascadeReport, Department,
    DepartmentId, EmailAddress, Hospital, HospitalId, Location, LocationId, Organization,
    OrganizationDependants, OrganizationId, Team, TeamId, User, UserId,
};

#[derive(Default)]
struct Tables {
    organizations: HashMap<OrganizationId, Organization>,
    hospitals: HashMap<HospitalId, Hospital>,
    departments: HashMap<DepartmentId, Department>,
    locations: HashMap<LocationId, Location>,
    teams: HashMap<TeamId, Team>,
    users: HashMap<UserId, User>,
    assignments: HashMap<AssignmentId, Assignment>,
}

impl Tables {
    fn remove_assignments(&mut self, doomed: impl Fn(&AssignmentLink) -> bool) -> u64 {
        let before = self.assignments.len();
        self.assignments.retain(|_, assignment| !doomed(&assignment.link));
        count(before - self.assignments.len())
    }
}

/// Shared in-memory tables guarded by an async lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Insert `value`, rejecting an existing id or a clash on `same_key`.
fn insert_unique<K, V>(
    table: &mut HashMap<K, V>,
    id: K,
    value: &V,
    same_key: impl Fn(&V) -> bool,
    duplicate: &str,
) -> Result<(), RepositoryError>
where
    K: Eq + Hash,
    V: Clone,
{
    if table.contains_key(&id) {
        return Err(RepositoryError::duplicate("record already exists"));
    }
    if table.values().any(same_key) {
        return Err(RepositoryError::duplicate(duplicate));
    }
    table.insert(id, value.clone());
    Ok(())
}

/// Replace the row stored under `id`, rejecting a clash with another row.
fn update_unique<K, V>(
    table: &mut HashMap<K, V>,
    id: K,
    value: &V,
    same_key: impl Fn(&K, &V) -> bool,
    duplicate: &str,
) -> Result<(), RepositoryError>
where
    K: Eq + Hash,
    V: Clone,
{
    if table.iter().any(|(other, row)| *other != id && same_key(other, row)) {
        return Err(RepositoryError::duplicate(duplicate));
    }
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = value.clone();
            Ok(())
        }
        None => Err(RepositoryError::query("record not found")),
    }
}

fn sorted_by_key<T>(mut rows: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    rows.sort_by_cached_key(|row| key(row));
    rows
}

fn sorted_users(rows: Vec<User>) -> Vec<User> {
    let mut rows = rows;
    rows.sort_by_cached_key(|user| {
        (
            user.display_name.as_ref().to_lowercase(),
            user.email.to_string(),
        )
    });
    rows
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn insert(&self, organization: &Organization) -> Result<(), RepositoryError> {
        let key = organization.name.key();
        let mut tables = self.tables.write().await;
        insert_unique(
            &mut tables.organizations,
            organization.id,
            organization,
            |row| row.name.key() == key,
            "an organization with this name already exists",
        )
    }

    async fn update(&self, organization: &Organization) -> Result<(), RepositoryError> {
        let key = organization.name.key();
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.organizations,
            organization.id,
            organization,
            |_, row| row.name.key() == key,
            "an organization with this name already exists",
        )
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn find_by_name_key(&self, key: &str) -> Result<Option<Organization>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .values()
            .find(|row| row.name.key() == key)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Organization>, RepositoryError> {
        let rows = self.tables.read().await.organizations.values().cloned().collect();
        Ok(sorted_by_key(rows, |row: &Organization| row.name.key()))
    }

    async fn dependants(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDependants, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(OrganizationDependants {
            hospitals: count(tables.hospitals.values().filter(|h| h.org_id == id).count()),
            departments: count(tables.departments.values().filter(|d| d.org_id == id).count()),
            users: count(tables.users.values().filter(|u| u.org_id == id).count()),
        })
    }

    async fn delete(&self, id: OrganizationId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.organizations.remove(&id).is_some())
    }
}

#[async_trait]
impl HospitalRepository for InMemoryStore {
    async fn insert(&self, hospital: &Hospital) -> Result<(), RepositoryError> {
        let key = hospital.name.key();
        let mut tables = self.tables.write().await;
        if !tables.organizations.contains_key(&hospital.org_id) {
            return Err(RepositoryError::query("referenced record does not exist"));
        }
        insert_unique(
            &mut tables.hospitals,
            hospital.id,
            hospital,
            |row| row.org_id == hospital.org_id && row.name.key() == key,
            "a hospital with this name already exists in this organization",
        )
    }

    async fn update(&self, hospital: &Hospital) -> Result<(), RepositoryError> {
        let key = hospital.name.key();
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.hospitals,
            hospital.id,
            hospital,
            |_, row| row.org_id == hospital.org_id && row.name.key() == key,
            "a hospital with this name already exists in this organization",
        )
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: HospitalId,
    ) -> Result<Option<Hospital>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .hospitals
            .get(&id)
            .filter(|row| row.org_id == org_id)
            .cloned())
    }

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Hospital>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .hospitals
            .values()
            .find(|row| row.org_id == org_id && row.name.key() == key)
            .cloned())
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Hospital>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .hospitals
            .values()
            .filter(|row| row.org_id == org_id)
            .cloned()
            .collect();
        Ok(sorted_by_key(rows, |row: &Hospital| row.name.key()))
    }

    async fn count_locations(&self, id: HospitalId) -> Result<u64, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(count(
            tables
                .locations
                .values()
                .filter(|row| row.hospital_id == id)
                .count(),
        ))
    }

    async fn delete(&self, id: HospitalId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.hospitals.remove(&id).is_some())
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn insert(&self, department: &Department) -> Result<(), RepositoryError> {
        let key = department.name.key();
        let mut tables = self.tables.write().await;
        if !tables.organizations.contains_key(&department.org_id) {
            return Err(RepositoryError::query("referenced record does not exist"));
        }
        insert_unique(
            &mut tables.departments,
            department.id,
            department,
            |row| row.org_id == department.org_id && row.name.key() == key,
            "a department with this name already exists in this organization",
        )
    }

    async fn update(&self, department: &Department) -> Result<(), RepositoryError> {
        let key = department.name.key();
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.departments,
            department.id,
            department,
            |_, row| row.org_id == department.org_id && row.name.key() == key,
            "a department with this name already exists in this organization",
        )
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: DepartmentId,
    ) -> Result<Option<Department>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .get(&id)
            .filter(|row| row.org_id == org_id)
            .cloned())
    }

    async fn find_by_name_key(
        &self,
        org_id: OrganizationId,
        key: &str,
    ) -> Result<Option<Department>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .values()
            .find(|row| row.org_id == org_id && row.name.key() == key)
            .cloned())
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<Department>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .departments
            .values()
            .filter(|row| row.org_id == org_id)
            .cloned()
            .collect();
        Ok(sorted_by_key(rows, |row: &Department| row.name.key()))
    }

    async fn delete_cascade(&self, id: DepartmentId) -> Result<CascadeReport, RepositoryError> {
        let mut tables = self.tables.write().await;
        let team_ids: Vec<TeamId> = tables
            .teams
            .values()
            .filter(|team| team.department_id == id)
            .map(|team| team.id)
            .collect();
        let assignments = tables.remove_assignments(|link| {
            link.department_id() == Some(id)
                || link.team_id().is_some_and(|team| team_ids.contains(&team))
        });
        tables.teams.retain(|_, team| team.department_id != id);
        tables.departments.remove(&id);
        Ok(CascadeReport {
            teams: count(team_ids.len()),
            assignments,
        })
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn insert(&self, location: &Location) -> Result<(), RepositoryError> {
        let key = location.name.key();
        let mut tables = self.tables.write().await;
        if !tables.hospitals.contains_key(&location.hospital_id) {
            return Err(RepositoryError::query("referenced record does not exist"));
        }
        insert_unique(
            &mut tables.locations,
            location.id,
            location,
            |row| row.hospital_id == location.hospital_id && row.name.key() == key,
            "a location with this name already exists in this hospital",
        )
    }

    async fn update(&self, location: &Location) -> Result<(), RepositoryError> {
        let key = location.name.key();
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.locations,
            location.id,
            location,
            |_, row| row.hospital_id == location.hospital_id && row.name.key() == key,
            "a location with this name already exists in this hospital",
        )
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: LocationId,
    ) -> Result<Option<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .get(&id)
            .filter(|row| row.org_id == org_id)
            .cloned())
    }

    async fn find_by_name_key(
        &self,
        hospital_id: HospitalId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .values()
            .find(|row| row.hospital_id == hospital_id && row.name.key() == key)
            .cloned())
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        hospital_id: Option<HospitalId>,
    ) -> Result<Vec<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .locations
            .values()
            .filter(|row| row.org_id == org_id)
            .filter(|row| hospital_id.is_none_or(|wanted| row.hospital_id == wanted))
            .cloned()
            .collect();
        Ok(sorted_by_key(rows, |row: &Location| row.name.key()))
    }

    async fn delete_with_assignments(&self, id: LocationId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.remove_assignments(|link| link.location_id() == Some(id));
        tables.locations.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn insert(&self, team: &Team) -> Result<(), RepositoryError> {
        let key = team.name.key();
        let mut tables = self.tables.write().await;
        if !tables.departments.contains_key(&team.department_id) {
            return Err(RepositoryError::query("referenced record does not exist"));
        }
        insert_unique(
            &mut tables.teams,
            team.id,
            team,
            |row| row.department_id == team.department_id && row.name.key() == key,
            "a team with this name already exists in this department",
        )
    }

    async fn update(&self, team: &Team) -> Result<(), RepositoryError> {
        let key = team.name.key();
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.teams,
            team.id,
            team,
            |_, row| row.department_id == team.department_id && row.name.key() == key,
            "a team with this name already exists in this department",
        )
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: TeamId,
    ) -> Result<Option<Team>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .teams
            .get(&id)
            .filter(|row| row.org_id == org_id)
            .cloned())
    }

    async fn find_by_name_key(
        &self,
        department_id: DepartmentId,
        key: &str,
    ) -> Result<Option<Team>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .teams
            .values()
            .find(|row| row.department_id == department_id && row.name.key() == key)
            .cloned())
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Team>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .teams
            .values()
            .filter(|row| row.org_id == org_id)
            .filter(|row| department_id.is_none_or(|wanted| row.department_id == wanted))
            .cloned()
            .collect();
        Ok(sorted_by_key(rows, |row: &Team| row.name.key()))
    }

    async fn delete_with_assignments(&self, id: TeamId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.remove_assignments(|link| link.team_id() == Some(id));
        tables.teams.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.organizations.contains_key(&user.org_id) {
            return Err(RepositoryError::query("referenced record does not exist"));
        }
        insert_unique(
            &mut tables.users,
            user.id,
            user,
            |row| row.org_id == user.org_id && row.email == user.email,
            "email is already in use in this organization",
        )
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.users,
            user.id,
            user,
            |_, row| row.org_id == user.org_id && row.email == user.email,
            "email is already in use in this organization",
        )
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        org_id: OrganizationId,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|row| row.org_id == org_id && row.email == *email)
            .cloned())
    }

    async fn list(&self, org_id: OrganizationId) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .users
            .values()
            .filter(|row| row.org_id == org_id)
            .cloned()
            .collect();
        Ok(sorted_users(rows))
    }

    async fn find_many(
        &self,
        org_id: OrganizationId,
        ids: &[UserId],
    ) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .filter(|row| row.org_id == org_id)
            .cloned()
            .collect();
        Ok(sorted_users(rows))
    }

    async fn delete_with_assignments(&self, id: UserId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.remove_assignments(|link| link.user_id() == Some(id));
        tables.users.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn insert(&self, assignment: &Assignment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        insert_unique(
            &mut tables.assignments,
            assignment.id,
            assignment,
            |_| false,
            "record already exists",
        )
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        update_unique(
            &mut tables.assignments,
            assignment.id,
            assignment,
            |_, _| false,
            "record already exists",
        )
    }

    async fn find_by_id(
        &self,
        org_id: OrganizationId,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .get(&id)
            .filter(|row| row.org_id == org_id)
            .cloned())
    }

    async fn list(
        &self,
        org_id: OrganizationId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<Assignment>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|row| row.org_id == org_id && filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.period.start(), row.id));
        Ok(rows)
    }

    async fn list_for_link(
        &self,
        link: &AssignmentLink,
    ) -> Result<Vec<Assignment>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|row| row.link == *link)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.period.start());
        Ok(rows)
    }

    async fn delete(&self, id: AssignmentId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.assignments.remove(&id).is_some())
    }
}
