//! Internal Diesel row structs and their mapping to domain entities.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each row derives `AsChangeset` so updates
//! write the whole record; nullable columns are cleared when the domain value
//! is `None`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    Assignment, AssignmentId, AssignmentKind, AssignmentLink, Audit, DateRange, Department,
    DepartmentId, DisplayName, EmailAddress, EntityName, Hospital, HospitalId, LinkColumns,
    Location, LocationId, LocationKind, Organization, OrganizationId, Team, TeamId, User, UserId,
    UserRole,
};

use super::schema::{assignments, departments, hospitals, locations, organizations, teams, users};

fn corrupt(table: &str, field: &str, error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::query(format!("stored {table}.{field} is invalid: {error}"))
}

fn to_audit(
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
) -> Audit {
    Audit {
        created_at,
        created_by: created_by.map(UserId::from_uuid),
        updated_at,
        updated_by: updated_by.map(UserId::from_uuid),
    }
}

fn actor_uuid(id: Option<UserId>) -> Option<Uuid> {
    id.map(Uuid::from)
}

fn stored_name(table: &str, raw: &str) -> Result<EntityName, RepositoryError> {
    EntityName::new(raw).map_err(|err| corrupt(table, "name", err))
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub name_key: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Organization> for OrganizationRow {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.into(),
            name: org.name.to_string(),
            name_key: org.name.key(),
            active: org.active,
            created_at: org.audit.created_at,
            created_by: actor_uuid(org.audit.created_by),
            updated_at: org.audit.updated_at,
            updated_by: actor_uuid(org.audit.updated_by),
        }
    }
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = RepositoryError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrganizationId::from_uuid(row.id),
            name: stored_name("organizations", &row.name)?,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Hospitals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = hospitals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HospitalRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub name_key: String,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Hospital> for HospitalRow {
    fn from(hospital: &Hospital) -> Self {
        Self {
            id: hospital.id.into(),
            org_id: hospital.org_id.into(),
            name: hospital.name.to_string(),
            name_key: hospital.name.key(),
            address: hospital.address.clone(),
            active: hospital.active,
            created_at: hospital.audit.created_at,
            created_by: actor_uuid(hospital.audit.created_by),
            updated_at: hospital.audit.updated_at,
            updated_by: actor_uuid(hospital.audit.updated_by),
        }
    }
}

impl TryFrom<HospitalRow> for Hospital {
    type Error = RepositoryError;

    fn try_from(row: HospitalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: HospitalId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            name: stored_name("hospitals", &row.name)?,
            address: row.address,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub name_key: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id.into(),
            org_id: department.org_id.into(),
            name: department.name.to_string(),
            name_key: department.name.key(),
            description: department.description.clone(),
            active: department.active,
            created_at: department.audit.created_at,
            created_by: actor_uuid(department.audit.created_by),
            updated_at: department.audit.updated_at,
            updated_by: actor_uuid(department.audit.updated_by),
        }
    }
}

impl TryFrom<DepartmentRow> for Department {
    type Error = RepositoryError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DepartmentId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            name: stored_name("departments", &row.name)?,
            description: row.description,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LocationRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub hospital_id: Uuid,
    pub name: String,
    pub name_key: String,
    pub kind: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Location> for LocationRow {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.into(),
            org_id: location.org_id.into(),
            hospital_id: location.hospital_id.into(),
            name: location.name.to_string(),
            name_key: location.name.key(),
            kind: location.kind.as_str().to_owned(),
            active: location.active,
            created_at: location.audit.created_at,
            created_by: actor_uuid(location.audit.created_by),
            updated_at: location.audit.updated_at,
            updated_by: actor_uuid(location.audit.updated_by),
        }
    }
}

impl TryFrom<LocationRow> for Location {
    type Error = RepositoryError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let kind: LocationKind = row
            .kind
            .parse()
            .map_err(|err| corrupt("locations", "kind", err))?;
        Ok(Self {
            id: LocationId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            hospital_id: HospitalId::from_uuid(row.hospital_id),
            name: stored_name("locations", &row.name)?,
            kind,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub name_key: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.into(),
            org_id: team.org_id.into(),
            department_id: team.department_id.into(),
            name: team.name.to_string(),
            name_key: team.name.key(),
            active: team.active,
            created_at: team.audit.created_at,
            created_by: actor_uuid(team.audit.created_by),
            updated_at: team.audit.updated_at,
            updated_by: actor_uuid(team.audit.updated_by),
        }
    }
}

impl TryFrom<TeamRow> for Team {
    type Error = RepositoryError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            department_id: DepartmentId::from_uuid(row.department_id),
            name: stored_name("teams", &row.name)?,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into(),
            org_id: user.org_id.into(),
            email: user.email.to_string(),
            display_name: user.display_name.to_string(),
            role: user.role.as_str().to_owned(),
            active: user.active,
            created_at: user.audit.created_at,
            created_by: actor_uuid(user.audit.created_by),
            updated_at: user.audit.updated_at,
            updated_by: actor_uuid(user.audit.updated_by),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: UserRole = row.role.parse().map_err(|err| corrupt("users", "role", err))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            email: EmailAddress::new(&row.email).map_err(|err| corrupt("users", "email", err))?,
            display_name: DisplayName::new(&row.display_name)
                .map_err(|err| corrupt("users", "display_name", err))?,
            role,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssignmentRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub kind: String,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Assignment> for AssignmentRow {
    fn from(assignment: &Assignment) -> Self {
        let columns = assignment.link.columns();
        Self {
            id: assignment.id.into(),
            org_id: assignment.org_id.into(),
            kind: assignment.link.kind().as_str().to_owned(),
            department_id: columns.department_id.map(Uuid::from),
            location_id: columns.location_id.map(Uuid::from),
            team_id: columns.team_id.map(Uuid::from),
            user_id: columns.user_id.map(Uuid::from),
            start_date: assignment.period.start(),
            end_date: assignment.period.end(),
            active: assignment.active,
            created_at: assignment.audit.created_at,
            created_by: actor_uuid(assignment.audit.created_by),
            updated_at: assignment.audit.updated_at,
            updated_by: actor_uuid(assignment.audit.updated_by),
        }
    }
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = RepositoryError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let kind: AssignmentKind = row
            .kind
            .parse()
            .map_err(|err| corrupt("assignments", "kind", err))?;
        let columns = LinkColumns {
            department_id: row.department_id.map(DepartmentId::from_uuid),
            location_id: row.location_id.map(LocationId::from_uuid),
            team_id: row.team_id.map(TeamId::from_uuid),
            user_id: row.user_id.map(UserId::from_uuid),
        };
        let link = AssignmentLink::from_columns(kind, columns)
            .ok_or_else(|| corrupt("assignments", "kind", format!("{kind} endpoint missing")))?;
        let period = DateRange::new(row.start_date, row.end_date)
            .map_err(|err| corrupt("assignments", "end_date", err))?;
        Ok(Self {
            id: AssignmentId::from_uuid(row.id),
            org_id: OrganizationId::from_uuid(row.org_id),
            link,
            period,
            active: row.active,
            audit: to_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
        })
    }
}

/// Convert a batch of rows, failing on the first invalid one.
pub(crate) fn rows_into<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepositoryError>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}
