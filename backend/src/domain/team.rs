//! Department team entity.

use serde::Serialize;

use super::{Audit, DepartmentId, EntityName, OrganizationId, TeamId, User};

/// A team owned by exactly one department.
///
/// ## Invariants
/// - `name` is unique within `department_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub org_id: OrganizationId,
    pub department_id: DepartmentId,
    pub name: EntityName,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Users on duty for a team on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRota {
    pub team_id: TeamId,
    pub on: chrono::NaiveDate,
    pub members: Vec<User>,
}
