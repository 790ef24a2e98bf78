//! Department entity.

use serde::Serialize;

use super::{Audit, DepartmentId, EntityName, OrganizationId};

/// Clinical or administrative department of an organization.
///
/// Departments are organization-wide rather than per hospital; they reach
/// hospital locations through assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub org_id: OrganizationId,
    pub name: EntityName,
    pub description: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}
