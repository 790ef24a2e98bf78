//! Hospital entity.

use serde::Serialize;

use super::{Audit, EntityName, HospitalId, OrganizationId};

/// A hospital site belonging to one organization.
///
/// ## Invariants
/// - `name` is unique within `org_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: HospitalId,
    pub org_id: OrganizationId,
    pub name: EntityName,
    pub address: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}
