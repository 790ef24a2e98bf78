//! Organization (tenant) entity.

use serde::Serialize;

use super::{Audit, EntityName, OrganizationId};

/// Top-level tenant owning hospitals, departments and users.
///
/// ## Invariants
/// - `name` is unique across all organizations, compared on its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: EntityName,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Records still owned by an organization; any non-zero count blocks deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizationDependants {
    pub hospitals: u64,
    pub departments: u64,
    pub users: u64,
}

impl OrganizationDependants {
    /// Whether nothing references the organization any more.
    pub fn is_empty(&self) -> bool {
        self.hospitals == 0 && self.departments == 0 && self.users == 0
    }
}
