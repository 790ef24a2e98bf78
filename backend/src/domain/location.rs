//! Hospital location entity (wards, clinics, theatres).

use serde::Serialize;

use super::{Audit, EntityName, HospitalId, LocationId, LocationKind, OrganizationId};

/// A physical area inside a hospital.
///
/// ## Invariants
/// - `name` is unique within `hospital_id`.
/// - `hospital_id` belongs to `org_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub org_id: OrganizationId,
    pub hospital_id: HospitalId,
    pub name: EntityName,
    pub kind: LocationKind,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Location {
    pub fn is_ward(&self) -> bool {
        self.kind == LocationKind::Ward
    }
}
