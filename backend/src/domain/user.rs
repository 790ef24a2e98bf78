//! Organization user entity.

use serde::Serialize;

use super::{Audit, DisplayName, EmailAddress, OrganizationId, UserId, UserRole};

/// A person who can sign in to the console and be rostered onto teams.
///
/// ## Invariants
/// - `email` is stored lower-cased and is unique within `org_id`.
/// - `id` doubles as the uid of the mirrored identity-provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub org_id: OrganizationId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub role: UserRole,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
}
