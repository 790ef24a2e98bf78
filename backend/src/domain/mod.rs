//! Domain primitives, entities and use-case services.
//!
//! Purpose: model the hospital administration data (organizations,
//! hospitals, locations, departments, teams, users and assignments) and the
//! rules around it, independent of HTTP and storage.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Typed ids and validated values (`EntityName`, `EmailAddress`, ...).
//! - Entities and the `*Service` types implementing the driving ports.
//! - `identity_sync`: mirrors user writes into the identity provider.

pub mod actor;
pub mod assignment;
pub mod assignment_service;
pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod cascade;
pub mod department;
pub mod department_service;
pub mod error;
pub mod hospital;
pub mod hospital_service;
pub mod identity_sync;
pub mod ids;
pub mod location;
pub mod location_service;
pub mod organization;
pub mod organization_service;
pub mod ports;
pub mod service_support;
pub mod team;
#[cfg(test)]
pub(crate) mod test_support;
pub mod team_service;
pub mod trace_id;
pub mod user;
pub mod user_change;
pub mod user_service;
pub mod values;

pub use self::actor::Actor;
pub use self::assignment::{
    Assignment, AssignmentFilter, AssignmentKind, AssignmentLink, LinkColumns,
    UnknownAssignmentKind,
};
pub use self::assignment_service::{AssignmentEndpoints, AssignmentService};
pub use self::audit::Audit;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::bootstrap::{
    BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_ID, BOOTSTRAP_ORG_ID, bootstrap_records, ensure_bootstrap,
    ensure_bootstrap_with_identity,
};
pub use self::cascade::CascadeReport;
pub use self::department::Department;
pub use self::department_service::DepartmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hospital::Hospital;
pub use self::hospital_service::HospitalService;
pub use self::identity_sync::{IdentitySync, SyncOutcome};
pub use self::ids::{
    AssignmentId, DepartmentId, HospitalId, IdParseError, LocationId, OrganizationId, TeamId,
    UserId,
};
pub use self::location::Location;
pub use self::location_service::LocationService;
pub use self::organization::{Organization, OrganizationDependants};
pub use self::organization_service::OrganizationService;
pub use self::team::{Team, TeamRota};
pub use self::team_service::TeamService;
pub use self::trace_id::TraceId;
pub use self::user::User;
pub use self::user_change::{UserChange, UserChangeEnvelope};
pub use self::user_service::UserService;
pub use self::values::{
    DateRange, DisplayName, EmailAddress, EntityName, LocationKind, UserRole, ValueError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use hospadmin::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
