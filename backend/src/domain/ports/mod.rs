//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, identity provider, change publisher) are
//! implemented by `crate::outbound`; driving ports (`*Admin`, login) are
//! implemented by the domain services and called from `crate::inbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_admin;
mod assignment_repository;
mod department_admin;
mod department_repository;
mod hospital_admin;
mod hospital_repository;
mod identity_provider;
mod location_admin;
mod location_repository;
mod login_service;
mod organization_admin;
mod organization_repository;
mod repository_error;
mod team_admin;
mod team_repository;
mod user_admin;
mod user_change_publisher;
mod user_repository;

pub use assignment_admin::{AssignmentAdmin, AssignmentPatch, NewAssignment};
#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
pub use assignment_repository::AssignmentRepository;
pub use department_admin::{DepartmentAdmin, DepartmentPatch, NewDepartment};
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use department_repository::DepartmentRepository;
pub use hospital_admin::{HospitalAdmin, HospitalPatch, NewHospital};
#[cfg(test)]
pub use hospital_repository::MockHospitalRepository;
pub use hospital_repository::HospitalRepository;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityPatch, IdentityProvider, IdentityProviderError, NewIdentity};
pub use location_admin::{LocationAdmin, LocationPatch, LocationQuery, NewLocation};
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::LocationRepository;
pub use login_service::{FixtureLoginService, LoginService};
pub use organization_admin::{OrganizationAdmin, OrganizationPatch};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::OrganizationRepository;
pub use repository_error::RepositoryError;
pub use team_admin::{TeamAdmin, TeamPatch, TeamQuery};
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::TeamRepository;
pub use user_admin::{ActorResolver, NewUser, UserAdmin, UserPatch};
#[cfg(test)]
pub use user_change_publisher::MockUserChangePublisher;
pub use user_change_publisher::{FixtureUserChangePublisher, UserChangePublisher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
