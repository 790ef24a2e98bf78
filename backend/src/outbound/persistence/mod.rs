//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`,
//! never exposed to the domain) and domain entities. Connections come from a
//! `bb8` pool through `diesel-async`. Cascading deletes run in a single
//! transaction, and unique index violations surface as
//! `RepositoryError::Duplicate`.
//!
//! # Example
//!
//! ```no_run
//! use hospadmin::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hospadmin")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_assignment_repository;
mod diesel_department_repository;
mod diesel_error_mapping;
mod diesel_hospital_repository;
mod diesel_location_repository;
mod diesel_organization_repository;
mod diesel_team_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_hospital_repository::DieselHospitalRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_team_repository::DieselTeamRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
