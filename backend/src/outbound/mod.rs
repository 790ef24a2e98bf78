//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel and `diesel-async`
//! - **memory**: in-process store used for development and tests
//! - **identity**: reqwest client for the identity provider admin API
//! - **queue**: bounded channel feeding the identity-sync worker
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod identity;
pub mod memory;
pub mod persistence;
pub mod queue;
