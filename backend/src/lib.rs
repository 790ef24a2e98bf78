//! Hospital administration backend.
//!
//! Layout follows ports and adapters: [`domain`] holds entities, services and
//! ports; [`inbound`] exposes them over HTTP; [`outbound`] implements the ports
//! with PostgreSQL, an in-memory store, the identity provider client and the
//! sync queue.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
