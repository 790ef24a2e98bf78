//! Inbound adapters translating external requests into domain service calls
//! while keeping framework details at the edge.
//!
//! The REST API lives under [`http`].

pub mod http;
