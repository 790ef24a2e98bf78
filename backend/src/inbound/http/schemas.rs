//! OpenAPI schemas for domain types that stay free of `utoipa`.
//!
//! The wrappers mirror the wire shape of the domain type they document and are
//! never constructed.

use utoipa::ToSchema;

/// Machine-readable error code.
#[derive(ToSchema)]
#[schema(as = ErrorCode, rename_all = "snake_case")]
pub enum ErrorCodeSchema {
    /// Malformed request or failed validation.
    InvalidRequest,
    /// Missing or invalid session or credentials.
    Unauthorized,
    /// Signed in but not permitted.
    Forbidden,
    NotFound,
    /// Duplicate name, overlapping assignment, or dependants block a delete.
    Conflict,
    /// Database or identity provider unreachable.
    ServiceUnavailable,
    InternalError,
}

/// Error payload returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    #[schema(example = "team name \"Night\" is already in use in this department")]
    message: String,
    #[schema(example = "0f9d3c1e-63a2-4b9e-9d4f-2a1c5e7b8d90")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "name", "code": "duplicate"}`.
    details: Option<serde_json::Value>,
}
