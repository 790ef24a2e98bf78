//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> TraceId {
    TRACE_ID.parse().expect("fixture trace id is a UUID")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::Conflict, "  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn blank_trace_ids_are_rejected() {
    let result = Error::not_found("missing").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn with_trace_id_keeps_previous_value_on_blank_input() {
    let error = Error::not_found("missing")
        .with_trace_id("abc")
        .with_trace_id("");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
#[tokio::test]
async fn constructors_capture_scoped_trace_id(trace_id: TraceId) {
    let error = TraceId::scope(trace_id, async { Error::conflict("duplicate") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_and_omits_empty_fields() {
    let value = serde_json::to_value(Error::conflict("taken")).expect("serialise");
    assert_eq!(value, json!({ "code": "conflict", "message": "taken" }));
}

#[rstest]
fn serialises_details_and_trace_id() {
    let error = Error::invalid_request("bad")
        .with_trace_id("t-1")
        .with_details(json!({ "field": "name" }));
    let value = serde_json::to_value(error).expect("serialise");
    assert_eq!(value["traceId"], json!("t-1"));
    assert_eq!(value["details"]["field"], json!("name"));
    assert_eq!(value["code"], json!("invalid_request"));
}
