//! Request parsing helpers shared by the admin handlers.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field in its camelCase wire form.

use std::str::FromStr;

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::service_support::invalid_value;
use crate::domain::{
    DisplayName, EmailAddress, EntityName, Error, IdParseError, LocationKind, UserRole, ValueError,
};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidBody,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidBody => "invalid_body",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
        None,
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a typed id from a path segment or body field.
pub(crate) fn parse_id<I>(raw: &str, field: FieldName) -> Result<I, Error>
where
    I: FromStr<Err = IdParseError>,
{
    I::from_str(raw).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            Some(raw),
        )
    })
}

pub(crate) fn parse_optional_id<I>(raw: Option<&str>, field: FieldName) -> Result<Option<I>, Error>
where
    I: FromStr<Err = IdParseError>,
{
    raw.map(|value| parse_id(value, field)).transpose()
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            format!("{} must be a YYYY-MM-DD date", field.as_str()),
            ErrorCode::InvalidDate,
            Some(raw),
        )
    })
}

pub(crate) fn parse_optional_date(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    raw.map(|value| parse_date(value, field)).transpose()
}

fn value<T>(result: Result<T, ValueError>, field: FieldName) -> Result<T, Error> {
    result.map_err(|err| invalid_value(field.as_str(), &err))
}

pub(crate) fn parse_name(raw: &str, field: FieldName) -> Result<EntityName, Error> {
    value(EntityName::new(raw), field)
}

pub(crate) fn parse_email(raw: &str, field: FieldName) -> Result<EmailAddress, Error> {
    value(EmailAddress::new(raw), field)
}

pub(crate) fn parse_display_name(raw: &str, field: FieldName) -> Result<DisplayName, Error> {
    value(DisplayName::new(raw), field)
}

pub(crate) fn parse_location_kind(raw: &str, field: FieldName) -> Result<LocationKind, Error> {
    value(LocationKind::from_str(raw), field)
}

pub(crate) fn parse_role(raw: &str, field: FieldName) -> Result<UserRole, Error> {
    value(UserRole::from_str(raw), field)
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Render malformed JSON bodies with the standard error payload.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}"))
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

/// Render malformed query strings with the standard error payload.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrganizationId;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn bad_uuid_names_field_and_value() {
        let err = parse_id::<OrganizationId>("nope", FieldName::new("orgId")).expect_err("bad id");
        assert_eq!(detail(&err, "field"), Some("orgId"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
        assert_eq!(detail(&err, "value"), Some("nope"));
    }

    #[rstest]
    #[case("2024-02-29", true)]
    #[case("2023-02-29", false)]
    #[case("29/02/2024", false)]
    fn dates_use_iso_calendar_format(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw, FieldName::new("on")).is_ok(), ok);
    }

    #[rstest]
    fn value_errors_carry_the_value_code() {
        let err = parse_location_kind("car_park", FieldName::new("kind")).expect_err("unknown");
        assert_eq!(detail(&err, "field"), Some("kind"));
        assert!(detail(&err, "code").is_some());
    }

    #[rstest]
    fn missing_fields_are_reported() {
        let err = require::<String>(None, FieldName::new("name")).expect_err("missing");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
        assert_eq!(err.message(), "missing required field: name");
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        address: Option<Option<String>>,
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"address":null}"#, Some(None))]
    #[case(r#"{"address":"1 High St"}"#, Some(Some("1 High St")))]
    fn double_option_separates_absent_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<&str>>,
    ) {
        let patch: Patch = serde_json::from_str(body).expect("json");
        assert_eq!(
            patch.address.as_ref().map(|inner| inner.as_deref()),
            expected
        );
    }
}
