//! Small helpers shared by the administration services.

use std::fmt::Display;

use serde_json::json;

use super::{EntityName, Error, ValueError};

pub(crate) fn not_found(entity: &str, id: impl Display) -> Error {
    Error::not_found(format!("{entity} {id} not found"))
}

/// Conflict raised when a name key is already taken inside `scope`.
pub(crate) fn name_taken(entity: &str, name: &EntityName, scope: &str) -> Error {
    Error::conflict(format!(
        "{entity} name \"{name}\" is already in use {scope}"
    ))
    .with_details(json!({ "field": "name", "code": "duplicate" }))
}

/// Invalid request naming the offending field.
pub fn invalid_value(field: &str, error: &ValueError) -> Error {
    Error::invalid_request(format!("{field}: {error}"))
        .with_details(json!({ "field": field, "code": error.code() }))
}

/// Trim free text, mapping blank input to `None`.
pub(crate) fn normalise_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

pub(crate) fn retain_active<T>(
    mut items: Vec<T>,
    include_inactive: bool,
    is_active: impl Fn(&T) -> bool,
) -> Vec<T> {
    if !include_inactive {
        items.retain(|item| is_active(item));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some(" 1 Main St "), Some("1 Main St"))]
    fn text_is_trimmed(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(
            normalise_text(raw.map(str::to_owned)).as_deref(),
            expected
        );
    }

    #[rstest]
    fn name_taken_is_a_conflict_with_field_details() {
        let name = EntityName::new("Cardiology").expect("valid");
        let err = name_taken("department", &name, "in this organization");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.message(),
            "department name \"Cardiology\" is already in use in this organization"
        );
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("name")));
    }

    #[rstest]
    fn retain_active_honours_opt_in() {
        let items = vec![(1, true), (2, false)];
        assert_eq!(retain_active(items.clone(), false, |item| item.1).len(), 1);
        assert_eq!(retain_active(items, true, |item| item.1).len(), 2);
    }
}
