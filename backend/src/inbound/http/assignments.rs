//! Assignment handlers.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/assignments?kind=user_team&teamId=...&activeOn=2024-05-01
//! POST   /api/v1/orgs/{orgId}/assignments
//! GET    /api/v1/orgs/{orgId}/assignments/{assignmentId}
//! PATCH  /api/v1/orgs/{orgId}/assignments/{assignmentId}
//! DELETE /api/v1/orgs/{orgId}/assignments/{assignmentId}
//! ```
//!
//! A create body names the `kind` and exactly the endpoint ids that kind
//! links, e.g. `{"kind":"user_team","userId":"...","teamId":"...",
//! "startDate":"2024-05-01"}`.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{AssignmentPatch, NewAssignment};
use crate::domain::{
    Assignment, AssignmentFilter, AssignmentId, AssignmentKind, AssignmentLink, DateRange, Error,
    LinkColumns, OrganizationId,
};
use crate::domain::service_support::invalid_value;
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::AuditFields;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, parse_date, parse_id, parse_optional_date, parse_optional_id,
    require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const ASSIGNMENT_ID: FieldName = FieldName::new("assignmentId");
const KIND: FieldName = FieldName::new("kind");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
const LOCATION_ID: FieldName = FieldName::new("locationId");
const TEAM_ID: FieldName = FieldName::new("teamId");
const USER_ID: FieldName = FieldName::new("userId");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");
const ACTIVE_ON: FieldName = FieldName::new("activeOn");

/// An assignment with its endpoint ids flattened next to `kind`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    /// `department_location`, `department_team`, `team_location`,
    /// `user_team` or `ward_department`.
    #[schema(example = "user_team")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        let columns = assignment.link.columns();
        Self {
            id: assignment.id.into(),
            org_id: assignment.org_id.into(),
            kind: assignment.link.kind().as_str().to_owned(),
            department_id: columns.department_id.map(Into::into),
            location_id: columns.location_id.map(Into::into),
            team_id: columns.team_id.map(Into::into),
            user_id: columns.user_id.map(Into::into),
            start_date: assignment.period.start(),
            end_date: assignment.period.end(),
            active: assignment.active,
            audit: AuditFields::from(&assignment.audit),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[schema(example = "user_team")]
    pub kind: Option<String>,
    pub department_id: Option<String>,
    pub location_id: Option<String>,
    pub team_id: Option<String>,
    pub user_id: Option<String>,
    #[schema(example = "2024-05-01")]
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Defaults to `true`.
    pub active: Option<bool>,
}

/// `endDate: null` makes the assignment open-ended.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AssignmentListQuery {
    pub kind: Option<String>,
    pub department_id: Option<String>,
    pub location_id: Option<String>,
    pub team_id: Option<String>,
    pub user_id: Option<String>,
    /// Only assignments whose date range covers this day.
    pub active_on: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

fn parse_kind(raw: &str) -> ApiResult<AssignmentKind> {
    AssignmentKind::from_str(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "kind",
            "value": raw,
            "code": "unknown_assignment_kind",
        }))
    })
}

fn parse_columns(
    department_id: Option<&str>,
    location_id: Option<&str>,
    team_id: Option<&str>,
    user_id: Option<&str>,
) -> ApiResult<LinkColumns> {
    Ok(LinkColumns {
        department_id: parse_optional_id(department_id, DEPARTMENT_ID)?,
        location_id: parse_optional_id(location_id, LOCATION_ID)?,
        team_id: parse_optional_id(team_id, TEAM_ID)?,
        user_id: parse_optional_id(user_id, USER_ID)?,
    })
}

/// Ids a kind links; anything else in the body is rejected.
fn expected_fields(kind: AssignmentKind) -> [&'static str; 2] {
    match kind {
        AssignmentKind::DepartmentLocation => ["departmentId", "locationId"],
        AssignmentKind::DepartmentTeam => ["departmentId", "teamId"],
        AssignmentKind::TeamLocation => ["teamId", "locationId"],
        AssignmentKind::UserTeam => ["userId", "teamId"],
        AssignmentKind::WardDepartment => ["locationId", "departmentId"],
    }
}

fn parse_link(kind: AssignmentKind, columns: LinkColumns) -> ApiResult<AssignmentLink> {
    let link = AssignmentLink::from_columns(kind, columns);
    let exact = link.is_some_and(|link| link.columns() == columns);
    match link {
        Some(link) if exact => Ok(link),
        _ => Err(Error::invalid_request(format!(
            "{kind} assignments link exactly {} and {}",
            expected_fields(kind)[0],
            expected_fields(kind)[1],
        ))
        .with_details(json!({
            "field": "kind",
            "value": kind.as_str(),
            "code": "invalid_endpoints",
            "expected": expected_fields(kind),
        }))),
    }
}

fn parse_new_assignment(body: CreateAssignmentRequest) -> ApiResult<NewAssignment> {
    let kind = parse_kind(&require(body.kind, KIND)?)?;
    let columns = parse_columns(
        body.department_id.as_deref(),
        body.location_id.as_deref(),
        body.team_id.as_deref(),
        body.user_id.as_deref(),
    )?;
    let link = parse_link(kind, columns)?;
    let start = parse_date(&require(body.start_date, START_DATE)?, START_DATE)?;
    let end = parse_optional_date(body.end_date.as_deref(), END_DATE)?;
    let period = DateRange::new(start, end).map_err(|err| invalid_value("endDate", &err))?;
    Ok(NewAssignment {
        link,
        period,
        active: body.active.unwrap_or(true),
    })
}

fn parse_assignment_patch(body: UpdateAssignmentRequest) -> ApiResult<AssignmentPatch> {
    Ok(AssignmentPatch {
        start_date: parse_optional_date(body.start_date.as_deref(), START_DATE)?,
        end_date: body
            .end_date
            .map(|value| parse_optional_date(value.as_deref(), END_DATE))
            .transpose()?,
        active: body.active,
    })
}

fn parse_filter(query: AssignmentListQuery) -> ApiResult<AssignmentFilter> {
    let columns = parse_columns(
        query.department_id.as_deref(),
        query.location_id.as_deref(),
        query.team_id.as_deref(),
        query.user_id.as_deref(),
    )?;
    Ok(AssignmentFilter {
        kind: query.kind.as_deref().map(parse_kind).transpose()?,
        department_id: columns.department_id,
        location_id: columns.location_id,
        team_id: columns.team_id,
        user_id: columns.user_id,
        active_on: parse_optional_date(query.active_on.as_deref(), ACTIVE_ON)?,
        include_inactive: query.include_inactive,
    })
}

fn assignment_path(path: &(String, String)) -> ApiResult<(OrganizationId, AssignmentId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, ASSIGNMENT_ID)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/assignments",
    params(("orgId" = Uuid, Path, description = "Organization id"), AssignmentListQuery),
    responses(
        (status = 200, description = "Assignments", body = [AssignmentResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "listAssignments"
)]
#[get("/orgs/{orgId}/assignments")]
pub async fn list_assignments(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<AssignmentListQuery>,
) -> ApiResult<web::Json<Vec<AssignmentResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let filter = parse_filter(query.into_inner())?;
    let assignments = state.assignments.list(&actor, org_id, filter).await?;
    Ok(web::Json(
        assignments
            .into_iter()
            .map(AssignmentResponse::from)
            .collect(),
    ))
}

/// Create an assignment. Overlapping active assignments of the same pair
/// are refused with 409.
#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/assignments",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Created", body = AssignmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Endpoint not found", body = ErrorSchema),
        (status = 409, description = "Overlapping assignment", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "createAssignment"
)]
#[post("/orgs/{orgId}/assignments")]
pub async fn create_assignment(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    payload: web::Json<CreateAssignmentRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path, ORG_ID)?;
    let input = parse_new_assignment(payload.into_inner())?;
    let assignment = state.assignments.create(&actor, org_id, input).await?;
    Ok(HttpResponse::Created().json(AssignmentResponse::from(assignment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/assignments/{assignmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("assignmentId" = Uuid, Path, description = "Assignment id")
    ),
    responses(
        (status = 200, description = "Assignment", body = AssignmentResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "getAssignment"
)]
#[get("/orgs/{orgId}/assignments/{assignmentId}")]
pub async fn get_assignment(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<AssignmentResponse>> {
    let (org_id, id) = assignment_path(&path)?;
    let assignment = state.assignments.get(&actor, org_id, id).await?;
    Ok(web::Json(assignment.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/assignments/{assignmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("assignmentId" = Uuid, Path, description = "Assignment id")
    ),
    request_body = UpdateAssignmentRequest,
    responses(
        (status = 200, description = "Updated assignment", body = AssignmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Overlapping assignment", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "updateAssignment"
)]
#[patch("/orgs/{orgId}/assignments/{assignmentId}")]
pub async fn update_assignment(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateAssignmentRequest>,
) -> ApiResult<web::Json<AssignmentResponse>> {
    let (org_id, id) = assignment_path(&path)?;
    let patch = parse_assignment_patch(payload.into_inner())?;
    let assignment = state.assignments.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(assignment.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/assignments/{assignmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("assignmentId" = Uuid, Path, description = "Assignment id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "deleteAssignment"
)]
#[delete("/orgs/{orgId}/assignments/{assignmentId}")]
pub async fn delete_assignment(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (org_id, id) = assignment_path(&path)?;
    state.assignments.delete(&actor, org_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, TeamId, UserId};
    use rstest::rstest;

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const TEAM: &str = "9b2d0f4e-1c7a-4e53-8d2b-7f1f0c6e5a10";

    fn user_team(start: &str, end: Option<&str>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            kind: Some("user_team".into()),
            user_id: Some(USER.into()),
            team_id: Some(TEAM.into()),
            start_date: Some(start.into()),
            end_date: end.map(str::to_owned),
            ..CreateAssignmentRequest::default()
        }
    }

    #[rstest]
    fn builds_user_team_link() {
        let input = parse_new_assignment(user_team("2024-05-01", None)).expect("valid");
        assert_eq!(
            input.link,
            AssignmentLink::UserTeam {
                user_id: UserId::new(USER).expect("id"),
                team_id: TeamId::new(TEAM).expect("id"),
            }
        );
        assert!(input.active);
        assert_eq!(input.period.end(), None);
    }

    #[rstest]
    fn extra_endpoint_is_rejected() {
        let body = CreateAssignmentRequest {
            department_id: Some(USER.into()),
            ..user_team("2024-05-01", None)
        };
        let err = parse_new_assignment(body).expect_err("extra endpoint");
        let details = err.details().expect("details");
        assert_eq!(details["code"], "invalid_endpoints");
        assert_eq!(details["expected"][0], "userId");
    }

    #[rstest]
    fn missing_endpoint_is_rejected() {
        let body = CreateAssignmentRequest {
            team_id: None,
            ..user_team("2024-05-01", None)
        };
        let err = parse_new_assignment(body).expect_err("missing endpoint");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(user_team("2024-05-10", Some("2024-05-01")), "endDate")]
    #[case(user_team("10/05/2024", None), "startDate")]
    #[case(CreateAssignmentRequest { kind: Some("patient_bed".into()), ..user_team("2024-05-01", None) }, "kind")]
    fn invalid_bodies_name_the_field(#[case] body: CreateAssignmentRequest, #[case] field: &str) {
        let err = parse_new_assignment(body).expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn patch_distinguishes_open_end_from_absent() {
        let open: UpdateAssignmentRequest =
            serde_json::from_str(r#"{"endDate":null}"#).expect("json");
        let untouched: UpdateAssignmentRequest =
            serde_json::from_str(r#"{"active":false}"#).expect("json");
        assert_eq!(
            parse_assignment_patch(open).expect("valid").end_date,
            Some(None)
        );
        let patch = parse_assignment_patch(untouched).expect("valid");
        assert_eq!(patch.end_date, None);
        assert_eq!(patch.active, Some(false));
    }

    #[rstest]
    fn filter_parses_every_parameter() {
        let filter = parse_filter(AssignmentListQuery {
            kind: Some("user_team".into()),
            team_id: Some(TEAM.into()),
            active_on: Some("2024-05-03".into()),
            include_inactive: true,
            ..AssignmentListQuery::default()
        })
        .expect("valid");
        assert_eq!(filter.kind, Some(AssignmentKind::UserTeam));
        assert_eq!(filter.team_id, Some(TeamId::new(TEAM).expect("id")));
        assert_eq!(filter.active_on, NaiveDate::from_ymd_opt(2024, 5, 3));
        assert!(filter.include_inactive);
    }

    #[rstest]
    fn response_flattens_link() {
        let input = parse_new_assignment(user_team("2024-05-01", Some("2024-05-31"))).expect("valid");
        let now = chrono::Utc::now();
        let response = AssignmentResponse::from(Assignment {
            id: AssignmentId::random(),
            org_id: OrganizationId::random(),
            link: input.link,
            period: input.period,
            active: true,
            audit: crate::domain::Audit::created(now, None),
        });
        let value = serde_json::to_value(&response).expect("serialise");
        assert_eq!(value["kind"], "user_team");
        assert_eq!(value["userId"], USER);
        assert!(value.get("departmentId").is_none());
        assert_eq!(value["endDate"], "2024-05-31");
    }
}
