//! Team handlers and the daily rota.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/teams?departmentId=...
//! GET    /api/v1/orgs/{orgId}/departments/{departmentId}/teams
//! POST   /api/v1/orgs/{orgId}/departments/{departmentId}/teams
//! GET    /api/v1/orgs/{orgId}/teams/{teamId}
//! PATCH  /api/v1/orgs/{orgId}/teams/{teamId}
//! DELETE /api/v1/orgs/{orgId}/teams/{teamId}
//! GET    /api/v1/orgs/{orgId}/teams/{teamId}/rota?on=2024-05-01
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{TeamPatch, TeamQuery};
use crate::domain::{OrganizationId, Team, TeamId, TeamRota};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, CascadeReportResponse, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_name, parse_optional_id, require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
const TEAM_ID: FieldName = FieldName::new("teamId");
const NAME: FieldName = FieldName::new("name");
const ON: FieldName = FieldName::new("on");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub department_id: Uuid,
    #[schema(example = "Night Shift A")]
    pub name: String,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id.into(),
            org_id: team.org_id.into(),
            department_id: team.department_id.into(),
            name: team.name.into(),
            active: team.active,
            audit: AuditFields::from(&team.audit),
        }
    }
}

/// Members of a team on one day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamRotaResponse {
    pub team_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub on: NaiveDate,
    pub members: Vec<UserResponse>,
}

impl From<TeamRota> for TeamRotaResponse {
    fn from(rota: TeamRota) -> Self {
        Self {
            team_id: rota.team_id.into(),
            on: rota.on,
            members: rota.members.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct TeamListQuery {
    pub department_id: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RotaQuery {
    /// Day to resolve (`YYYY-MM-DD`).
    pub on: Option<String>,
}

fn parse_team_patch(body: UpdateTeamRequest) -> ApiResult<TeamPatch> {
    Ok(TeamPatch {
        name: body.name.map(|raw| parse_name(&raw, NAME)).transpose()?,
        active: body.active,
    })
}

fn team_path(path: &(String, String)) -> ApiResult<(OrganizationId, TeamId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, TEAM_ID)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/teams",
    params(("orgId" = Uuid, Path, description = "Organization id"), TeamListQuery),
    responses(
        (status = 200, description = "Teams", body = [TeamResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "listTeams"
)]
#[get("/orgs/{orgId}/teams")]
pub async fn list_teams(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<TeamListQuery>,
) -> ApiResult<web::Json<Vec<TeamResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let query = TeamQuery {
        department_id: parse_optional_id(query.department_id.as_deref(), DEPARTMENT_ID)?,
        include_inactive: query.include_inactive,
    };
    let teams = state.teams.list(&actor, org_id, query).await?;
    Ok(web::Json(teams.into_iter().map(TeamResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/departments/{departmentId}/teams",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("departmentId" = Uuid, Path, description = "Department id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Teams of the department", body = [TeamResponse]),
        (status = 404, description = "Department not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "listDepartmentTeams"
)]
#[get("/orgs/{orgId}/departments/{departmentId}/teams")]
pub async fn list_department_teams(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<TeamResponse>>> {
    let org_id = parse_id(&path.0, ORG_ID)?;
    let department_id = parse_id(&path.1, DEPARTMENT_ID)?;
    state.departments.get(&actor, org_id, department_id).await?;
    let query = TeamQuery {
        department_id: Some(department_id),
        include_inactive: query.include_inactive,
    };
    let teams = state.teams.list(&actor, org_id, query).await?;
    Ok(web::Json(teams.into_iter().map(TeamResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/departments/{departmentId}/teams",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("departmentId" = Uuid, Path, description = "Department id")
    ),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Created", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Department not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "createTeam"
)]
#[post("/orgs/{orgId}/departments/{departmentId}/teams")]
pub async fn create_team(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<CreateTeamRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path.0, ORG_ID)?;
    let department_id = parse_id(&path.1, DEPARTMENT_ID)?;
    let name = parse_name(&require(payload.into_inner().name, NAME)?, NAME)?;
    let team = state
        .teams
        .create(&actor, org_id, department_id, name)
        .await?;
    Ok(HttpResponse::Created().json(TeamResponse::from(team)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/teams/{teamId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("teamId" = Uuid, Path, description = "Team id")
    ),
    responses(
        (status = 200, description = "Team", body = TeamResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/orgs/{orgId}/teams/{teamId}")]
pub async fn get_team(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<TeamResponse>> {
    let (org_id, id) = team_path(&path)?;
    let team = state.teams.get(&actor, org_id, id).await?;
    Ok(web::Json(team.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/teams/{teamId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("teamId" = Uuid, Path, description = "Team id")
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Updated team", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "updateTeam"
)]
#[patch("/orgs/{orgId}/teams/{teamId}")]
pub async fn update_team(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateTeamRequest>,
) -> ApiResult<web::Json<TeamResponse>> {
    let (org_id, id) = team_path(&path)?;
    let patch = parse_team_patch(payload.into_inner())?;
    let team = state.teams.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(team.into()))
}

/// Delete a team and every assignment referencing it.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/teams/{teamId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("teamId" = Uuid, Path, description = "Team id")
    ),
    responses(
        (status = 200, description = "Removed records", body = CascadeReportResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "deleteTeam"
)]
#[delete("/orgs/{orgId}/teams/{teamId}")]
pub async fn delete_team(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CascadeReportResponse>> {
    let (org_id, id) = team_path(&path)?;
    let report = state.teams.delete(&actor, org_id, id).await?;
    Ok(web::Json(report.into()))
}

/// Active members of the team on the given day, ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/teams/{teamId}/rota",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("teamId" = Uuid, Path, description = "Team id"),
        RotaQuery
    ),
    responses(
        (status = 200, description = "Rota", body = TeamRotaResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeamRota"
)]
#[get("/orgs/{orgId}/teams/{teamId}/rota")]
pub async fn team_rota(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    query: web::Query<RotaQuery>,
) -> ApiResult<web::Json<TeamRotaResponse>> {
    let (org_id, id) = team_path(&path)?;
    let on = parse_date(&require(query.into_inner().on, ON)?, ON)?;
    let rota = state.teams.rota(&actor, org_id, id, on).await?;
    Ok(web::Json(rota.into()))
}
