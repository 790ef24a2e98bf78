//! Organization handlers.
//!
//! ```text
//! GET    /api/v1/orgs
//! POST   /api/v1/orgs
//! GET    /api/v1/orgs/{orgId}
//! PATCH  /api/v1/orgs/{orgId}
//! DELETE /api/v1/orgs/{orgId}
//! ```
//!
//! Creating and deleting organizations is reserved for super admins; the
//! service enforces that.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Organization;
use crate::domain::ports::OrganizationPatch;
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_name, require};

const ORG_ID: FieldName = FieldName::new("orgId");
const NAME: FieldName = FieldName::new("name");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: Uuid,
    #[schema(example = "North Trust")]
    pub name: String,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id.into(),
            name: org.name.into(),
            active: org.active,
            audit: AuditFields::from(&org.audit),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

fn parse_organization_patch(body: UpdateOrganizationRequest) -> ApiResult<OrganizationPatch> {
    Ok(OrganizationPatch {
        name: body.name.map(|raw| parse_name(&raw, NAME)).transpose()?,
        active: body.active,
    })
}

/// Organizations visible to the caller: all of them for super admins, the
/// caller's own otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/orgs",
    params(ListQuery),
    responses(
        (status = 200, description = "Organizations", body = [OrganizationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "listOrganizations"
)]
#[get("/orgs")]
pub async fn list_organizations(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<OrganizationResponse>>> {
    let orgs = state
        .organizations
        .list(&actor, query.include_inactive)
        .await?;
    Ok(web::Json(
        orgs.into_iter().map(OrganizationResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/orgs",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Created", body = OrganizationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization"
)]
#[post("/orgs")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    payload: web::Json<CreateOrganizationRequest>,
) -> ApiResult<HttpResponse> {
    let name = parse_name(&require(payload.into_inner().name, NAME)?, NAME)?;
    let org = state.organizations.create(&actor, name).await?;
    Ok(HttpResponse::Created().json(OrganizationResponse::from(org)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization", body = OrganizationResponse),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "getOrganization"
)]
#[get("/orgs/{orgId}")]
pub async fn get_organization(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrganizationResponse>> {
    let id = parse_id(&path, ORG_ID)?;
    let org = state.organizations.get(&actor, id).await?;
    Ok(web::Json(org.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Updated organization", body = OrganizationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "updateOrganization"
)]
#[patch("/orgs/{orgId}")]
pub async fn update_organization(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    payload: web::Json<UpdateOrganizationRequest>,
) -> ApiResult<web::Json<OrganizationResponse>> {
    let id = parse_id(&path, ORG_ID)?;
    let patch = parse_organization_patch(payload.into_inner())?;
    let org = state.organizations.update(&actor, id, patch).await?;
    Ok(web::Json(org.into()))
}

/// Delete an empty organization. Refused with 409 while hospitals,
/// departments or users remain.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Organization still has dependants", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "deleteOrganization"
)]
#[delete("/orgs/{orgId}")]
pub async fn delete_organization(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, ORG_ID)?;
    state.organizations.delete(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
