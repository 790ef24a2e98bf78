//! Hospital location handlers.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/locations?hospitalId=...
//! GET    /api/v1/orgs/{orgId}/hospitals/{hospitalId}/locations
//! POST   /api/v1/orgs/{orgId}/hospitals/{hospitalId}/locations
//! GET    /api/v1/orgs/{orgId}/locations/{locationId}
//! PATCH  /api/v1/orgs/{orgId}/locations/{locationId}
//! DELETE /api/v1/orgs/{orgId}/locations/{locationId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{LocationPatch, LocationQuery, NewLocation};
use crate::domain::{Location, LocationId, OrganizationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, CascadeReportResponse, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_location_kind, parse_name, parse_optional_id, require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const HOSPITAL_ID: FieldName = FieldName::new("hospitalId");
const LOCATION_ID: FieldName = FieldName::new("locationId");
const NAME: FieldName = FieldName::new("name");
const KIND: FieldName = FieldName::new("kind");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub hospital_id: Uuid,
    #[schema(example = "Ward 7B")]
    pub name: String,
    /// `ward`, `clinic`, `theatre` or `other`.
    #[schema(example = "ward")]
    pub kind: String,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id.into(),
            org_id: location.org_id.into(),
            hospital_id: location.hospital_id.into(),
            name: location.name.into(),
            kind: location.kind.as_str().to_owned(),
            active: location.active,
            audit: AuditFields::from(&location.audit),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub active: Option<bool>,
}

/// Organization-wide location listing, optionally narrowed to one hospital.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct LocationListQuery {
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

fn parse_new_location(body: CreateLocationRequest) -> ApiResult<NewLocation> {
    Ok(NewLocation {
        name: parse_name(&require(body.name, NAME)?, NAME)?,
        kind: parse_location_kind(&require(body.kind, KIND)?, KIND)?,
    })
}

fn parse_location_patch(body: UpdateLocationRequest) -> ApiResult<LocationPatch> {
    Ok(LocationPatch {
        name: body.name.map(|raw| parse_name(&raw, NAME)).transpose()?,
        kind: body
            .kind
            .map(|raw| parse_location_kind(&raw, KIND))
            .transpose()?,
        active: body.active,
    })
}

fn location_path(path: &(String, String)) -> ApiResult<(OrganizationId, LocationId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, LOCATION_ID)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/locations",
    params(("orgId" = Uuid, Path, description = "Organization id"), LocationListQuery),
    responses(
        (status = 200, description = "Locations", body = [LocationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations"
)]
#[get("/orgs/{orgId}/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<LocationListQuery>,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let query = LocationQuery {
        hospital_id: parse_optional_id(query.hospital_id.as_deref(), HOSPITAL_ID)?,
        include_inactive: query.include_inactive,
    };
    let locations = state.locations.list(&actor, org_id, query).await?;
    Ok(web::Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/hospitals/{hospitalId}/locations",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("hospitalId" = Uuid, Path, description = "Hospital id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Locations of the hospital", body = [LocationResponse]),
        (status = 404, description = "Hospital not found", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listHospitalLocations"
)]
#[get("/orgs/{orgId}/hospitals/{hospitalId}/locations")]
pub async fn list_hospital_locations(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let org_id = parse_id(&path.0, ORG_ID)?;
    let hospital_id = parse_id(&path.1, HOSPITAL_ID)?;
    state.hospitals.get(&actor, org_id, hospital_id).await?;
    let query = LocationQuery {
        hospital_id: Some(hospital_id),
        include_inactive: query.include_inactive,
    };
    let locations = state.locations.list(&actor, org_id, query).await?;
    Ok(web::Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/hospitals/{hospitalId}/locations",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("hospitalId" = Uuid, Path, description = "Hospital id")
    ),
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Created", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Hospital not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "createLocation"
)]
#[post("/orgs/{orgId}/hospitals/{hospitalId}/locations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<CreateLocationRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path.0, ORG_ID)?;
    let hospital_id = parse_id(&path.1, HOSPITAL_ID)?;
    let input = parse_new_location(payload.into_inner())?;
    let location = state
        .locations
        .create(&actor, org_id, hospital_id, input)
        .await?;
    Ok(HttpResponse::Created().json(LocationResponse::from(location)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/locations/{locationId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("locationId" = Uuid, Path, description = "Location id")
    ),
    responses(
        (status = 200, description = "Location", body = LocationResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "getLocation"
)]
#[get("/orgs/{orgId}/locations/{locationId}")]
pub async fn get_location(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<LocationResponse>> {
    let (org_id, id) = location_path(&path)?;
    let location = state.locations.get(&actor, org_id, id).await?;
    Ok(web::Json(location.into()))
}

/// Update a location. A ward that still has ward-department assignments
/// cannot change kind.
#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/locations/{locationId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("locationId" = Uuid, Path, description = "Location id")
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Updated location", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Conflict", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "updateLocation"
)]
#[patch("/orgs/{orgId}/locations/{locationId}")]
pub async fn update_location(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateLocationRequest>,
) -> ApiResult<web::Json<LocationResponse>> {
    let (org_id, id) = location_path(&path)?;
    let patch = parse_location_patch(payload.into_inner())?;
    let location = state.locations.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(location.into()))
}

/// Delete a location together with the assignments referencing it.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/locations/{locationId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("locationId" = Uuid, Path, description = "Location id")
    ),
    responses(
        (status = 200, description = "Removed records", body = CascadeReportResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "deleteLocation"
)]
#[delete("/orgs/{orgId}/locations/{locationId}")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CascadeReportResponse>> {
    let (org_id, id) = location_path(&path)?;
    let report = state.locations.delete(&actor, org_id, id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationKind;
    use rstest::rstest;

    #[rstest]
    #[case("ward", LocationKind::Ward)]
    #[case("theatre", LocationKind::Theatre)]
    fn create_parses_kind(#[case] raw: &str, #[case] expected: LocationKind) {
        let input = parse_new_location(CreateLocationRequest {
            name: Some("Bay 1".into()),
            kind: Some(raw.into()),
        })
        .expect("valid");
        assert_eq!(input.kind, expected);
    }

    #[rstest]
    fn unknown_kind_names_the_field() {
        let err = parse_location_patch(UpdateLocationRequest {
            kind: Some("canteen".into()),
            ..UpdateLocationRequest::default()
        })
        .expect_err("unknown kind");
        assert_eq!(err.details().expect("details")["field"], "kind");
    }
}
