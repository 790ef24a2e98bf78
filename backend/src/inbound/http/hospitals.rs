//! Hospital handlers.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/hospitals
//! POST   /api/v1/orgs/{orgId}/hospitals
//! GET    /api/v1/orgs/{orgId}/hospitals/{hospitalId}
//! PATCH  /api/v1/orgs/{orgId}/hospitals/{hospitalId}
//! DELETE /api/v1/orgs/{orgId}/hospitals/{hospitalId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{HospitalPatch, NewHospital};
use crate::domain::{Hospital, HospitalId, OrganizationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, parse_id, parse_name, require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const HOSPITAL_ID: FieldName = FieldName::new("hospitalId");
const NAME: FieldName = FieldName::new("name");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    #[schema(example = "St Elsewhere")]
    pub name: String,
    pub address: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Hospital> for HospitalResponse {
    fn from(hospital: Hospital) -> Self {
        Self {
            id: hospital.id.into(),
            org_id: hospital.org_id.into(),
            name: hospital.name.into(),
            address: hospital.address,
            active: hospital.active,
            audit: AuditFields::from(&hospital.audit),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHospitalRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// `address: null` clears the address; omitting it leaves it unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHospitalRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    pub active: Option<bool>,
}

fn parse_new_hospital(body: CreateHospitalRequest) -> ApiResult<NewHospital> {
    Ok(NewHospital {
        name: parse_name(&require(body.name, NAME)?, NAME)?,
        address: body.address,
    })
}

fn parse_hospital_patch(body: UpdateHospitalRequest) -> ApiResult<HospitalPatch> {
    Ok(HospitalPatch {
        name: body.name.map(|raw| parse_name(&raw, NAME)).transpose()?,
        address: body.address,
        active: body.active,
    })
}

fn hospital_path(path: &(String, String)) -> ApiResult<(OrganizationId, HospitalId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, HOSPITAL_ID)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/hospitals",
    params(("orgId" = Uuid, Path, description = "Organization id"), ListQuery),
    responses(
        (status = 200, description = "Hospitals", body = [HospitalResponse]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["hospitals"],
    operation_id = "listHospitals"
)]
#[get("/orgs/{orgId}/hospitals")]
pub async fn list_hospitals(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<HospitalResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let hospitals = state
        .hospitals
        .list(&actor, org_id, query.include_inactive)
        .await?;
    Ok(web::Json(
        hospitals.into_iter().map(HospitalResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/hospitals",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    request_body = CreateHospitalRequest,
    responses(
        (status = 201, description = "Created", body = HospitalResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["hospitals"],
    operation_id = "createHospital"
)]
#[post("/orgs/{orgId}/hospitals")]
pub async fn create_hospital(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    payload: web::Json<CreateHospitalRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path, ORG_ID)?;
    let input = parse_new_hospital(payload.into_inner())?;
    let hospital = state.hospitals.create(&actor, org_id, input).await?;
    Ok(HttpResponse::Created().json(HospitalResponse::from(hospital)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/hospitals/{hospitalId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("hospitalId" = Uuid, Path, description = "Hospital id")
    ),
    responses(
        (status = 200, description = "Hospital", body = HospitalResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["hospitals"],
    operation_id = "getHospital"
)]
#[get("/orgs/{orgId}/hospitals/{hospitalId}")]
pub async fn get_hospital(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<HospitalResponse>> {
    let (org_id, id) = hospital_path(&path)?;
    let hospital = state.hospitals.get(&actor, org_id, id).await?;
    Ok(web::Json(hospital.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/hospitals/{hospitalId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("hospitalId" = Uuid, Path, description = "Hospital id")
    ),
    request_body = UpdateHospitalRequest,
    responses(
        (status = 200, description = "Updated hospital", body = HospitalResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["hospitals"],
    operation_id = "updateHospital"
)]
#[patch("/orgs/{orgId}/hospitals/{hospitalId}")]
pub async fn update_hospital(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateHospitalRequest>,
) -> ApiResult<web::Json<HospitalResponse>> {
    let (org_id, id) = hospital_path(&path)?;
    let patch = parse_hospital_patch(payload.into_inner())?;
    let hospital = state.hospitals.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(hospital.into()))
}

/// Delete a hospital without locations. Refused with 409 otherwise.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/hospitals/{hospitalId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("hospitalId" = Uuid, Path, description = "Hospital id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Hospital still has locations", body = ErrorSchema)
    ),
    tags = ["hospitals"],
    operation_id = "deleteHospital"
)]
#[delete("/orgs/{orgId}/hospitals/{hospitalId}")]
pub async fn delete_hospital(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (org_id, id) = hospital_path(&path)?;
    state.hospitals.delete(&actor, org_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"address":null}"#, Some(None))]
    #[case(r#"{"address":"1 High St"}"#, Some(Some("1 High St")))]
    fn address_patch_distinguishes_absent_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<&str>>,
    ) {
        let request: UpdateHospitalRequest = serde_json::from_str(body).expect("json");
        let patch = parse_hospital_patch(request).expect("valid");
        assert_eq!(patch.address, expected.map(|inner| inner.map(str::to_owned)));
    }

    #[rstest]
    fn create_requires_name() {
        let err = parse_new_hospital(CreateHospitalRequest {
            name: None,
            address: Some("somewhere".into()),
        })
        .expect_err("name missing");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}
