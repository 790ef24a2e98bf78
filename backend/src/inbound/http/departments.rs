//! Department handlers.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/departments
//! POST   /api/v1/orgs/{orgId}/departments
//! GET    /api/v1/orgs/{orgId}/departments/{departmentId}
//! PATCH  /api/v1/orgs/{orgId}/departments/{departmentId}
//! DELETE /api/v1/orgs/{orgId}/departments/{departmentId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{DepartmentPatch, NewDepartment};
use crate::domain::{Department, DepartmentId, OrganizationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, CascadeReportResponse, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, parse_id, parse_name, require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
const NAME: FieldName = FieldName::new("name");

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    #[schema(example = "Cardiology")]
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.into(),
            org_id: department.org_id.into(),
            name: department.name.into(),
            description: department.description,
            active: department.active,
            audit: AuditFields::from(&department.audit),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `description: null` clears the description.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}

fn parse_new_department(body: CreateDepartmentRequest) -> ApiResult<NewDepartment> {
    Ok(NewDepartment {
        name: parse_name(&require(body.name, NAME)?, NAME)?,
        description: body.description,
    })
}

fn parse_department_patch(body: UpdateDepartmentRequest) -> ApiResult<DepartmentPatch> {
    Ok(DepartmentPatch {
        name: body.name.map(|raw| parse_name(&raw, NAME)).transpose()?,
        description: body.description,
        active: body.active,
    })
}

fn department_path(path: &(String, String)) -> ApiResult<(OrganizationId, DepartmentId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, DEPARTMENT_ID)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/departments",
    params(("orgId" = Uuid, Path, description = "Organization id"), ListQuery),
    responses(
        (status = 200, description = "Departments", body = [DepartmentResponse]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/orgs/{orgId}/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<DepartmentResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let departments = state
        .departments
        .list(&actor, org_id, query.include_inactive)
        .await?;
    Ok(web::Json(
        departments
            .into_iter()
            .map(DepartmentResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/departments",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Created", body = DepartmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "createDepartment"
)]
#[post("/orgs/{orgId}/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    payload: web::Json<CreateDepartmentRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path, ORG_ID)?;
    let input = parse_new_department(payload.into_inner())?;
    let department = state.departments.create(&actor, org_id, input).await?;
    Ok(HttpResponse::Created().json(DepartmentResponse::from(department)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/departments/{departmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("departmentId" = Uuid, Path, description = "Department id")
    ),
    responses(
        (status = 200, description = "Department", body = DepartmentResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "getDepartment"
)]
#[get("/orgs/{orgId}/departments/{departmentId}")]
pub async fn get_department(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let (org_id, id) = department_path(&path)?;
    let department = state.departments.get(&actor, org_id, id).await?;
    Ok(web::Json(department.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/departments/{departmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("departmentId" = Uuid, Path, description = "Department id")
    ),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Updated department", body = DepartmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "updateDepartment"
)]
#[patch("/orgs/{orgId}/departments/{departmentId}")]
pub async fn update_department(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateDepartmentRequest>,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let (org_id, id) = department_path(&path)?;
    let patch = parse_department_patch(payload.into_inner())?;
    let department = state.departments.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(department.into()))
}

/// Delete a department, its teams and every assignment touching either.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/departments/{departmentId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("departmentId" = Uuid, Path, description = "Department id")
    ),
    responses(
        (status = 200, description = "Removed records", body = CascadeReportResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "deleteDepartment"
)]
#[delete("/orgs/{orgId}/departments/{departmentId}")]
pub async fn delete_department(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CascadeReportResponse>> {
    let (org_id, id) = department_path(&path)?;
    let report = state.departments.delete(&actor, org_id, id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn null_description_clears_it() {
        let request: UpdateDepartmentRequest =
            serde_json::from_str(r#"{"description":null}"#).expect("json");
        let patch = parse_department_patch(request).expect("valid");
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.name, None);
    }

    #[rstest]
    fn create_rejects_overlong_name() {
        let err = parse_new_department(CreateDepartmentRequest {
            name: Some("x".repeat(500)),
            description: None,
        })
        .expect_err("too long");
        assert_eq!(err.details().expect("details")["field"], "name");
    }
}
