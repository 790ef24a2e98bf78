//! Organization user handlers.
//!
//! ```text
//! GET    /api/v1/orgs/{orgId}/users
//! POST   /api/v1/orgs/{orgId}/users
//! GET    /api/v1/orgs/{orgId}/users/{userId}
//! PATCH  /api/v1/orgs/{orgId}/users/{userId}
//! DELETE /api/v1/orgs/{orgId}/users/{userId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{NewUser, UserPatch};
use crate::domain::{OrganizationId, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::SignedIn;
use crate::inbound::http::dto::{AuditFields, CascadeReportResponse, ListQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_display_name, parse_email, parse_id, parse_role, require,
};

const ORG_ID: FieldName = FieldName::new("orgId");
const USER_ID: FieldName = FieldName::new("userId");
const EMAIL: FieldName = FieldName::new("email");
const DISPLAY_NAME: FieldName = FieldName::new("displayName");
const ROLE: FieldName = FieldName::new("role");

/// A user as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    #[schema(example = "ward.clerk@example.org")]
    pub email: String,
    #[schema(example = "Ward Clerk")]
    pub display_name: String,
    /// `super_admin`, `org_admin` or `staff`.
    #[schema(example = "staff")]
    pub role: String,
    pub active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            org_id: user.org_id.into(),
            email: user.email.into(),
            display_name: user.display_name.into(),
            role: user.role.as_str().to_owned(),
            active: user.active,
            audit: AuditFields::from(&user.audit),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    /// Defaults to `true`.
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

fn parse_new_user(body: CreateUserRequest) -> ApiResult<NewUser> {
    Ok(NewUser {
        email: parse_email(&require(body.email, EMAIL)?, EMAIL)?,
        display_name: parse_display_name(&require(body.display_name, DISPLAY_NAME)?, DISPLAY_NAME)?,
        role: parse_role(&require(body.role, ROLE)?, ROLE)?,
        active: body.active.unwrap_or(true),
    })
}

fn parse_user_patch(body: UpdateUserRequest) -> ApiResult<UserPatch> {
    Ok(UserPatch {
        email: body
            .email
            .map(|raw| parse_email(&raw, EMAIL))
            .transpose()?,
        display_name: body
            .display_name
            .map(|raw| parse_display_name(&raw, DISPLAY_NAME))
            .transpose()?,
        role: body.role.map(|raw| parse_role(&raw, ROLE)).transpose()?,
        active: body.active,
    })
}

fn user_path(path: &(String, String)) -> ApiResult<(OrganizationId, UserId)> {
    Ok((parse_id(&path.0, ORG_ID)?, parse_id(&path.1, USER_ID)?))
}

/// List users of an organization ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/users",
    params(("orgId" = Uuid, Path, description = "Organization id"), ListQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/orgs/{orgId}/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let org_id = parse_id(&path, ORG_ID)?;
    let users = state
        .users
        .list(&actor, org_id, query.include_inactive)
        .await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user; the identity provider account is created asynchronously.
#[utoipa::path(
    post,
    path = "/api/v1/orgs/{orgId}/users",
    params(("orgId" = Uuid, Path, description = "Organization id")),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Email already in use", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/orgs/{orgId}/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<String>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let org_id = parse_id(&path, ORG_ID)?;
    let input = parse_new_user(payload.into_inner())?;
    let user = state.users.create(&actor, org_id, input).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orgs/{orgId}/users/{userId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("userId" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/orgs/{orgId}/users/{userId}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<UserResponse>> {
    let (org_id, id) = user_path(&path)?;
    let user = state.users.get(&actor, org_id, id).await?;
    Ok(web::Json(user.into()))
}

/// Update a user. Deactivating yourself is refused.
#[utoipa::path(
    patch,
    path = "/api/v1/orgs/{orgId}/users/{userId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("userId" = Uuid, Path, description = "User id")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already in use", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/orgs/{orgId}/users/{userId}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let (org_id, id) = user_path(&path)?;
    let patch = parse_user_patch(payload.into_inner())?;
    let user = state.users.update(&actor, org_id, id, patch).await?;
    Ok(web::Json(user.into()))
}

/// Delete a user and their assignments.
#[utoipa::path(
    delete,
    path = "/api/v1/orgs/{orgId}/users/{userId}",
    params(
        ("orgId" = Uuid, Path, description = "Organization id"),
        ("userId" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Removed records", body = CascadeReportResponse),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/orgs/{orgId}/users/{userId}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    SignedIn(actor): SignedIn,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CascadeReportResponse>> {
    let (org_id, id) = user_path(&path)?;
    let report = state.users.delete(&actor, org_id, id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, UserRole};
    use rstest::rstest;

    #[rstest]
    fn create_requires_role() {
        let err = parse_new_user(CreateUserRequest {
            email: Some("a@example.org".into()),
            display_name: Some("A".into()),
            role: None,
            active: None,
        })
        .expect_err("role missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "missing required field: role");
    }

    #[rstest]
    fn create_defaults_to_active_and_normalises_email() {
        let input = parse_new_user(CreateUserRequest {
            email: Some(" Porter@Example.org ".into()),
            display_name: Some("Porter".into()),
            role: Some("staff".into()),
            active: None,
        })
        .expect("valid");
        assert!(input.active);
        assert_eq!(input.email.as_ref(), "porter@example.org");
        assert_eq!(input.role, UserRole::Staff);
    }

    #[rstest]
    #[case(UpdateUserRequest { role: Some("chief".into()), ..UpdateUserRequest::default() }, "role")]
    #[case(UpdateUserRequest { email: Some("no-at-sign".into()), ..UpdateUserRequest::default() }, "email")]
    fn patch_rejects_bad_values(#[case] body: UpdateUserRequest, #[case] field: &str) {
        let err = parse_user_patch(body).expect_err("invalid");
        let details = err.details().expect("details");
        assert_eq!(details["field"], field);
    }
}
