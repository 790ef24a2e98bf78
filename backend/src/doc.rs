//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes, the
//! request/response DTOs and the error schema mirrors. It is served by Swagger
//! UI in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::assignments::{
    AssignmentResponse, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::departments::{
    CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest,
};
use crate::inbound::http::dto::{AuditFields, CascadeReportResponse};
use crate::inbound::http::hospitals::{
    CreateHospitalRequest, HospitalResponse, UpdateHospitalRequest,
};
use crate::inbound::http::locations::{
    CreateLocationRequest, LocationResponse, UpdateLocationRequest,
};
use crate::inbound::http::organizations::{
    CreateOrganizationRequest, OrganizationResponse, UpdateOrganizationRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::teams::{
    CreateTeamRequest, TeamResponse, TeamRotaResponse, UpdateTeamRequest,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Hospital administration API",
        description = "Multi-tenant administration of organizations, hospitals, locations, \
                       departments, teams, users and their date-bounded assignments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::organizations::list_organizations,
        crate::inbound::http::organizations::create_organization,
        crate::inbound::http::organizations::get_organization,
        crate::inbound::http::organizations::update_organization,
        crate::inbound::http::organizations::delete_organization,
        crate::inbound::http::hospitals::list_hospitals,
        crate::inbound::http::hospitals::create_hospital,
        crate::inbound::http::hospitals::get_hospital,
        crate::inbound::http::hospitals::update_hospital,
        crate::inbound::http::hospitals::delete_hospital,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::list_hospital_locations,
        crate::inbound::http::locations::create_location,
        crate::inbound::http::locations::get_location,
        crate::inbound::http::locations::update_location,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::departments::list_departments,
        crate::inbound::http::departments::create_department,
        crate::inbound::http::departments::get_department,
        crate::inbound::http::departments::update_department,
        crate::inbound::http::departments::delete_department,
        crate::inbound::http::teams::list_teams,
        crate::inbound::http::teams::list_department_teams,
        crate::inbound::http::teams::create_team,
        crate::inbound::http::teams::get_team,
        crate::inbound::http::teams::update_team,
        crate::inbound::http::teams::delete_team,
        crate::inbound::http::teams::team_rota,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::assignments::list_assignments,
        crate::inbound::http::assignments::create_assignment,
        crate::inbound::http::assignments::get_assignment,
        crate::inbound::http::assignments::update_assignment,
        crate::inbound::http::assignments::delete_assignment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AuditFields,
        CascadeReportResponse,
        LoginRequest,
        OrganizationResponse,
        CreateOrganizationRequest,
        UpdateOrganizationRequest,
        HospitalResponse,
        CreateHospitalRequest,
        UpdateHospitalRequest,
        LocationResponse,
        CreateLocationRequest,
        UpdateLocationRequest,
        DepartmentResponse,
        CreateDepartmentRequest,
        UpdateDepartmentRequest,
        TeamResponse,
        TeamRotaResponse,
        CreateTeamRequest,
        UpdateTeamRequest,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        AssignmentResponse,
        CreateAssignmentRequest,
        UpdateAssignmentRequest,
    )),
    tags(
        (name = "session", description = "Login, logout and the signed-in user"),
        (name = "organizations", description = "Tenants"),
        (name = "hospitals", description = "Hospitals of an organization"),
        (name = "locations", description = "Wards, clinics and theatres"),
        (name = "departments", description = "Clinical and support departments"),
        (name = "teams", description = "Department teams and their rota"),
        (name = "users", description = "Organization users"),
        (name = "assignments", description = "Date-bounded links between entities"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
