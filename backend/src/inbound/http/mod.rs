//! HTTP inbound adapter exposing the administration REST API.
//!
//! Handlers parse requests into domain inputs, call the driving ports held by
//! [`state::HttpState`], and map results to camelCase JSON. Everything below
//! is mounted under `/api/v1` by [`configure`].

pub mod actor;
pub mod assignments;
pub mod auth;
pub mod departments;
pub mod dto;
pub mod error;
pub mod health;
pub mod hospitals;
pub mod locations;
pub mod organizations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod teams;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler and the JSON/query error handlers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use hospadmin::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(organizations::list_organizations)
        .service(organizations::create_organization)
        .service(organizations::get_organization)
        .service(organizations::update_organization)
        .service(organizations::delete_organization)
        .service(hospitals::list_hospitals)
        .service(hospitals::create_hospital)
        .service(hospitals::get_hospital)
        .service(hospitals::update_hospital)
        .service(hospitals::delete_hospital)
        .service(locations::list_locations)
        .service(locations::list_hospital_locations)
        .service(locations::create_location)
        .service(locations::get_location)
        .service(locations::update_location)
        .service(locations::delete_location)
        .service(departments::list_departments)
        .service(departments::create_department)
        .service(departments::get_department)
        .service(departments::update_department)
        .service(departments::delete_department)
        .service(teams::list_teams)
        .service(teams::list_department_teams)
        .service(teams::create_team)
        .service(teams::get_team)
        .service(teams::update_team)
        .service(teams::delete_team)
        .service(teams::team_rota)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(assignments::list_assignments)
        .service(assignments::create_assignment)
        .service(assignments::get_assignment)
        .service(assignments::update_assignment)
        .service(assignments::delete_assignment);
}
