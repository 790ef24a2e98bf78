//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::Utc;
use mockable::DefaultClock;
use serde_json::json;

use crate::Trace;
use crate::domain::ensure_bootstrap;
use crate::domain::ports::{FixtureLoginService, FixtureUserChangePublisher};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, Repositories, ServiceContext};
use crate::outbound::memory::InMemoryStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Handler state over a bootstrapped in-memory store with fixture login.
pub async fn memory_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::default());
    ensure_bootstrap(store.as_ref(), store.as_ref(), Utc::now())
        .await
        .expect("bootstrap");
    web::Data::new(HttpState::from_repositories(
        Repositories::shared(store),
        ServiceContext {
            login: Arc::new(FixtureLoginService),
            publisher: Arc::new(FixtureUserChangePublisher),
            clock: Arc::new(DefaultClock),
        },
    ))
}

/// The `/api/v1` surface wired the way the server wires it.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).wrap(Trace).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(configure),
    )
}

/// Log in and return the session cookie.
pub async fn login_as<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie(&res)
}

/// Log in as the bootstrap super admin.
pub async fn login_as_admin<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login_as(app, "admin@example.org", "password").await
}
