//! Shared harness for driving the REST API over the in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use tokio::sync::mpsc::Receiver;

use hospadmin::Trace;
use hospadmin::domain::ports::LoginService;
use hospadmin::domain::{
    BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_ID, Error, LoginCredentials, UserChangeEnvelope, UserId,
    ensure_bootstrap,
};
use hospadmin::inbound::http::configure;
use hospadmin::inbound::http::state::{HttpState, Repositories, ServiceContext};
use hospadmin::outbound::memory::InMemoryStore;
use hospadmin::outbound::queue::ChannelUserChangePublisher;

pub const PASSWORD: &str = "password";

/// Sign-in double accepting any registered email with [`PASSWORD`].
#[derive(Default)]
pub struct RegisteredLogins {
    accounts: RwLock<HashMap<String, UserId>>,
}

impl RegisteredLogins {
    pub fn register(&self, email: &str, id: UserId) {
        self.accounts
            .write()
            .expect("logins lock")
            .insert(email.to_ascii_lowercase(), id);
    }
}

#[async_trait]
impl LoginService for RegisteredLogins {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let accounts = self.accounts.read().expect("logins lock");
        match accounts.get(credentials.email().as_ref()) {
            Some(id) if credentials.password() == PASSWORD => Ok(*id),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

pub struct Harness {
    pub state: web::Data<HttpState>,
    pub logins: Arc<RegisteredLogins>,
    pub sync_queue: Receiver<UserChangeEnvelope>,
}

pub async fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::default());
    ensure_bootstrap(store.as_ref(), store.as_ref(), DefaultClock.utc())
        .await
        .expect("bootstrap records");
    let logins = Arc::new(RegisteredLogins::default());
    logins.register(BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_ID);
    let (publisher, sync_queue) = ChannelUserChangePublisher::bounded(64);
    let state = HttpState::from_repositories(
        Repositories::shared(store),
        ServiceContext {
            login: logins.clone(),
            publisher: Arc::new(publisher),
            clock: Arc::new(DefaultClock),
        },
    );
    Harness {
        state: web::Data::new(state),
        logins,
        sync_queue,
    }
}

pub fn app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure))
}

/// Response status, headers and JSON body (`Value::Null` when empty).
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send<S, B>(app: &S, request: TestRequest) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    Reply {
        status,
        headers,
        body,
    }
}

pub async fn login<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

pub fn get(uri: &str, cookie: &Cookie<'static>) -> TestRequest {
    TestRequest::get().uri(uri).cookie(cookie.clone())
}

pub fn post(uri: &str, cookie: &Cookie<'static>, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

pub fn patch(uri: &str, cookie: &Cookie<'static>, body: Value) -> TestRequest {
    TestRequest::patch()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

pub fn delete(uri: &str, cookie: &Cookie<'static>) -> TestRequest {
    TestRequest::delete().uri(uri).cookie(cookie.clone())
}

/// POST `body` to `uri`, expect `201 Created` and return the new id.
pub async fn create<S, B>(app: &S, uri: &str, cookie: &Cookie<'static>, body: Value) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(app, post(uri, cookie, body)).await;
    assert_eq!(reply.status, StatusCode::CREATED, "POST {uri}: {}", reply.body);
    reply.body["id"]
        .as_str()
        .expect("created id")
        .to_owned()
}
