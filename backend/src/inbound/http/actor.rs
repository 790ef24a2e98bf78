//! Extractor resolving the signed-in [`Actor`] for a request.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error, ErrorCode};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The actor behind the session cookie.
///
/// Fails with 401 when there is no session or its user is gone, and 403 when
/// the user is deactivated. Either way the stale session is purged.
#[derive(Debug, Clone, Copy)]
pub struct SignedIn(pub Actor);

impl FromRequest for SignedIn {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user_id = session.require_user_id()?;
            match state.actors.resolve(user_id).await {
                Ok(actor) => Ok(Self(actor)),
                Err(err) => {
                    if matches!(err.code(), ErrorCode::Unauthorized | ErrorCode::Forbidden) {
                        session.purge();
                    }
                    Err(err.into())
                }
            }
        })
    }
}
