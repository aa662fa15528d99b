//! Visit capture for signed-in users.
//!
//! Every request whose session names a user is recorded with its client IP
//! and `User-Agent` before the handler runs. Recording failures are logged
//! and the request carries on.
//!
//! Must sit inside the session middleware so the session is readable:
//!
//! ```text
//! App::new().wrap(VisitTracking).wrap(session_middleware)
//! ```

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::USER_AGENT;
use actix_web::{Error, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::VisitDetails;
use crate::domain::activity::client_ip;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Records one visit row per authenticated request.
#[derive(Clone, Default)]
pub struct VisitTracking;

impl<S, B> Transform<S, ServiceRequest> for VisitTracking
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = VisitTrackingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VisitTrackingMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct VisitTrackingMiddleware<S> {
    service: Rc<S>,
}

fn visit_details(req: &ServiceRequest) -> Option<VisitDetails> {
    let session = SessionContext::new(req.get_session());
    let user_id = session.user_id().ok().flatten()?;
    let forwarded = req
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok());
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    Some(VisitDetails {
        user_id,
        ip_address: client_ip(forwarded, peer.as_deref()),
        user_agent,
    })
}

impl<S, B> Service<ServiceRequest> for VisitTrackingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let details = visit_details(&req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            if let (Some(details), Some(state)) = (details, state) {
                let user_id = details.user_id;
                if let Err(error) = state.activity.record_visit(details).await {
                    warn!(%user_id, error = %error, "failed to record visit");
                }
            }
            service.call(req).await
        })
    }
}
