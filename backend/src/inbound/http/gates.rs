//! Identity extractors guarding handlers.
//!
//! The session user is loaded at most once per request and cached in the
//! request extensions, so a handler taking both a gate and a [`Renderer`]
//! costs one lookup.
//!
//! [`Renderer`]: super::page::Renderer

use actix_session::SessionExt;
use actix_web::error::InternalError;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{CurrentUser, Error};

use super::session::SessionContext;
use super::state::HttpState;

pub const LOGIN_PATH: &str = "/login/";

#[derive(Clone)]
struct CachedUser(Option<CurrentUser>);

/// Resolve the signed-in user for `req`.
///
/// A session naming a deleted account reads as anonymous.
pub(crate) async fn current_user(req: &HttpRequest) -> Result<Option<CurrentUser>, Error> {
    if let Some(CachedUser(user)) = req.extensions().get::<CachedUser>().cloned() {
        return Ok(user);
    }
    let session = SessionContext::new(req.get_session());
    let user = match session.user_id()? {
        Some(id) => {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state
                .accounts
                .find_user(&id)
                .await?
                .as_ref()
                .map(CurrentUser::from)
        }
        None => None,
    };
    req.extensions_mut().insert(CachedUser(user.clone()));
    Ok(user)
}

/// `/login/?next=<current path>` for `req`.
pub fn login_url(req: &HttpRequest) -> String {
    let next = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path(), |pq| pq.as_str());
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
}

fn login_redirect(req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::Found()
        .insert_header((LOCATION, login_url(req)))
        .finish();
    InternalError::from_response("login required", response).into()
}

/// Any signed-in user; anonymous requests are sent to the login page.
#[derive(Debug, Clone)]
pub struct Authenticated(pub CurrentUser);

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match current_user(&req).await? {
                Some(user) => Ok(Self(user)),
                None => Err(login_redirect(&req)),
            }
        })
    }
}

/// A signed-in staff member; everyone else is sent to the login page.
#[derive(Debug, Clone)]
pub struct StaffMember(pub CurrentUser);

impl FromRequest for StaffMember {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match current_user(&req).await? {
                Some(user) if user.is_staff => Ok(Self(user)),
                _ => Err(login_redirect(&req)),
            }
        })
    }
}

/// The signed-in user if there is one; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(Self(current_user(&req).await?)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("/upload/", "/login/?next=%2Fupload%2F")]
    #[case("/search/?query=a b", "/login/?next=%2Fsearch%2F%3Fquery%3Da%2520b")]
    fn login_url_carries_the_requested_path(#[case] uri: &str, #[case] expected: &str) {
        let req = TestRequest::get().uri(&uri.replace(' ', "%20")).to_http_request();
        assert_eq!(login_url(&req), expected);
    }
}
