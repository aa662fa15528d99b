//! Session helpers so handlers deal in identities and flash messages rather
//! than raw cookie keys.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const RESET_USER_ID_KEY: &str = "reset_user_id";
pub(crate) const MESSAGES_KEY: &str = "_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Newtype over the Actix session exposing the keys this app uses.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Mark the session as authenticated for `user_id`.
    ///
    /// The session is renewed first so a pre-login session id is not reused.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, user_id.to_string())
    }

    /// Drop every key and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// The authenticated user id, if any.
    ///
    /// A malformed id is logged and treated as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        self.read_id(USER_ID_KEY)
    }

    /// Remember which account a password reset applies to.
    pub fn set_reset_user_id(&self, user_id: &UserId) -> Result<(), Error> {
        self.insert(RESET_USER_ID_KEY, user_id.to_string())
    }

    pub fn reset_user_id(&self) -> Result<Option<UserId>, Error> {
        self.read_id(RESET_USER_ID_KEY)
    }

    pub fn clear_reset_user_id(&self) {
        self.0.remove(RESET_USER_ID_KEY);
    }

    /// Queue a flash message for the next rendered page.
    pub fn push_flash(&self, level: FlashLevel, message: impl Into<String>) -> Result<(), Error> {
        let mut queued = self
            .0
            .get::<Vec<Flash>>(MESSAGES_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .unwrap_or_default();
        queued.push(Flash::new(level, message));
        self.insert(MESSAGES_KEY, queued)
    }

    /// Remove and return every queued flash message, oldest first.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(MESSAGES_KEY) {
            Some(Ok(messages)) => messages,
            Some(Err(raw)) => {
                warn!(%raw, "discarding unreadable flash messages");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn insert(&self, key: &str, value: impl Serialize) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read_id(&self, key: &str) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match raw.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(key, %error, "invalid user id in session cookie");
                None
            }
        }))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(req.get_session())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id: UserId = FIXTURE_ID.parse().expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?.expect("user in session");
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set.status(), StatusCode::OK);
        let cookie = session_cookie(&set);

        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(get).await, FIXTURE_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_user_id_reads_as_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{}", id.is_some())))
                    }),
                ),
        )
        .await;

        let set = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let get = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(get).await, "false");
    }

    #[rstest]
    #[actix_web::test]
    async fn flashes_are_shown_once() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/push",
                    web::get().to(|session: SessionContext| async move {
                        session.push_flash(FlashLevel::Success, "first")?;
                        session.push_flash(FlashLevel::Error, "second")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        HttpResponse::Ok().json(session.take_flashes())
                    }),
                ),
        )
        .await;

        let push = test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let take = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(session_cookie(&push))
                .to_request(),
        )
        .await;
        let cookie = take
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned);
        let flashes: Vec<Flash> = test::read_body_json(take).await;
        assert_eq!(
            flashes,
            vec![
                Flash::new(FlashLevel::Success, "first"),
                Flash::new(FlashLevel::Error, "second"),
            ]
        );

        let mut request = test::TestRequest::get().uri("/take");
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        let again = test::call_service(&app, request.to_request()).await;
        let flashes: Vec<Flash> = test::read_body_json(again).await;
        assert!(flashes.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn reset_user_id_can_be_cleared() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/",
                    web::get().to(|session: SessionContext| async move {
                        let id: UserId = FIXTURE_ID.parse().expect("fixture id");
                        session.set_reset_user_id(&id)?;
                        let stored = session.reset_user_id()?;
                        session.clear_reset_user_id();
                        let cleared = session.reset_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!(
                            "{}:{}",
                            stored.is_some(),
                            cleared.is_none()
                        )))
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(test::read_body(res).await, "true:true");
    }
}
