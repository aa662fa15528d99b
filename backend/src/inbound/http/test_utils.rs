//! Test helpers for inbound HTTP components.

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_http::Request;
use actix_web::cookie::{Cookie, Key, time::Duration};
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde::Serialize;
use serde_json::Value;
use tempfile::TempDir;

use crate::middleware::{Trace, VisitTracking};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::storage::CapStdBlobStore;

use super::health::HealthState;
use super::render::JsonPageRenderer;
use super::state::{HttpState, HttpStatePorts};

pub const TEST_PASSWORD: &str = "correct horse battery";
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory application with a throwaway media directory.
///
/// Pages render as JSON so assertions can read the template name and context.
pub struct TestApp {
    pub state: web::Data<HttpState>,
    pub store: Arc<InMemoryStore>,
    key: Key,
    _media: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let media = tempfile::tempdir().expect("media dir");
        let blobs = CapStdBlobStore::open(media.path()).expect("blob store");
        let store = Arc::new(InMemoryStore::new());
        let ports = HttpStatePorts::from_store(
            &store,
            Arc::new(blobs),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(DefaultClock),
        );
        let state = HttpState::new(ports, Arc::new(JsonPageRenderer), 64 * 1024);
        Self {
            state: web::Data::new(state),
            store,
            key: Key::generate(),
            _media: media,
        }
    }

    /// The full middleware stack and every route.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(self.state.clone())
            .app_data(web::Data::new(HealthState::new()))
            .wrap(VisitTracking)
            .wrap(session)
            .wrap(Trace)
            .configure(super::configure)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// `Location` of a redirect response.
pub fn location(res: &ServiceResponse) -> String {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// Decode a page rendered by [`JsonPageRenderer`] into `(template, context)`.
pub async fn page(res: ServiceResponse) -> (String, Value) {
    let body: Value = test::read_body_json(res).await;
    let template = body["template"].as_str().unwrap_or_default().to_owned();
    (template, body["context"].clone())
}

/// Drives an initialised app while keeping cookies between requests.
pub struct Browser<S> {
    app: S,
    jar: HashMap<String, Cookie<'static>>,
}

impl<S> Browser<S>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    pub fn new(app: S) -> Self {
        Self {
            app,
            jar: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.jar.get(name)
    }

    pub async fn send(&mut self, mut req: test::TestRequest) -> ServiceResponse {
        for cookie in self.jar.values() {
            req = req.cookie(cookie.clone());
        }
        let res = test::call_service(&self.app, req.to_request()).await;
        for cookie in res.response().cookies() {
            if cookie.max_age() == Some(Duration::ZERO) || cookie.value().is_empty() {
                self.jar.remove(cookie.name());
            } else {
                self.jar
                    .insert(cookie.name().to_owned(), cookie.clone().into_owned());
            }
        }
        res
    }

    pub async fn get(&mut self, uri: &str) -> ServiceResponse {
        self.send(test::TestRequest::get().uri(uri)).await
    }

    pub async fn post_form(&mut self, uri: &str, form: impl Serialize) -> ServiceResponse {
        self.send(test::TestRequest::post().uri(uri).set_form(form))
            .await
    }

    /// Post a multipart body built from `(name, file name, content)` parts.
    pub async fn post_multipart(
        &mut self,
        uri: &str,
        parts: &[(&str, Option<&str>, &[u8])],
    ) -> ServiceResponse {
        let (content_type, body) = multipart_body(parts);
        self.send(
            test::TestRequest::post()
                .uri(uri)
                .insert_header((CONTENT_TYPE, content_type))
                .set_payload(body),
        )
        .await
    }

    /// Register `username` through the form, leaving the browser signed in.
    pub async fn register(&mut self, username: &str) {
        let email = format!("{username}@example.org");
        let res = self
            .post_form(
                "/register/",
                [
                    ("username", username),
                    ("email", email.as_str()),
                    ("password1", TEST_PASSWORD),
                    ("password2", TEST_PASSWORD),
                ],
            )
            .await;
        assert_eq!(res.status().as_u16(), 302, "registration should redirect");
    }
}

const BOUNDARY: &str = "ecoactions-test-boundary";

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Register `username` through the form and return the signed-in session.
pub async fn register_and_login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let email = format!("{username}@example.org");
    let req = test::TestRequest::post()
        .uri("/register/")
        .set_form([
            ("username", username),
            ("email", email.as_str()),
            ("password1", TEST_PASSWORD),
            ("password2", TEST_PASSWORD),
        ])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status().as_u16(), 302, "registration should redirect");
    session_cookie(&res).expect("session cookie after registration")
}
