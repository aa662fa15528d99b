//! Page responses and redirects for handlers.

use std::str::FromStr;

use actix_session::SessionExt;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::domain::{CurrentUser, Error};

use super::error::ApiResult;
use super::gates::current_user;
use super::render::page_context;
use super::session::{FlashLevel, SessionContext};
use super::state::HttpState;

/// A template name, its handler-specific context and the response status.
#[derive(Debug, Clone)]
pub struct Page {
    template: &'static str,
    context: Value,
    status: StatusCode,
}

impl Page {
    pub fn new(template: &'static str, context: Value) -> Self {
        Self {
            template,
            context,
            status: StatusCode::OK,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// Parse an id taken from the URL path; malformed ids read as missing pages.
pub fn path_id<T: FromStr>(raw: &str) -> Result<T, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("no page at id {raw}")))
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.as_ref()))
        .finish()
}

/// Per-request page rendering: adds the signed-in user, pending flash
/// messages and site settings to every context.
pub struct Renderer {
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Option<CurrentUser>,
}

impl Renderer {
    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Queue a flash message and redirect.
    pub fn flash_redirect(
        &self,
        level: FlashLevel,
        message: &str,
        location: &str,
    ) -> ApiResult<HttpResponse> {
        self.session.push_flash(level, message)?;
        Ok(redirect(location))
    }

    pub async fn render(&self, page: Page) -> ApiResult<HttpResponse> {
        let site = self.state.team.site_settings().await?;
        let messages = self.session.take_flashes();
        let context = page_context(page.context, self.user.as_ref(), &messages, &site);
        let rendered = self.state.pages.render(page.template, &context)?;
        debug!(template = page.template, status = page.status.as_u16(), "page rendered");
        Ok(HttpResponse::build(page.status)
            .content_type(rendered.content_type)
            .body(rendered.body))
    }
}

impl FromRequest for Renderer {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        let session = SessionContext::new(req.get_session());
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            Ok(Self {
                state,
                session,
                user: current_user(&req).await?,
            })
        })
    }
}
