//! Registration, login, logout and the two-step password reset.
//!
//! ```text
//! GET|POST /register/
//! GET|POST /login/
//! POST     /logout/
//! GET|POST /password-request/
//! GET|POST /password-reset/
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::FormError;
use crate::domain::auth::{
    LoginInput, PasswordResetConfirmInput, PasswordResetRequestInput, RESET_NO_MATCH,
    RegistrationInput,
};

use super::ApiResult;
use super::gates::LOGIN_PATH;
use super::page::{Page, Renderer, redirect};
use super::session::FlashLevel;
use super::state::HttpState;

pub const PASSWORD_REQUEST_PATH: &str = "/password-request/";
pub const PASSWORD_RESET_PATH: &str = "/password-reset/";
pub const RESET_DONE: &str = "Password reset successful. Please login.";

const REGISTER_TEMPLATE: &str = "accounts/register.html";
const LOGIN_TEMPLATE: &str = "accounts/login.html";
const REQUEST_TEMPLATE: &str = "accounts/password_request.html";
const RESET_TEMPLATE: &str = "accounts/password_reset.html";

/// Keep `next` only when it names a path on this site.
///
/// # Examples
/// ```
/// use ecoactions::inbound::http::accounts::safe_next;
///
/// assert_eq!(safe_next(Some("/actions/")), "/actions/");
/// assert_eq!(safe_next(Some("//evil.example/")), "/");
/// assert_eq!(safe_next(Some("https://evil.example/")), "/");
/// assert_eq!(safe_next(None), "/");
/// ```
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

#[get("/register/")]
pub async fn register_form(renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer
        .render(Page::new(REGISTER_TEMPLATE, json!({"form": {}, "errors": {}})))
        .await
}

#[post("/register/")]
pub async fn register(
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<RegistrationInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.accounts.register(&input).await {
        Ok(user) => {
            renderer.session().persist_user(&user.id)?;
            Ok(redirect("/"))
        }
        Err(FormError::Invalid(errors)) => {
            let form = json!({"username": input.username, "email": input.email});
            renderer
                .render(Page::new(
                    REGISTER_TEMPLATE,
                    json!({"form": form, "errors": errors}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[get("/login/")]
pub async fn login_form(
    renderer: Renderer,
    query: web::Query<NextQuery>,
) -> ApiResult<HttpResponse> {
    let next = safe_next(query.next.as_deref());
    renderer
        .render(Page::new(
            LOGIN_TEMPLATE,
            json!({"form": {}, "errors": {}, "next": next}),
        ))
        .await
}

#[post("/login/")]
pub async fn login(
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<LoginInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.accounts.login(&input).await {
        Ok(user) => {
            renderer.session().persist_user(&user.id)?;
            Ok(redirect(safe_next(input.next.as_deref())))
        }
        Err(FormError::Invalid(errors)) => {
            let next = safe_next(input.next.as_deref());
            renderer
                .render(Page::new(
                    LOGIN_TEMPLATE,
                    json!({"form": {"username": input.username}, "errors": errors, "next": next}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

#[post("/logout/")]
pub async fn logout(renderer: Renderer) -> HttpResponse {
    if let Some(user) = renderer.user() {
        info!(user_id = %user.id, "user logged out");
    }
    renderer.session().purge();
    redirect(LOGIN_PATH)
}

#[get("/password-request/")]
pub async fn password_request_form(renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer
        .render(Page::new(REQUEST_TEMPLATE, json!({"form": {}, "errors": {}})))
        .await
}

#[post("/password-request/")]
pub async fn password_request(
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<PasswordResetRequestInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    let errors = match state.accounts.request_password_reset(&input).await {
        Ok(Some(user_id)) => {
            renderer.session().set_reset_user_id(&user_id)?;
            return Ok(redirect(PASSWORD_RESET_PATH));
        }
        Ok(None) => {
            renderer
                .session()
                .push_flash(FlashLevel::Error, RESET_NO_MATCH)?;
            json!({})
        }
        Err(FormError::Invalid(errors)) => json!(errors),
        Err(FormError::Failed(err)) => return Err(err),
    };
    let form = json!({"username": input.username, "email": input.email});
    renderer
        .render(Page::new(
            REQUEST_TEMPLATE,
            json!({"form": form, "errors": errors}),
        ))
        .await
}

#[get("/password-reset/")]
pub async fn password_reset_form(renderer: Renderer) -> ApiResult<HttpResponse> {
    if renderer.session().reset_user_id()?.is_none() {
        return Ok(redirect(PASSWORD_REQUEST_PATH));
    }
    renderer
        .render(Page::new(RESET_TEMPLATE, json!({"form": {}, "errors": {}})))
        .await
}

#[post("/password-reset/")]
pub async fn password_reset(
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<PasswordResetConfirmInput>,
) -> ApiResult<HttpResponse> {
    let Some(user_id) = renderer.session().reset_user_id()? else {
        return Ok(redirect(PASSWORD_REQUEST_PATH));
    };
    match state
        .accounts
        .confirm_password_reset(&user_id, &form.into_inner())
        .await
    {
        Ok(()) => {
            renderer.session().clear_reset_user_id();
            renderer.flash_redirect(FlashLevel::Success, RESET_DONE, LOGIN_PATH)
        }
        Err(FormError::Invalid(errors)) => {
            renderer
                .render(Page::new(
                    RESET_TEMPLATE,
                    json!({"form": {}, "errors": errors}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
