//! Contact form for visitors and feedback form for members.

use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::domain::FormError;
use crate::domain::engagement::{CONTACT_THANKS, ContactInput, FeedbackInput};

use super::ApiResult;
use super::gates::Authenticated;
use super::page::{Page, Renderer, redirect};
use super::session::FlashLevel;
use super::state::HttpState;

pub const CONTACT_PATH: &str = "/contact/";

const CONTACT_TEMPLATE: &str = "contact.html";
const FEEDBACK_TEMPLATE: &str = "feedback.html";

#[get("/contact/")]
pub async fn contact_form(renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer
        .render(Page::new(CONTACT_TEMPLATE, json!({"form": {}, "errors": {}})))
        .await
}

#[post("/contact/")]
pub async fn contact(
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<ContactInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.engagement.send_contact(&input).await {
        Ok(_) => renderer.flash_redirect(FlashLevel::Success, CONTACT_THANKS, CONTACT_PATH),
        Err(FormError::Invalid(errors)) => {
            let form = json!({
                "name": input.name,
                "email": input.email,
                "subject": input.subject,
                "message": input.message,
            });
            renderer
                .render(Page::new(
                    CONTACT_TEMPLATE,
                    json!({"form": form, "errors": errors}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

#[get("/feedback/")]
pub async fn feedback_form(_user: Authenticated, renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer
        .render(Page::new(FEEDBACK_TEMPLATE, json!({"form": {}, "errors": {}})))
        .await
}

#[post("/feedback/")]
pub async fn feedback(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<FeedbackInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.engagement.submit_feedback(&user.id, &input).await {
        Ok(_) => Ok(redirect("/")),
        Err(FormError::Invalid(errors)) => {
            renderer
                .render(Page::new(
                    FEEDBACK_TEMPLATE,
                    json!({"form": {"comment": input.comment}, "errors": errors}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}
