//! Eco-action pages and file uploads.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use serde_json::{Value, json};

use crate::domain::FormError;
use crate::domain::actions::{EcoActionInput, UploadInput};

use super::ApiResult;
use super::gates::Authenticated;
use super::multipart::MultipartForm;
use super::page::{Page, Renderer, path_id, redirect};
use super::state::HttpState;

pub const MY_UPLOADS_PATH: &str = "/my_uploads/";

const UPLOAD_TEMPLATE: &str = "actions/upload.html";
const NEW_ACTION_TEMPLATE: &str = "actions/form.html";

async fn form_context(state: &HttpState, form: Value, errors: Value) -> ApiResult<Value> {
    let categories = state.actions.categories().await?;
    Ok(json!({"form": form, "errors": errors, "categories": categories}))
}

/// Empty upload form with the category choices.
#[get("/upload/")]
pub async fn upload_form(
    _user: Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let context = form_context(&state, json!({}), json!({})).await?;
    renderer.render(Page::new(UPLOAD_TEMPLATE, context)).await
}

/// Store a multipart upload for the signed-in user and redirect to their uploads.
#[post("/upload/")]
pub async fn upload(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = MultipartForm::read(payload, state.upload_limit).await?;
    let input = UploadInput {
        title: form.text("title"),
        description: form.text("description"),
        category: form.text("category"),
        file: form.take_file("file"),
    };
    let echo = json!({
        "title": input.title,
        "description": input.description,
        "category": input.category,
    });
    match state.actions.create_upload(&user.id, input).await {
        Ok(_) => Ok(redirect(MY_UPLOADS_PATH)),
        Err(FormError::Invalid(errors)) => {
            let context = form_context(&state, echo, json!(errors)).await?;
            renderer.render(Page::new(UPLOAD_TEMPLATE, context)).await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// Every eco-action, newest first.
#[get("/actions/")]
pub async fn action_list(
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let actions = state.actions.actions().await?;
    renderer
        .render(Page::new("actions/list.html", json!({"actions": actions})))
        .await
}

/// Empty eco-action form with the category choices.
#[get("/actions/new/")]
pub async fn new_action_form(
    _user: Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let context = form_context(&state, json!({}), json!({})).await?;
    renderer.render(Page::new(NEW_ACTION_TEMPLATE, context)).await
}

/// Create an eco-action and redirect to its detail page.
#[post("/actions/new/")]
pub async fn new_action(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<EcoActionInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.actions.create_action(&user.id, &input).await {
        Ok(action) => Ok(redirect(format!("/actions/{}/", action.id))),
        Err(FormError::Invalid(errors)) => {
            let echo = json!({
                "title": input.title,
                "description": input.description,
                "category": input.category,
            });
            let context = form_context(&state, echo, json!(errors)).await?;
            renderer.render(Page::new(NEW_ACTION_TEMPLATE, context)).await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// A single eco-action. Unknown or malformed ids are a 404.
#[get("/actions/{id}/")]
pub async fn action_detail(
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let action = state.actions.action(&path_id(&path)?).await?;
    renderer
        .render(Page::new("actions/detail.html", json!({"action": action})))
        .await
}

/// The signed-in user's uploads, newest first.
#[get("/my_uploads/")]
pub async fn my_uploads(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let uploads = state.actions.uploads_for(&user.id).await?;
    renderer
        .render(Page::new("actions/my_uploads.html", json!({"uploads": uploads})))
        .await
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
