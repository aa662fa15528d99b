//! Community events: listing, detail with view counting, and creation.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use serde_json::{Value, json};

use crate::domain::FormError;
use crate::domain::events::EventInput;

use super::ApiResult;
use super::gates::Authenticated;
use super::multipart::MultipartForm;
use super::page::{Page, Renderer, path_id};
use super::session::FlashLevel;
use super::state::HttpState;

pub const EVENTS_PATH: &str = "/events/";
pub const EVENT_CREATED: &str = "Event created successfully!";

const CREATE_TEMPLATE: &str = "events/create.html";

async fn create_context(state: &HttpState, form: Value, errors: Value) -> ApiResult<Value> {
    let categories = state.actions.categories().await?;
    Ok(json!({"form": form, "errors": errors, "categories": categories}))
}

/// Every event, latest date first.
#[get("/events/")]
pub async fn event_list(
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let events = state.events.list().await?;
    renderer
        .render(Page::new("events/list.html", json!({"events": events})))
        .await
}

/// Empty event form with the category choices.
#[get("/events/create/")]
pub async fn create_event_form(
    _user: Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let context = create_context(&state, json!({}), json!({})).await?;
    renderer.render(Page::new(CREATE_TEMPLATE, context)).await
}

/// Create an event from a multipart body, flashing a confirmation.
#[post("/events/create/")]
pub async fn create_event(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = MultipartForm::read(payload, state.upload_limit).await?;
    let input = EventInput {
        title: form.text("title"),
        description: form.text("description"),
        category: form.text("category"),
        date: form.text("date"),
        time: form.text("time"),
        location: form.text("location"),
        city: form.text("city"),
        image: form.take_file("image"),
    };
    let echo = json!({
        "title": input.title,
        "description": input.description,
        "category": input.category,
        "date": input.date,
        "time": input.time,
        "location": input.location,
        "city": input.city,
    });
    match state.events.create(&user.id, input).await {
        Ok(_) => renderer.flash_redirect(FlashLevel::Success, EVENT_CREATED, EVENTS_PATH),
        Err(FormError::Invalid(errors)) => {
            let context = create_context(&state, echo, json!(errors)).await?;
            renderer.render(Page::new(CREATE_TEMPLATE, context)).await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// Show an event and count the view.
#[get("/events/{id}/")]
pub async fn event_detail(
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event = state.events.view(&path_id(&path)?).await?;
    renderer
        .render(Page::new("events/detail.html", json!({"event": event})))
        .await
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
