//! Staff pages for categories and the activity listings.
//!
//! ```text
//! GET|POST /admin/categories/
//! POST     /admin/categories/{id}/delete/
//! GET      /admin/feedback/
//! GET      /admin/contact-messages/
//! GET      /admin/visits/
//! GET      /admin/search-logs/
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde_json::{Value, json};
use tracing::info;

use crate::domain::actions::CategoryInput;
use crate::domain::{CategoryId, FormError};

use super::ApiResult;
use super::gates::StaffMember;
use super::page::{Page, Renderer, path_id};
use super::session::FlashLevel;
use super::state::HttpState;

pub const CATEGORIES_PATH: &str = "/admin/categories/";

const CATEGORIES_TEMPLATE: &str = "admin/categories.html";

async fn categories_page(state: &HttpState, form: Value, errors: Value) -> ApiResult<Page> {
    let categories = state.actions.categories().await?;
    Ok(Page::new(
        CATEGORIES_TEMPLATE,
        json!({"categories": categories, "form": form, "errors": errors}),
    ))
}

/// Show every category with an empty creation form.
#[get("/admin/categories/")]
pub async fn category_list(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let page = categories_page(&state, json!({}), json!({})).await?;
    renderer.render(page).await
}

/// Create a category, re-rendering the listing when the name is invalid or taken.
#[post("/admin/categories/")]
pub async fn create_category(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<CategoryInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.actions.create_category(&input).await {
        Ok(category) => renderer.flash_redirect(
            FlashLevel::Success,
            &format!("Category \"{}\" created.", category.name),
            CATEGORIES_PATH,
        ),
        Err(FormError::Invalid(errors)) => {
            let page =
                categories_page(&state, json!({"name": input.name}), json!(errors)).await?;
            renderer.render(page).await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// Delete a category. Actions and uploads filed under it become uncategorised.
#[post("/admin/categories/{id}/delete/")]
pub async fn delete_category(
    StaffMember(staff): StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CategoryId = path_id(&path)?;
    state.actions.delete_category(&id).await?;
    info!(category_id = %id, staff_id = %staff.id, "category removed from admin");
    renderer.flash_redirect(FlashLevel::Success, "Category deleted.", CATEGORIES_PATH)
}

/// List feedback, newest first.
#[get("/admin/feedback/")]
pub async fn feedback_list(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let feedback = state.engagement.feedback().await?;
    renderer
        .render(Page::new("admin/feedback.html", json!({"feedback": feedback})))
        .await
}

/// List contact messages, newest first.
#[get("/admin/contact-messages/")]
pub async fn contact_messages(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let messages = state.engagement.contact_messages().await?;
    renderer
        .render(Page::new(
            "admin/contact_messages.html",
            json!({"contact_messages": messages}),
        ))
        .await
}

/// List recorded visits, newest first.
#[get("/admin/visits/")]
pub async fn visit_list(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let visits = state.activity.recent_visits().await?;
    renderer
        .render(Page::new("admin/visits.html", json!({"visits": visits})))
        .await
}

/// List logged searches, newest first.
#[get("/admin/search-logs/")]
pub async fn search_logs(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let searches = state.activity.recent_searches().await?;
    renderer
        .render(Page::new("admin/search_logs.html", json!({"searches": searches})))
        .await
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
