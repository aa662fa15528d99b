//! Landing page and site search.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use serde_json::json;

use super::ApiResult;
use super::gates::MaybeUser;
use super::page::{Page, Renderer};
use super::state::HttpState;

#[get("/")]
pub async fn home(renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer.render(Page::new("home.html", json!({}))).await
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// `GET /search/?query=...`; blank queries render an empty result page.
#[get("/search/")]
pub async fn search(
    MaybeUser(user): MaybeUser,
    renderer: Renderer,
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .actions
        .search(user.map(|user| user.id), params.query.as_deref())
        .await?;
    renderer
        .render(Page::new("search.html", json!(outcome)))
        .await
}
