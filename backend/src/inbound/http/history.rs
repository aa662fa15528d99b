//! The user history page and its browser-side visit counter.
//!
//! Two cookies travel with the page: `visit_count`, bumped on every view,
//! and `last_visit`, the time of the previous view. Both live 30 days.

use actix_web::cookie::{Cookie, time::Duration};
use actix_web::{HttpRequest, HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;

use super::ApiResult;
use super::gates::Authenticated;
use super::page::{Page, Renderer};
use super::state::HttpState;

pub const VISIT_COUNT_COOKIE: &str = "visit_count";
pub const LAST_VISIT_COOKIE: &str = "last_visit";
pub const FIRST_VISIT: &str = "First Visit";
const COOKIE_MAX_AGE_DAYS: i64 = 30;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counter state carried by the visit cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitCookies {
    pub visit_count: u64,
    pub last_visit: String,
}

impl VisitCookies {
    /// Read the cookies and count this visit. A missing or garbled counter
    /// starts again from zero.
    pub fn next(req: &HttpRequest) -> Self {
        let previous = req
            .cookie(VISIT_COUNT_COOKIE)
            .and_then(|cookie| cookie.value().trim().parse::<u64>().ok())
            .unwrap_or(0);
        let last_visit = req
            .cookie(LAST_VISIT_COOKIE)
            .map_or_else(|| FIRST_VISIT.to_owned(), |cookie| cookie.value().to_owned());
        Self {
            visit_count: previous.saturating_add(1),
            last_visit,
        }
    }

    pub fn is_first_visit(&self) -> bool {
        self.visit_count == 1
    }

    fn cookies(&self, now: &DateTime<Utc>) -> [Cookie<'static>; 2] {
        let build = |name: &'static str, value: String| {
            Cookie::build(name, value)
                .path("/")
                .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
                .finish()
        };
        [
            build(VISIT_COUNT_COOKIE, self.visit_count.to_string()),
            build(LAST_VISIT_COOKIE, now.format(TIMESTAMP_FORMAT).to_string()),
        ]
    }
}

#[get("/user_history/")]
pub async fn user_history(
    Authenticated(user): Authenticated,
    req: HttpRequest,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let visits = VisitCookies::next(&req);
    let summary = state.activity.history(&user.id).await?;
    let now = summary.checked_at;
    let context = json!({
        "total_logins": summary.total_logins,
        "login_dates": summary.login_dates,
        "visit_count": visits.visit_count,
        "last_visit": visits.last_visit,
        "current_time": now.format(TIMESTAMP_FORMAT).to_string(),
        "first_visit": visits.is_first_visit(),
        "today_visits": summary.today.visit_count,
        "bio": summary.bio,
    });
    let mut response = renderer.render(Page::new("history.html", context)).await?;
    for cookie in visits.cookies(&now) {
        response
            .add_cookie(&cookie)
            .map_err(|err| Error::internal(format!("failed to set visit cookie: {err}")))?;
    }
    Ok(response)
}
