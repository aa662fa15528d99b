//! HTTP inbound adapter serving the server-rendered pages.

pub mod accounts;
pub mod actions;
pub mod admin;
pub mod engagement;
pub mod error;
pub mod events;
pub mod gates;
pub mod health;
pub mod history;
pub mod home;
pub mod multipart;
pub mod page;
pub mod render;
pub mod session;
pub mod session_config;
pub mod state;
pub mod team;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register every page route.
///
/// Fixed segments are registered before `{id}` captures on the same prefix.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
///
/// let app = App::new().configure(ecoactions::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(home::search)
        .service(accounts::register_form)
        .service(accounts::register)
        .service(accounts::login_form)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::password_request_form)
        .service(accounts::password_request)
        .service(accounts::password_reset_form)
        .service(accounts::password_reset)
        .service(actions::upload_form)
        .service(actions::upload)
        .service(actions::action_list)
        .service(actions::new_action_form)
        .service(actions::new_action)
        .service(actions::action_detail)
        .service(actions::my_uploads)
        .service(engagement::contact_form)
        .service(engagement::contact)
        .service(engagement::feedback_form)
        .service(engagement::feedback)
        .service(history::user_history)
        .service(team::team_list)
        .service(team::add_member_form)
        .service(team::add_member)
        .service(team::delete_member_confirm)
        .service(team::delete_member)
        .service(team::edit_member_form)
        .service(team::edit_member)
        .service(team::site_settings_form)
        .service(team::update_site_settings)
        .service(events::event_list)
        .service(events::create_event_form)
        .service(events::create_event)
        .service(events::event_detail)
        .service(admin::category_list)
        .service(admin::create_category)
        .service(admin::delete_category)
        .service(admin::feedback_list)
        .service(admin::contact_messages)
        .service(admin::visit_list)
        .service(admin::search_logs)
        .service(health::ready)
        .service(health::live);
}
