//! Team roster and the staff-only site settings form.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::team::{SiteSettingsInput, TeamMemberInput};
use crate::domain::{FormError, TeamMemberId};

use super::ApiResult;
use super::gates::{Authenticated, StaffMember};
use super::multipart::MultipartForm;
use super::page::{Page, Renderer, path_id, redirect};
use super::session::FlashLevel;
use super::state::HttpState;

pub const TEAM_PATH: &str = "/team/";
pub const SITE_SETTINGS_PATH: &str = "/admin/site-settings/";

pub const MEMBER_ADDED: &str = "Team member added successfully.";
pub const MEMBER_UPDATED: &str = "Team member updated successfully.";
pub const DELETE_DENIED: &str = "You don't have permission to delete team members.";
pub const SETTINGS_UPDATED: &str = "Site settings updated.";

const MEMBER_FORM_TEMPLATE: &str = "team/form.html";
const SETTINGS_TEMPLATE: &str = "admin/site_settings.html";

fn member_form_page(title: &str, form: Value, errors: Value) -> Page {
    Page::new(
        MEMBER_FORM_TEMPLATE,
        json!({"title": title, "form": form, "errors": errors}),
    )
}

async fn read_member(payload: Multipart, limit: usize) -> ApiResult<TeamMemberInput> {
    let mut form = MultipartForm::read(payload, limit).await?;
    Ok(TeamMemberInput {
        name: form.text("name"),
        role: form.text("role"),
        bio: form.text("bio"),
        photo: form.take_file("photo"),
    })
}

fn member_echo(input: &TeamMemberInput) -> Value {
    json!({"name": input.name, "role": input.role, "bio": input.bio})
}

/// The team roster, ordered by name.
#[get("/team/")]
pub async fn team_list(
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let members = state.team.members().await?;
    renderer
        .render(Page::new("team/list.html", json!({"members": members})))
        .await
}

/// Empty team member form. Staff only.
#[get("/team/add/")]
pub async fn add_member_form(_staff: StaffMember, renderer: Renderer) -> ApiResult<HttpResponse> {
    renderer
        .render(member_form_page("Add Team Member", json!({}), json!({})))
        .await
}

/// Add a team member with an optional photo. Staff only.
#[post("/team/add/")]
pub async fn add_member(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let input = read_member(payload, state.upload_limit).await?;
    let echo = member_echo(&input);
    match state.team.add(input).await {
        Ok(_) => renderer.flash_redirect(FlashLevel::Success, MEMBER_ADDED, TEAM_PATH),
        Err(FormError::Invalid(errors)) => {
            renderer
                .render(member_form_page("Add Team Member", echo, json!(errors)))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// Team member form prefilled with the stored values. Staff only.
#[get("/team/{id}/edit/")]
pub async fn edit_member_form(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let member = state.team.member(&path_id(&path)?).await?;
    let form = json!({
        "name": member.name,
        "role": member.role,
        "bio": member.bio,
        "photo_path": member.photo_path,
    });
    renderer
        .render(member_form_page("Edit Team Member", form, json!({})))
        .await
}

/// Update a team member. The stored photo is kept when none is sent.
#[post("/team/{id}/edit/")]
pub async fn edit_member(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id: TeamMemberId = path_id(&path)?;
    let input = read_member(payload, state.upload_limit).await?;
    let echo = member_echo(&input);
    match state.team.edit(&id, input).await {
        Ok(_) => renderer.flash_redirect(FlashLevel::Success, MEMBER_UPDATED, TEAM_PATH),
        Err(FormError::Invalid(errors)) => {
            renderer
                .render(member_form_page("Edit Team Member", echo, json!(errors)))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

/// Deletion confirmation page. Non-staff members are turned away with an error flash.
#[get("/team/delete/{id}/")]
pub async fn delete_member_confirm(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if !user.is_staff {
        return renderer.flash_redirect(FlashLevel::Error, DELETE_DENIED, TEAM_PATH);
    }
    let member = state.team.member(&path_id(&path)?).await?;
    renderer
        .render(Page::new(
            "team/confirm_delete.html",
            json!({"member": member}),
        ))
        .await
}

/// Remove a team member. Non-staff members are turned away with an error flash.
#[post("/team/delete/{id}/")]
pub async fn delete_member(
    Authenticated(user): Authenticated,
    renderer: Renderer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if !user.is_staff {
        warn!(user_id = %user.id, "non-staff team member deletion refused");
        return renderer.flash_redirect(FlashLevel::Error, DELETE_DENIED, TEAM_PATH);
    }
    state.team.remove(&path_id(&path)?).await?;
    Ok(redirect(TEAM_PATH))
}

/// Site footer and theme colour form. Staff only.
#[get("/admin/site-settings/")]
pub async fn site_settings_form(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let settings = state.team.site_settings().await?;
    renderer
        .render(Page::new(
            SETTINGS_TEMPLATE,
            json!({"form": settings, "errors": {}}),
        ))
        .await
}

/// Save the site footer and theme colour. Staff only.
#[post("/admin/site-settings/")]
pub async fn update_site_settings(
    _staff: StaffMember,
    renderer: Renderer,
    state: web::Data<HttpState>,
    form: web::Form<SiteSettingsInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match state.team.update_site_settings(&input).await {
        Ok(_) => renderer.flash_redirect(FlashLevel::Success, SETTINGS_UPDATED, SITE_SETTINGS_PATH),
        Err(FormError::Invalid(errors)) => {
            let form = json!({"footer_text": input.footer_text, "theme_color": input.theme_color});
            renderer
                .render(Page::new(
                    SETTINGS_TEMPLATE,
                    json!({"form": form, "errors": errors}),
                ))
                .await
        }
        Err(FormError::Failed(err)) => Err(err),
    }
}

#[cfg(test)]
#[path = "team_tests.rs"]
mod tests;
