//! Team roster management and site settings.

use actix_web::test;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::team::TeamMemberInput;
use crate::inbound::http::test_utils::{Browser, TestApp, location, page};

async fn member_id(harness: &TestApp, name: &str) -> String {
    harness
        .state
        .team
        .add(TeamMemberInput {
            name: Some(name.to_owned()),
            role: Some("Coordinator".to_owned()),
            ..TeamMemberInput::default()
        })
        .await
        .expect("member")
        .id
        .to_string()
}

#[rstest]
#[actix_web::test]
async fn staff_can_add_members_with_a_photo() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("staff").await;
    harness.state.accounts.promote("staff").await.expect("promote");

    let res = browser
        .post_multipart(
            "/team/add/",
            &[
                ("name", None, b"Grace"),
                ("role", None, b"Organiser"),
                ("photo", Some("grace.jpg"), b"\xff\xd8 jpeg"),
            ],
        )
        .await;
    assert_eq!(location(&res), TEAM_PATH);

    let (template, context) = page(browser.get(TEAM_PATH).await).await;
    assert_eq!(template, "team/list.html");
    assert_eq!(context["messages"][0]["message"], MEMBER_ADDED);
    assert_eq!(context["members"][0]["name"], "Grace");
    assert_eq!(context["members"][0]["bio"], "");
    let photo = context["members"][0]["photo_path"].as_str().expect("photo");
    assert!(photo.starts_with("team_photos/"));
}

#[rstest]
#[actix_web::test]
async fn edit_form_is_prefilled() {
    let harness = TestApp::new();
    let id = member_id(&harness, "Grace").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("staff").await;
    harness.state.accounts.promote("staff").await.expect("promote");

    let (template, context) = page(browser.get(&format!("/team/{id}/edit/")).await).await;
    assert_eq!(template, MEMBER_FORM_TEMPLATE);
    assert_eq!(context["title"], "Edit Team Member");
    assert_eq!(context["form"]["name"], "Grace");

    let res = browser
        .post_multipart(
            &format!("/team/{id}/edit/"),
            &[("name", None, b"Grace H."), ("role", None, b"Lead")],
        )
        .await;
    assert_eq!(location(&res), TEAM_PATH);
    let (_, context) = page(browser.get(TEAM_PATH).await).await;
    assert_eq!(context["messages"][0]["message"], MEMBER_UPDATED);
    assert_eq!(context["members"][0]["role"], "Lead");
}

#[rstest]
#[actix_web::test]
async fn non_staff_members_cannot_reach_the_add_form() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let res = browser.get("/team/add/").await;
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(location(&res), "/login/?next=%2Fteam%2Fadd%2F");
}

#[rstest]
#[case::confirm_page(false)]
#[case::submission(true)]
#[actix_web::test]
async fn non_staff_deletion_is_refused(#[case] submit: bool) {
    let harness = TestApp::new();
    let id = member_id(&harness, "Grace").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let uri = format!("/team/delete/{id}/");
    let res = if submit {
        browser.post_form(&uri, [("", "")]).await
    } else {
        browser.get(&uri).await
    };
    assert_eq!(location(&res), TEAM_PATH);

    let (_, context) = page(browser.get(TEAM_PATH).await).await;
    assert_eq!(context["messages"][0]["message"], DELETE_DENIED);
    assert_eq!(context["messages"][0]["level"], "error");
    assert_eq!(context["members"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn staff_deletion_removes_the_member() {
    let harness = TestApp::new();
    let id = member_id(&harness, "Grace").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("staff").await;
    harness.state.accounts.promote("staff").await.expect("promote");

    let uri = format!("/team/delete/{id}/");
    let (template, context) = page(browser.get(&uri).await).await;
    assert_eq!(template, "team/confirm_delete.html");
    assert_eq!(context["member"]["name"], "Grace");

    let res = browser.post_form(&uri, [("", "")]).await;
    assert_eq!(location(&res), TEAM_PATH);
    let (_, context) = page(browser.get(TEAM_PATH).await).await;
    assert_eq!(context["members"], json!([]));
    assert_eq!(context["messages"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn site_settings_flow_into_every_page() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("staff").await;
    harness.state.accounts.promote("staff").await.expect("promote");

    let (_, context) = page(browser.get(SITE_SETTINGS_PATH).await).await;
    assert_eq!(context["form"]["theme_color"], "#28a745");

    let res = browser
        .post_form(
            SITE_SETTINGS_PATH,
            [("footer_text", "Green Town"), ("theme_color", "#112233")],
        )
        .await;
    assert_eq!(location(&res), SITE_SETTINGS_PATH);

    let (_, context) = page(browser.get("/").await).await;
    assert_eq!(context["site"]["footer_text"], "Green Town");
    assert_eq!(context["site"]["theme_color"], "#112233");
}

#[rstest]
#[actix_web::test]
async fn over_long_theme_colour_is_rejected() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("staff").await;
    harness.state.accounts.promote("staff").await.expect("promote");

    let res = browser
        .post_form(
            SITE_SETTINGS_PATH,
            [("footer_text", "Green Town"), ("theme_color", "#1122334")],
        )
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let (template, context) = page(res).await;
    assert_eq!(template, SETTINGS_TEMPLATE);
    assert!(context["errors"]["theme_color"].is_array());
    assert_eq!(context["form"]["theme_color"], "#1122334");
}
