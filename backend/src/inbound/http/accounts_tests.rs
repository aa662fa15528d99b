//! Registration, login and password reset through the HTTP surface.

use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::auth::{EMAIL_TAKEN, INVALID_LOGIN, RESET_PASSWORD_MISMATCH, USERNAME_TAKEN};
use crate::domain::forms::NON_FIELD_ERRORS;
use crate::inbound::http::test_utils::{Browser, TEST_PASSWORD, TestApp, location, page};

#[rstest]
#[actix_web::test]
async fn registration_signs_the_user_in() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;

    let (template, context) = page(browser.get("/").await).await;
    assert_eq!(template, "home.html");
    assert_eq!(context["user"]["username"], "ada");
    assert_eq!(context["user"]["is_staff"], false);
}

#[rstest]
#[case("ada", "other@example.org", "username", USERNAME_TAKEN)]
#[case("grace", "ada@example.org", "email", EMAIL_TAKEN)]
#[actix_web::test]
async fn duplicate_identities_are_rejected(
    #[case] username: &str,
    #[case] email: &str,
    #[case] field: &str,
    #[case] message: &str,
) {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    browser.post_form("/logout/", [("", "")]).await;

    let res = browser
        .post_form(
            "/register/",
            [
                ("username", username),
                ("email", email),
                ("password1", TEST_PASSWORD),
                ("password2", TEST_PASSWORD),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let (template, context) = page(res).await;
    assert_eq!(template, REGISTER_TEMPLATE);
    assert_eq!(context["errors"][field], json!([message]));
    assert!(context["user"].is_null());
}

#[rstest]
#[actix_web::test]
async fn login_redirects_to_a_local_next_path() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    browser.post_form("/logout/", [("", "")]).await;

    let res = browser
        .post_form(
            "/login/",
            [
                ("username", "ada"),
                ("password", TEST_PASSWORD),
                ("next", "/my_uploads/"),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(location(&res), "/my_uploads/");
}

#[rstest]
#[actix_web::test]
async fn login_ignores_offsite_next() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;

    let res = browser
        .post_form(
            "/login/",
            [
                ("username", "ada"),
                ("password", TEST_PASSWORD),
                ("next", "//evil.example/"),
            ],
        )
        .await;
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn wrong_password_re_renders_the_form() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    browser.post_form("/logout/", [("", "")]).await;

    let res = browser
        .post_form("/login/", [("username", "ada"), ("password", "nope")])
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let (template, context) = page(res).await;
    assert_eq!(template, LOGIN_TEMPLATE);
    assert_eq!(context["errors"][NON_FIELD_ERRORS], json!([INVALID_LOGIN]));
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;

    let res = browser.post_form("/logout/", [("", "")]).await;
    assert_eq!(location(&res), LOGIN_PATH);
    let (_, context) = page(browser.get("/").await).await;
    assert!(context["user"].is_null());
}

#[rstest]
#[actix_web::test]
async fn two_logins_on_one_day_record_one_activity() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    for _ in 0..2 {
        browser.post_form("/logout/", [("", "")]).await;
        browser
            .post_form("/login/", [("username", "ada"), ("password", TEST_PASSWORD)])
            .await;
    }

    let (_, context) = page(browser.get("/user_history/").await).await;
    assert_eq!(context["total_logins"], 1);
}

#[rstest]
#[actix_web::test]
async fn reset_page_requires_a_prior_request() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);

    let res = browser.get(PASSWORD_RESET_PATH).await;
    assert_eq!(location(&res), PASSWORD_REQUEST_PATH);
    let res = browser
        .post_form(
            PASSWORD_RESET_PATH,
            [("new_password", "fresh one"), ("confirm_password", "fresh one")],
        )
        .await;
    assert_eq!(location(&res), PASSWORD_REQUEST_PATH);
}

#[rstest]
#[actix_web::test]
async fn mismatched_identity_flashes_an_error() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    browser.post_form("/logout/", [("", "")]).await;

    let res = browser
        .post_form(
            PASSWORD_REQUEST_PATH,
            [("username", "ada"), ("email", "someone@example.org")],
        )
        .await;
    let (template, context) = page(res).await;
    assert_eq!(template, REQUEST_TEMPLATE);
    assert_eq!(context["messages"][0]["message"], RESET_NO_MATCH);
    assert_eq!(context["messages"][0]["level"], "error");
}

#[rstest]
#[actix_web::test]
async fn password_reset_round_trip() {
    let harness = TestApp::new();
    let mut browser = Browser::new(actix_test::init_service(harness.app()).await);
    browser.register("ada").await;
    browser.post_form("/logout/", [("", "")]).await;

    let res = browser
        .post_form(
            PASSWORD_REQUEST_PATH,
            [("username", "ada"), ("email", "ada@example.org")],
        )
        .await;
    assert_eq!(location(&res), PASSWORD_RESET_PATH);

    let res = browser
        .post_form(
            PASSWORD_RESET_PATH,
            [("new_password", "first"), ("confirm_password", "second")],
        )
        .await;
    let (_, context) = page(res).await;
    assert_eq!(
        context["errors"][NON_FIELD_ERRORS],
        json!([RESET_PASSWORD_MISMATCH])
    );

    let res = browser
        .post_form(
            PASSWORD_RESET_PATH,
            [("new_password", "brand new"), ("confirm_password", "brand new")],
        )
        .await;
    assert_eq!(location(&res), LOGIN_PATH);
    let (_, context) = page(browser.get(LOGIN_PATH).await).await;
    assert_eq!(context["messages"][0]["message"], RESET_DONE);

    let old = browser
        .post_form("/login/", [("username", "ada"), ("password", TEST_PASSWORD)])
        .await;
    assert_eq!(old.status().as_u16(), 200);
    let new = browser
        .post_form("/login/", [("username", "ada"), ("password", "brand new")])
        .await;
    assert_eq!(new.status().as_u16(), 302);
    assert_eq!(location(&browser.get(PASSWORD_RESET_PATH).await), PASSWORD_REQUEST_PATH);
}

#[rstest]
#[case(Some("/actions/?page=2"), "/actions/?page=2")]
#[case(Some("/\\evil.example"), "/")]
#[case(Some("relative/path"), "/")]
#[case(Some(""), "/")]
fn next_must_be_a_local_path(#[case] next: Option<&str>, #[case] expected: &str) {
    assert_eq!(safe_next(next), expected);
}
