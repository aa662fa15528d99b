//! Action pages, uploads and the staff category screens.

use actix_web::test;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::Category;
use crate::domain::actions::CategoryInput;
use crate::domain::forms::{INVALID_CHOICE, REQUIRED};
use crate::inbound::http::test_utils::{Browser, TestApp, location, page};

async fn category(harness: &TestApp, name: &str) -> Category {
    harness
        .state
        .actions
        .create_category(&CategoryInput {
            name: Some(name.to_owned()),
        })
        .await
        .expect("category")
}

#[rstest]
#[actix_web::test]
async fn created_action_appears_in_the_list() {
    let harness = TestApp::new();
    let recycling = category(&harness, "Recycling").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let res = browser
        .post_form(
            "/actions/new/",
            [
                ("title", "Recycle paper"),
                ("description", "Recycle old papers"),
                ("category", recycling.id.to_string().as_str()),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 302);
    let detail = location(&res);
    assert!(detail.starts_with("/actions/"));

    let (template, context) = page(browser.get("/actions/").await).await;
    assert_eq!(template, "actions/list.html");
    let actions = context["actions"].as_array().expect("actions");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["title"], "Recycle paper");

    let (template, context) = page(browser.get(&detail).await).await;
    assert_eq!(template, "actions/detail.html");
    assert_eq!(context["action"]["category_id"], json!(recycling.id));
}

#[rstest]
#[actix_web::test]
async fn unknown_category_is_an_invalid_choice() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let res = browser
        .post_form(
            "/actions/new/",
            [
                ("title", "Recycle paper"),
                ("description", ""),
                ("category", "00000000-0000-0000-0000-000000000000"),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let (template, context) = page(res).await;
    assert_eq!(template, NEW_ACTION_TEMPLATE);
    assert_eq!(context["errors"]["category"], json!([INVALID_CHOICE]));
    assert_eq!(context["form"]["title"], "Recycle paper");
    assert_eq!(context["categories"], json!([]));
}

#[rstest]
#[case("/actions/not-a-uuid/")]
#[case("/actions/00000000-0000-0000-0000-000000000000/")]
#[actix_web::test]
async fn missing_actions_are_not_found(#[case] uri: &str) {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    let res = browser.get(uri).await;
    assert_eq!(res.status().as_u16(), 404);
}

#[rstest]
#[case("/upload/")]
#[case("/actions/new/")]
#[case("/my_uploads/")]
#[actix_web::test]
async fn anonymous_visitors_are_sent_to_login(#[case] uri: &str) {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    let res = browser.get(uri).await;
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(
        location(&res),
        format!("/login/?next={}", urlencoding::encode(uri))
    );
}

#[rstest]
#[actix_web::test]
async fn upload_is_listed_under_my_uploads() {
    let harness = TestApp::new();
    let recycling = category(&harness, "Recycling").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let category_id = recycling.id.to_string();
    let res = browser
        .post_multipart(
            "/upload/",
            &[
                ("title", None, b"Compost guide"),
                ("description", None, b"How we compost"),
                ("category", None, category_id.as_bytes()),
                ("file", Some("guide.pdf"), b"%PDF-1.4 compost"),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(location(&res), MY_UPLOADS_PATH);

    let (template, context) = page(browser.get(MY_UPLOADS_PATH).await).await;
    assert_eq!(template, "actions/my_uploads.html");
    let uploads = context["uploads"].as_array().expect("uploads");
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0]["title"], "Compost guide");
    let path = uploads[0]["file_path"].as_str().expect("file path");
    assert!(path.starts_with("uploads/"));
}

#[rstest]
#[actix_web::test]
async fn upload_without_a_file_is_rejected() {
    let harness = TestApp::new();
    let recycling = category(&harness, "Recycling").await;
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let category_id = recycling.id.to_string();
    let res = browser
        .post_multipart(
            "/upload/",
            &[
                ("title", None, b"Compost guide"),
                ("category", None, category_id.as_bytes()),
            ],
        )
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let (template, context) = page(res).await;
    assert_eq!(template, UPLOAD_TEMPLATE);
    assert_eq!(context["errors"]["file"], json!([REQUIRED]));
    assert_eq!(context["form"]["title"], "Compost guide");
}

#[rstest]
#[actix_web::test]
async fn oversized_upload_is_a_bad_request() {
    let harness = TestApp::new();
    let mut browser = Browser::new(test::init_service(harness.app()).await);
    browser.register("ada").await;

    let huge = vec![b'x'; 128 * 1024];
    let res = browser
        .post_multipart(
            "/upload/",
            &[("title", None, b"Big"), ("file", Some("big.bin"), huge.as_slice())],
        )
        .await;
    assert_eq!(res.status().as_u16(), 400);
}
