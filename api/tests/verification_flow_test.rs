//! Integration tests for email and phone ownership verification

mod common;

use actix_web::test;
use serde_json::json;

use common::{get, login, post_json, register, TestContext, EMAIL_QUEUE};
use us_api::create_app;
use us_infra::sms::MockSmsSender;

const PHONE: &str = "+14155552671";

#[actix_web::test]
async fn test_email_verification_round_trip() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;
    register(&app, "alice@example.com", None).await;
    let (access, _) = login(&app, "alice@example.com").await;

    let (status, _) = post_json(&app, "/api/v1/verify-email/send", json!({}), Some(&access)).await;
    assert_eq!(status, 200);
    assert_eq!(ctx.queue.pending(EMAIL_QUEUE), 1);

    let code = ctx.last_email_code().expect("queued task carries a code");
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let (status, body) = post_json(
        &app,
        "/api/v1/verify-email/confirm",
        json!({ "code": wrong }),
        Some(&access),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_verification_code");

    let (status, _) = post_json(
        &app,
        "/api/v1/verify-email/confirm",
        json!({ "code": code }),
        Some(&access),
    )
    .await;
    assert_eq!(status, 200);

    let (_, me) = get(&app, "/api/v1/me", Some(&access)).await;
    assert_eq!(me["email_verified"], true);

    let (status, body) = post_json(&app, "/api/v1/verify-email/send", json!({}), Some(&access)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "email_already_verified");
    assert_eq!(ctx.queue.pending(EMAIL_QUEUE), 0);
}

#[actix_web::test]
async fn test_new_email_code_replaces_previous() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;
    register(&app, "alice@example.com", None).await;
    let (access, _) = login(&app, "alice@example.com").await;

    post_json(&app, "/api/v1/verify-email/send", json!({}), Some(&access)).await;
    let first = ctx.last_email_code().unwrap();
    post_json(&app, "/api/v1/verify-email/send", json!({}), Some(&access)).await;
    let second = ctx.last_email_code().unwrap();

    if first != second {
        let (status, _) = post_json(
            &app,
            "/api/v1/verify-email/confirm",
            json!({ "code": first }),
            Some(&access),
        )
        .await;
        assert_eq!(status, 400);
    }

    let (status, _) = post_json(
        &app,
        "/api/v1/verify-email/confirm",
        json!({ "code": second }),
        Some(&access),
    )
    .await;
    assert_eq!(status, 200);
}

#[actix_web::test]
async fn test_phone_verification_round_trip() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;
    register(&app, "alice@example.com", Some(PHONE)).await;
    let (access, _) = login(&app, "alice@example.com").await;

    let (status, _) = post_json(&app, "/api/v1/verify-phone/send", json!({}), Some(&access)).await;
    assert_eq!(status, 200);

    let code = ctx.last_sms_code(PHONE).expect("SMS carries a code");
    let (status, _) = post_json(
        &app,
        "/api/v1/verify-phone/confirm",
        json!({ "code": code }),
        Some(&access),
    )
    .await;
    assert_eq!(status, 200);

    let (_, me) = get(&app, "/api/v1/me", Some(&access)).await;
    assert_eq!(me["phone_verified"], true);

    let (status, body) = post_json(
        &app,
        "/api/v1/verify-phone/confirm",
        json!({ "code": code }),
        Some(&access),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "phone_already_verified");
}

#[actix_web::test]
async fn test_phone_verification_without_phone() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;
    register(&app, "alice@example.com", None).await;
    let (access, _) = login(&app, "alice@example.com").await;

    let (status, body) = post_json(&app, "/api/v1/verify-phone/send", json!({}), Some(&access)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "phone_number_not_found");
}

#[actix_web::test]
async fn test_sms_failure_leaves_no_usable_code() {
    let ctx = TestContext::with_sms(MockSmsSender::failing());
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;
    let account = register(&app, "alice@example.com", Some(PHONE)).await;
    let (access, _) = login(&app, "alice@example.com").await;

    let (status, body) = post_json(&app, "/api/v1/verify-phone/send", json!({}), Some(&access)).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "sms_failure");

    let id = account["id"].as_str().unwrap().parse().unwrap();
    let stored = ctx.accounts.raw(id).await.unwrap();
    assert!(stored.phone_verification_code_digest.is_none());
}

#[actix_web::test]
async fn test_verification_requires_bearer() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &TestContext::origins())).await;

    for uri in [
        "/api/v1/verify-email/send",
        "/api/v1/verify-email/confirm",
        "/api/v1/verify-phone/send",
        "/api/v1/verify-phone/confirm",
    ] {
        let (status, _) = post_json(&app, uri, json!({ "code": "123456" }), None).await;
        assert_eq!(status, 401, "{} should require authentication", uri);
    }
    assert_eq!(ctx.queue.pending(EMAIL_QUEUE), 0);
    assert!(ctx.sms.sent_messages().is_empty());
}
