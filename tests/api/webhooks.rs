use reqwest::StatusCode;

use serde_json::{json, Value};

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{cancellation_body, TestApp, CHANNEL, PORTAL};

async fn mount_slack_ok(app: &TestApp, expected_calls: u64) {
    Mock::given(path("/chat.postMessage"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(expected_calls)
        .mount(&app.slack_server)
        .await;
}

async fn outcome_of(res: reqwest::Response) -> String {
    let body: Value = res.json().await.expect("Failed to read response body");
    body["outcome"]
        .as_str()
        .expect("Response has no outcome")
        .to_string()
}

#[tokio::test]
async fn cancellation_with_feedback_is_relayed() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 1).await;

    let res = app
        .post_webhook(&cancellation_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("relayed", outcome_of(res).await);
}

#[tokio::test]
async fn relayed_notification_is_formatted() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 1).await;

    app.post_webhook(&cancellation_body())
        .await
        .expect("Failed to execute request");

    let slack_request = &app.slack_server.received_requests().await.unwrap()[0];
    let body: Value = serde_json::from_slice(&slack_request.body).unwrap();

    let customer_url = format!("{}881234", PORTAL);
    let headline = format!(
        "<{}|jane@example.com> canceled their subscription",
        customer_url
    );

    assert_eq!(CHANNEL, body["channel"]);
    assert_eq!(headline.as_str(), body["text"]);
    assert_eq!(
        format!(
            "{}\n\n> *Feedback:*\n> Too expensive — Pricing doubled this year\n\n> *What could we have done better?*\n> A cheaper annual plan",
            headline
        )
        .as_str(),
        body["blocks"][0]["text"]["text"]
    );
    assert_eq!(customer_url.as_str(), body["blocks"][0]["accessory"]["url"]);
    assert_eq!(
        "Subscribed 3 days ago • $29.00/month (trial)",
        body["blocks"][1]["elements"][0]["text"]
    );
}

#[tokio::test]
async fn subscription_id_stays_inside_the_portal_link() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 1).await;

    let mut body = cancellation_body();
    body["data"]["customer"]["subscription_id"] = json!("//evil.example/../admin?x#y");

    let res = app
        .post_webhook(&body)
        .await
        .expect("Failed to execute request");
    assert_eq!("relayed", outcome_of(res).await);

    let slack_request = &app.slack_server.received_requests().await.unwrap()[0];
    let body: Value = serde_json::from_slice(&slack_request.body).unwrap();

    assert_eq!(
        format!("{}%2F%2Fevil.example%2F..%2Fadmin%3Fx%23y", PORTAL).as_str(),
        body["blocks"][0]["accessory"]["url"]
    );
}

#[tokio::test]
async fn cancellation_without_feedback_is_not_relayed() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 0).await;

    let mut body = cancellation_body();
    body["data"]["session"]["feedback"] = json!(null);
    body["data"]["session"]
        .as_object_mut()
        .unwrap()
        .remove("followupResponse");

    let res = app
        .post_webhook(&body)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("no_feedback", outcome_of(res).await);
}

#[tokio::test]
async fn non_cancellation_sessions_are_ignored() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 0).await;

    let mut body = cancellation_body();
    body["data"]["session"]["result"] = json!("discount_accepted");

    let res = app
        .post_webhook(&body)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("ignored", outcome_of(res).await);
}

#[tokio::test]
async fn malformed_payloads_are_acknowledged_as_malformed() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 0).await;

    let mut missing_plan = cancellation_body();
    missing_plan["data"]["customer"]["subscriptions"]["data"][0] = json!({});

    let mut missing_customer = cancellation_body();
    missing_customer["data"]
        .as_object_mut()
        .unwrap()
        .remove("customer");

    let mut bad_signup_date = cancellation_body();
    bad_signup_date["data"]["customer"]["signup_date"] = json!("not a date");

    let test_cases: Vec<(&str, Value)> = vec![
        ("missing plan", missing_plan),
        ("missing customer", missing_customer),
        ("bad signup date", bad_signup_date),
        ("missing session", json!({ "data": {} })),
        ("missing data", json!({})),
    ];

    for (desc, body) in test_cases {
        let res = app
            .post_webhook(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::OK,
            res.status(),
            "API did not acknowledge payload with {}",
            desc
        );
        assert_eq!(
            "malformed",
            outcome_of(res).await,
            "Wrong outcome for {}",
            desc
        );
    }
}

#[tokio::test]
async fn invalid_json_is_acknowledged_as_malformed() {
    let app = TestApp::spawn_unsigned().await;
    mount_slack_ok(&app, 0).await;

    let res = app
        .post_raw_webhook(b"{not json".to_vec(), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("malformed", outcome_of(res).await);
}

#[tokio::test]
async fn slack_failure_is_acknowledged_as_delivery_failed() {
    let app = TestApp::spawn().await;

    Mock::given(path("/chat.postMessage"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "not_in_channel" })),
        )
        .expect(1)
        .mount(&app.slack_server)
        .await;

    let res = app
        .post_webhook(&cancellation_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("delivery_failed", outcome_of(res).await);
}

#[tokio::test]
async fn unsigned_webhook_is_rejected_when_secret_is_configured() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 0).await;

    let body = serde_json::to_vec(&cancellation_body()).unwrap();

    let res = app
        .post_raw_webhook(body, None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn wrongly_signed_webhook_is_rejected() {
    let app = TestApp::spawn().await;
    mount_slack_ok(&app, 0).await;

    let body = serde_json::to_vec(&cancellation_body()).unwrap();
    let forged = "0".repeat(64);

    let res = app
        .post_raw_webhook(body, Some(&forged))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn unsigned_webhook_is_accepted_without_secret() {
    let app = TestApp::spawn_unsigned().await;
    mount_slack_ok(&app, 1).await;

    let body = serde_json::to_vec(&cancellation_body()).unwrap();

    let res = app
        .post_raw_webhook(body, None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("relayed", outcome_of(res).await);
}
