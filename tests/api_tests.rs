use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use movie_club_api::api::{create_router, AppState};
use movie_club_api::error::{AppError, AppResult};
use movie_club_api::services::providers::{
    ChatModel, ChatRequest, EmailSender, OutboundEmail, SmsSender,
};
use movie_club_api::store::Stores;

/// Chat model replying with a fixed script, one entry per call. An exhausted
/// script errors like an unreachable upstream.
struct ScriptedModel {
    replies: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
        })
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _request: ChatRequest) -> AppResult<String> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AppError::ExternalApi("script exhausted".to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// SMS sink recording every send.
#[derive(Default)]
struct RecordingSms {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send_sms(&self, to: &str, body: &str, _media_url: Option<&str>) -> AppResult<()> {
        self.sent.lock().unwrap().push((to.to_string(), body.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording-sms"
    }
}

/// Email sink recording recipient addresses.
#[derive(Default)]
struct RecordingEmail {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_email(&self, email: OutboundEmail) -> AppResult<()> {
        self.sent.lock().unwrap().push(email.to);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording-email"
    }
}

struct TestApp {
    server: TestServer,
    sms: Arc<RecordingSms>,
    email: Arc<RecordingEmail>,
    // Holds the store directory alive for the duration of the test.
    _data_dir: tempfile::TempDir,
}

fn test_app_with_model(replies: &[&str]) -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let sms = Arc::new(RecordingSms::default());
    let email = Arc::new(RecordingEmail::default());

    let state = AppState::with_parts(
        ScriptedModel::new(replies),
        None,
        sms.clone(),
        email.clone(),
        Stores::open(data_dir.path()),
        4,
    );

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        sms,
        email,
        _data_dir: data_dir,
    }
}

fn test_app() -> TestApp {
    test_app_with_model(&[])
}

const JAPAN_MOVIE: &str = r#"{
    "title": "After Life",
    "year": "1998",
    "country": "Japan",
    "director": "Hirokazu Kore-eda",
    "description": "The recently deceased pick one memory to keep.",
    "watch_info": "Criterion Channel"
}"#;

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = app.server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_publish_and_fetch_weekly_movie() {
    let app = test_app();

    let response = app
        .server
        .post("/api/weekly-movie")
        .json(&json!({ "title": "Test", "code": "ABC123" }))
        .await;
    response.assert_status_ok();
    let published: serde_json::Value = response.json();
    assert_eq!(published["success"], true);

    let response = app.server.get("/api/weekly-movie").await;
    response.assert_status_ok();
    let stored: serde_json::Value = response.json();
    assert_eq!(stored, json!({ "title": "Test", "code": "ABC123" }));
}

#[tokio::test]
async fn test_weekly_movie_missing_is_404() {
    let app = test_app();
    let response = app.server.get("/api/weekly-movie").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_publish_without_code_is_rejected_and_store_untouched() {
    let app = test_app();

    app.server
        .post("/api/weekly-movie")
        .json(&json!({ "title": "First", "code": "AAA111" }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/weekly-movie")
        .json(&json!({ "title": "Second" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/weekly-movie")
        .json(&json!({ "code": "BBB222" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let stored: serde_json::Value = app.server.get("/api/weekly-movie").await.json();
    assert_eq!(stored, json!({ "title": "First", "code": "AAA111" }));
}

#[tokio::test]
async fn test_review_round_trip() {
    let app = test_app();

    let response = app
        .server
        .post("/api/receive-review")
        .form(&[
            ("From", "+15551230001"),
            ("Body", "ABC123 Loved it!"),
            ("To", "+15551239999"),
        ])
        .await;
    response.assert_status_ok();
    response.assert_text("Review received. Thank you!");

    let response = app.server.get("/api/get-reviews").add_query_param("code", "ABC123").await;
    response.assert_status_ok();
    let reviews: Vec<serde_json::Value> = response.json();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["review"], "Loved it!");
    assert_eq!(reviews[0]["code"], "ABC123");
    assert_eq!(reviews[0]["from"], "+15551230001");
    assert_eq!(reviews[0]["raw"], "ABC123 Loved it!");
}

#[tokio::test]
async fn test_review_lookup_is_case_insensitive() {
    let app = test_app();

    app.server
        .post("/api/receive-review")
        .form(&[("From", "+15551230001"), ("Body", "ABC123 Loved it!")])
        .await
        .assert_status_ok();

    let reviews: Vec<serde_json::Value> = app
        .server
        .get("/api/get-reviews")
        .add_query_param("code", "abc123")
        .await
        .json();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["review"], "Loved it!");
}

#[tokio::test]
async fn test_review_without_code_is_stored_but_not_matched() {
    let app = test_app();

    app.server
        .post("/api/receive-review")
        .form(&[("From", "+15551230001"), ("Body", "Loved it!")])
        .await
        .assert_status_ok();

    let reviews: Vec<serde_json::Value> = app
        .server
        .get("/api/get-reviews")
        .add_query_param("code", "ABC123")
        .await
        .json();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn test_receive_review_requires_from_and_body() {
    let app = test_app();

    let response = app
        .server
        .post("/api/receive-review")
        .form(&[("From", "+15551230001")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/receive-review")
        .form(&[("Body", "ABC123 Loved it!")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_reviews_requires_code_param() {
    let app = test_app();
    let response = app.server.get("/api/get-reviews").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_movie_filters_to_requested_region() {
    let french_movie = r#"{"title": "Playtime", "year": "1967", "country": "France"}"#;
    let app = test_app_with_model(&["not json at all", french_movie, JAPAN_MOVIE]);

    let response = app
        .server
        .post("/api/generate-movie")
        .json(&json!({
            "region": "Asia",
            "genre": "Drama",
            "decade": "1990s",
            "budget": "Indie"
        }))
        .await;
    response.assert_status_ok();

    let movie: serde_json::Value = response.json();
    assert_eq!(movie["title"], "After Life");
    assert_eq!(movie["country"], "Japan");
    assert_eq!(movie["region"], "Asia");
    assert_eq!(movie["genre"], "Drama");
    assert_eq!(movie["decade"], "1990s");
    assert_eq!(movie["budget"], "Indie");
    assert_eq!(movie["release_year"], "1998");
    assert_eq!(movie["code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_generate_movie_fills_missing_categories() {
    let app = test_app_with_model(&[JAPAN_MOVIE]);

    // Japan only matches the Asia catalog, so force the region and let the
    // other categories be drawn randomly.
    let response = app
        .server
        .post("/api/generate-movie")
        .json(&json!({ "region": "Asia" }))
        .await;
    response.assert_status_ok();

    let movie: serde_json::Value = response.json();
    assert!(movie["genre"].is_string());
    assert!(movie["decade"].is_string());
    assert!(movie["budget"].is_string());
}

#[tokio::test]
async fn test_generate_movie_unknown_region_is_400() {
    let app = test_app();
    let response = app
        .server
        .post("/api/generate-movie")
        .json(&json!({ "region": "Atlantis" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_movie_exhausted_attempts_is_500() {
    let french_movie = r#"{"title": "Playtime", "year": "1967", "country": "France"}"#;
    // Attempt cap is 4 in the test state; every reply misses the region.
    let app = test_app_with_model(&[french_movie, french_movie, french_movie, french_movie]);

    let response = app
        .server
        .post("/api/generate-movie")
        .json(&json!({ "region": "Asia" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_register_user_appends_and_sends_welcome_sms() {
    let app = test_app();

    let response = app
        .server
        .post("/api/register-user")
        .form(&[("name", "Jerry"), ("phone", "+15551230001"), ("consent", "yes")])
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    // The welcome SMS is spawned off the request; give it a beat.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let sent = app.sms.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15551230001");
    assert!(sent[0].1.contains("Jerry"));
}

#[tokio::test]
async fn test_register_user_requires_consent() {
    let app = test_app();

    let response = app
        .server
        .post("/api/register-user")
        .form(&[("name", "Jerry"), ("phone", "+15551230001")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/register-user")
        .form(&[("name", "Jerry"), ("phone", "+15551230001"), ("consent", "no")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/register-user")
        .form(&[("phone", "+15551230001"), ("consent", "yes")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_witty_intro_uses_model_reply() {
    let app = test_app_with_model(&["A memory worth keeping."]);

    let response = app
        .server
        .post("/api/ai-witty-intro")
        .json(&json!({ "movie": { "title": "After Life", "genre": "Drama" } }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["intro"], "A memory worth keeping.");
}

#[tokio::test]
async fn test_witty_intro_falls_back_when_model_fails() {
    // Empty script: the model errors on the first call.
    let app = test_app();

    let response = app
        .server
        .post("/api/ai-witty-intro")
        .json(&json!({
            "movie": { "title": "After Life", "genre": "Drama", "release_year": "1998" }
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let intro = body["intro"].as_str().unwrap();
    assert!(intro.contains("After Life"));
    assert!(intro.contains("a drama film"));
}

#[tokio::test]
async fn test_witty_intro_without_movie_is_empty() {
    let app = test_app();

    let response = app.server.post("/api/ai-witty-intro").json(&json!({})).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["intro"], "");
}

#[tokio::test]
async fn test_send_results_dispatches_per_contact() {
    let app = test_app();

    // 1x1 transparent PNG
    let image = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    let response = app
        .server
        .post("/api/send-results")
        .json(&json!({
            "contacts": ["jerry@example.com", "+15551230001"],
            "image": image,
            "posterUrl": "https://img/poster.jpg"
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["contact"], "jerry@example.com");
    assert_eq!(results[0]["status"], "email sent");
    assert_eq!(results[1]["contact"], "+15551230001");
    assert_eq!(results[1]["status"], "sms sent");

    let emails = app.email.sent.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0], "jerry@example.com");
    assert_eq!(app.sms.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_results_rejects_bare_base64() {
    let app = test_app();

    let response = app
        .server
        .post("/api/send-results")
        .json(&json!({ "contacts": [], "image": "iVBORw0KGgo" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
