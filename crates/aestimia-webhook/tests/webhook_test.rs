//! Webhook router tests against a wiremock Aestimia service.

use std::sync::{Arc, Mutex};

use aestimia_client::{AestimiaClient, AestimiaConfig};
use aestimia_core::{Application, BoxError, Evaluation, SubmissionId};
use aestimia_webhook::{endpoint, ReviewHandler};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Remembers every evaluation it is shown; optionally fails.
#[derive(Default)]
struct RecordingHandler {
    seen: Mutex<Vec<(Option<SubmissionId>, Evaluation)>>,
    fail: bool,
}

#[async_trait]
impl ReviewHandler for RecordingHandler {
    async fn handle(
        &self,
        application: &Application,
        evaluation: &Evaluation,
    ) -> Result<(), BoxError> {
        self.seen
            .lock()
            .unwrap()
            .push((application.submission_id.clone(), evaluation.clone()));
        if self.fail {
            return Err("badge issuer unavailable".into());
        }
        Ok(())
    }
}

fn client(mock_server: &MockServer) -> Arc<AestimiaClient> {
    let config = AestimiaConfig::new(&mock_server.uri(), "s3cret").unwrap();
    Arc::new(AestimiaClient::new(config).unwrap())
}

fn notify(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn mount_submission(mock_server: &MockServer, reviews: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/submissions/sub-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "sub-1",
            "rubric": {"items": [{"text": "Has done some work", "required": true}]},
            "reviews": reviews
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn accepted_review_is_handled_and_processed() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, json!([{"_id": "r1", "satisfiedRubrics": [0]}])).await;
    Mock::given(method("POST"))
        .and(path("/submissions/sub-1/reviews/r1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let app = endpoint(client(&mock_server), Arc::clone(&handler));

    let response = app.oneshot(notify(r#"{"_id": "sub-1"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let seen = handler.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, Some(SubmissionId::new("sub-1")));
    assert!(seen[0].1.accepted);
}

#[tokio::test]
async fn submission_without_reviews_is_not_processed() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, json!([])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let app = endpoint(client(&mock_server), Arc::clone(&handler));

    let response = app.oneshot(notify(r#"{"id": "sub-1"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let seen = handler.seen.lock().unwrap();
    assert_eq!(seen[0].1.review, None);
    assert!(!seen[0].1.accepted);
}

#[tokio::test]
async fn submission_id_alias_is_accepted() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, json!([{"satisfiedRubrics": []}])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let app = endpoint(client(&mock_server), handler);

    let response = app
        .oneshot(notify(r#"{"submissionId": "sub-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn malformed_notification_is_rejected() {
    let mock_server = MockServer::start().await;
    let app = endpoint(client(&mock_server), Arc::new(RecordingHandler::default()));

    for body in ["not json", r#"{"other": 1}"#, r#"{"_id": 42}"#, r#"{"_id": " "}"#] {
        let response = app.clone().oneshot(notify(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn dot_segment_ids_are_rejected_before_any_upstream_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reviews": []})))
        .expect(0)
        .mount(&mock_server)
        .await;
    let handler = Arc::new(RecordingHandler::default());
    let app = endpoint(client(&mock_server), Arc::clone(&handler));

    for body in [r#"{"_id": ".."}"#, r#"{"id": "."}"#] {
        let response = app.clone().oneshot(notify(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert!(handler.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/submissions/sub-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let app = endpoint(client(&mock_server), Arc::clone(&handler));

    let response = app.oneshot(notify(r#"{"_id": "sub-1"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(handler.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn handler_failure_skips_processing() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, json!([{"_id": "r1", "satisfiedRubrics": [0]}])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = Arc::new(RecordingHandler {
        fail: true,
        ..RecordingHandler::default()
    });
    let app = endpoint(client(&mock_server), Arc::clone(&handler));

    let response = app.oneshot(notify(r#"{"_id": "sub-1"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "HANDLER_ERROR");
    assert_eq!(handler.seen.lock().unwrap().len(), 1);
}
