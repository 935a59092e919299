//! Webhook delivery against a local mock server

use std::time::Duration;

use mockito::Matcher;
use serde_json::{json, Map, Value};

use rpas_infra::webhook::{DeliveryOperation, NotifyError};
use rpas_infra::{FileUpload, WebhookNotifier, WebhookNotifierConfig};

fn fast_notifier() -> WebhookNotifier {
    WebhookNotifier::new(WebhookNotifierConfig {
        timeout_seconds: 5,
        backoff_base: Duration::from_millis(1),
    })
    .unwrap()
}

fn payload() -> Value {
    json!({
        "surveyType": "rpas",
        "projectName": "WestMine",
        "projection": "MGA50",
        "acquisitionDate": "2024-01-15",
        "surveyTime": "14:30",
        "outputFilePath": "/outputs/westmine.las",
        "gpJobId": "j1a2b3"
    })
}

#[tokio::test]
async fn send_json_posts_payload_once_on_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(payload()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    fast_notifier().send_json(&url, &payload(), 3).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn send_json_accepts_any_2xx() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    fast_notifier().send_json(&url, &payload(), 3).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn send_json_retries_until_budget_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    let err = fast_notifier()
        .send_json(&url, &payload(), 3)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        NotifyError::Exhausted {
            operation: DeliveryOperation::WebhookCall,
            attempts: 3,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Webhook call failed after 3 attempts: HTTP 500 Internal Server Error"
    );
}

#[tokio::test]
async fn send_json_zero_budget_makes_one_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    let err = fast_notifier()
        .send_json(&url, &payload(), 0)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().contains("after 1 attempts"));
}

#[tokio::test]
async fn blank_url_fails_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let notifier = fast_notifier();
    for url in ["", "   "] {
        let err = notifier.send_json(url, &payload(), 3).await.unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
        assert_eq!(err.to_string(), "Webhook URL not configured");

        let file = FileUpload::new("scan.las", b"points".to_vec());
        let err = notifier
            .upload_file(url, &file, &Map::new(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn transport_error_is_retried() {
    // Nothing listens on the discard port
    let err = fast_notifier()
        .send_json("http://127.0.0.1:9/hook", &payload(), 2)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Webhook call failed after 2 attempts: request error"));
}

#[tokio::test]
async fn upload_file_sends_multipart_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="scan.las""#.to_string()),
            Matcher::Regex("point cloud bytes".to_string()),
            Matcher::Regex(r#"name="projectName"\r\n\r\nWestMine\r\n"#.to_string()),
            Matcher::Regex(r#"name="pointCount"\r\n\r\n42\r\n"#.to_string()),
            Matcher::Regex(r#"name="verified"\r\n\r\ntrue\r\n"#.to_string()),
        ]))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let mut metadata = Map::new();
    metadata.insert("projectName".to_string(), json!("WestMine"));
    metadata.insert("pointCount".to_string(), json!(42));
    metadata.insert("verified".to_string(), json!(true));
    metadata.insert("gpJobId".to_string(), Value::Null);

    let file = FileUpload::new("scan.las", b"point cloud bytes".to_vec());
    let url = format!("{}/upload", server.url());
    fast_notifier()
        .upload_file(&url, &file, &metadata, 3)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn upload_file_skips_null_metadata() {
    let mut server = mockito::Server::new_async().await;
    let with_null_field = server
        .mock("POST", "/upload")
        .match_body(Matcher::Regex(r#"name="gpJobId""#.to_string()))
        .with_status(500)
        .expect(0)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/upload")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut metadata = Map::new();
    metadata.insert("gpJobId".to_string(), Value::Null);

    let file = FileUpload::new("ortho.tif", vec![0u8; 16]);
    let url = format!("{}/upload", server.url());
    fast_notifier()
        .upload_file(&url, &file, &metadata, 1)
        .await
        .unwrap();

    with_null_field.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn upload_file_failure_includes_response_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .with_status(413)
        .with_body("file too large")
        .expect(2)
        .create_async()
        .await;

    let file = FileUpload::new("scan.las", b"points".to_vec());
    let url = format!("{}/upload", server.url());
    let err = fast_notifier()
        .upload_file(&url, &file, &Map::new(), 2)
        .await
        .unwrap_err();

    mock.assert_async().await;
    let message = err.to_string();
    assert!(message.starts_with("File upload failed after 2 attempts: HTTP 413"), "{message}");
    assert!(message.ends_with(". file too large"), "{message}");
}

#[tokio::test]
async fn upload_file_requires_file_name() {
    let file = FileUpload::new("  ", b"points".to_vec());
    let err = fast_notifier()
        .upload_file("https://example.com/upload", &file, &Map::new(), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::MissingFile));
}
