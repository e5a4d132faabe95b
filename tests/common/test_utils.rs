use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use essay_scorer::{
    Result,
    classifier::{Classifier, create_classifier},
    config::{Backend, Config, ModelConfig},
    server::{AppState, router},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;
use tower::ServiceExt; // for `oneshot`

/// Router backed by the given classifier
pub fn create_test_app(classifier: Arc<dyn Classifier>) -> Router {
    router(AppState::new(classifier))
}

/// Router backed by the built-in lexicon classifier
pub fn create_lexicon_app() -> Router {
    let config = ModelConfig {
        backend: Backend::Lexicon,
        ..ModelConfig::default()
    };
    let classifier = create_classifier(&config).unwrap();
    create_test_app(classifier)
}

/// `POST /score` with a JSON body
pub fn score_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/score")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends `request` and returns the status with the decoded JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Asserts the body is a list of `{label, score}` pairs with scores in [0, 1]
pub fn assert_classification_shape(body: &Value) {
    let items = body.as_array().expect("response body should be an array");
    assert!(!items.is_empty(), "response should hold at least one label");

    for item in items {
        let object = item.as_object().expect("each entry should be an object");
        assert_eq!(object.len(), 2, "unexpected fields in {}", item);
        assert!(object["label"].is_string());
        let score = object["score"].as_f64().expect("score should be a number");
        assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config::default()
}

/// Sample configuration YAML for the lexicon backend
pub const SAMPLE_LEXICON_CONFIG: &str = r#"
server:
  host: "0.0.0.0"
  port: 8080
  logs:
    level: "debug"

model:
  backend: lexicon
  name: "essay-lexicon"
  max_input_chars: 20000
  labels:
    positive: "LABEL_1"
    negative: "LABEL_0"
  lexicon:
    stellar: 3.0
"#;

/// Sample configuration YAML for the remote backend
pub const SAMPLE_REMOTE_CONFIG: &str = r#"
server:
  port: 5001

model:
  backend: remote
  name: "distilbert-base-uncased-finetuned-sst-2-english"
  url: "http://127.0.0.1:8000/models/distilbert"
  api_key: "test-api-key"
  headers:
    X-Team: "essays"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
