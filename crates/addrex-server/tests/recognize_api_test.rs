//! End-to-end tests for the REST surface, driven through the router with a
//! scripted annotator in place of a real model.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use addrex_core::error::AddrexResult;
use addrex_core::{AnnotatedEntity, Annotator, AnnotatorConfig, EntityCategory, ServiceConfig};
use addrex_server::{create_server, AppState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

const KEY: &str = "test-key";

/// Tags every occurrence of a fixed phrase with a fixed category.
struct PhraseAnnotator {
    phrases: Vec<(&'static str, EntityCategory)>,
    calls: AtomicUsize,
}

impl PhraseAnnotator {
    fn label_example() -> Self {
        Self {
            phrases: vec![
                ("John Smith", EntityCategory::PersonName),
                ("Acme Corp", EntityCategory::Organization),
                ("Austin", EntityCategory::GeopoliticalPlace),
                ("TX", EntityCategory::GeopoliticalPlace),
            ],
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Annotator for PhraseAnnotator {
    async fn annotate(&self, text: &str) -> AddrexResult<Vec<AnnotatedEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut found: Vec<AnnotatedEntity> = self
            .phrases
            .iter()
            .flat_map(|(phrase, category)| {
                text.match_indices(phrase)
                    .map(move |(i, m)| AnnotatedEntity::new(m, *category).at(i))
            })
            .collect();
        found.sort_by_key(|e| e.start);
        Ok(found)
    }

    fn model_name(&self) -> &str {
        "phrase-test"
    }
}

fn config() -> ServiceConfig {
    ServiceConfig::builder().api_key(KEY).build()
}

fn app_with(annotator: Arc<PhraseAnnotator>) -> (Router, AppState) {
    let state = AppState::new_with_annotator(config(), annotator);
    (create_server(state.clone()), state)
}

fn recognize(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/v1/addresses/recognize")
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_recognize_label() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let text = "John Smith\nAcme Corp\n123 Main St\nAustin, TX 78701";

    let (status, body) = send(app, recognize(json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "name": "John Smith", "company": "Acme Corp", "city_locality": "Austin" })
    );
}

#[tokio::test]
async fn test_known_fields_win() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = recognize(json!({
        "text": "John Smith\nAcme Corp\nAustin, TX",
        "address": { "name": "Jane Doe", "postal_code": "78701" }
    }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["postal_code"], "78701");
    assert_eq!(body["company"], "Acme Corp");
    assert_eq!(body["city_locality"], "Austin");
}

#[tokio::test]
async fn test_whitespace_text_skips_annotation() {
    let annotator = Arc::new(PhraseAnnotator::label_example());
    let (app, _) = app_with(annotator.clone());
    let request = recognize(json!({ "text": "  \n\t ", "address": { "country_code": "US" } }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "country_code": "US" }));
    assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_api_key() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/addresses/recognize")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "John Smith" }).to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_api_key() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/addresses/recognize")
        .header("content-type", "application/json")
        .header("x-api-key", "nope")
        .body(Body::from(json!({ "text": "John Smith" }).to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid API key.");
}

#[tokio::test]
async fn test_text_too_long() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = recognize(json!({ "text": "x".repeat(5001) }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "text");
    assert_eq!(body["error"]["details"]["code"], "VAL_002");
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));

    let (status, body) = send(app, recognize(json!({ "text": "" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["code"], "VAL_003");
}

#[tokio::test]
async fn test_seed_field_too_long() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = recognize(json!({ "text": "Austin", "address": { "country_code": "USA" } }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "address.country_code");
}

#[tokio::test]
async fn test_unknown_field_rejected() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = recognize(json!({ "text": "Austin", "address": { "zip": "78701" } }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["code"], "VAL_004");
}

#[tokio::test]
async fn test_malformed_json() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/addresses/recognize")
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from("{\"text\": "))
        .unwrap();

    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_not_allowed() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/addresses/recognize")
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from(json!({ "text": "Austin" }).to_string()))
        .unwrap();

    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_reports_model() {
    let (app, _) = app_with(Arc::new(PhraseAnnotator::label_example()));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["annotator_loaded"], true);
    assert_eq!(body["model"], "phrase-test");
}

#[tokio::test]
async fn test_missing_model_is_unavailable_then_recovers() {
    let annotator = AnnotatorConfig {
        model_path: Some(PathBuf::from("/nonexistent/addrex/model.json")),
        preload: false,
        ..Default::default()
    };
    let config = ServiceConfig::builder()
        .api_key(KEY)
        .annotator(annotator)
        .build();
    let state = AppState::new(config);
    let app = create_server(state.clone());

    let (status, body) = send(app.clone(), recognize(json!({ "text": "Austin" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "ANNOTATOR_UNAVAILABLE");
    assert!(!state.annotators().is_loaded());

    state
        .annotators()
        .inject(Arc::new(PhraseAnnotator::label_example()));

    let (status, body) = send(app, recognize(json!({ "text": "Austin" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city_locality"], "Austin");
}

#[tokio::test]
async fn test_requests_share_one_annotator() {
    let annotator = Arc::new(PhraseAnnotator::label_example());
    let (app, state) = app_with(annotator.clone());

    for _ in 0..3 {
        let (status, _) = send(app.clone(), recognize(json!({ "text": "Austin" }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(annotator.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        state.annotators().get().map(|a| a.model_name().to_string()),
        Some("phrase-test".to_string())
    );
}
