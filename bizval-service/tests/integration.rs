//! Integration tests for bizval-service.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bizval_common::logging::TRACE_ID_HEADER;
use bizval_service::{
    build_router, AppState, ChannelsNotifier, InMemoryStore, LogNotifier, Notifier, ValuationStore,
};
use bizval_valuation::{Currency, ValuationReport};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every delivered report.
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, ValuationReport)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, email: &str, report: &ValuationReport) -> bizval_common::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), report.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _email: &str, _report: &ValuationReport) -> bizval_common::Result<()> {
        Err(bizval_common::Error::Notification("smtp relay down".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

struct BrokenStore;

#[async_trait]
impl ValuationStore for BrokenStore {
    async fn save(
        &self,
        _record: bizval_valuation::ValuationRecord,
    ) -> bizval_common::Result<uuid::Uuid> {
        Err(bizval_common::Error::Storage("connection refused".into()))
    }

    async fn get(
        &self,
        _id: uuid::Uuid,
    ) -> bizval_common::Result<Option<bizval_valuation::ValuationRecord>> {
        Ok(None)
    }

    async fn count(&self) -> bizval_common::Result<usize> {
        Ok(0)
    }
}

fn test_app(notifier: Arc<dyn Notifier>) -> axum::Router {
    build_router(AppState::new(
        Arc::new(InMemoryStore::new(100)),
        notifier,
        Currency::Usd,
    ))
}

fn example_form() -> serde_json::Value {
    serde_json::json!({
        "formData": {
            "email": "jane@acme.test",
            "companyName": "Acme Ltd",
            "businessIndividualName": "Jane",
            "currency": "usd",
            "revenue": "100000",
            "netIncome": "20000",
            "industry": "tech",
            "assets": "50000",
            "liabilities": "10000",
            "yearsInOperation": "3–5 years",
            "socialFollowers": "1000",
            "revenueTrend": "growing"
        }
    })
}

fn post_valuation(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/calculatevaluation")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_full_valuation_flow() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = test_app(notifier.clone());

    // 1. Submit the form
    let response = app
        .clone()
        .oneshot(post_valuation(&example_form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));

    let json = read_json(response).await;
    assert_eq!(json["message"], "Valuation report has been sent to your email");
    assert_eq!(json["formattedValuation"], "$121,000");
    assert!(json["content"].as_str().unwrap().contains("$121,000"));
    let total = json["totalValuation"].as_f64().unwrap();
    assert!((total - 121_000.0).abs() < 1e-6);
    let id = json["id"].as_str().unwrap().to_string();

    // 2. The report went to the submitter
    {
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "jane@acme.test");
        assert_eq!(sent[0].1.subject, "Business Valuation Report - Acme Ltd");
        assert!(sent[0].1.html.contains("$121,000"));
    }

    // 3. The record can be fetched back
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/valuations/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], id.as_str());
    assert_eq!(json["data"]["companyName"], "Acme Ltd");
    assert_eq!(json["data"]["contactName"], "Jane");
    assert_eq!(json["data"]["formData"]["yearsInOperation"], "3–5 years");
    assert_eq!(json["data"]["formattedValuation"], "$121,000");
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let app = test_app(Arc::new(LogNotifier));

    let mut request = post_valuation(&example_form());
    request
        .headers_mut()
        .insert(TRACE_ID_HEADER, "trace-abc".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(TRACE_ID_HEADER).unwrap(), "trace-abc");
}

#[tokio::test]
async fn test_notifier_failure_returns_multi_status() {
    let store = Arc::new(InMemoryStore::new(100));
    let app = build_router(AppState::new(
        store.clone(),
        Arc::new(FailingNotifier),
        Currency::Usd,
    ));

    let response = app.oneshot(post_valuation(&example_form())).await.unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let json = read_json(response).await;
    assert_eq!(
        json["message"],
        "Valuation result available but email delivery failed. Please try again later."
    );
    assert!(json["content"].as_str().unwrap().contains("$121,000"));
    assert!(json["id"].is_string());

    // The record is persisted even though delivery failed.
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_contact_is_bad_request() {
    let app = test_app(Arc::new(LogNotifier));
    let mut form = example_form();
    form["formData"]["email"] = serde_json::json!("");

    let response = app.oneshot(post_valuation(&form)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(json["error"]["message"], "Missing required field: email");
}

#[tokio::test]
async fn test_overflowing_amounts_are_rejected() {
    let store = Arc::new(InMemoryStore::new(100));
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build_router(AppState::new(store.clone(), notifier.clone(), Currency::Usd));

    let mut form = example_form();
    form["formData"]["assets"] = serde_json::json!("1.7e308");
    form["formData"]["netIncome"] = serde_json::json!("1e308");

    let response = app.oneshot(post_valuation(&form)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");

    // Nothing was stored or sent.
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = build_router(AppState::new(
        Arc::new(BrokenStore),
        Arc::new(LogNotifier),
        Currency::Usd,
    ));

    let response = app.oneshot(post_valuation(&example_form())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json(response).await;
    assert_eq!(json["error"]["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_unknown_valuation_is_not_found() {
    let app = test_app(Arc::new(LogNotifier));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/valuations/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"]["code"], "VALUATION_NOT_FOUND");
}

#[tokio::test]
async fn test_empty_currency_uses_configured_default() {
    let app = build_router(AppState::new(
        Arc::new(InMemoryStore::new(100)),
        Arc::new(LogNotifier),
        Currency::Kwd,
    ));
    let mut form = example_form();
    form["formData"]["currency"] = serde_json::json!("");

    let response = app.oneshot(post_valuation(&form)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["formattedValuation"], "121,000 KWD");
}

#[tokio::test]
async fn test_channels_notifier_delivers_report() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/send"))
        .and(body_partial_json(serde_json::json!({
            "channel_type": "email",
            "channel_id": "jane@acme.test",
            "content": {
                "type": "html",
                "subject": "Business Valuation Report - Acme Ltd"
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notifier = ChannelsNotifier::new(server.uri(), Duration::from_secs(5), 1);
    let app = test_app(Arc::new(notifier));

    let response = app.oneshot(post_valuation(&example_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_channels_notifier_reports_remote_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"success": false, "error": "channel not configured"}),
        ))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = ChannelsNotifier::new(server.uri(), Duration::from_secs(5), 2);
    let report = ValuationReport {
        subject: "s".into(),
        html: "h".into(),
        text: "t".into(),
    };

    let err = notifier.notify("jane@acme.test", &report).await.unwrap_err();
    assert!(err.to_string().contains("channel not configured"));
    assert!(err.to_string().contains("j***@acme.test"));
}

#[tokio::test]
async fn test_channels_notifier_http_error_gives_multi_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/send"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let notifier = ChannelsNotifier::new(server.uri(), Duration::from_secs(5), 1);
    let app = test_app(Arc::new(notifier));

    let response = app.oneshot(post_valuation(&example_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
}
