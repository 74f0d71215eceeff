//! HTTP API routes.

use crate::error::ServiceError;
use crate::notifier::{notifier_from_config, Notifier};
use crate::store::{InMemoryStore, ValuationStore};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bizval_common::config::Config;
use bizval_common::logging::RequestContext;
use bizval_common::util::mask_email;
use bizval_valuation::{calculate, Currency, ValuationForm, ValuationRecord, ValuationReport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Service name reported by the health check and attached to request spans.
pub const SERVICE_NAME: &str = "bizval-service";

const MESSAGE_DELIVERED: &str = "Valuation report has been sent to your email";
const MESSAGE_DELIVERY_FAILED: &str =
    "Valuation result available but email delivery failed. Please try again later.";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ValuationStore>,
    pub notifier: Arc<dyn Notifier>,
    /// Currency used when a form leaves it empty
    pub default_currency: Currency,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ValuationStore>,
        notifier: Arc<dyn Notifier>,
        default_currency: Currency,
    ) -> Self {
        Self {
            store,
            notifier,
            default_currency,
        }
    }

    /// Wire the in-memory store and the configured notifier.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let default_currency =
            Currency::parse(&config.valuation.default_currency).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unsupported valuation.default_currency '{}' (expected one of: {})",
                    config.valuation.default_currency,
                    Currency::ALL.map(|c| c.code()).join(", ")
                )
            })?;

        Ok(Self::new(
            Arc::new(InMemoryStore::new(config.storage.max_records)),
            notifier_from_config(&config.notification),
            default_currency,
        ))
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Valuation
        .route("/api/calculatevaluation", post(calculate_valuation))
        .route("/api/valuations/:id", get(get_valuation))
        .with_state(state)
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ Valuation ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub form_data: ValuationForm,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    /// Explanation text
    pub content: String,
    pub message: String,
    pub id: Uuid,
    pub total_valuation: f64,
    pub formatted_valuation: String,
}

async fn calculate_valuation(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let span = ctx.span("calculate_valuation");

    let Json(request) = payload.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;

    let (status, body) = process_valuation(&state, request.form_data)
        .instrument(span)
        .await?;

    let mut response_headers = HeaderMap::new();
    ctx.to_headers(&mut response_headers);

    Ok((status, response_headers, Json(body)).into_response())
}

async fn process_valuation(
    state: &AppState,
    form: ValuationForm,
) -> Result<(StatusCode, CalculateResponse), ServiceError> {
    let contact = form.contact()?;
    let metrics = form.normalize_with_currency(state.default_currency);
    let result = calculate(&metrics);
    if !result.total_valuation.is_finite() {
        tracing::warn!(
            industry = %result.factors.industry,
            "Valuation overflowed, rejecting submission"
        );
        return Err(ServiceError::InvalidRequest(
            "amounts are too large to value".into(),
        ));
    }

    let record = ValuationRecord::new(contact, metrics, &result, Utc::now());
    let id = state.store.save(record.clone()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store valuation record");
        e
    })?;

    tracing::info!(
        record_id = %id,
        industry = %result.factors.industry,
        currency = %result.factors.currency,
        recipient = %mask_email(&record.email),
        total = result.total_valuation,
        "Valuation calculated"
    );

    let report = ValuationReport::render(&record);
    let (status, message) = match state.notifier.notify(&record.email, &report).await {
        Ok(()) => (StatusCode::OK, MESSAGE_DELIVERED),
        Err(e) => {
            tracing::warn!(
                record_id = %id,
                notifier = state.notifier.name(),
                error = %e,
                "Report delivery failed"
            );
            (StatusCode::MULTI_STATUS, MESSAGE_DELIVERY_FAILED)
        }
    };

    Ok((
        status,
        CalculateResponse {
            content: result.explanation.clone(),
            message: message.to_string(),
            id,
            total_valuation: result.total_valuation,
            formatted_valuation: record.formatted_valuation,
        },
    ))
}

async fn get_valuation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ServiceError::InvalidRequest(format!("'{id}' is not a valuation id")))?;

    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": record
    })))
}
