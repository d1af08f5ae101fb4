//! API Handlers
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use deckcheck_ai::evaluator::FAILURE_REASON;
use deckcheck_ai::{AiCheckRequest, AiVerdict};
use deckcheck_analyze::analyze_document;
use deckcheck_core::{
    detect_format, fingerprint, Config, Deck, DeckAnalysis, DeckFormat, FormatHint,
    DECKCHECK_VERSION,
};
use deckcheck_pipeline::ValidationReport;
use deckcheck_resolve::{Resolution, ResolveRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::AppState;

/// Error body: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn current_config(state: &AppState) -> Result<Config, ApiError> {
    state.config.load().map_err(|e| {
        warn!(error = %e, "config load failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

fn decode_document(encoded: &str) -> Result<Vec<u8>, ApiError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("INPUT/documentBase64: {}", e)))
}

// === Resolve ===

pub async fn resolve_url(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> (StatusCode, Json<Resolution>) {
    let default_export = match state.config.load() {
        Ok(config) => config.url_auto_export_to_pdf,
        Err(e) => {
            warn!(error = %e, "config load failed, export not attempted by default");
            false
        }
    };

    match state.resolver.resolve(&request, default_export).await {
        Ok(resolution) => {
            if let Some(method) = resolution.method {
                state.metrics.record_resolution(method.as_str());
            }
            (StatusCode::OK, Json(resolution))
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(Resolution::failure(&e)))
        }
    }
}

// === AI Check ===

/// Always 200: degraded verdicts carry `fallback: true`, and a malformed
/// body fails open like any other degraded path.
pub async fn ai_check(State(state): State<AppState>, body: Bytes) -> Json<AiVerdict> {
    let verdict = match serde_json::from_slice::<AiCheckRequest>(&body) {
        Ok(request) => state.evaluator.evaluate_request(&request).await,
        Err(e) => {
            warn!(error = %e, "ai-check body rejected");
            AiVerdict::fallback(FAILURE_REASON, Some(e.to_string()))
        }
    };
    if verdict.fallback {
        state.metrics.record_fallback();
    }
    Json(verdict)
}

// === Analyze ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    pub document_base64: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub format: DeckFormat,
    pub analysis: Option<DeckAnalysis>,
    pub fingerprint: String,
}

pub async fn analyze(Json(request): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>, ApiError> {
    let bytes = decode_document(&request.document_base64)?;
    let format = detect_format(&FormatHint::file(
        request.file_name.as_deref().unwrap_or(""),
        request.mime.as_deref(),
    ));
    let fingerprint = fingerprint(&bytes);

    let analysis = analyze_document(&bytes, format)
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    info!(%format, fingerprint = %fingerprint, bytes = bytes.len(), "document analyzed");
    Ok(Json(AnalyzeResponse {
        format,
        analysis,
        fingerprint,
    }))
}

// === Validate ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub deck: Deck,
    /// Document to analyze when the deck carries no analysis yet
    #[serde(default)]
    pub document_base64: Option<String>,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationReport>, ApiError> {
    let config = current_config(&state)?;
    let mut deck = request.deck;

    if let Some(encoded) = request.document_base64.as_deref() {
        let bytes = decode_document(encoded)?;
        if deck.analysis.is_none() {
            deck.analysis = analyze_document(&bytes, deck.format)
                .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
        }
        deck.file_data = Some(bytes);
    }

    let ctx = state.runs.begin(&deck.id);
    let report = state.runner.run_in(&ctx, &deck, &config).await;

    if !state.runs.is_current(&ctx) {
        warn!(deck_id = %ctx.deck_id, run_id = %ctx.run_id, "stale run discarded");
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Superseded by a newer validation run for this deck",
        ));
    }
    state.runs.finish(&ctx);
    state.metrics.record_run(report.ai_fallbacks);
    Ok(Json(report))
}

// === Config ===

pub async fn get_config(State(state): State<AppState>) -> Result<Json<Config>, ApiError> {
    current_config(&state).map(Json)
}

pub async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<Config>,
) -> Result<Json<Config>, ApiError> {
    config
        .validate()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    state.config.save(&config).map_err(|e| {
        warn!(error = %e, "config save failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(ai_checks = config.ai_checks.len(), "config replaced");
    Ok(Json(config))
}

// === Health / Metrics ===

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": DECKCHECK_VERSION,
            "ai": state.evaluator.is_enabled(),
        })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
