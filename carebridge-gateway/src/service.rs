use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use carebridge_tasks::{
    CareGuidanceRequest, FaqRequest, GenerationError, OllamaGenerator, SummarizeRequest,
    TaskRunner, TextGenerator, TranslateRequest,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    config::GatewayConfig,
    error::{ApiResult, handle_panic},
    models::{
        CareGuidanceResponse, FaqResponse, HealthResponse, NotFoundResponse, SummarizeResponse,
        TranslateResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub runner: TaskRunner,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &GatewayConfig) -> Self {
        Self {
            runner: TaskRunner::new(generator).with_timeout(config.generation_timeout),
        }
    }
}

/// Builds the full application against the Ollama instance named in `config`.
pub fn create_app(config: &GatewayConfig) -> Result<Router, GenerationError> {
    let generator = OllamaGenerator::new(&config.ollama_base_url, config.model.clone())?;
    Ok(build_router(AppState::new(Arc::new(generator), config)))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/summarize", post(summarize))
        .route("/api/generate-faq", post(generate_faq))
        .route("/api/care-guidance", post(care_guidance))
        .route("/api/translate", post(translate))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(app_state)
}

async fn health_check(State(state): State<AppState>) -> Response {
    match state.runner.probe().await {
        Ok(models) => {
            info!(available_models = models.len(), "Health probe succeeded");
            Json(HealthResponse::ok(state.runner.model())).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unavailable(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<SummarizeResponse> {
    let Json(request) = payload?;
    let simplified_text = state.runner.summarize(request).await?;

    Ok(Json(SummarizeResponse {
        simplified_text,
        model: state.runner.model().to_string(),
        success: true,
    }))
}

async fn generate_faq(
    State(state): State<AppState>,
    payload: Result<Json<FaqRequest>, JsonRejection>,
) -> ApiResult<FaqResponse> {
    let Json(request) = payload?;
    let faqs = state.runner.generate_faqs(request).await?;

    Ok(Json(FaqResponse {
        faqs,
        success: true,
    }))
}

async fn care_guidance(
    State(state): State<AppState>,
    payload: Result<Json<CareGuidanceRequest>, JsonRejection>,
) -> ApiResult<CareGuidanceResponse> {
    let Json(request) = payload?;
    let care_guidance = state.runner.care_guidance(request).await?;

    Ok(Json(CareGuidanceResponse {
        care_guidance,
        success: true,
    }))
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<TranslateResponse> {
    let Json(request) = payload?;
    let translation = state.runner.translate(request).await?;

    Ok(Json(TranslateResponse {
        translated_text: translation.translated_text,
        target_language: translation.target_language,
        success: true,
    }))
}

async fn not_found() -> (StatusCode, Json<NotFoundResponse>) {
    (StatusCode::NOT_FOUND, Json(NotFoundResponse::default()))
}
