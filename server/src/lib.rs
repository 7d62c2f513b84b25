use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bookcore::persist::{load_predictor, ModelPaths};
use bookcore::{GenrePredictor, KeywordExtractor, SuggestIndex};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const MAX_SUGGESTIONS: usize = 50;

#[derive(Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_n")]
    pub n: usize,
}
fn default_n() -> usize {
    5
}

#[derive(Deserialize)]
pub struct SummaryBody {
    #[serde(default)]
    pub summary: String,
}

/// Shared, read-only service state. Each engine is built once at startup;
/// a failed build leaves `None` and its endpoint reports 503 instead of
/// being retried per request.
#[derive(Clone)]
pub struct AppState {
    pub suggest: Option<Arc<SuggestIndex>>,
    pub genre: Option<Arc<GenrePredictor>>,
}

/// Build the router, loading the suggestion index from the catalog CSV and
/// the genre model from the artifact directory. Either engine may fail to
/// load without taking the process down; the failure is logged and the
/// matching endpoint serves 503.
pub fn build_app<P: AsRef<Path>>(catalog_path: P, model_dir: P) -> Router {
    let suggest = match SuggestIndex::load(catalog_path.as_ref()) {
        Ok(index) => Some(Arc::new(index)),
        Err(e) => {
            tracing::error!(error = %e, "suggestion index unavailable");
            None
        }
    };
    let genre = match load_predictor(&ModelPaths::new(model_dir.as_ref())) {
        Ok(predictor) => Some(Arc::new(predictor)),
        Err(e) => {
            tracing::error!(error = %e, "genre model unavailable");
            None
        }
    };
    let state = AppState { suggest, genre };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(home_handler))
        .route("/autocomplete", get(autocomplete_handler))
        .route("/predict-genre", post(predict_genre_handler))
        .route("/extract-tags", post(extract_tags_handler))
        .with_state(state)
        .layer(cors)
}

type ApiError = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

async fn home_handler() -> Json<Value> {
    Json(json!({
        "message": "book ML API is running",
        "endpoints": ["/predict-genre", "/extract-tags", "/autocomplete"],
    }))
}

pub async fn autocomplete_handler(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    let index = state.suggest.as_ref().ok_or_else(|| {
        error_response(StatusCode::SERVICE_UNAVAILABLE, "suggestion index not loaded")
    })?;
    let top_n = params.n.clamp(1, MAX_SUGGESTIONS);
    let titles = index.suggest(&params.q, top_n).map_err(|e| {
        tracing::error!(error = %e, "autocomplete failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "autocomplete failed")
    })?;
    Ok(Json(titles))
}

pub async fn predict_genre_handler(
    State(state): State<AppState>,
    Json(body): Json<SummaryBody>,
) -> Result<Json<Value>, ApiError> {
    let summary = body.summary.trim();
    if summary.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "summary required"));
    }
    let predictor = state.genre.as_ref().ok_or_else(|| {
        error_response(StatusCode::SERVICE_UNAVAILABLE, "genre model not loaded")
    })?;
    let genre = predictor.predict(summary);
    Ok(Json(json!({ "predicted_genre": genre })))
}

pub async fn extract_tags_handler(
    Json(body): Json<SummaryBody>,
) -> Result<Json<Value>, ApiError> {
    let summary = body.summary.trim();
    if summary.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "summary required"));
    }
    let tags = KeywordExtractor::new()
        .with_max_phrase_words(1)
        .with_top_k(10)
        .extract(summary);
    Ok(Json(json!({ "tags": tags })))
}
