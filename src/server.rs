//! HTTP server for the FAQ assistant.
//!
//! A thin transport shell around [`FaqEngine`]: it parses the request,
//! delegates to the engine, and maps the outcome to a status code.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ask` | Answer a question: `{ "question": "..." }` |
//! | `GET`  | `/health` | Health check (returns version and index size) |
//! | `GET`  | `/images/*` | Static FAQ images, when `server.images_dir` is set |
//!
//! # Error Contract
//!
//! ```json
//! { "error": "Missing question" }          // 400
//! { "error": "Internal server error" }     // 500
//! ```
//!
//! A question with no matching FAQ is not an error: it returns `200` with
//! the localized fallback reply.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::Config;
use crate::engine::FaqEngine;
use crate::error::FaqError;
use crate::models::Reply;

/// Largest accepted request body, in bytes.
const MAX_BODY_BYTES: usize = 1024;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    engine: Arc<FaqEngine>,
}

/// Starts the HTTP server.
///
/// Binds to `[server].bind` and serves until the process is terminated.
/// The engine must already be bootstrapped.
pub async fn run_server(config: &Config, engine: Arc<FaqEngine>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config, engine);

    info!(bind = %bind_addr, "FAQ server listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
pub fn router(config: &Config, engine: Arc<FaqEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/ask", post(handle_ask))
        .route("/health", get(handle_health));

    if let Some(dir) = &config.server.images_dir {
        app = app.nest_service("/images", ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(AppState { engine })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        match err {
            FaqError::Validation(message) => AppError {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            other => {
                error!(error = %other, "/ask failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                }
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    entries: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        entries: state.engine.index().len(),
    })
}

// ============ POST /ask ============

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: Option<String>,
}

/// Handler for `POST /ask`.
///
/// A missing or blank `question` is rejected with `400`. Malformed JSON is
/// rejected by the extractor before reaching the engine.
async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Reply>, AppError> {
    let question = req.question.unwrap_or_default();
    let reply = state.engine.ask(&question).await?;
    Ok(Json(reply))
}
