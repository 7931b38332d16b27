//! HTTP server
//!
//! JSON API and dashboard for the shopping list. Every route sits below
//! the capability prefix `/{secret}`; anything else is refused.

pub mod dashboard;
pub mod handlers;

use crate::app::AppState;
use crate::error::AppError;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::AmbiguousItem { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "message": self,
        });
        (status, Json(body)).into_response()
    }
}

/// Create the router with every route under `/{secret}`
pub fn create_router(state: Arc<AppState>) -> Router {
    let secret = state.secret.clone();
    let at = |path: &str| format!("/{}{}", secret, path);

    Router::new()
        // Dashboard
        .route(&at(""), get(handlers::index))
        .route(&at("/"), get(handlers::index))
        .route(&at("/index.html"), get(handlers::index))
        // Queries
        .route(&at("/api/list"), get(handlers::list))
        .route(&at("/api/summary"), get(handlers::summary))
        .route(&at("/api/stores"), get(handlers::stores))
        .route(&at("/api/recent"), get(handlers::recent))
        .route(&at("/api/search"), get(handlers::search))
        .route(&at("/api/urgent"), get(handlers::urgent))
        .route(&at("/api/at/{store}"), get(handlers::at_store))
        .route(&at("/api/for/{person}"), get(handlers::for_person))
        .route(&at("/api/items/{id}"), get(handlers::get_item))
        // Commands
        .route(&at("/api/add"), post(handlers::add))
        .route(&at("/api/mark_bought"), post(handlers::mark_bought))
        .route(&at("/api/archive"), post(handlers::archive))
        .route(&at("/api/restore"), post(handlers::restore))
        .route(&at("/api/delete"), post(handlers::delete))
        .route(&at("/api/update"), post(handlers::update))
        .fallback(fallback)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Unknown endpoints under the prefix are 404; everything else is 403
async fn fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let prefix = format!("/{}/", state.secret);
    if uri.path().starts_with(&prefix) {
        let body = serde_json::json!({ "success": false, "message": "Unknown endpoint" });
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    } else {
        tracing::warn!("Rejected request outside the dashboard prefix");
        let body = serde_json::json!({ "success": false, "message": "Access denied" });
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    tracing::info!("Grabbit listening on {}", local);
    tracing::info!("Dashboard: http://{}/{}/", local, state.secret);

    axum::serve(listener, app).await
}
