use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod notes;
pub mod response;
pub mod state;

use crate::state::AppState;

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "active",
        "message": "Make Notes API is running",
        "timestamp": db::now_utc(),
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "status": "error",
            "message": "Endpoint not found",
        })),
    )
}

/// Cookie auth needs credentialed CORS, which forbids wildcard origins;
/// without a configured frontend we fall back to the permissive dev setup.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Some(Err(_)) => {
            warn!("FRONTEND_URL is not a valid origin; falling back to permissive CORS");
            CorsLayer::permissive()
        }
        None => CorsLayer::permissive(),
    }
}

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_url.as_deref());
    Router::new()
        .route("/", get(root))
        .nest("/api/auth", auth::router())
        .nest("/api/notes", notes::router())
        .nest("/api/categories", categories::router())
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = res.status();
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "5000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
