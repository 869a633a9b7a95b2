//! Thesis checker API server.
//!
//! Provides REST endpoints for:
//! - Submitting a thesis PDF for a structure and format check
//! - Retrieving stored check results
//! - Uploading an institutional template for comparison
//! - Aggregate statistics over past checks

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod models;
mod pipeline;
mod state;

use state::AppState;

/// Router with all API routes and middleware.
fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/check-document", post(handlers::check_document))
        .route("/api/check-result/:id", get(handlers::get_check_result))
        .route("/api/upload-template", post(handlers::upload_template))
        .route("/api/statistics", get(handlers::statistics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("checker_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing checker API...");
    let state = AppState::new().await?;
    let app = app(Arc::new(state));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting checker API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use shared_types::FormatRuleSet;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    async fn test_state(upload_dir: std::path::PathBuf) -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        AppState::run_migrations(&pool).await.unwrap();
        Arc::new(AppState {
            db: pool,
            rules: Arc::new(FormatRuleSet::default()),
            judge: None,
            upload_dir,
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(test_state(dir.path().to_path_buf()).await);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK".as_slice());
    }

    #[tokio::test]
    async fn test_statistics_on_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(test_state(dir.path().to_path_buf()).await);

        let response = app
            .oneshot(Request::get("/api/statistics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let stats: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats["total_checks"], 0);
        assert_eq!(stats["pass_rate"], 0.0);
    }

    #[tokio::test]
    async fn test_check_document_rejects_non_pdf_upload() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().to_path_buf()).await;
        let app = app(state.clone());

        let payload = serde_json::json!({
            "filename": "skripsi.pdf",
            "pdf_base64": BASE64.encode(b"definitely not a pdf"),
        });
        let response = app
            .oneshot(
                Request::post("/api/check-document")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let result: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(result["validation"]["is_valid_pdf"], false);
        assert_eq!(result["report"], serde_json::Value::Null);

        // The rejected check is still recorded.
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM check_results")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_unknown_check_result_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(test_state(dir.path().to_path_buf()).await);

        let response = app
            .oneshot(
                Request::get("/api/check-result/no-such-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
