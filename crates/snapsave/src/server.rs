use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use snapsave_core::{SnapError, SnapResult};
use snapsave_resolve::Resolver;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    resolver: Arc<Resolver>,
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    url: Option<String>,
}

pub fn build_app(resolver: Resolver) -> Router {
    let state = AppState {
        resolver: Arc::new(resolver),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/test", post(resolve_handler))
        .route("/health", get(health_handler))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(resolver: Resolver, host: &str, port: u16) -> SnapResult<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| SnapError::Network(format!("failed to bind {addr}: {err}")))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_app(resolver))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| SnapError::Network(format!("server error: {err}")))?;

    info!("Server stopped");
    Ok(())
}

async fn resolve_handler(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let Some(url) = request.url.filter(|url| !url.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "URL is required" })),
        )
            .into_response();
    };

    let outcome = state.resolver.resolve(url.trim()).await;
    Json(outcome).into_response()
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use snapsave_resolve::HttpSettings;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        build_app(Resolver::with_settings(&HttpSettings::default()).unwrap())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/test")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn health_reports_healthy() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let response = app()
                .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["status"], "healthy");
            assert!(body["timestamp"].is_string());
        });
    }

    #[test]
    fn missing_url_is_bad_request() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let response = app().oneshot(post_json("{}")).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body, json!({ "success": false, "message": "URL is required" }));
        });
    }

    #[test]
    fn invalid_url_resolves_without_network() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let response = app()
                .oneshot(post_json(r#"{"url":"https://example.com/clip"}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body, json!({ "success": false, "message": "Invalid URL" }));
        });
    }

    #[test]
    fn unknown_route_is_not_found() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let response = app()
                .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_json(response).await, json!({ "error": "Not found" }));
        });
    }
}
