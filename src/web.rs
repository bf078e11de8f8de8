use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::GreeterError;
use crate::api;
use crate::config::GreeterConfig;
use crate::greeting::GreetingHandler;

/// Read-only state shared by all requests
pub struct AppState {
    pub greeter: GreetingHandler,
}

impl AppState {
    pub fn new(config: &GreeterConfig) -> crate::Result<Self> {
        Ok(Self {
            greeter: GreetingHandler::from_config(config)?,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(index))
        .nest("/api", api::router());

    with_service_layers(routes).with_state(state)
}

/// Panic recovery, request tracing and CORS, applied to every route
fn with_service_layers<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Credentials forbid wildcards, so origin, methods and headers are mirrored.
    let cors = CorsLayer::very_permissive();

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: GreeterConfig) -> Result<()> {
    let state = Arc::new(AppState::new(&config).context("Failed to create HTTP clients")?);
    let app = router(state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn index() -> Json<Value> {
    Json(json!({ "Message": "Welcome to Home Page" }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Request handler panicked: {}", message);

    GreeterError::general(message).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_message() {
        let Json(body) = index().await;
        assert_eq!(body, json!({"Message": "Welcome to Home Page"}));
    }

    #[tokio::test]
    async fn test_handle_panic_exposes_message() {
        let response = handle_panic(Box::new("division by zero"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "division by zero"}));

        let response = handle_panic(Box::new(String::from("index out of bounds")));
        assert_eq!(json_body(response).await, json!({"error": "index out of bounds"}));

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Unknown panic message"}));
    }

    #[tokio::test]
    async fn test_panicking_route_returns_error_json() {
        async fn explode() -> Json<Value> {
            panic!("division by zero")
        }
        let app: Router = with_service_layers(Router::new().route("/explode", get(explode)));

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "division by zero"}));
    }

    #[tokio::test]
    async fn test_handler_error_returns_error_json() {
        async fn failing() -> Result<Json<Value>, GreeterError> {
            Err(GreeterError::general("upstream exploded"))
        }
        let app: Router = with_service_layers(Router::new().route("/failing", get(failing)));

        let response = app
            .oneshot(Request::builder().uri("/failing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "upstream exploded"}));
    }
}
