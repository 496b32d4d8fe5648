//! HTTP control surface for link-relay.
//!
//! Placeholder CRUD endpoints, environment introspection, and a health
//! check. This is plumbing around the core: nothing here touches a
//! connection or the relay channel directly.

pub mod health;

use crate::relay::Relay;
use axum::http::StatusCode;
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/api/v1", get(api_get).post(api_post).put(api_put))
        .route("/api/v1/env", get(env_handler))
        .route("/health", get(health::health_handler))
        .layer(Extension(relay))
}

/// Body for the placeholder endpoints.
#[derive(Debug, Serialize)]
struct ApiMessage {
    message: &'static str,
}

// Placeholders until the control API grows real resources.
async fn api_get() -> (StatusCode, Json<ApiMessage>) {
    (
        StatusCode::OK,
        Json(ApiMessage {
            message: "get not used yet",
        }),
    )
}

async fn api_post() -> (StatusCode, Json<ApiMessage>) {
    (
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "post not used yet",
        }),
    )
}

async fn api_put() -> (StatusCode, Json<ApiMessage>) {
    (
        StatusCode::ACCEPTED,
        Json(ApiMessage {
            message: "put not used yet",
        }),
    )
}

/// Environment introspection: the visor-supplied settings this relay
/// was launched with, as an array of one object.
async fn env_handler(
    Extension(relay): Extension<Arc<Relay>>,
) -> Json<Vec<crate::config::EnvInfo>> {
    Json(vec![relay.env().clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::relay_channel;
    use crate::config::{Config, EnvInfo};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::util::ServiceExt;

    fn test_relay() -> Arc<Relay> {
        let (sender, _rx) = relay_channel(1);
        let env = EnvInfo {
            visor_pk: "02deadbeef".to_string(),
            app_server_addr: "localhost:5505".to_string(),
            app_key: "test-key".to_string(),
        };
        Arc::new(Relay::new(Config::default(), env, sender))
    }

    async fn request(method: Method, uri: &str) -> axum::response::Response {
        let app = build_router(test_relay());
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn api_get_returns_ok_placeholder() {
        let response = request(Method::GET, "/api/v1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"message":"get not used yet"}"#);
    }

    #[tokio::test]
    async fn api_post_returns_created() {
        let response = request(Method::POST, "/api/v1").await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn api_put_returns_accepted() {
        let response = request(Method::PUT, "/api/v1").await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn env_endpoint_returns_array_of_one() {
        let response = request(Method::GET, "/api/v1/env").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: Vec<EnvInfo> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].visor_pk, "02deadbeef");
        assert_eq!(parsed[0].app_server_addr, "localhost:5505");
        assert_eq!(parsed[0].app_key, "test-key");
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let response = request(Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
