//! Router configuration for Web API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{submit_feedback, AppState};
use super::middleware::create_cors_layer;

/// Create the feedback router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/feedback", post(submit_feedback))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::mail::{Dispatcher, SmtpConnector};

    fn create_test_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.smtp.host = "127.0.0.1".to_string();
        config.smtp.port = 1;
        config.smtp.user = "relay".to_string();
        config.message.sender_address = "relay@example.com".to_string();
        config.message.recipient_address = "dev@example.com".to_string();
        let connector = SmtpConnector::new(&config.smtp);
        Arc::new(AppState::new(
            Dispatcher::new(&config, Arc::new(connector)).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_feedback_route_allows_configured_origin() {
        let origins = vec!["https://app.example.com".to_string()];
        let router = create_router(create_test_state(), &origins);

        // An invalid body is rejected before any mail session is opened.
        let response = router
            .oneshot(
                Request::post("/feedback")
                    .header(ORIGIN, "https://app.example.com")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );
    }
}
