use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer for browser callers.
///
/// An empty list or a `*` entry allows any origin. Preflight (`OPTIONS`)
/// requests are answered by the layer itself with `200` and an empty body.
pub fn cors_layer(allowed_origins: &[String], methods: &[Method]) -> CorsLayer {
    let allow_origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Ignoring invalid CORS origin '{}': {}", o, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods.to_vec())
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::post};
    use tower::util::ServiceExt;

    fn app(origins: &[String]) -> Router {
        Router::new()
            .route("/analyze", post(|| async { "ok" }))
            .layer(cors_layer(origins, &[Method::POST, Method::OPTIONS]))
    }

    #[tokio::test]
    async fn test_preflight_without_origin_still_answered() {
        let response = app(&[])
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/analyze")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().contains_key("access-control-allow-methods"));
        assert!(response.headers().contains_key("access-control-allow-headers"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_listed_origin_is_echoed() {
        let origins = vec!["https://example.com".to_string()];
        let response = app(&origins)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/analyze")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://example.com"
        );
    }
}
