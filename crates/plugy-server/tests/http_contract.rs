use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use plugy_config::{AllowList, CorsConfig, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn default_app() -> Router {
    plugy_server::app(&ServerConfig::default()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_origin(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

fn preflight(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-plugy-client")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = default_app();
    let response = send(&app, get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_TYPE),
        Some("application/json")
    );
    assert_eq!(
        json_body(response).await,
        json!({"message": "Welcome to Plugy Agent API"})
    );
}

#[tokio::test]
async fn health_returns_healthy() {
    let app = default_app();
    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "healthy"}));
}

#[tokio::test]
async fn health_is_stateless_across_repeated_calls() {
    let app = default_app();
    for _ in 0..1000 {
        let response = send(&app, get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "healthy"}));
    }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = default_app();
    let response = send(&app, get("/nonexistent")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_ne!(response.status(), StatusCode::OK);
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn any_origin_is_accepted_with_credentials() {
    let app = default_app();
    for origin in ["https://example.com", "http://localhost:5173", "null"] {
        for uri in ["/", "/health"] {
            for _ in 0..3 {
                let response = send(&app, get_with_origin(uri, origin)).await;
                assert_eq!(response.status(), StatusCode::OK);
                assert_eq!(
                    header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
                    Some(origin)
                );
                assert_eq!(
                    header_str(&response, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
                    Some("true")
                );
            }
        }
    }
}

#[tokio::test]
async fn cors_headers_apply_to_unknown_routes() {
    let app = default_app();
    let response = send(&app, get_with_origin("/nonexistent", "https://example.com")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://example.com")
    );
}

#[tokio::test]
async fn preflight_permits_any_origin() {
    let app = default_app();
    let response = send(&app, preflight("/", "https://example.com")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://example.com")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some("true")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_METHODS),
        Some("GET")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_HEADERS),
        Some("x-plugy-client")
    );
    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_MAX_AGE),
        Some("600")
    );
}

#[tokio::test]
async fn wildcard_without_credentials_sends_star() {
    let config = ServerConfig {
        cors: CorsConfig {
            allow_credentials: false,
            ..CorsConfig::default()
        },
        ..ServerConfig::default()
    };
    let app = plugy_server::app(&config).unwrap();
    let response = send(&app, get_with_origin("/health", "https://example.com")).await;

    assert_eq!(
        header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("*")
    );
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());
}

#[tokio::test]
async fn restricted_origins_are_enforced() {
    let config = ServerConfig {
        cors: CorsConfig {
            allow_origins: AllowList::List(vec!["https://app.plugy.dev".into()]),
            allow_credentials: true,
            allow_methods: AllowList::List(vec!["GET".into()]),
            allow_headers: AllowList::List(vec!["content-type".into()]),
        },
        ..ServerConfig::default()
    };
    let app = plugy_server::app(&config).unwrap();

    let allowed = send(&app, get_with_origin("/", "https://app.plugy.dev")).await;
    assert_eq!(
        header_str(&allowed, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://app.plugy.dev")
    );

    let denied = send(&app, get_with_origin("/", "https://evil.example")).await;
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
    // The handler still runs; enforcement is the browser's job.
    assert_eq!(denied.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_exposes_metadata() {
    let app = default_app();
    let response = send(&app, get("/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert_eq!(
        doc["info"],
        json!({
            "title": "Plugy Agent API",
            "description": "Backend API for Plugy Agent",
            "version": "0.1.0",
        })
    );
    assert!(doc["paths"]["/"].is_object());
    assert!(doc["paths"]["/health"].is_object());
}
