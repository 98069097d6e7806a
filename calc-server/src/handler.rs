//! HTTP routes for the arithmetic service.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rand::Rng;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use calc_core::number::format_number;
use calc_core::{evaluate, Operation, OperationRequest, OperationResponse, API_VERSION};

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Arithmetic HTTP server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("Calculator server listening on {}", self.config.bind_addr);

        axum::serve(listener, router(&self.config)).await?;
        Ok(())
    }
}

/// Build the service router: `POST /v1/<operation>` for every operation.
pub fn router(config: &ServerConfig) -> Router {
    let mut router = Router::new();
    for op in Operation::ALL {
        let path = format!("/{}/{}", API_VERSION, op.path());
        router = router.route(
            &path,
            post(move |body: Result<Json<OperationRequest>, JsonRejection>| calculate(op, body)),
        );
    }

    if config.artificial_delay_ms > 0 {
        tracing::info!("Artificial delay enabled: 0-{}ms", config.artificial_delay_ms);
        router = router.layer(middleware::from_fn_with_state(
            config.artificial_delay_ms,
            artificial_delay,
        ));
    }

    if config.allow_cors {
        tracing::info!("CORS headers enabled");
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    router.layer(middleware::from_fn(log_request))
}

/// Evaluate one operation request.
async fn calculate(
    op: Operation,
    body: Result<Json<OperationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return failure(rejection.body_text()),
    };

    let a = match parse_operand("a", &request.a) {
        Ok(a) => a,
        Err(msg) => return failure(msg),
    };
    let b = if op.arity() == 2 {
        let raw = match request.b.as_deref() {
            Some(raw) => raw,
            None => return failure("missing operand b"),
        };
        match parse_operand("b", raw) {
            Ok(b) => b,
            Err(msg) => return failure(msg),
        }
    } else {
        0.0
    };

    match evaluate(op, a, b) {
        Ok(result) => {
            tracing::debug!(%op, a, b, result, "Evaluated");
            (StatusCode::OK, Json(OperationResponse::success(format_number(result)))).into_response()
        }
        Err(e) => failure(e.to_string()),
    }
}

/// Operands must be finite decimal numbers.
fn parse_operand(name: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid operand {}: {:?}", name, raw))
}

fn failure(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(OperationResponse::failure(message)),
    )
        .into_response()
}

async fn artificial_delay(State(max_ms): State<u64>, request: Request, next: Next) -> Response {
    let ms = rand::thread_rng().gen_range(0..max_ms);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    next.run(request).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(router: Router, path: &str, body: &str) -> (StatusCode, Value) {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app() -> Router {
        router(&ServerConfig::default())
    }

    #[tokio::test]
    async fn add_string_operands() {
        let (status, body) = post_json(app(), "/v1/add", r#"{"a": "5", "b": "3"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "8"}));
    }

    #[tokio::test]
    async fn accepts_number_operands() {
        let (status, body) = post_json(app(), "/v1/multiply", r#"{"a": 1.5, "b": 4}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "6"}));
    }

    #[tokio::test]
    async fn sqrt_takes_one_operand() {
        let (status, body) = post_json(app(), "/v1/sqrt", r#"{"a": "2.25"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "1.5"}));
    }

    #[tokio::test]
    async fn division_by_zero() {
        let (status, body) = post_json(app(), "/v1/divide", r#"{"a": "5", "b": "0"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "division by zero"}));
    }

    #[tokio::test]
    async fn negative_percentage() {
        let (status, body) = post_json(app(), "/v1/percentage", r#"{"a": "-5", "b": "10"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "negative percentage");
    }

    #[tokio::test]
    async fn missing_second_operand() {
        let (status, body) = post_json(app(), "/v1/power", r#"{"a": "2"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing operand b");
    }

    #[tokio::test]
    async fn non_numeric_operand() {
        let (status, body) = post_json(app(), "/v1/subtract", r#"{"a": "abc", "b": "1"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid operand a"));
    }

    #[tokio::test]
    async fn malformed_body() {
        let (status, body) = post_json(app(), "/v1/add", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_operation_is_not_found() {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/v1/modulo")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight() {
        let app = router(&ServerConfig::default().with_cors(true));
        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/add")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn artificial_delay_still_answers() {
        let app = router(&ServerConfig::default().with_artificial_delay(50));
        let (status, body) = post_json(app, "/v1/add", r#"{"a": "1", "b": "2"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "3"}));
    }
}
