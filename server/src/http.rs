use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use products_hr::{EmployeeStore, HrError};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::employees;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EmployeeStore>,
}

impl AppState {
    pub fn new(store: Arc<EmployeeStore>) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    info!("employee server stopped");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/employees", get(employees::list_employees))
        .route("/employee", post(employees::create_employee))
        .route(
            "/employee/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

pub(crate) type HttpResult<T> = Result<T, HttpError>;

/// Plain-text error response.
#[derive(Debug)]
pub(crate) struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub(crate) fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    pub(crate) fn internal(err: anyhow::Error) -> Self {
        error!(error = %err, "internal error while handling request");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        let status = if err.is_malformed() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        };
        debug!(%status, reason = ?err, "request rejected");
        Self::new(status, &err.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl+c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn domain_errors_map_to_status_and_message() {
        let cases = [
            (HrError::InvalidId("x".into()), StatusCode::BAD_REQUEST, "Invalid employee ID"),
            (HrError::NotFound(3), StatusCode::NOT_FOUND, "Employee not found"),
        ];
        for (err, status, message) in cases {
            let response = HttpError::from(err).into_response();
            assert_eq!(response.status(), status);
            let content_type = response.headers()[header::CONTENT_TYPE].clone();
            assert!(content_type.to_str().unwrap().starts_with("text/plain"));
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&body[..], message.as_bytes());
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = HttpError::internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"internal server error");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = build_router(AppState::new(Arc::new(EmployeeStore::new())));
        let response = app
            .oneshot(
                Request::get("/employees")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-123");

        let app = build_router(AppState::new(Arc::new(EmployeeStore::new())));
        let response = app
            .oneshot(Request::get("/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_routes_and_methods_use_router_defaults() {
        let app = build_router(AppState::new(Arc::new(EmployeeStore::new())));
        let response = app
            .clone()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::post("/employee/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn serve_config_joins_host_and_port() {
        let config = ServeConfig::new("127.0.0.1".parse().unwrap(), 8080);
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }
}
