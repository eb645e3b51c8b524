use crate::config::ApiConfig;
use crate::db::DatabaseService;
use crate::error::Error;
use crate::security::AuthService;
use crate::services::{AlertService, ObjectDetector};
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use log::info;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod alerts_controller;
pub mod detections_controller;
pub mod system_controller;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<DatabaseService>,
    pub alert_service: Arc<AlertService>,
    pub auth_service: Arc<AuthService>,
    pub detector: Arc<dyn ObjectDetector>,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Authentication(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::AlreadyExists(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::CONFLICT.as_u16(),
            },
            Error::Validation(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            },
            Error::Config(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            // Internal detail stays in the logs, not in the response
            Error::Database(_) => ApiError {
                message: "Internal storage error".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
            _ => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return (*err).clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState) -> Self {
        Self {
            config: config.clone(),
            state,
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Permissive CORS for the monitoring dashboard
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        let app = Router::new()
            .route("/", get(system_controller::root))
            .route("/health", get(system_controller::health))
            .route("/api/health", get(system_controller::health_alias))
            .route("/upload/", post(system_controller::upload_image))
            .route("/detections/", get(detections_controller::list_detections))
            .route(
                "/notifications/test",
                post(system_controller::test_notification),
            )
            .route("/alerts/", get(alerts_controller::list_alerts))
            .route("/alerts/trigger", post(alerts_controller::trigger_alert))
            .route(
                "/alerts/:alert_id/status",
                patch(alerts_controller::update_alert_status),
            )
            .with_state(self.state.clone())
            .layer(cors);

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}
