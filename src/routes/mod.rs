// Route exports
pub mod likes;
pub mod users;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse, Responder, ResponseError};
use std::future::{ready, Ready};
use std::sync::Arc;

use crate::models::{ErrorResponse, HealthResponse, UserRef};
use crate::services::{CurrentUserProvider, RelationshipError, RelationshipService, UserDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub relationships: Arc<RelationshipService>,
    pub directory: Arc<dyn UserDirectory>,
    pub users: Arc<dyn CurrentUserProvider>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(likes::configure)
            .configure(users::configure),
    );
}

/// Authenticated user of the current request
pub struct CurrentUser(pub UserRef);

impl FromRequest for CurrentUser {
    type Error = RelationshipError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.users.resolve(req).map(CurrentUser),
            None => {
                tracing::error!("AppState missing while resolving current user");
                Err(RelationshipError::Unauthenticated)
            }
        };

        ready(resolved)
    }
}

fn error_code(err: &RelationshipError) -> &'static str {
    match err {
        RelationshipError::SelfLike => "self_like",
        RelationshipError::DuplicateLike(_) => "duplicate_like",
        RelationshipError::LikeNotFound(_) => "like_not_found",
        RelationshipError::UserNotFound(_) => "user_not_found",
        RelationshipError::Unauthenticated => "unauthenticated",
        RelationshipError::StoreUnavailable(_) => "store_unavailable",
        RelationshipError::DirectoryUnavailable(_) => "directory_unavailable",
    }
}

impl ResponseError for RelationshipError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelationshipError::SelfLike => StatusCode::UNPROCESSABLE_ENTITY,
            RelationshipError::DuplicateLike(_) => StatusCode::CONFLICT,
            RelationshipError::LikeNotFound(_) | RelationshipError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            RelationshipError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RelationshipError::StoreUnavailable(_) | RelationshipError::DirectoryUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code(self).to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.error.clone(),
            message: self.message.clone(),
            status_code: self.status_code,
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.relationships.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
