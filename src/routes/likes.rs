use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ErrorResponse, LikeRequest, LikeResponse, UnlikeResponse};
use crate::routes::{AppState, CurrentUser};
use crate::services::RelationshipError;

/// Configure like routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/likes")
            .route(web::post().to(create_like))
            .route(web::delete().to(delete_like)),
    );
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Like a user
///
/// POST /api/v1/likes
///
/// Request body:
/// ```json
/// { "liked_user": 42 }
/// ```
///
/// Responds `201` with the created like and whether it completed a match.
async fn create_like(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<LikeRequest>,
) -> Result<HttpResponse, RelationshipError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for like request: {:?}", errors);
        return Ok(validation_failed(errors));
    }

    let outcome = state.relationships.like(user.0, req.target()).await?;

    Ok(HttpResponse::Created().json(LikeResponse {
        like: outcome.like,
        matched: outcome.matched,
    }))
}

/// Remove a like
///
/// DELETE /api/v1/likes
///
/// Request body:
/// ```json
/// { "liked_user": 42 }
/// ```
async fn delete_like(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<LikeRequest>,
) -> Result<HttpResponse, RelationshipError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let outcome = state.relationships.unlike(user.0, req.target()).await?;

    Ok(HttpResponse::Ok().json(UnlikeResponse {
        liked_user: req.target(),
        match_removed: outcome.match_removed,
    }))
}
