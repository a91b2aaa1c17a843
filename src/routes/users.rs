use actix_web::{web, HttpResponse};

use crate::models::{DeleteUserResponse, RelationResponse, UserProfile, UserRef};
use crate::routes::{AppState, CurrentUser};
use crate::services::{DirectoryError, RelationshipError};

/// Configure user relationship routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/liked", web::get().to(liked_users))
        .route("/users/liked_by", web::get().to(liked_by_users))
        .route("/users/matches", web::get().to(matched_users))
        .route("/users/current", web::delete().to(delete_current_user))
        .route("/users/{id}/relation", web::get().to(relation));
}

/// Resolve ids to profiles, skipping users deleted since the edges were read
async fn resolve_profiles(
    state: &AppState,
    ids: Vec<UserRef>,
) -> Result<Vec<UserProfile>, RelationshipError> {
    let mut profiles = Vec::with_capacity(ids.len());

    for id in ids {
        match state.directory.find_by_id(id).await {
            Ok(profile) => profiles.push(profile),
            Err(DirectoryError::NotFound(_)) => {
                tracing::warn!("Skipping user {} missing from directory", id);
            }
            Err(e) => return Err(RelationshipError::DirectoryUnavailable(e)),
        }
    }

    Ok(profiles)
}

/// GET /api/v1/users/liked
async fn liked_users(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, RelationshipError> {
    let ids = state.relationships.list_liked(user.0).await?;
    let profiles = resolve_profiles(&state, ids).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /api/v1/users/liked_by
async fn liked_by_users(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, RelationshipError> {
    let ids = state.relationships.list_liked_by(user.0).await?;
    let profiles = resolve_profiles(&state, ids).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /api/v1/users/matches
async fn matched_users(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, RelationshipError> {
    let ids = state.relationships.list_matches(user.0).await?;
    let profiles = resolve_profiles(&state, ids).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /api/v1/users/{id}/relation
async fn relation(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, RelationshipError> {
    let other = UserRef(path.into_inner());
    let pair_state = state.relationships.relation(user.0, other).await?;

    Ok(HttpResponse::Ok().json(RelationResponse {
        user_id: user.0,
        other_user: other,
        state: pair_state,
    }))
}

/// Delete the current account
///
/// DELETE /api/v1/users/current
///
/// Relationship edges are removed before the account row.
async fn delete_current_user(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, RelationshipError> {
    let removed = state.relationships.delete_user(user.0).await?;

    match state.directory.delete_by_id(user.0).await {
        Ok(()) => {}
        Err(DirectoryError::NotFound(id)) => {
            tracing::warn!("User {} was already gone from the directory", id);
        }
        Err(e) => return Err(RelationshipError::DirectoryUnavailable(e)),
    }

    Ok(HttpResponse::Ok().json(DeleteUserResponse {
        user_id: user.0,
        likes_removed: removed.likes,
        matches_removed: removed.matches,
    }))
}
