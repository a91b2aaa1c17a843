use serde::{Deserialize, Serialize};

use crate::core::PairState;
use crate::models::domain::{LikeEdge, UserRef};

/// Body returned for a created like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(flatten)]
    pub like: LikeEdge,
    pub matched: bool,
}

/// Body returned for a removed like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlikeResponse {
    pub liked_user: UserRef,
    pub match_removed: bool,
}

/// Observed relationship between the current user and another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationResponse {
    pub user_id: UserRef,
    pub other_user: UserRef,
    #[serde(flatten)]
    pub state: PairState,
}

/// Body returned after an account's relationships were removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub user_id: UserRef,
    pub likes_removed: u64,
    pub matches_removed: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
