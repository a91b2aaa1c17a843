use async_trait::async_trait;
use thiserror::Error;

use crate::models::{UserProfile, UserRef};

/// Errors that can occur when resolving users
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Not found: no user with id {0}")]
    NotFound(UserRef),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Read access to user profiles, plus the account deletion hook
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, user: UserRef) -> Result<UserProfile, DirectoryError>;

    /// Remove the account itself; relationship edges must already be gone
    async fn delete_by_id(&self, user: UserRef) -> Result<(), DirectoryError>;
}
