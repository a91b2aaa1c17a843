use async_trait::async_trait;
use thiserror::Error;

use crate::models::{LikeEdge, MatchEdge, UserRef};

/// Errors that can occur when reading or writing relationship edges
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Self reference: user {0} cannot relate to themselves")]
    SelfReference(UserRef),

    #[error("Duplicate edge: {0} -> {1} already exists")]
    DuplicateEdge(UserRef, UserRef),

    #[error("Not found: no edge {0} -> {1}")]
    NotFound(UserRef, UserRef),

    /// The edge references a user that does not exist
    #[error("Unknown user {0}")]
    UnknownUser(UserRef),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Durable storage for like and match edges
///
/// Implementations enforce the relational constraints themselves: no self edges, one
/// like per ordered pair, one match per unordered pair. Callers rely on those
/// constraints instead of checking before writing, so a racing duplicate surfaces as
/// [`StoreError::DuplicateEdge`].
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Insert a `from -> to` like
    async fn put_like(&self, from: UserRef, to: UserRef) -> Result<LikeEdge, StoreError>;

    async fn find_like(&self, from: UserRef, to: UserRef) -> Result<Option<LikeEdge>, StoreError>;

    /// Likes given by `user`, oldest first
    async fn likes_from(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError>;

    /// Likes received by `user`, oldest first
    async fn likes_to(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError>;

    /// Remove a `from -> to` like, failing with [`StoreError::NotFound`] when absent
    async fn delete_like(&self, from: UserRef, to: UserRef) -> Result<(), StoreError>;

    /// Remove every like given or received by `user`
    async fn delete_likes_involving(&self, user: UserRef) -> Result<u64, StoreError>;

    /// Insert the match of pair `(a, b)`, reported from `a`'s view
    async fn put_match(&self, a: UserRef, b: UserRef) -> Result<MatchEdge, StoreError>;

    async fn find_match(&self, a: UserRef, b: UserRef) -> Result<Option<MatchEdge>, StoreError>;

    /// Remove the match of pair `(a, b)`; returns whether one existed
    async fn delete_match(&self, a: UserRef, b: UserRef) -> Result<bool, StoreError>;

    /// Matches involving `user`, each oriented so that `other` is the partner
    async fn matches_for(&self, user: UserRef) -> Result<Vec<MatchEdge>, StoreError>;

    async fn delete_matches_involving(&self, user: UserRef) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
