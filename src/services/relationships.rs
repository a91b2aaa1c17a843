use std::sync::Arc;
use thiserror::Error;

use crate::core::{MatchDetector, PairState, Reconciliation};
use crate::models::{LikeEdge, UserRef};
use crate::services::directory::DirectoryError;
use crate::services::store::{RelationshipStore, StoreError};

/// Errors surfaced by relationship operations
#[derive(Debug, Error)]
pub enum RelationshipError {
    #[error("user cannot like themselves")]
    SelfLike,

    #[error("user {0} is already liked")]
    DuplicateLike(UserRef),

    #[error("no like for user {0}")]
    LikeNotFound(UserRef),

    #[error("no user with id {0}")]
    UserNotFound(UserRef),

    #[error("you are not authenticated")]
    Unauthenticated,

    #[error("relationship store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("user directory unavailable: {0}")]
    DirectoryUnavailable(#[source] DirectoryError),
}

/// Result of a successful like
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub like: LikeEdge,
    /// Whether the pair is matched after this like
    pub matched: bool,
}

/// Result of a successful unlike
#[derive(Debug, Clone, Copy)]
pub struct UnlikeOutcome {
    pub match_removed: bool,
}

/// Edges removed while deleting an account
#[derive(Debug, Clone, Copy, Default)]
pub struct DeletedRelations {
    pub matches: u64,
    pub likes: u64,
}

/// Orchestrates the relationship store and the match detector
///
/// Every operation is a short sequence of store calls without application-level
/// locking. Exactly-once match creation comes from the store's uniqueness constraint
/// on the unordered pair: a racing duplicate insert is treated as "already matched".
#[derive(Clone)]
pub struct RelationshipService {
    store: Arc<dyn RelationshipStore>,
    detector: MatchDetector,
}

impl RelationshipService {
    pub fn new(store: Arc<dyn RelationshipStore>) -> Self {
        Self {
            store,
            detector: MatchDetector::new(),
        }
    }

    /// Record that `requester` likes `target`, creating the match on reciprocity
    ///
    /// The like is committed before the reverse edge is read. If the match write then
    /// fails the like is kept and the error is returned; the pair stays pending until
    /// [`reconcile`](Self::reconcile) or the next unlike/relike repairs it.
    pub async fn like(&self, requester: UserRef, target: UserRef) -> Result<LikeOutcome, RelationshipError> {
        if requester == target {
            return Err(RelationshipError::SelfLike);
        }

        let like = self
            .store
            .put_like(requester, target)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEdge(..) => RelationshipError::DuplicateLike(target),
                StoreError::SelfReference(_) => RelationshipError::SelfLike,
                StoreError::UnknownUser(missing) => RelationshipError::UserNotFound(missing),
                other => RelationshipError::StoreUnavailable(other),
            })?;

        let reverse_edge_exists = self.store.find_like(target, requester).await?.is_some();
        let decision = self
            .detector
            .evaluate_on_like_created(requester, target, reverse_edge_exists);

        let matched = if decision.create_match {
            self.create_match(requester, target).await?;
            true
        } else {
            false
        };

        tracing::debug!(
            "User {} liked {} (like {}, matched: {})",
            requester,
            target,
            like.id,
            matched
        );

        Ok(LikeOutcome { like, matched })
    }

    /// Retract `requester`'s like of `target` and any match the pair had
    pub async fn unlike(&self, requester: UserRef, target: UserRef) -> Result<UnlikeOutcome, RelationshipError> {
        self.store
            .delete_like(requester, target)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(..) => RelationshipError::LikeNotFound(target),
                other => RelationshipError::StoreUnavailable(other),
            })?;

        let decision = self.detector.evaluate_on_like_removed(requester, target);
        let match_removed = if decision.remove_match {
            self.remove_match(requester, target).await?
        } else {
            false
        };

        Ok(UnlikeOutcome { match_removed })
    }

    /// Users that `user` likes
    pub async fn list_liked(&self, user: UserRef) -> Result<Vec<UserRef>, RelationshipError> {
        let likes = self.store.likes_from(user).await?;
        Ok(likes.into_iter().map(|l| l.to_user).collect())
    }

    /// Users that like `user`
    pub async fn list_liked_by(&self, user: UserRef) -> Result<Vec<UserRef>, RelationshipError> {
        let likes = self.store.likes_to(user).await?;
        Ok(likes.into_iter().map(|l| l.from_user).collect())
    }

    /// Users that `user` is matched with
    pub async fn list_matches(&self, user: UserRef) -> Result<Vec<UserRef>, RelationshipError> {
        let matches = self.store.matches_for(user).await?;
        Ok(matches.into_iter().map(|m| m.other).collect())
    }

    /// Remove every edge referencing `user`
    ///
    /// Matches go first so that no match is ever left pointing at a removed like.
    pub async fn delete_user(&self, user: UserRef) -> Result<DeletedRelations, RelationshipError> {
        let matches = self.store.delete_matches_involving(user).await?;
        let likes = self.store.delete_likes_involving(user).await?;

        tracing::info!(
            "Removed relationships of user {}: {} matches, {} likes",
            user,
            matches,
            likes
        );

        Ok(DeletedRelations { matches, likes })
    }

    /// Current state of the pair `(user, other)`
    pub async fn relation(&self, user: UserRef, other: UserRef) -> Result<PairState, RelationshipError> {
        let (a_likes_b, b_likes_a, matched) = self.observe(user, other).await?;
        Ok(PairState::observe(user, other, a_likes_b, b_likes_a, matched))
    }

    /// Bring the pair's match back in line with its likes
    pub async fn reconcile(&self, user: UserRef, other: UserRef) -> Result<Reconciliation, RelationshipError> {
        let (a_likes_b, b_likes_a, matched) = self.observe(user, other).await?;
        let action = self.detector.evaluate_pair(a_likes_b, b_likes_a, matched);

        match action {
            Reconciliation::CreateMatch => self.create_match(user, other).await?,
            Reconciliation::RemoveMatch => {
                self.remove_match(user, other).await?;
            }
            Reconciliation::Consistent => {}
        }

        if action != Reconciliation::Consistent {
            tracing::warn!("Repaired pair {} / {}: {:?}", user, other, action);
        }

        Ok(action)
    }

    pub async fn health_check(&self) -> Result<bool, RelationshipError> {
        Ok(self.store.health_check().await?)
    }

    async fn observe(&self, user: UserRef, other: UserRef) -> Result<(bool, bool, bool), RelationshipError> {
        if user == other {
            return Err(RelationshipError::SelfLike);
        }

        let a_likes_b = self.store.find_like(user, other).await?.is_some();
        let b_likes_a = self.store.find_like(other, user).await?.is_some();
        let matched = self.store.find_match(user, other).await?.is_some();

        Ok((a_likes_b, b_likes_a, matched))
    }

    async fn create_match(&self, a: UserRef, b: UserRef) -> Result<(), RelationshipError> {
        match self.store.put_match(a, b).await {
            Ok(edge) => {
                tracing::info!("Match {} created between {} and {}", edge.id, a, b);
                Ok(())
            }
            Err(StoreError::DuplicateEdge(..)) => {
                tracing::debug!("Match between {} and {} already exists", a, b);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to create match between {} and {}: {}", a, b, e);
                Err(e.into())
            }
        }
    }

    async fn remove_match(&self, a: UserRef, b: UserRef) -> Result<bool, RelationshipError> {
        let removed = self.store.delete_match(a, b).await?;

        if removed {
            tracing::info!("Match between {} and {} removed", a, b);
        } else {
            tracing::debug!("No match between {} and {} to remove", a, b);
        }

        Ok(removed)
    }
}
