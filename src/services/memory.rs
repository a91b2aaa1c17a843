//! In-memory relationship store and user directory.
//!
//! Mirrors the PostgreSQL schema: self edges, duplicate likes and duplicate match
//! pairs are rejected, edges must reference known users, and deleting a user
//! cascades to every edge that references them.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::models::{LikeEdge, MatchEdge, UserPair, UserProfile, UserRef};
use crate::services::directory::{DirectoryError, UserDirectory};
use crate::services::store::{RelationshipStore, StoreError};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserRef, UserProfile>,
    likes: BTreeMap<(UserRef, UserRef), LikeEdge>,
    // Stored with `user` = low side of the pair
    matches: HashMap<UserPair, MatchEdge>,
    next_like_id: i64,
    next_match_id: i64,
}

impl Tables {
    fn ensure_users(&self, from: UserRef, to: UserRef) -> Result<(), StoreError> {
        match [from, to].into_iter().find(|u| !self.users.contains_key(u)) {
            Some(missing) => Err(StoreError::UnknownUser(missing)),
            None => Ok(()),
        }
    }

    fn purge_user(&mut self, user: UserRef) -> (u64, u64) {
        let matches_before = self.matches.len();
        self.matches.retain(|pair, _| !pair.contains(user));

        let likes_before = self.likes.len();
        self.likes
            .retain(|(from, to), _| *from != user && *to != user);

        (
            (likes_before - self.likes.len()) as u64,
            (matches_before - self.matches.len()) as u64,
        )
    }
}

/// Relationship store and user directory held in process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `users`
    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let tables = Tables {
            users: users.into_iter().map(|u| (u.user_id, u)).collect(),
            ..Tables::default()
        };

        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn like_count(&self) -> usize {
        self.tables.read().await.likes.len()
    }

    pub async fn match_count(&self) -> usize {
        self.tables.read().await.matches.len()
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn put_like(&self, from: UserRef, to: UserRef) -> Result<LikeEdge, StoreError> {
        if from == to {
            return Err(StoreError::SelfReference(from));
        }

        let mut tables = self.tables.write().await;
        tables.ensure_users(from, to)?;
        if tables.likes.contains_key(&(from, to)) {
            return Err(StoreError::DuplicateEdge(from, to));
        }

        tables.next_like_id += 1;
        let like = LikeEdge {
            id: tables.next_like_id,
            from_user: from,
            to_user: to,
            created_at: Utc::now(),
        };
        tables.likes.insert((from, to), like.clone());

        Ok(like)
    }

    async fn find_like(&self, from: UserRef, to: UserRef) -> Result<Option<LikeEdge>, StoreError> {
        Ok(self.tables.read().await.likes.get(&(from, to)).cloned())
    }

    async fn likes_from(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError> {
        let tables = self.tables.read().await;
        let mut likes: Vec<LikeEdge> = tables
            .likes
            .range((user, UserRef(i64::MIN))..=(user, UserRef(i64::MAX)))
            .map(|(_, like)| like.clone())
            .collect();
        likes.sort_by_key(|l| l.id);

        Ok(likes)
    }

    async fn likes_to(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError> {
        let tables = self.tables.read().await;
        let mut likes: Vec<LikeEdge> = tables
            .likes
            .values()
            .filter(|like| like.to_user == user)
            .cloned()
            .collect();
        likes.sort_by_key(|l| l.id);

        Ok(likes)
    }

    async fn delete_like(&self, from: UserRef, to: UserRef) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .likes
            .remove(&(from, to))
            .map(|_| ())
            .ok_or(StoreError::NotFound(from, to))
    }

    async fn delete_likes_involving(&self, user: UserRef) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|(from, to), _| *from != user && *to != user);

        Ok((before - tables.likes.len()) as u64)
    }

    async fn put_match(&self, a: UserRef, b: UserRef) -> Result<MatchEdge, StoreError> {
        let pair = UserPair::new(a, b).ok_or(StoreError::SelfReference(a))?;

        let mut tables = self.tables.write().await;
        tables.ensure_users(a, b)?;
        if tables.matches.contains_key(&pair) {
            return Err(StoreError::DuplicateEdge(a, b));
        }

        tables.next_match_id += 1;
        let edge = MatchEdge {
            id: tables.next_match_id,
            user: pair.low(),
            other: pair.high(),
            matched_at: Utc::now(),
        };
        tables.matches.insert(pair, edge.clone());

        Ok(edge.viewed_by(a))
    }

    async fn find_match(&self, a: UserRef, b: UserRef) -> Result<Option<MatchEdge>, StoreError> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(None);
        };

        Ok(self
            .tables
            .read()
            .await
            .matches
            .get(&pair)
            .cloned()
            .map(|m| m.viewed_by(a)))
    }

    async fn delete_match(&self, a: UserRef, b: UserRef) -> Result<bool, StoreError> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(false);
        };

        Ok(self.tables.write().await.matches.remove(&pair).is_some())
    }

    async fn matches_for(&self, user: UserRef) -> Result<Vec<MatchEdge>, StoreError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<MatchEdge> = tables
            .matches
            .iter()
            .filter(|(pair, _)| pair.contains(user))
            .map(|(_, edge)| edge.clone().viewed_by(user))
            .collect();
        matches.sort_by_key(|m| m.id);

        Ok(matches)
    }

    async fn delete_matches_involving(&self, user: UserRef) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.matches.len();
        tables.matches.retain(|pair, _| !pair.contains(user));

        Ok((before - tables.matches.len()) as u64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, user: UserRef) -> Result<UserProfile, DirectoryError> {
        self.tables
            .read()
            .await
            .users
            .get(&user)
            .cloned()
            .ok_or(DirectoryError::NotFound(user))
    }

    async fn delete_by_id(&self, user: UserRef) -> Result<(), DirectoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user).is_none() {
            return Err(DirectoryError::NotFound(user));
        }

        let (likes, matches) = tables.purge_user(user);
        if likes > 0 || matches > 0 {
            tracing::debug!(
                "Cascaded {} likes and {} matches for deleted user {}",
                likes,
                matches,
                user
            );
        }

        Ok(())
    }
}
