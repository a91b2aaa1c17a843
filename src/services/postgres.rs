use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::models::{LikeEdge, MatchEdge, UserPair, UserProfile, UserRef};
use crate::services::directory::{DirectoryError, UserDirectory};
use crate::services::store::{RelationshipStore, StoreError};

const LIKE_COLUMNS: &str = "like_id, user_id, liked_user, created_at";
const MATCH_COLUMNS: &str = "match_id, user_1, user_2, matched_at";

/// PostgreSQL client for likes, matches and user lookups
///
/// Relational invariants live in the schema: `likes_unique_pair` and `likes_not_self`
/// guard likes, `matches_unique_pair` guards the unordered match pair. Constraint
/// violations are translated into [`StoreError`] variants.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        let client = Self { pool };
        client.migrate().await?;

        Ok(client)
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool without running migrations
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Foreign keys on the first column of an edge (`likes.user_id`, `matches.user_1`)
const SOURCE_USER_FKEYS: [&str; 2] = ["likes_user_id_fkey", "matches_user_1_fkey"];

/// Map a failed edge write onto the constraint it violated
///
/// `from` and `to` must be bound in column order so that a foreign key failure
/// names the user that is actually missing.
fn classify(err: sqlx::Error, from: UserRef, to: UserRef) -> StoreError {
    let violation = err
        .as_database_error()
        .map(|db| (db.kind(), db.constraint().map(str::to_owned)));

    match violation {
        Some((ErrorKind::UniqueViolation, _)) => StoreError::DuplicateEdge(from, to),
        Some((ErrorKind::CheckViolation, _)) => StoreError::SelfReference(from),
        Some((ErrorKind::ForeignKeyViolation, constraint)) => {
            match constraint.as_deref() {
                Some(name) if SOURCE_USER_FKEYS.contains(&name) => StoreError::UnknownUser(from),
                _ => StoreError::UnknownUser(to),
            }
        }
        _ => StoreError::Database(err),
    }
}

fn like_from_row(row: &PgRow) -> Result<LikeEdge, sqlx::Error> {
    Ok(LikeEdge {
        id: row.try_get("like_id")?,
        from_user: row.try_get("user_id")?,
        to_user: row.try_get("liked_user")?,
        created_at: row.try_get("created_at")?,
    })
}

fn match_from_row(row: &PgRow) -> Result<MatchEdge, sqlx::Error> {
    Ok(MatchEdge {
        id: row.try_get("match_id")?,
        user: row.try_get("user_1")?,
        other: row.try_get("user_2")?,
        matched_at: row.try_get("matched_at")?,
    })
}

#[async_trait]
impl RelationshipStore for PostgresClient {
    async fn put_like(&self, from: UserRef, to: UserRef) -> Result<LikeEdge, StoreError> {
        let query = format!(
            "INSERT INTO likes (user_id, liked_user) VALUES ($1, $2) RETURNING {}",
            LIKE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, from, to))?;

        let like = like_from_row(&row)?;
        tracing::debug!("Stored like {}: {} -> {}", like.id, from, to);

        Ok(like)
    }

    async fn find_like(&self, from: UserRef, to: UserRef) -> Result<Option<LikeEdge>, StoreError> {
        let query = format!(
            "SELECT {} FROM likes WHERE user_id = $1 AND liked_user = $2",
            LIKE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(like_from_row).transpose()?)
    }

    async fn likes_from(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError> {
        let query = format!(
            "SELECT {} FROM likes WHERE user_id = $1 ORDER BY like_id",
            LIKE_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;

        let likes: Result<Vec<LikeEdge>, _> = rows.iter().map(like_from_row).collect();
        Ok(likes?)
    }

    async fn likes_to(&self, user: UserRef) -> Result<Vec<LikeEdge>, StoreError> {
        let query = format!(
            "SELECT {} FROM likes WHERE liked_user = $1 ORDER BY like_id",
            LIKE_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;

        let likes: Result<Vec<LikeEdge>, _> = rows.iter().map(like_from_row).collect();
        Ok(likes?)
    }

    async fn delete_like(&self, from: UserRef, to: UserRef) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND liked_user = $2")
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(from, to));
        }

        Ok(())
    }

    async fn delete_likes_involving(&self, user: UserRef) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 OR liked_user = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleared {} likes involving user {}", result.rows_affected(), user);

        Ok(result.rows_affected())
    }

    async fn put_match(&self, a: UserRef, b: UserRef) -> Result<MatchEdge, StoreError> {
        let pair = UserPair::new(a, b).ok_or(StoreError::SelfReference(a))?;
        let query = format!(
            "INSERT INTO matches (user_1, user_2) VALUES ($1, $2) RETURNING {}",
            MATCH_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, pair.low(), pair.high()))?;

        Ok(match_from_row(&row)?.viewed_by(a))
    }

    async fn find_match(&self, a: UserRef, b: UserRef) -> Result<Option<MatchEdge>, StoreError> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(None);
        };
        let query = format!(
            "SELECT {} FROM matches WHERE user_1 = $1 AND user_2 = $2",
            MATCH_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .as_ref()
            .map(match_from_row)
            .transpose()?
            .map(|m| m.viewed_by(a)))
    }

    async fn delete_match(&self, a: UserRef, b: UserRef) -> Result<bool, StoreError> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM matches WHERE user_1 = $1 AND user_2 = $2")
            .bind(pair.low())
            .bind(pair.high())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn matches_for(&self, user: UserRef) -> Result<Vec<MatchEdge>, StoreError> {
        let query = format!(
            "SELECT {} FROM matches WHERE user_1 = $1 OR user_2 = $1 ORDER BY match_id",
            MATCH_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user).fetch_all(&self.pool).await?;

        let matches: Result<Vec<MatchEdge>, _> = rows
            .iter()
            .map(|row| match_from_row(row).map(|m| m.viewed_by(user)))
            .collect();

        Ok(matches?)
    }

    async fn delete_matches_involving(&self, user: UserRef) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM matches WHERE user_1 = $1 OR user_2 = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleared {} matches involving user {}", result.rows_affected(), user);

        Ok(result.rows_affected())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl UserDirectory for PostgresClient {
    async fn find_by_id(&self, user: UserRef) -> Result<UserProfile, DirectoryError> {
        let row = sqlx::query(
            "SELECT user_id, login, name, age, gender, city, about FROM users WHERE user_id = $1",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DirectoryError::NotFound(user))?;

        Ok(UserProfile {
            user_id: row.try_get("user_id")?,
            login: row.try_get("login")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            city: row.try_get("city")?,
            about: row.try_get("about")?,
        })
    }

    async fn delete_by_id(&self, user: UserRef) -> Result<(), DirectoryError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(user));
        }

        tracing::info!("Deleted user {}", user);
        Ok(())
    }
}
