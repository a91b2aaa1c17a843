use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier
///
/// The relationship engine never looks inside a user; profile data is owned by the
/// user directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserRef(pub i64);

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered pair of distinct users in canonical `(low, high)` order
///
/// Matches are keyed by this ordering so that `(a, b)` and `(b, a)` land on the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPair {
    low: UserRef,
    high: UserRef,
}

impl UserPair {
    /// Returns `None` when both sides are the same user
    pub fn new(a: UserRef, b: UserRef) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> UserRef {
        self.low
    }

    pub fn high(&self) -> UserRef {
        self.high
    }

    pub fn contains(&self, user: UserRef) -> bool {
        self.low == user || self.high == user
    }
}

/// Directed record of one user's interest in another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeEdge {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub from_user: UserRef,
    #[serde(rename = "liked_user")]
    pub to_user: UserRef,
    pub created_at: DateTime<Utc>,
}

/// Undirected record of mutual interest, reported from one participant's view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEdge {
    pub id: i64,
    #[serde(rename = "user_1")]
    pub user: UserRef,
    #[serde(rename = "user_2")]
    pub other: UserRef,
    pub matched_at: DateTime<Utc>,
}

impl MatchEdge {
    /// Re-orient the edge so that `viewer` is on the `user` side
    pub fn viewed_by(self, viewer: UserRef) -> Self {
        if self.other == viewer {
            Self {
                user: self.other,
                other: self.user,
                ..self
            }
        } else {
            self
        }
    }
}

/// Public profile summary resolved through the user directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "id")]
    pub user_id: UserRef,
    pub login: String,
    pub name: String,
    pub age: i16,
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub about: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_order_independent() {
        let ab = UserPair::new(UserRef(7), UserRef(3)).unwrap();
        let ba = UserPair::new(UserRef(3), UserRef(7)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), UserRef(3));
        assert_eq!(ab.high(), UserRef(7));
    }

    #[test]
    fn test_pair_rejects_self() {
        assert!(UserPair::new(UserRef(4), UserRef(4)).is_none());
    }

    #[test]
    fn test_match_edge_viewed_by_other_side() {
        let edge = MatchEdge {
            id: 1,
            user: UserRef(1),
            other: UserRef(2),
            matched_at: Utc::now(),
        };

        let flipped = edge.clone().viewed_by(UserRef(2));
        assert_eq!(flipped.user, UserRef(2));
        assert_eq!(flipped.other, UserRef(1));

        let same = edge.clone().viewed_by(UserRef(1));
        assert_eq!(same, edge);
    }

    #[test]
    fn test_like_edge_wire_names() {
        let like = LikeEdge {
            id: 5,
            from_user: UserRef(1),
            to_user: UserRef(2),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&like).unwrap();
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["liked_user"], 2);
    }
}
