//! Scotch API - like and match relationship service for the Scotch dating app
//!
//! This library holds the mutual-interest engine: users like each other, and a match
//! is materialized exactly when both directed likes exist.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchDetector, PairEvent, PairState, Reconciliation};
pub use crate::models::{LikeEdge, MatchEdge, UserPair, UserProfile, UserRef};
pub use crate::services::{
    MemoryStore, PostgresClient, RelationshipError, RelationshipService, RelationshipStore,
    StoreError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let detector = MatchDetector::new();
        assert!(detector.evaluate_on_like_created(UserRef(1), UserRef(2), true).create_match);
    }
}
