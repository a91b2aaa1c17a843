// Core algorithm exports
pub mod detector;
pub mod state;

pub use detector::{LikeCreated, LikeRemoved, MatchDetector, Reconciliation};
pub use state::{PairEvent, PairState};
