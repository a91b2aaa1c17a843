use serde::{Deserialize, Serialize};

use crate::models::UserRef;

/// Observed relationship state of an unordered user pair
///
/// `NoRelation`, `OneSidedLike` and `Matched` are the states a healthy pair moves
/// through. `PendingMatch` and `StaleMatch` only appear after a partial store failure
/// and are repaired by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PairState {
    NoRelation,
    OneSidedLike { from: UserRef, to: UserRef },
    Matched,
    /// Both likes exist but the match was never written
    PendingMatch,
    /// A match exists without both supporting likes
    StaleMatch,
}

/// Event applied to a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEvent {
    Like { from: UserRef, to: UserRef },
    Unlike { from: UserRef, to: UserRef },
}

impl PairState {
    /// Build the state of pair `(a, b)` from what the store holds
    pub fn observe(a: UserRef, b: UserRef, a_likes_b: bool, b_likes_a: bool, matched: bool) -> Self {
        match (a_likes_b, b_likes_a, matched) {
            (true, true, true) => PairState::Matched,
            (true, true, false) => PairState::PendingMatch,
            (_, _, true) => PairState::StaleMatch,
            (true, false, false) => PairState::OneSidedLike { from: a, to: b },
            (false, true, false) => PairState::OneSidedLike { from: b, to: a },
            (false, false, false) => PairState::NoRelation,
        }
    }

    pub fn is_consistent(&self) -> bool {
        !matches!(self, PairState::PendingMatch | PairState::StaleMatch)
    }

    /// Next state after `event`, or `None` when the event is not valid here
    ///
    /// Invalid events are a duplicate like, an unlike of an absent edge, a self edge,
    /// or any event on an inconsistent state.
    pub fn apply(self, event: PairEvent) -> Option<PairState> {
        match event {
            PairEvent::Like { from, to } if from != to => match self {
                PairState::NoRelation => Some(PairState::OneSidedLike { from, to }),
                PairState::OneSidedLike { from: f, to: t } if f == to && t == from => {
                    Some(PairState::Matched)
                }
                _ => None,
            },
            PairEvent::Unlike { from, to } if from != to => match self {
                PairState::OneSidedLike { from: f, to: t } if f == from && t == to => {
                    Some(PairState::NoRelation)
                }
                PairState::Matched => Some(PairState::OneSidedLike { from: to, to: from }),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: UserRef = UserRef(1);
    const B: UserRef = UserRef(2);

    #[test]
    fn test_full_lifecycle() {
        let state = PairState::NoRelation;
        let state = state.apply(PairEvent::Like { from: A, to: B }).unwrap();
        assert_eq!(state, PairState::OneSidedLike { from: A, to: B });

        let state = state.apply(PairEvent::Like { from: B, to: A }).unwrap();
        assert_eq!(state, PairState::Matched);

        // Only one side unlikes: regress to the surviving direction
        let state = state.apply(PairEvent::Unlike { from: A, to: B }).unwrap();
        assert_eq!(state, PairState::OneSidedLike { from: B, to: A });

        let state = state.apply(PairEvent::Unlike { from: B, to: A }).unwrap();
        assert_eq!(state, PairState::NoRelation);
    }

    #[test]
    fn test_invalid_events() {
        assert_eq!(PairState::NoRelation.apply(PairEvent::Unlike { from: A, to: B }), None);
        assert_eq!(PairState::NoRelation.apply(PairEvent::Like { from: A, to: A }), None);

        let one_sided = PairState::OneSidedLike { from: A, to: B };
        assert_eq!(one_sided.apply(PairEvent::Like { from: A, to: B }), None);
        assert_eq!(one_sided.apply(PairEvent::Unlike { from: B, to: A }), None);

        assert_eq!(PairState::Matched.apply(PairEvent::Like { from: B, to: A }), None);
        assert_eq!(PairState::PendingMatch.apply(PairEvent::Unlike { from: A, to: B }), None);
    }

    #[test]
    fn test_observe() {
        assert_eq!(PairState::observe(A, B, false, false, false), PairState::NoRelation);
        assert_eq!(
            PairState::observe(A, B, false, true, false),
            PairState::OneSidedLike { from: B, to: A }
        );
        assert_eq!(PairState::observe(A, B, true, true, true), PairState::Matched);
        assert_eq!(PairState::observe(A, B, true, true, false), PairState::PendingMatch);
        assert_eq!(PairState::observe(A, B, true, false, true), PairState::StaleMatch);
        assert!(!PairState::StaleMatch.is_consistent());
        assert!(PairState::Matched.is_consistent());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(PairState::OneSidedLike { from: A, to: B }).unwrap();
        assert_eq!(json["state"], "one_sided_like");
        assert_eq!(json["from"], 1);
        assert_eq!(json["to"], 2);
    }
}
