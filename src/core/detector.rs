use crate::models::UserRef;

/// Decision taken after a like edge was inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeCreated {
    pub create_match: bool,
}

/// Decision taken after a like edge was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeRemoved {
    pub remove_match: bool,
}

/// What must happen to a pair's match so that it mirrors the pair's likes again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Consistent,
    CreateMatch,
    RemoveMatch,
}

/// Mutual-interest detector
///
/// Pure decision logic: it never touches storage. A match exists exactly when both
/// directed likes of a pair exist, so the detector only needs to know whether the
/// reverse edge was already present when a like arrives.
///
/// # Rules
/// 1. The like that arrives second creates the match; the first one never does
/// 2. Removing either like of a pair removes its match
/// 3. Duplicate likes are rejected by the store and never reach the detector
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchDetector;

impl MatchDetector {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a freshly inserted `from -> to` like
    ///
    /// `reverse_edge_exists` must be read after the like itself became visible, so that
    /// two racing reciprocal likes cannot both miss each other.
    pub fn evaluate_on_like_created(
        &self,
        from: UserRef,
        to: UserRef,
        reverse_edge_exists: bool,
    ) -> LikeCreated {
        tracing::trace!(
            "Evaluating like {} -> {} (reverse present: {})",
            from,
            to,
            reverse_edge_exists
        );

        LikeCreated {
            create_match: from != to && reverse_edge_exists,
        }
    }

    /// Evaluate a removed `from -> to` like
    pub fn evaluate_on_like_removed(&self, from: UserRef, to: UserRef) -> LikeRemoved {
        tracing::trace!("Evaluating unlike {} -> {}", from, to);

        LikeRemoved { remove_match: true }
    }

    /// Compare a pair's likes with its match record
    pub fn evaluate_pair(&self, a_likes_b: bool, b_likes_a: bool, matched: bool) -> Reconciliation {
        match (a_likes_b && b_likes_a, matched) {
            (true, false) => Reconciliation::CreateMatch,
            (false, true) => Reconciliation::RemoveMatch,
            _ => Reconciliation::Consistent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_like_never_matches() {
        let detector = MatchDetector::new();
        let decision = detector.evaluate_on_like_created(UserRef(1), UserRef(2), false);
        assert!(!decision.create_match);
    }

    #[test]
    fn test_second_like_matches() {
        let detector = MatchDetector::new();
        let decision = detector.evaluate_on_like_created(UserRef(2), UserRef(1), true);
        assert!(decision.create_match);
    }

    #[test]
    fn test_self_edge_never_matches() {
        let detector = MatchDetector::new();
        let decision = detector.evaluate_on_like_created(UserRef(3), UserRef(3), true);
        assert!(!decision.create_match);
    }

    #[test]
    fn test_removal_always_retracts() {
        let detector = MatchDetector::new();
        assert!(detector.evaluate_on_like_removed(UserRef(1), UserRef(2)).remove_match);
        assert!(detector.evaluate_on_like_removed(UserRef(2), UserRef(1)).remove_match);
    }

    #[test]
    fn test_pair_reconciliation() {
        let detector = MatchDetector::new();
        assert_eq!(detector.evaluate_pair(true, true, true), Reconciliation::Consistent);
        assert_eq!(detector.evaluate_pair(true, false, false), Reconciliation::Consistent);
        assert_eq!(detector.evaluate_pair(false, false, false), Reconciliation::Consistent);
        assert_eq!(detector.evaluate_pair(true, true, false), Reconciliation::CreateMatch);
        assert_eq!(detector.evaluate_pair(false, true, true), Reconciliation::RemoveMatch);
        assert_eq!(detector.evaluate_pair(false, false, true), Reconciliation::RemoveMatch);
    }
}
