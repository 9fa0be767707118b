// src/pipeline/join.rs

//! Combining the posts and rankings reads of one refresh cycle.

use crate::models::{Collection, JoinStrategy, Post, RankingEntry};
use crate::services::Loaded;

/// What a refresh cycle may apply to the feed state.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// Both collections produced data
    Complete {
        posts: Vec<Post>,
        rankings: Vec<RankingEntry>,
    },
    /// Only some collections produced data; the rest keep their old values.
    /// `Independent` only.
    Partial {
        posts: Option<Vec<Post>>,
        rankings: Option<Vec<RankingEntry>>,
        missing: Vec<Collection>,
    },
    /// Nothing is applied. `Independent` only.
    Failed { missing: Vec<Collection> },
}

/// Combine both reads according to `strategy`.
///
/// Reads never reject, so `AllOrNothing` always applies both collections; an
/// unavailable read counts as an empty one.
pub fn join(
    strategy: JoinStrategy,
    posts: Loaded<Post>,
    rankings: Loaded<RankingEntry>,
) -> JoinOutcome {
    if strategy == JoinStrategy::AllOrNothing {
        return JoinOutcome::Complete {
            posts: posts.items,
            rankings: rankings.items,
        };
    }

    let mut missing = Vec::new();
    if !posts.is_available() {
        missing.push(Collection::Posts);
    }
    if !rankings.is_available() {
        missing.push(Collection::Rankings);
    }

    if missing.is_empty() {
        return JoinOutcome::Complete {
            posts: posts.items,
            rankings: rankings.items,
        };
    }

    if missing.len() == 2 {
        return JoinOutcome::Failed { missing };
    }
    JoinOutcome::Partial {
        posts: posts.is_available().then_some(posts.items),
        rankings: rankings.is_available().then_some(rankings.items),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostId;
    use crate::services::DataSource;

    fn posts(source: DataSource) -> Loaded<Post> {
        let items = if source == DataSource::Unavailable {
            Vec::new()
        } else {
            vec![serde_json::from_value(serde_json::json!({"id": 1})).unwrap()]
        };
        Loaded { items, source }
    }

    fn rankings(source: DataSource) -> Loaded<RankingEntry> {
        let items = if source == DataSource::Unavailable {
            Vec::new()
        } else {
            vec![RankingEntry::default()]
        };
        Loaded { items, source }
    }

    #[test]
    fn test_complete_when_both_available() {
        let outcome = join(
            JoinStrategy::AllOrNothing,
            posts(DataSource::Live),
            rankings(DataSource::Mock),
        );
        match outcome {
            JoinOutcome::Complete { posts, rankings } => {
                assert_eq!(posts[0].id, PostId::Number(1));
                assert_eq!(rankings.len(), 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_all_or_nothing_treats_unavailable_as_empty() {
        let outcome = join(
            JoinStrategy::AllOrNothing,
            posts(DataSource::Live),
            rankings(DataSource::Unavailable),
        );
        match outcome {
            JoinOutcome::Complete { posts, rankings } => {
                assert_eq!(posts.len(), 1);
                assert!(rankings.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_all_or_nothing_applies_both_empty() {
        let outcome = join(
            JoinStrategy::AllOrNothing,
            posts(DataSource::Unavailable),
            rankings(DataSource::Unavailable),
        );
        assert_eq!(
            outcome,
            JoinOutcome::Complete {
                posts: Vec::new(),
                rankings: Vec::new()
            }
        );
    }

    #[test]
    fn test_independent_keeps_available_side() {
        let outcome = join(
            JoinStrategy::Independent,
            posts(DataSource::Unavailable),
            rankings(DataSource::Live),
        );
        match outcome {
            JoinOutcome::Partial {
                posts,
                rankings,
                missing,
            } => {
                assert!(posts.is_none());
                assert_eq!(rankings.map(|r| r.len()), Some(1));
                assert_eq!(missing, vec![Collection::Posts]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_independent_fails_when_both_missing() {
        let outcome = join(
            JoinStrategy::Independent,
            posts(DataSource::Unavailable),
            rankings(DataSource::Unavailable),
        );
        assert!(matches!(outcome, JoinOutcome::Failed { missing } if missing.len() == 2));
    }
}
