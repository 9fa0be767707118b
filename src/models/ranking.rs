// src/models/ranking.rs

use serde::{Deserialize, Serialize};

use super::PostId;

/// One leaderboard row from `GET /api/rankings`.
///
/// Post rankings carry `post_id`/`score`; profile rankings carry a name and
/// an attention total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(default)]
    pub post_id: Option<PostId>,

    #[serde(default)]
    pub profile_name: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub attention: Option<f64>,
}

impl RankingEntry {
    pub fn display_name(&self) -> &str {
        [self.profile_name.as_deref(), self.author.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or("Anonymous")
    }

    /// Score, else attention, else zero. A zero score defers to attention.
    pub fn display_score(&self) -> f64 {
        [self.score, self.attention]
            .into_iter()
            .flatten()
            .find(|value| *value != 0.0)
            .unwrap_or(0.0)
    }
}
