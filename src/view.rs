// src/view.rs

//! Pure rendering of feed state into a display model.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::{Post, PostId, RankingEntry};
use crate::pipeline::FeedState;
use crate::utils::format;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
const TOP_POSTS: usize = 5;
const SNIPPET_LEN: usize = 80;

pub const EMPTY_POSTS: &str = "No posts yet. Be the first to share!";
pub const EMPTY_RANKINGS: &str = "No rankings yet.";
pub const EMPTY_TOP_POSTS: &str = "No posts yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_posts: usize,
    pub ranked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub initial: String,
    pub author: String,
    pub date: String,
    pub content: String,
    pub likes: i64,
    pub comments: i64,
    pub reposts: i64,
    pub attention: i64,
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub medal: &'static str,
    pub name: String,
    pub score: String,
    /// 1-based
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopPost {
    pub id: PostId,
    pub author: String,
    pub snippet: String,
}

/// Everything a front end needs to draw the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub stats: Stats,
    pub posts: Vec<PostCard>,
    pub rankings: Vec<RankingRow>,
    pub top_posts: Vec<TopPost>,
    pub updated: Option<String>,
    pub diagnostic: Option<String>,
}

/// Render `state` as of `now`.
pub fn render(state: &FeedState, now: DateTime<Utc>) -> FeedView {
    FeedView {
        stats: Stats {
            total_posts: state.posts.len(),
            ranked: state.rankings.len(),
        },
        posts: state.posts.iter().map(|p| post_card(p, now)).collect(),
        rankings: state
            .rankings
            .iter()
            .enumerate()
            .map(|(i, entry)| ranking_row(i, entry))
            .collect(),
        top_posts: top_posts(&state.posts),
        updated: state
            .updated_at
            .map(|at| format::relative_time(Some(&at.to_rfc3339()), now)),
        diagnostic: state.diagnostic.clone(),
    }
}

fn post_card(post: &Post, now: DateTime<Utc>) -> PostCard {
    PostCard {
        id: post.id.clone(),
        initial: format::initial(post.author.as_deref().filter(|a| !a.is_empty())),
        author: post.author_or_anonymous().to_string(),
        date: format::relative_time(post.created_at.as_deref(), now),
        content: post.body().to_string(),
        likes: post.likes,
        comments: post.comments,
        reposts: post.reposts,
        attention: post.attention_accumulated,
        level: post.level_or_default(),
    }
}

fn ranking_row(index: usize, entry: &RankingEntry) -> RankingRow {
    RankingRow {
        medal: MEDALS.get(index).copied().unwrap_or("⭐"),
        name: entry.display_name().to_string(),
        score: format::score(entry.display_score()),
        rank: index + 1,
    }
}

fn top_posts(posts: &[Post]) -> Vec<TopPost> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    // Stable, so ties keep feed order.
    ranked.sort_by(|a, b| b.attention_accumulated.cmp(&a.attention_accumulated));
    ranked
        .into_iter()
        .take(TOP_POSTS)
        .map(|post| TopPost {
            id: post.id.clone(),
            author: post.author_or_anonymous().to_string(),
            snippet: format::snippet(post.body(), SNIPPET_LEN),
        })
        .collect()
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Posts: {}  Ranked: {}",
            self.stats.total_posts, self.stats.ranked
        )?;
        if let Some(updated) = &self.updated {
            writeln!(f, "Updated: {updated}")?;
        }
        if let Some(diagnostic) = &self.diagnostic {
            writeln!(f, "! {diagnostic}")?;
        }

        writeln!(f, "\n== Feed ==")?;
        if self.posts.is_empty() {
            writeln!(f, "{EMPTY_POSTS}")?;
        }
        for card in &self.posts {
            writeln!(f, "[{}] {} · {}", card.initial, card.author, card.date)?;
            writeln!(f, "    {}", card.content)?;
            writeln!(
                f,
                "    ❤️ {}  💬 {}  🔁 {}  👁️ {}  ⭐ Level {}",
                card.likes, card.comments, card.reposts, card.attention, card.level
            )?;
        }

        writeln!(f, "\n== Rankings ==")?;
        if self.rankings.is_empty() {
            writeln!(f, "{EMPTY_RANKINGS}")?;
        }
        for row in &self.rankings {
            writeln!(f, "{} #{} {}  Score: {}", row.medal, row.rank, row.name, row.score)?;
        }

        writeln!(f, "\n== Top Posts ==")?;
        if self.top_posts.is_empty() {
            writeln!(f, "{EMPTY_TOP_POSTS}")?;
        }
        for top in &self.top_posts {
            writeln!(f, "{}: {}", top.author, top.snippet)?;
        }
        Ok(())
    }
}
