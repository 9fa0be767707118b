// src/models/post.rs

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Post identifier; the backend issues UUID strings, snapshots use integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

/// A post as returned by `GET /api/posts`.
///
/// Every field but `id` is optional on the wire; missing counters read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    /// Older backends only expose the content hash
    #[serde(default)]
    pub content_hash: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub likes: i64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub comments: i64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub reposts: i64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub attention_accumulated: i64,

    #[serde(default)]
    pub level: Option<i64>,
}

impl Post {
    pub fn author_or_anonymous(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.is_empty() => author,
            _ => "anonymous",
        }
    }

    /// Content text, falling back to the content hash.
    pub fn body(&self) -> &str {
        self.content
            .as_deref()
            .or(self.content_hash.as_deref())
            .unwrap_or("")
    }

    pub fn level_or_default(&self) -> i64 {
        match self.level {
            Some(level) if level != 0 => level,
            _ => 1,
        }
    }
}

/// Counters may be absent or `null`; both read as zero.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub author: String,
    pub content: String,
}

/// Backend acknowledgement of a created post.
///
/// The API answers `{id, status}`; the sample server may answer a full post
/// or, with a 2xx status, an `{error}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPost {
    #[serde(default)]
    pub id: Option<PostId>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}
