// src/models/mod.rs

//! Domain models for the feed client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod attempt;
mod config;
mod endpoint;
mod post;
mod ranking;
mod request;

// Re-export all public types
pub use attempt::{AttemptOutcome, FetchAttempt};
pub use config::{
    ApiConfig, Config, DebugConfig, JoinStrategy, LoggingConfig, MockConfig, ProxyConfig,
    RefreshConfig,
};
pub use endpoint::{Endpoint, EndpointCandidates, SAME_ORIGIN};
pub use post::{CreatedPost, NewPost, Post, PostId};
pub use ranking::RankingEntry;
pub use request::RequestDescriptor;

/// The two read-only collections the client displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Rankings,
}

impl Collection {
    /// Live API path.
    pub fn api_path(&self) -> &'static str {
        match self {
            Collection::Posts => "/api/posts",
            Collection::Rankings => "/api/rankings",
        }
    }

    /// Snapshot file name, relative to the mock directory.
    pub fn mock_file(&self) -> &'static str {
        match self {
            Collection::Posts => "posts.json",
            Collection::Rankings => "rankings.json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Rankings => "rankings",
        }
    }
}
