//! Refresh cycle for the feed.
//!
//! - `join`: Combine one cycle's posts and rankings reads
//! - `FeedController`: Own the displayed state, run refreshes, submit posts

pub mod controller;
pub mod join;

pub use controller::{FeedController, FeedState, RefreshOutcome, Toast, ToastKind};
pub use join::{JoinOutcome, join};
