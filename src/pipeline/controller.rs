// src/pipeline/controller.rs

//! Feed controller: owns the displayed state and drives refresh cycles.
//!
//! Only one refresh runs at a time. A refresh requested while another is in
//! flight is dropped, not queued. `stop` clears the periodic ticker but lets
//! any in-flight refresh finish on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::{Collection, Config, JoinStrategy, NewPost, Post, RankingEntry, RefreshConfig};
use crate::pipeline::join::{JoinOutcome, join};
use crate::services::FeedApi;
use crate::telemetry::{DebugLog, DebugSink, Severity};

/// Data the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub posts: Vec<Post>,
    pub rankings: Vec<RankingEntry>,
    /// Time of the last cycle that applied any data
    pub updated_at: Option<DateTime<Utc>>,
    /// Why the last cycle did not apply everything
    pub diagnostic: Option<String>,
}

/// Result of one `refresh` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was already running
    Skipped,
    Completed { posts: usize, rankings: usize },
    Partial { missing: Vec<Collection> },
    Failed { missing: Vec<Collection> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    fn success(message: &str) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.to_string(),
        }
    }
}

/// Clears the busy flag when a refresh ends, however it ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeedController {
    api: FeedApi,
    debug: Arc<DebugLog>,
    join: JoinStrategy,
    interval: Duration,
    state: RwLock<FeedState>,
    loading: AtomicBool,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl FeedController {
    pub fn new(api: FeedApi, debug: Arc<DebugLog>, refresh: &RefreshConfig) -> Arc<Self> {
        Arc::new(Self {
            api,
            debug,
            join: refresh.join,
            interval: Duration::from_secs(refresh.interval_secs.max(1)),
            state: RwLock::new(FeedState::default()),
            loading: AtomicBool::new(false),
            ticker: Mutex::new(None),
        })
    }

    /// Build a controller with a `reqwest` transport and a debug log sized
    /// from config.
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let debug = Arc::new(DebugLog::new(config.debug.capacity));
        let api = FeedApi::from_config(config, Arc::clone(&debug) as Arc<dyn DebugSink>)?;
        Ok(Self::new(api, debug, &config.refresh))
    }

    pub fn api(&self) -> &FeedApi {
        &self.api
    }

    pub fn debug_log(&self) -> &Arc<DebugLog> {
        &self.debug
    }

    /// Copy of the current state.
    pub fn state(&self) -> FeedState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one refresh cycle, or nothing if one is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Refresh already in progress, skipping");
            return RefreshOutcome::Skipped;
        }
        let _guard = LoadingGuard(&self.loading);

        log::info!("Loading data from API...");
        let (posts, rankings) = futures::join!(self.api.posts(), self.api.rankings());
        let outcome = join(self.join, posts, rankings);
        self.apply(outcome)
    }

    fn apply(&self, outcome: JoinOutcome) -> RefreshOutcome {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match outcome {
            JoinOutcome::Complete { posts, rankings } => {
                let counts = (posts.len(), rankings.len());
                state.posts = posts;
                state.rankings = rankings;
                state.updated_at = Some(Utc::now());
                state.diagnostic = None;
                log::info!("Loaded {} posts and {} rankings", counts.0, counts.1);
                RefreshOutcome::Completed {
                    posts: counts.0,
                    rankings: counts.1,
                }
            }
            JoinOutcome::Partial {
                posts,
                rankings,
                missing,
            } => {
                if let Some(posts) = posts {
                    state.posts = posts;
                }
                if let Some(rankings) = rankings {
                    state.rankings = rankings;
                }
                state.updated_at = Some(Utc::now());
                state.diagnostic = Some(unavailable_message(&missing));
                self.debug.record(Severity::Warn, &unavailable_message(&missing));
                RefreshOutcome::Partial { missing }
            }
            JoinOutcome::Failed { missing } => {
                state.diagnostic = Some(unavailable_message(&missing));
                self.debug.record(
                    Severity::Error,
                    &format!("Error loading data: {}", unavailable_message(&missing)),
                );
                RefreshOutcome::Failed { missing }
            }
        }
    }

    /// Start the periodic refresh. Returns `false` if it is already running.
    ///
    /// Must be called inside a Tokio runtime. The first cycle starts
    /// immediately.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut ticker = self.lock_ticker();
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.interval;
        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                // Each cycle runs detached so `stop` never cancels one mid-flight.
                tokio::spawn(async move {
                    controller.refresh().await;
                });
            }
        }));

        log::info!("Auto-refresh every {}s", period.as_secs());
        true
    }

    /// Clear the periodic refresh.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_ticker().take() {
            handle.abort();
            log::info!("Auto-refresh stopped");
        }
    }

    /// Validate, submit, and refresh; the toast reports the result.
    pub async fn submit_post(&self, author: &str, content: &str) -> Toast {
        let author = match author.trim() {
            "" => "anonymous",
            trimmed => trimmed,
        };
        let content = content.trim();
        if content.is_empty() {
            return Toast::error("Please enter some content");
        }

        let post = NewPost {
            author: author.to_string(),
            content: content.to_string(),
        };
        match self.api.create_post(&post).await {
            Ok(_) => {
                self.refresh().await;
                Toast::success("Post created successfully!")
            }
            Err(e) => {
                self.debug
                    .record(Severity::Error, &format!("Error creating post: {e}"));
                Toast::error("Failed to create post. Please try again.")
            }
        }
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn unavailable_message(missing: &[Collection]) -> String {
    let names: Vec<&str> = missing.iter().map(Collection::name).collect();
    format!("unavailable: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use tokio::sync::Semaphore;

    use super::*;
    use crate::services::transport::testing::{Reply, ScriptedTransport};

    const POSTS: &str = "http://127.0.0.1:8080/api/posts";
    const RANKINGS: &str = "http://127.0.0.1:8080/api/rankings";
    const POSTS_BODY: &str = r#"[{"id":1,"author":"Alice","attention_accumulated":10}]"#;
    const RANKINGS_BODY: &str = r#"[{"profile_name":"Alice","score":10}]"#;

    fn controller(transport: Arc<ScriptedTransport>, join: JoinStrategy) -> Arc<FeedController> {
        let mut config = Config::default();
        config.refresh.join = join;
        let debug = Arc::new(DebugLog::new(config.debug.capacity));
        let api = FeedApi::with_transport(&config, transport, Arc::clone(&debug) as Arc<dyn DebugSink>)
            .unwrap();
        FeedController::new(api, debug, &config.refresh)
    }

    fn healthy() -> ScriptedTransport {
        ScriptedTransport::new()
            .ok(POSTS, POSTS_BODY)
            .ok(RANKINGS, RANKINGS_BODY)
    }

    #[tokio::test]
    async fn test_refresh_applies_both_collections() {
        let controller = controller(Arc::new(healthy()), JoinStrategy::AllOrNothing);

        let outcome = controller.refresh().await;
        assert_eq!(outcome, RefreshOutcome::Completed { posts: 1, rankings: 1 });

        let state = controller.state();
        assert_eq!(state.posts[0].author.as_deref(), Some("Alice"));
        assert_eq!(state.rankings[0].display_name(), "Alice");
        assert!(state.updated_at.is_some());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_all_or_nothing_applies_posts_when_rankings_unreachable() {
        // Rankings: live chain and snapshot both refused.
        let transport = Arc::new(
            ScriptedTransport::new().ok(POSTS, r#"[{"id":1,"author":"Alice"}]"#),
        );
        let controller = controller(transport, JoinStrategy::AllOrNothing);

        let outcome = controller.refresh().await;
        assert_eq!(outcome, RefreshOutcome::Completed { posts: 1, rankings: 0 });

        let state = controller.state();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].author.as_deref(), Some("Alice"));
        assert!(state.rankings.is_empty());
        assert!(state.updated_at.is_some());
        assert!(state.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_independent_fails_when_nothing_reachable() {
        let controller = controller(Arc::new(ScriptedTransport::new()), JoinStrategy::Independent);

        let outcome = controller.refresh().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Failed {
                missing: vec![Collection::Posts, Collection::Rankings]
            }
        );
        assert!(controller.state().updated_at.is_none());
        assert_eq!(
            controller.state().diagnostic.as_deref(),
            Some("unavailable: posts, rankings")
        );
    }

    #[tokio::test]
    async fn test_independent_applies_available_side() {
        let transport = Arc::new(ScriptedTransport::new().ok(POSTS, POSTS_BODY));
        let controller = controller(transport, JoinStrategy::Independent);

        let outcome = controller.refresh().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Partial {
                missing: vec![Collection::Rankings]
            }
        );
        assert_eq!(controller.state().posts.len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_dropped() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(healthy().gated(Arc::clone(&gate)));
        let controller = controller(transport.clone(), JoinStrategy::AllOrNothing);

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh().await }
        });
        while !controller.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.refresh().await, RefreshOutcome::Skipped);

        gate.add_permits(16);
        assert_eq!(
            first.await.unwrap(),
            RefreshOutcome::Completed { posts: 1, rankings: 1 }
        );
        assert_eq!(transport.calls().len(), 2);
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop_ticker() {
        let transport = Arc::new(healthy());
        let controller = controller(transport.clone(), JoinStrategy::AllOrNothing);

        assert!(controller.start());
        assert!(!controller.start());
        assert!(controller.is_running());

        tokio::time::sleep(Duration::from_secs(11)).await;
        let ticked = transport.calls().len();
        assert!(ticked >= 4, "expected at least two cycles, saw {ticked} calls");

        controller.stop();
        assert!(!controller.is_running());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.calls().len(), ticked);
    }

    #[tokio::test]
    async fn test_submit_requires_content() {
        let transport = Arc::new(healthy());
        let controller = controller(transport.clone(), JoinStrategy::AllOrNothing);

        let toast = controller.submit_post("alice", "   ").await;
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Please enter some content");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_refreshes_feed() {
        let transport = Arc::new(healthy().reply_for(
            "POST",
            POSTS,
            Reply::Status(201, r#"{"id":"p-2","status":"created"}"#.into()),
        ));
        let controller = controller(transport.clone(), JoinStrategy::AllOrNothing);

        let toast = controller.submit_post("", "gm").await;
        assert_eq!(toast.kind, ToastKind::Success);
        assert!(transport.calls().contains(&RANKINGS.to_string()));
        assert_eq!(controller.state().posts.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_is_not_optimistic() {
        let transport = Arc::new(
            healthy()
                .reply_for("POST", POSTS, Reply::Status(500, String::new()))
                .reply_for("POST", "http://127.0.0.1:3000/api/posts", Reply::Refused)
                .reply_for("POST", "http://localhost:3000/api/posts", Reply::Refused),
        );
        let controller = controller(transport.clone(), JoinStrategy::AllOrNothing);

        let toast = controller.submit_post("alice", "hello").await;
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to create post. Please try again.");
        assert!(controller.state().posts.is_empty());
        assert!(!transport.calls().contains(&RANKINGS.to_string()));
    }
}
