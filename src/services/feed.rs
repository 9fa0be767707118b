// src/services/feed.rs

//! Feed API: posts and rankings reads, post creation.
//!
//! Reads never fail: the live chain is tried first, then the mock snapshot,
//! and finally an empty collection. Writes propagate failure and never touch
//! the snapshot.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{Collection, Config, CreatedPost, NewPost, Post, RankingEntry, RequestDescriptor};
use crate::services::mock::{MockLoader, MockSource};
use crate::services::resolver::FallbackResolver;
use crate::services::transport::{ReqwestTransport, Transport};
use crate::telemetry::DebugSink;

/// Where a read's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Mock,
    /// Neither the backend nor the snapshot produced data
    Unavailable,
}

/// A read result; `items` is empty when `source` is `Unavailable`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub source: DataSource,
}

impl<T> Loaded<T> {
    pub fn is_available(&self) -> bool {
        self.source != DataSource::Unavailable
    }

    fn unavailable() -> Self {
        Self {
            items: Vec::new(),
            source: DataSource::Unavailable,
        }
    }
}

/// Client for the SUITER backend.
#[derive(Clone)]
pub struct FeedApi {
    resolver: FallbackResolver,
    mock: MockLoader,
}

impl FeedApi {
    pub fn new(resolver: FallbackResolver, mock: MockLoader) -> Self {
        Self { resolver, mock }
    }

    /// Build the client over a `reqwest` transport.
    pub fn from_config(config: &Config, sink: Arc<dyn DebugSink>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
        Self::with_transport(config, transport, sink)
    }

    /// Build the client over any transport.
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn DebugSink>,
    ) -> Result<Self> {
        let candidates = config.api.candidates()?;
        let source = MockSource::from_config(config.mock.dir.as_deref(), candidates.origin());
        let mock = MockLoader::new(source, Arc::clone(&transport), Arc::clone(&sink));
        let resolver = FallbackResolver::new(candidates, transport, sink);
        Ok(Self::new(resolver, mock))
    }

    pub fn resolver(&self) -> &FallbackResolver {
        &self.resolver
    }

    pub async fn posts(&self) -> Loaded<Post> {
        self.read(Collection::Posts).await
    }

    pub async fn rankings(&self) -> Loaded<RankingEntry> {
        self.read(Collection::Rankings).await
    }

    async fn read<T: DeserializeOwned>(&self, collection: Collection) -> Loaded<T> {
        let request = match RequestDescriptor::get(collection.api_path()) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Error building {} request: {}", collection.name(), e);
                return Loaded::unavailable();
            }
        };
        self.read_with(collection, &request).await
    }

    /// Live chain first; only read requests may fall back to the snapshot.
    async fn read_with<T: DeserializeOwned>(
        &self,
        collection: Collection,
        request: &RequestDescriptor,
    ) -> Loaded<T> {
        match self.resolver.fetch_json::<Vec<T>>(request).await {
            Ok(items) => {
                log::info!("{} fetched: {}", collection.name(), items.len());
                return Loaded {
                    items,
                    source: DataSource::Live,
                };
            }
            Err(e) => log::error!("Error fetching {}: {}", collection.name(), e),
        }

        if !request.is_read() {
            return Loaded::unavailable();
        }
        match self.mock.load(collection).await {
            Ok(items) => Loaded {
                items,
                source: DataSource::Mock,
            },
            Err(_) => Loaded::unavailable(),
        }
    }

    /// Submit a new post. Any failure reaches the caller.
    pub async fn create_post(&self, post: &NewPost) -> Result<CreatedPost> {
        let request = RequestDescriptor::post_json(Collection::Posts.api_path(), post)?;
        let created: CreatedPost = self.resolver.fetch_json(&request).await.map_err(|e| {
            log::error!("Error creating post: {}", e);
            e
        })?;

        if let Some(error) = &created.error {
            log::error!("Backend rejected post: {}", error);
            return Err(AppError::validation(format!("backend rejected post: {error}")));
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostId;
    use crate::services::transport::testing::{Reply, ScriptedTransport};
    use crate::telemetry::DebugLog;

    const SAME: &str = "http://127.0.0.1:8080/api/posts";
    const LOOPBACK: &str = "http://127.0.0.1:3000/api/posts";
    const LOCALHOST: &str = "http://localhost:3000/api/posts";
    const MOCK_POSTS: &str = "http://127.0.0.1:8080/mock/posts.json";

    fn api(transport: Arc<ScriptedTransport>) -> FeedApi {
        FeedApi::with_transport(&Config::default(), transport, Arc::new(DebugLog::default()))
            .unwrap()
    }

    fn all_down() -> ScriptedTransport {
        ScriptedTransport::new()
            .status(SAME, 502)
            .reply(LOOPBACK, Reply::Refused)
            .reply(LOCALHOST, Reply::Refused)
    }

    #[tokio::test]
    async fn test_live_posts() {
        let transport = Arc::new(ScriptedTransport::new().ok(SAME, r#"[{"id":"p1","likes":4}]"#));
        let loaded = api(transport.clone()).posts().await;

        assert_eq!(loaded.source, DataSource::Live);
        assert_eq!(loaded.items[0].id, PostId::Text("p1".into()));
        assert_eq!(transport.calls(), vec![SAME]);
    }

    #[tokio::test]
    async fn test_exhausted_read_uses_mock_snapshot() {
        let transport = Arc::new(all_down().ok(MOCK_POSTS, r#"[{"id":1},{"id":2}]"#));
        let loaded = api(transport.clone()).posts().await;

        assert_eq!(loaded.source, DataSource::Mock);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(transport.calls().last().map(String::as_str), Some(MOCK_POSTS));
    }

    #[tokio::test]
    async fn test_exhausted_read_without_mock_is_empty() {
        let transport = Arc::new(all_down().reply(MOCK_POSTS, Reply::Refused));
        let loaded = api(transport).posts().await;

        assert_eq!(loaded.source, DataSource::Unavailable);
        assert!(loaded.items.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_live_body_falls_back() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .ok(SAME, r#"{"unexpected":"object"}"#)
                .ok(MOCK_POSTS, r#"[{"id":9}]"#),
        );
        let loaded = api(transport).posts().await;

        assert_eq!(loaded.source, DataSource::Mock);
        assert_eq!(loaded.items[0].id, PostId::Number(9));
    }

    #[tokio::test]
    async fn test_mock_directory_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rankings.json"), r#"[{"profile_name":"Eve","score":9}]"#)
            .unwrap();

        let mut config = Config::default();
        config.mock.dir = Some(dir.path().to_string_lossy().into_owned());
        let transport = Arc::new(ScriptedTransport::new());
        let api =
            FeedApi::with_transport(&config, transport.clone(), Arc::new(DebugLog::default()))
                .unwrap();

        let loaded = api.rankings().await;
        assert_eq!(loaded.source, DataSource::Mock);
        assert_eq!(loaded.items[0].display_name(), "Eve");
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_write_request_never_reads_snapshot() {
        let transport = Arc::new(all_down().ok(MOCK_POSTS, r#"[{"id":1}]"#));
        let api = api(transport.clone());
        let request = RequestDescriptor::post_json(
            Collection::Posts.api_path(),
            &serde_json::json!({"author": "alice", "content": "hi"}),
        )
        .unwrap();

        let loaded: Loaded<Post> = api.read_with(Collection::Posts, &request).await;
        assert_eq!(loaded.source, DataSource::Unavailable);
        assert!(!transport.calls().contains(&MOCK_POSTS.to_string()));
    }

    #[tokio::test]
    async fn test_create_post_success() {
        let transport =
            Arc::new(ScriptedTransport::new().ok(SAME, r#"{"id":"new-1","status":"created"}"#));
        let created = api(transport)
            .create_post(&NewPost {
                author: "alice".into(),
                content: "hello".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, Some(PostId::Text("new-1".into())));
    }

    #[tokio::test]
    async fn test_create_post_exhausted_skips_mock() {
        let transport = Arc::new(all_down().ok(MOCK_POSTS, "[]"));
        let result = api(transport.clone())
            .create_post(&NewPost {
                author: "alice".into(),
                content: "hello".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Exhausted { .. })));
        assert_eq!(transport.calls(), vec![SAME, LOOPBACK, LOCALHOST]);
    }

    #[tokio::test]
    async fn test_create_post_error_body_is_failure() {
        let transport =
            Arc::new(ScriptedTransport::new().ok(SAME, r#"{"error":"Content cannot be empty"}"#));
        let result = api(transport)
            .create_post(&NewPost {
                author: "alice".into(),
                content: " ".into(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
