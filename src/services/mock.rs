// src/services/mock.rs

//! Last-resort snapshot source for read operations.

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Collection, RequestDescriptor};
use crate::services::transport::Transport;
use crate::telemetry::{DebugSink, Severity};
use crate::utils::url::build_url;

/// URL prefix of the bundled snapshots on the static server.
pub const MOCK_PREFIX: &str = "/mock/";

/// Where snapshot files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockSource {
    /// Local directory with `posts.json` and `rankings.json`
    Directory(PathBuf),
    /// Static files under `/mock/` on the client's own origin
    Origin(Url),
}

impl MockSource {
    /// Directory if configured, otherwise the origin's `/mock/` path.
    pub fn from_config(dir: Option<&str>, origin: &Url) -> Self {
        match dir {
            Some(dir) => MockSource::Directory(PathBuf::from(dir)),
            None => MockSource::Origin(origin.clone()),
        }
    }
}

/// Loads static snapshots of read-only collections.
#[derive(Clone)]
pub struct MockLoader {
    source: MockSource,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DebugSink>,
}

impl MockLoader {
    pub fn new(source: MockSource, transport: Arc<dyn Transport>, sink: Arc<dyn DebugSink>) -> Self {
        Self {
            source,
            transport,
            sink,
        }
    }

    pub fn source(&self) -> &MockSource {
        &self.source
    }

    /// Read and decode the snapshot for `collection`.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let result = match &self.source {
            MockSource::Directory(dir) => {
                let bytes = tokio::fs::read(dir.join(collection.mock_file())).await?;
                serde_json::from_slice(&bytes).map_err(AppError::from)
            }
            MockSource::Origin(origin) => self.load_from_origin(origin, collection).await,
        };

        match &result {
            Ok(items) => self.sink.record(
                Severity::Info,
                &format!(
                    "Loaded {} {} from local mock",
                    items.len(),
                    collection.name()
                ),
            ),
            Err(e) => self.sink.record(
                Severity::Warn,
                &format!("Mock {} unavailable: {e}", collection.name()),
            ),
        }
        result
    }

    async fn load_from_origin<T: DeserializeOwned>(
        &self,
        origin: &Url,
        collection: Collection,
    ) -> Result<Vec<T>> {
        let path = format!("{MOCK_PREFIX}{}", collection.mock_file());
        let target = build_url(origin, &path);
        let request = RequestDescriptor::get(path)?;

        let response = self.transport.send(&target, &request).await?;
        if !response.is_success() {
            return Err(AppError::HttpStatus {
                target,
                status: response.status,
            });
        }
        response.json()
    }
}
