// src/services/transport.rs

//! HTTP transport seam used by the resolver and mock loader.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{ApiConfig, RequestDescriptor};
use crate::utils::http::create_async_client;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Empty unless `status` is 2xx
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends one request to one fully-resolved URL.
///
/// Transport-level failures are `Err`; any HTTP answer, including 4xx/5xx,
/// is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &str, request: &RequestDescriptor) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, request: &RequestDescriptor) -> Result<TransportResponse> {
        let mut builder = self.client.request(request.method().clone(), url);
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = if status.is_success() {
            response.bytes().await?.to_vec()
        } else {
            Vec::new()
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory transport for call-count assertions.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tokio::sync::Semaphore;

    use super::*;
    use crate::error::AppError;

    #[derive(Debug, Clone)]
    pub enum Reply {
        Status(u16, String),
        Refused,
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, url: &str, reply: Reply) -> Self {
            self.replies.insert(url.to_string(), reply);
            self
        }

        /// Reply used only for `method`; takes precedence over `reply`.
        pub fn reply_for(mut self, method: &str, url: &str, reply: Reply) -> Self {
            self.replies.insert(format!("{method} {url}"), reply);
            self
        }

        pub fn ok(self, url: &str, body: &str) -> Self {
            self.reply(url, Reply::Status(200, body.to_string()))
        }

        pub fn status(self, url: &str, status: u16) -> Self {
            self.reply(url, Reply::Status(status, String::new()))
        }

        /// Hold every request until the gate gets permits.
        pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, url: &str, request: &RequestDescriptor) -> Result<TransportResponse> {
            self.calls.lock().unwrap().push(url.to_string());
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            let reply = self
                .replies
                .get(&format!("{} {url}", request.method()))
                .or_else(|| self.replies.get(url))
                .cloned();
            match reply {
                Some(Reply::Status(status, body)) => Ok(TransportResponse {
                    status,
                    body: if (200..300).contains(&status) {
                        body.into_bytes()
                    } else {
                        Vec::new()
                    },
                }),
                Some(Reply::Refused) | None => Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            }
        }
    }
}
