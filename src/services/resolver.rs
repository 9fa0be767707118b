// src/services/resolver.rs

//! Fallback-chain fetch executor.
//!
//! A request is sent to the same-origin candidate first and then to each
//! configured host, in order, until one answers with a 2xx status. Each
//! candidate is tried exactly once per call. Non-2xx answers and transport
//! errors are handled the same way: recorded, then the next candidate.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{AttemptOutcome, Endpoint, EndpointCandidates, FetchAttempt, RequestDescriptor};
use crate::services::transport::Transport;
use crate::telemetry::{DebugSink, Severity};

/// The first successful answer in the chain.
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    pub endpoint: Endpoint,
    pub target: String,
    pub status: u16,
    pub body: Vec<u8>,
    /// Every attempt made for this call, the last one being the success
    pub attempts: Vec<FetchAttempt>,
}

impl ResolvedResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Executes requests against an ordered candidate list.
#[derive(Clone)]
pub struct FallbackResolver {
    candidates: EndpointCandidates,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DebugSink>,
}

impl FallbackResolver {
    pub fn new(
        candidates: EndpointCandidates,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn DebugSink>,
    ) -> Self {
        Self {
            candidates,
            transport,
            sink,
        }
    }

    pub fn candidates(&self) -> &EndpointCandidates {
        &self.candidates
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn sink(&self) -> &Arc<dyn DebugSink> {
        &self.sink
    }

    /// Deliver `request`, stopping at the first 2xx answer.
    ///
    /// On exhaustion the error carries the most recent failure and the full
    /// attempt list.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ResolvedResponse> {
        let path = request.path();
        let mut attempts = Vec::with_capacity(self.candidates.len());
        let mut last_error: Option<String> = None;

        for (endpoint, target) in self.candidates.targets(path) {
            self.sink.record(Severity::Info, &trying_message(endpoint, &target, path));

            match self.transport.send(&target, request).await {
                Ok(response) if response.is_success() => {
                    self.sink
                        .record(Severity::Success, &success_message(endpoint, &target, path));
                    attempts.push(FetchAttempt::new(&target, AttemptOutcome::Success, None));
                    return Ok(ResolvedResponse {
                        endpoint: endpoint.clone(),
                        target,
                        status: response.status,
                        body: response.body,
                        attempts,
                    });
                }
                Ok(response) => {
                    let error = AppError::HttpStatus {
                        target: target.clone(),
                        status: response.status,
                    };
                    self.sink.record(
                        Severity::Warn,
                        &format!("Request to {endpoint} failed: HTTP {}", response.status),
                    );
                    attempts.push(FetchAttempt::new(
                        &target,
                        AttemptOutcome::HttpError(response.status),
                        None,
                    ));
                    last_error = Some(error.to_string());
                }
                Err(error) => {
                    let detail = error.to_string();
                    self.sink
                        .record(Severity::Warn, &format!("Request to {endpoint} failed: {detail}"));
                    attempts.push(FetchAttempt::new(
                        &target,
                        AttemptOutcome::NetworkError,
                        Some(detail.clone()),
                    ));
                    last_error = Some(detail);
                }
            }
        }

        let last = last_error.unwrap_or_else(|| "no endpoint candidates configured".to_string());
        self.sink
            .record(Severity::Error, &format!("All fetch attempts failed: {last}"));
        Err(AppError::Exhausted { attempts, last })
    }

    /// Execute and decode the winning body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        self.execute(request).await?.json()
    }
}

fn trying_message(endpoint: &Endpoint, target: &str, path: &str) -> String {
    match endpoint {
        Endpoint::SameOrigin => format!("Trying same-origin {path}"),
        Endpoint::Host(_) => format!("Trying {target}"),
    }
}

fn success_message(endpoint: &Endpoint, target: &str, path: &str) -> String {
    match endpoint {
        Endpoint::SameOrigin => format!("Success same-origin {path}"),
        Endpoint::Host(_) => format!("Success {target}"),
    }
}
