// src/models/attempt.rs

use std::fmt;

use serde::Serialize;

/// How a single candidate attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    HttpError(u16),
    NetworkError,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// Ephemeral record of one delivery attempt against one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchAttempt {
    /// Fully resolved URL the request was sent to
    pub target: String,
    pub outcome: AttemptOutcome,
    /// Transport error text, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FetchAttempt {
    pub fn new(target: impl Into<String>, outcome: AttemptOutcome, detail: Option<String>) -> Self {
        Self {
            target: target.into(),
            outcome,
            detail,
        }
    }
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.outcome, &self.detail) {
            (AttemptOutcome::Success, _) => write!(f, "{} ok", self.target),
            (AttemptOutcome::HttpError(status), _) => write!(f, "{} HTTP {}", self.target, status),
            (AttemptOutcome::NetworkError, Some(detail)) => write!(f, "{} {}", self.target, detail),
            (AttemptOutcome::NetworkError, None) => write!(f, "{} network error", self.target),
        }
    }
}
