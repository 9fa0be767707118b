// src/models/request.rs

use reqwest::Method;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Immutable description of one API call, independent of which base it hits.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    path: String,
    method: Method,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Create a descriptor; `path` must be relative and begin with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(AppError::validation(format!(
                "request path '{path}' must begin with '/'"
            )));
        }
        Ok(Self {
            path,
            method,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn get(path: impl Into<String>) -> Result<Self> {
        Self::new(Method::GET, path)
    }

    /// A POST carrying `body` as JSON.
    pub fn post_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)?;
        Ok(Self::new(Method::POST, path)?
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Writes get no mock fallback.
    pub fn is_read(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}
