// src/models/endpoint.rs

//! Endpoint candidates tried by the fallback resolver.
//!
//! The order is always the same-origin marker first, then each configured
//! host in the order it was listed. The list is fixed once built.

use std::fmt;

use url::Url;

use crate::error::{AppError, Result};
use crate::utils::url::build_url;

/// Config marker standing in for "the page's own origin".
pub const SAME_ORIGIN: &str = "same-origin";

/// A single base the resolver may try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// The origin serving the client, usually a proxy in front of the backend
    SameOrigin,
    /// An absolute backend base URL
    Host(Url),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::SameOrigin => f.write_str(SAME_ORIGIN),
            Endpoint::Host(url) => f.write_str(url.as_str().trim_end_matches('/')),
        }
    }
}

/// Ordered, immutable candidate list.
#[derive(Debug, Clone)]
pub struct EndpointCandidates {
    origin: Url,
    endpoints: Vec<Endpoint>,
}

impl EndpointCandidates {
    /// Build the candidate list from config entries.
    ///
    /// The same-origin marker is prepended when absent and rejected anywhere
    /// but the first position.
    pub fn parse(origin: &str, entries: &[String]) -> Result<Self> {
        let origin = parse_http_url(origin)?;
        let mut endpoints = vec![Endpoint::SameOrigin];

        for (index, entry) in entries.iter().enumerate() {
            let entry = entry.trim();
            if entry == SAME_ORIGIN {
                if index != 0 {
                    return Err(AppError::validation(format!(
                        "'{SAME_ORIGIN}' must be the first candidate, found at position {}",
                        index + 1
                    )));
                }
                continue;
            }
            endpoints.push(Endpoint::Host(parse_http_url(entry)?));
        }

        Ok(Self { origin, endpoints })
    }

    /// The URL the same-origin marker resolves against.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Resolve `path` against one candidate.
    pub fn target(&self, endpoint: &Endpoint, path: &str) -> String {
        match endpoint {
            Endpoint::SameOrigin => build_url(&self.origin, path),
            Endpoint::Host(base) => build_url(base, path),
        }
    }

    /// Resolve `path` against every candidate, in order.
    pub fn targets(&self, path: &str) -> Vec<(&Endpoint, String)> {
        self.endpoints
            .iter()
            .map(|endpoint| (endpoint, self.target(endpoint, path)))
            .collect()
    }
}

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::validation(format!(
            "candidate '{raw}' has unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_same_origin_comes_first() {
        let candidates = EndpointCandidates::parse(
            "http://127.0.0.1:8080",
            &entries(&["same-origin", "http://127.0.0.1:3000", "http://localhost:3000"]),
        )
        .unwrap();

        let targets: Vec<String> = candidates
            .targets("/api/posts")
            .into_iter()
            .map(|(_, url)| url)
            .collect();
        assert_eq!(
            targets,
            vec![
                "http://127.0.0.1:8080/api/posts",
                "http://127.0.0.1:3000/api/posts",
                "http://localhost:3000/api/posts",
            ]
        );
    }

    #[test]
    fn test_marker_prepended_when_missing() {
        let candidates =
            EndpointCandidates::parse("http://127.0.0.1:8080", &entries(&["http://localhost:3000"]))
                .unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates.endpoints()[0], Endpoint::SameOrigin);
    }

    #[test]
    fn test_marker_out_of_place_rejected() {
        let result = EndpointCandidates::parse(
            "http://127.0.0.1:8080",
            &entries(&["http://localhost:3000", "same-origin"]),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let result =
            EndpointCandidates::parse("http://127.0.0.1:8080", &entries(&["ftp://example.com"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_display() {
        let host = Endpoint::Host(Url::parse("http://localhost:3000").unwrap());
        assert_eq!(host.to_string(), "http://localhost:3000");
        assert_eq!(Endpoint::SameOrigin.to_string(), "same-origin");
    }
}
