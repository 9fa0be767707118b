// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve an absolute-path reference such as `/api/posts` against a base.
///
/// # Examples
/// ```
/// use suiter::utils::url::build_url;
///
/// let base = url::Url::parse("http://127.0.0.1:3000").unwrap();
/// assert_eq!(build_url(&base, "/api/posts"), "http://127.0.0.1:3000/api/posts");
/// ```
pub fn build_url(base: &Url, path: &str) -> String {
    base.join(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| concat_path(base.as_str(), path))
}

/// Append `path` to `base` verbatim, keeping any path prefix on the base.
///
/// Used by the proxy, where `BACKEND_API_URL` may carry a mount prefix that
/// a URL join would discard.
pub fn concat_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Attach a raw query string, if any.
pub fn with_query(url: String, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{url}?{q}"),
        _ => url,
    }
}
