// src/proxy/forward.rs

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use super::ProxyState;
use crate::utils::url::{concat_path, with_query};

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("{0}")]
    Backend(#[from] reqwest::Error),

    #[error("backend returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": "Failed to reach backend API",
            "message": self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Forward one `/api/*` request and relay the backend's status and JSON body.
pub async fn forward(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let target = with_query(concat_path(&state.backend_url, uri.path()), uri.query());
    debug!("{method} {uri} -> {target}");

    let mut request = state
        .client
        .request(method.clone(), &target)
        .headers(forwardable(&headers));
    if !body.is_empty() {
        request = request.body(body);
    }

    let response = request.send().await.map_err(|e| {
        warn!("Proxy error for {method} {target}: {e}");
        ProxyError::from(e)
    })?;
    let status = response.status();
    let bytes = response.bytes().await?;
    let payload: Value = serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Backend answered {status} with a non-JSON body for {target}");
        ProxyError::from(e)
    })?;

    Ok((status, Json(payload)).into_response())
}

fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in &HOP_BY_HOP {
        out.remove(name);
    }
    out.remove("keep-alive");
    out.remove(header::UPGRADE);
    out
}
