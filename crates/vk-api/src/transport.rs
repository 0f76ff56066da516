//! Shared GET-and-decode path for the token endpoint and method calls

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Query parameters whose values must never reach the logs
const SENSITIVE_PARAMS: &[&str] = &["access_token", "client_secret", "code"];

/// Raw response: status plus the full body text
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Issue a GET and read the whole body.
///
/// Only connection-level failures are reported here. VK signals most
/// errors inside a 200 body, so status interpretation is left to `decode`.
pub(crate) async fn get(client: &Client, url: Url) -> Result<RawResponse> {
    debug!(url = %redacted(&url), "GET");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| Error::Transport(format!("GET {} failed: {e}", url.path())))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("reading response body failed: {e}")))?;

    debug!(%status, bytes = body.len(), "response received");
    Ok(RawResponse { status, body })
}

/// Decode a JSON body.
///
/// An undecodable body under a non-2xx status is a transport failure (a
/// proxy or gateway page, most likely); under a 2xx status it is a decode
/// failure.
pub(crate) fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T> {
    serde_json::from_str(&raw.body).map_err(|e| {
        let snippet: String = raw.body.chars().take(200).collect();
        if raw.status.is_success() {
            Error::Decode(format!("{e}; body: {snippet}"))
        } else {
            warn!(status = %raw.status, "non-success status with undecodable body");
            Error::Transport(format!("server returned {}: {snippet}", raw.status))
        }
    })
}

/// Render a URL for logging with credential values masked.
pub(crate) fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SENSITIVE_PARAMS.contains(&k.as_ref()) {
                "[REDACTED]".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }
    masked.to_string()
}
