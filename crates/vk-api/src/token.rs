//! Token endpoint response
//!
//! VK answers the code exchange with HTTP 200 for both outcomes; a failed
//! exchange is signalled by a non-empty `error` field in the body, not by
//! the status code.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::Session;

/// Body of `GET oauth.vk.com/access_token`.
///
/// `expires_in` is a delta in seconds; `0` marks a token issued with the
/// `offline` scope, which does not expire.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_description: String,
}

impl TokenResponse {
    /// Convert into a `Session` anchored at `now`.
    ///
    /// Fails with `Error::Authorization` when the provider reported an
    /// error, and with `Error::Decode` when a success body lacks a token.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session> {
        if !self.error.is_empty() {
            let message = if self.error_description.is_empty() {
                self.error
            } else {
                self.error_description
            };
            return Err(Error::Authorization(message));
        }
        if self.access_token.is_empty() {
            return Err(Error::Decode(
                "token response has neither access_token nor error".into(),
            ));
        }

        let expires_at = match self.expires_in {
            0 => DateTime::<Utc>::MAX_UTC,
            secs => i64::try_from(secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        Ok(Session::new(
            self.access_token,
            expires_at,
            self.user_id.to_string(),
            self.email.filter(|e| !e.is_empty()),
        ))
    }
}
