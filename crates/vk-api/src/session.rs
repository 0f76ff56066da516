//! Authenticated session state
//!
//! A `Session` is the result of one successful code exchange. It is a
//! plain value: the caller owns it and hands it to `ApiClient`. Nothing in
//! this crate mutates a session after creation.

use chrono::{DateTime, TimeDelta, Utc};
use common::Secret;

#[derive(Debug, Clone)]
pub struct Session {
    access_token: Secret<String>,
    /// Absolute expiry; `DateTime::<Utc>::MAX_UTC` for non-expiring tokens
    expires_at: DateTime<Utc>,
    /// Decimal rendering of the provider's numeric user id
    user_id: String,
    /// Present only when the `email` scope was granted
    email: Option<String>,
}

impl Session {
    /// Assemble a session from already-validated parts.
    pub fn new(
        access_token: impl Into<Secret<String>>,
        expires_at: DateTime<Utc>,
        user_id: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
            user_id: user_id.into(),
            email,
        }
    }

    /// Token appended as `access_token` to every method call
    pub fn access_token(&self) -> &Secret<String> {
        &self.access_token
    }

    /// Absolute expiry instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Id of the user who granted access
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Email, when the `email` scope was granted
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Whether the token is no longer valid at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token is no longer valid right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, zero once expired.
    pub fn expires_in(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.expires_at - now).max(TimeDelta::zero())
    }
}
