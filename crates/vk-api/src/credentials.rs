//! Application credentials registered with VK
//!
//! Validated once at construction and immutable afterwards. The app
//! secret is wrapped in `Secret` so it never shows up in logs or debug
//! output.

use common::Secret;
use url::Url;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Credentials {
    app_id: String,
    secret: Secret<String>,
    scopes: Vec<String>,
    callback_url: Url,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// Fails with `Error::Construction` when the app id or secret is blank,
    /// or when the callback is not an absolute URL.
    pub fn new(
        app_id: impl Into<String>,
        secret: impl Into<Secret<String>>,
        scopes: impl IntoIterator<Item = impl Into<String>>,
        callback_url: &str,
    ) -> Result<Self> {
        let app_id = app_id.into();
        let secret = secret.into();

        if app_id.trim().is_empty() {
            return Err(Error::Construction("app id must not be empty".into()));
        }
        if secret.expose().trim().is_empty() {
            return Err(Error::Construction("app secret must not be empty".into()));
        }
        let callback_url = Url::parse(callback_url).map_err(|e| {
            Error::Construction(format!("callback URL {callback_url:?} is invalid: {e}"))
        })?;
        if callback_url.cannot_be_a_base() {
            return Err(Error::Construction(format!(
                "callback URL {callback_url} must be a hierarchical URL"
            )));
        }

        Ok(Self {
            app_id,
            secret,
            scopes: scopes.into_iter().map(Into::into).collect(),
            callback_url,
        })
    }

    /// Application id shown at vk.com/apps, sent as `client_id`
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Protected key, sent only on the server-to-server code exchange
    pub fn secret(&self) -> &Secret<String> {
        &self.secret
    }

    /// Requested permissions, comma-joined into `scope`
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Redirect target registered for the app; always has a path
    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }
}
