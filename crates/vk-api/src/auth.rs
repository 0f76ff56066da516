//! OAuth2 authorization-code flow
//!
//! Two steps against `oauth.vk.com`:
//! 1. `authorization_url()` - where the user is sent to grant scopes
//! 2. `exchange_code()` - server-to-server swap of the returned code for
//!    an access token
//!
//! Unlike most providers, VK expects the exchange as a GET with the app
//! secret in the query string.

use chrono::Utc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::token::TokenResponse;
use crate::transport;

#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: Credentials,
    config: ApiConfig,
    authorize_endpoint: Url,
    token_endpoint: Url,
    http: reqwest::Client,
}

impl Authenticator {
    /// Fails with `Error::Construction` if a configured endpoint is not a URL.
    pub fn new(credentials: Credentials, config: ApiConfig) -> Result<Self> {
        Ok(Self {
            authorize_endpoint: config.authorize_endpoint()?,
            token_endpoint: config.token_endpoint()?,
            credentials,
            config,
            http: reqwest::Client::new(),
        })
    }

    /// Replace the HTTP client, e.g. with one carrying a request timeout.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the authorization page URL.
    ///
    /// `scope` is omitted entirely when no scopes are configured, and
    /// `state` when it is empty. The provider echoes `state` back to the
    /// callback unchanged.
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.authorize_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", self.credentials.app_id());
            if !self.credentials.scopes().is_empty() {
                query.append_pair("scope", &self.credentials.scopes().join(","));
            }
            query
                .append_pair("redirect_uri", self.credentials.callback_url().as_str())
                .append_pair("display", &self.config.display)
                .append_pair("v", &self.config.version)
                .append_pair("response_type", "code");
            if !state.is_empty() {
                query.append_pair("state", state);
            }
        }
        url
    }

    /// URL of the code exchange request. Contains the app secret.
    pub fn token_request_url(&self, code: &str) -> Url {
        let mut url = self.token_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.credentials.app_id())
            .append_pair("client_secret", self.credentials.secret().expose())
            .append_pair("code", code)
            .append_pair("redirect_uri", self.credentials.callback_url().as_str());
        url
    }

    /// Exchange an authorization code for a `Session`.
    ///
    /// The returned session replaces whatever the caller held before; on
    /// error nothing is produced, so an existing session stays as it was.
    #[instrument(skip_all, fields(app_id = %self.credentials.app_id()))]
    pub async fn exchange_code(&self, code: &str) -> Result<Session> {
        if code.is_empty() {
            return Err(Error::Validation("authorization code must not be empty".into()));
        }

        let raw = transport::get(&self.http, self.token_request_url(code)).await?;
        let token: TokenResponse = transport::decode(&raw)?;

        let session = token.into_session(Utc::now()).inspect_err(|e| {
            if let Error::Authorization(reason) = e {
                warn!(reason = %reason, "token exchange rejected");
            }
        })?;

        info!(
            user_id = session.user_id(),
            expires_at = %session.expires_at(),
            "token exchange succeeded"
        );
        Ok(session)
    }
}
