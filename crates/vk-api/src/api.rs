//! Signed method calls against `api.vk.com`
//!
//! Every call carries `v`, `https` and `access_token` ahead of its own
//! parameters. Calls are single GETs: no retry, no pagination, no rate
//! limiting.

use tracing::{info, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::transport;
use crate::users::{Envelope, NameCase, UserProfile};

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    api_base: Url,
    session: Session,
    http: reqwest::Client,
}

impl ApiClient {
    /// Fails with `Error::Construction` if `config.api_base_url` is not a URL.
    pub fn new(config: ApiConfig, session: Session) -> Result<Self> {
        Ok(Self {
            api_base: config.api_base()?,
            config,
            session,
            http: reqwest::Client::new(),
        })
    }

    /// Replace the HTTP client, e.g. with one carrying a request timeout.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Swap in a fresh session after re-authentication.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Signed URL for `method` with `params` appended in order.
    pub fn method_url(&self, method: &str, params: &[(&str, &str)]) -> Result<Url> {
        if !is_method_name(method) {
            return Err(Error::Validation(format!("invalid method name {method:?}")));
        }
        let mut url = self
            .api_base
            .join(method)
            .map_err(|e| Error::Validation(format!("invalid method name {method:?}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("v", &self.config.version)
                .append_pair("https", self.config.https_flag())
                .append_pair("access_token", self.session.access_token().expose());
            query.extend_pairs(params);
        }
        Ok(url)
    }

    /// Look up user profiles (https://vk.com/dev/users.get).
    ///
    /// `ids` are numeric ids or screen names, at most `MAX_USER_IDS` of
    /// them; the limit is not checked here. `name_case` must be one of
    /// `nom`, `gen`, `dat`, `acc`, `ins`, `abl`. Both arguments are
    /// validated before any request is made.
    #[instrument(skip_all, fields(ids = ids.len(), name_case = name_case))]
    pub async fn users_get(
        &self,
        ids: &[impl AsRef<str>],
        fields: &[impl AsRef<str>],
        name_case: &str,
    ) -> Result<Vec<UserProfile>> {
        if ids.is_empty() {
            return Err(Error::Validation(
                "you must pass at least one id or screen_name".into(),
            ));
        }
        let name_case: NameCase = name_case.parse()?;

        let user_ids = join(ids);
        let fields = join(fields);
        let url = self.method_url(
            "users.get",
            &[
                ("user_ids", user_ids.as_str()),
                ("fields", fields.as_str()),
                ("name_case", name_case.as_str()),
            ],
        )?;

        let users = self.call::<Vec<UserProfile>>(url).await?;
        info!(returned = users.len(), "users.get succeeded");
        Ok(users)
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let raw = transport::get(&self.http, url).await?;
        let envelope: Envelope<T> = transport::decode(&raw)?;

        match envelope {
            Envelope {
                error: Some(err), ..
            } => {
                warn!(code = err.error_code, message = %err.error_msg, "API returned error");
                Err(Error::Api {
                    code: err.error_code,
                    message: err.error_msg,
                })
            }
            Envelope {
                response: Some(response),
                ..
            } => Ok(response),
            Envelope { .. } => Err(Error::Decode(
                "response envelope has neither response nor error".into(),
            )),
        }
    }
}

/// Method names look like `users.get`: ASCII letters, digits, `_` and
/// `.`, with at least one letter so `.` and `..` can't escape the base path.
fn is_method_name(method: &str) -> bool {
    method.chars().any(|c| c.is_ascii_alphabetic())
        && method
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn join(items: &[impl AsRef<str>]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
