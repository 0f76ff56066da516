//! Per-client API configuration
//!
//! Version, endpoints and the transport flag are injected here instead of
//! living in process-wide globals, so two clients never influence each
//! other. `ApiConfig` deserializes from a partial table: every missing key
//! falls back to the production default.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    API_BASE_URL, API_VERSION, AUTHORIZE_ENDPOINT, DISPLAY_MODE, TOKEN_ENDPOINT,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Sent as `v` on method calls and on the authorization URL
    pub version: String,
    /// Method dispatch base; must end with `/`
    pub api_base_url: String,
    pub authorize_url: String,
    pub token_url: String,
    /// Ask the API to return `https://` links in responses (`https=1`)
    pub https: bool,
    /// Authorization page layout
    pub display: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: API_VERSION.to_owned(),
            api_base_url: API_BASE_URL.to_owned(),
            authorize_url: AUTHORIZE_ENDPOINT.to_owned(),
            token_url: TOKEN_ENDPOINT.to_owned(),
            https: true,
            display: DISPLAY_MODE.to_owned(),
        }
    }
}

impl ApiConfig {
    /// Value of the `https` query parameter
    pub fn https_flag(&self) -> &'static str {
        if self.https { "1" } else { "0" }
    }

    /// Parse the method base URL, normalizing a missing trailing slash so
    /// that joining a method name appends instead of replacing the last
    /// path segment.
    pub(crate) fn api_base(&self) -> Result<Url> {
        let raw = if self.api_base_url.ends_with('/') {
            self.api_base_url.clone()
        } else {
            format!("{}/", self.api_base_url)
        };
        parse_endpoint("api_base_url", &raw)
    }

    pub(crate) fn authorize_endpoint(&self) -> Result<Url> {
        parse_endpoint("authorize_url", &self.authorize_url)
    }

    pub(crate) fn token_endpoint(&self) -> Result<Url> {
        parse_endpoint("token_url", &self.token_url)
    }
}

fn parse_endpoint(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Construction(format!("{field} is not a valid URL ({raw}): {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Construction(format!(
            "{field} must be a hierarchical URL, got: {raw}"
        )));
    }
    Ok(url)
}
