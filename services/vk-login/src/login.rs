//! Callback handling for a single login attempt
//!
//! VK redirects the browser to the callback URL with either `code` and
//! `state`, or `error` and `error_description` when the user declines.
//! A successful callback exchanges the code, looks up the user's own
//! profile and signals the server to shut down.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tokio::sync::Notify;
use tracing::{info, warn};
use vk_api::{ApiClient, ApiConfig, Authenticator, UserProfile};

use crate::config::LookupConfig;
use crate::error::{Error, Result};

/// Shared state for the callback route
#[derive(Clone)]
pub struct LoginState {
    pub auth: Arc<Authenticator>,
    pub api: ApiConfig,
    pub lookup: Arc<LookupConfig>,
    pub http: reqwest::Client,
    /// Random value embedded in the authorization URL
    pub expected_state: Arc<str>,
    /// Fired once a login completes
    pub completed: Arc<Notify>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub async fn callback_handler(
    State(state): State<LoginState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<serde_json::Value>> {
    let result = complete_login(&state, params).await;
    match &result {
        Ok(_) => state.completed.notify_one(),
        Err(e) => warn!(error = %e, "login attempt failed"),
    }
    result.map(Json)
}

async fn complete_login(state: &LoginState, params: CallbackParams) -> Result<serde_json::Value> {
    if let Some(error) = params.error {
        return Err(Error::Denied(params.error_description.unwrap_or(error)));
    }
    if params.state.as_deref() != Some(&*state.expected_state) {
        return Err(Error::StateMismatch);
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(Error::MissingCode)?;

    let session = state.auth.exchange_code(&code).await.map_err(Error::Exchange)?;

    let client = ApiClient::new(state.api.clone(), session.clone())
        .map_err(Error::Lookup)?
        .with_http_client(state.http.clone());
    let profiles: Vec<UserProfile> = client
        .users_get(
            &[session.user_id()],
            state.lookup.fields.as_slice(),
            state.lookup.name_case.as_str(),
        )
        .await
        .map_err(Error::Lookup)?;

    let profile = profiles.into_iter().next();
    if let Some(p) = &profile {
        info!(
            user_id = p.id,
            first_name = %p.first_name,
            last_name = %p.last_name,
            "logged in"
        );
    }

    Ok(serde_json::json!({
        "status": "ok",
        "user_id": session.user_id(),
        "email": session.email(),
        "expires_at": session.expires_at().to_rfc3339(),
        "profile": profile,
    }))
}
