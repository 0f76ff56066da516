//! VKontakte API client
//!
//! Implements the OAuth2 authorization-code flow against `oauth.vk.com`
//! and the signed method-call convention of `api.vk.com`. Only one data
//! method is covered: `users.get`.
//!
//! Flow:
//! 1. Build `Credentials` and an `Authenticator`
//! 2. Send the user to `Authenticator::authorization_url()`
//! 3. The provider redirects to the callback with `?code=...`
//! 4. `Authenticator::exchange_code()` turns the code into a `Session`
//! 5. `ApiClient::new(config, session)` signs every method call with it

pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod epoch;
pub mod error;
pub mod session;
pub mod token;
mod transport;
pub mod users;

pub use api::ApiClient;
pub use auth::Authenticator;
pub use config::ApiConfig;
pub use constants::*;
pub use credentials::Credentials;
pub use epoch::EpochTime;
pub use error::{Error, Result};
pub use session::Session;
pub use token::TokenResponse;
pub use users::{NameCase, UserProfile};
