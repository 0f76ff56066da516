//! Types shared by the VK API client and the login service

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
