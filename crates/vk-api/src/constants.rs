//! VK endpoint defaults
//!
//! These are the production values. Every one of them can be overridden
//! per client through `ApiConfig`.

/// API version sent as `v` on every call
pub const API_VERSION: &str = "5.12";

/// Base for method calls; the method name is appended as the last path segment
pub const API_BASE_URL: &str = "https://api.vk.com/method/";

/// OAuth authorization page the user is redirected to
pub const AUTHORIZE_ENDPOINT: &str = "https://oauth.vk.com/authorize";

/// Server-to-server code exchange endpoint
pub const TOKEN_ENDPOINT: &str = "https://oauth.vk.com/access_token";

/// Authorization page layout (`page`, `popup` or `mobile`)
pub const DISPLAY_MODE: &str = "page";

/// Provider-documented maximum ids per `users.get` call.
/// Not enforced by the client; staying under it is the caller's job.
pub const MAX_USER_IDS: usize = 1000;
