//! Configuration error types

use thiserror::Error;

/// Errors raised while loading service configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_problem() {
        let err = Error::Config("app_id must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: app_id must not be empty"
        );
    }

    #[test]
    fn io_error_converts_with_prefix() {
        let err: Error =
            std::io::Error::new(std::io::ErrorKind::NotFound, "vk-login.toml").into();
        assert!(err.to_string().starts_with("I/O error:"), "got: {err}");
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn toml_error_converts() {
        let parse_err = toml::from_str::<toml::Table>("app_id = ").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Toml(_)), "got: {err:?}");
    }
}
