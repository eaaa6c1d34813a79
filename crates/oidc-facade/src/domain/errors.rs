//! # Domain Errors

use thiserror::Error;

/// Errors raised by an OIDC client implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OidcClientError {
    /// Client settings cannot produce a request.
    #[error("Invalid client settings: {0}")]
    InvalidSettings(String),

    /// An endpoint URL failed to parse.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Failure reported by the underlying client library.
    #[error("Client error: {0}")]
    Client(String),
}

/// Errors surfaced by the facade.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// Forwarded client failure.
    #[error(transparent)]
    Client(#[from] OidcClientError),

    /// The store was dropped before the awaited state appeared.
    #[error("Store closed")]
    StoreClosed,

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_transparent() {
        let err: FacadeError = OidcClientError::Client("storage unavailable".to_string()).into();
        assert_eq!(err.to_string(), "Client error: storage unavailable");
    }

    #[test]
    fn test_url_error_conversion() {
        let parse = url::Url::parse("not a url").unwrap_err();
        let err: OidcClientError = parse.into();
        assert!(err.to_string().starts_with("Invalid URL"));
    }

    #[test]
    fn test_invalid_settings_message() {
        let err = OidcClientError::InvalidSettings("client_id is required".to_string());
        assert!(err.to_string().contains("client_id"));
    }
}
