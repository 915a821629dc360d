//! Error types for the graph-apponly application.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use thiserror::Error;

/// Errors that end the process: bad configuration, a failed remote call in
/// the command loop, or broken terminal I/O.
///
/// Bootstrap failures travel as `anyhow` chains around [`AuthError`] instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the client credentials token exchange.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("Credentials rejected: {0}")]
    InvalidCredentials(String),

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}

/// Microsoft Graph API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Graph API request failed: {0}")]
    GraphRequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseFailed(String),

    #[error("Unauthorized (401): Token may be expired")]
    Unauthorized,

    #[error("Forbidden (403): Insufficient permissions")]
    Forbidden,

    #[error("Rate limited (429): Too many requests")]
    RateLimited,
}

/// Failure of a remote capability invoked by a menu action.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppError {
    /// Returns a user-friendly hint to print after the diagnostic.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Directory(DirectoryError::Auth(e)) => e.user_message(),
            Self::Directory(DirectoryError::Api(e)) => e.user_message(),
            Self::Config(_) => {
                "Configuration error. Check AZURE_CLIENT_ID, AZURE_TENANT_ID and AZURE_CLIENT_SECRET."
            }
            Self::Io(_) => "Terminal I/O failed.",
        }
    }
}

impl AuthError {
    /// Returns a user-friendly hint to print after the diagnostic.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials(_) => {
                "The identity platform rejected the app credentials. Check the client secret."
            }
            Self::TokenRequestFailed(_) => "Could not reach the identity platform.",
            Self::MalformedResponse(_) => "Unexpected response from the identity platform.",
        }
    }
}

impl ApiError {
    /// Returns a user-friendly hint to print after the diagnostic.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Authentication expired. Restart to acquire a new token.",
            Self::Forbidden => {
                "Insufficient permissions. Grant the app User.Read.All and Application.Read.All."
            }
            Self::RateLimited => "Too many requests. Please wait a moment.",
            Self::GraphRequestFailed(_) | Self::ParseFailed(_) => {
                "Microsoft Graph request failed. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AppError::Config("missing".into());
        assert!(err.user_message().contains("AZURE_CLIENT_ID"));

        let err = AppError::Directory(DirectoryError::Api(ApiError::RateLimited));
        assert_eq!(err.user_message(), "Too many requests. Please wait a moment.");

        let err = AppError::Directory(AuthError::InvalidCredentials("HTTP 401".into()).into());
        assert!(err.user_message().contains("client secret"));

        let err = AppError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert_eq!(err.user_message(), "Terminal I/O failed.");
    }

    #[test]
    fn test_directory_error_is_transparent() {
        let err = DirectoryError::from(ApiError::Forbidden);
        assert_eq!(err.to_string(), "Forbidden (403): Insufficient permissions");
    }
}
