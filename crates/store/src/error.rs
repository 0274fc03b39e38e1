//! The errors the state layer can surface.
//!
//! The taxonomy the presentation layer cares about:
//!
//! - [`Auth`] for HTTP 401 (prompt for a new personal access token),
//! - [`Api`] for any other unsuccessful response, carrying the API's
//!   structured error payload when it could be parsed,
//! - [`Network`] for transport-level failures with no payload at all.
//!
//! [`Auth`]: StoreError::Auth
//! [`Api`]: StoreError::Api
//! [`Network`]: StoreError::Network

use std::fmt;

use api_types::ErrorObject;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// The first structured error object from an `{errors: [...]}` response
/// body, or a generic stand-in when the body was unparseable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    pub status: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ErrorDetail {
    /// Fallback used when a non-success response carries no readable
    /// `{errors: [...]}` document.
    pub fn generic(status: StatusCode) -> Self {
        Self {
            status: Some(status.as_u16().to_string()),
            title: None,
            detail: Some("the API returned an unreadable error response".to_string()),
        }
    }
}

impl From<ErrorObject> for ErrorDetail {
    fn from(error: ErrorObject) -> Self {
        Self {
            status: error.status,
            title: error.title,
            detail: error.detail,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(status) = &self.status {
            write!(f, "{status}")?;
            wrote = true;
        }
        if let Some(title) = &self.title {
            if wrote {
                write!(f, " ")?;
            }
            write!(f, "{title}")?;
            wrote = true;
        }
        if let Some(detail) = &self.detail {
            if wrote {
                write!(f, ": ")?;
            }
            write!(f, "{detail}")?;
            wrote = true;
        }
        if !wrote {
            write!(f, "unknown error")?;
        }
        Ok(())
    }
}

/// State layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API rejected the personal access token (HTTP 401).
    #[error("authentication failed: {0}")]
    Auth(ErrorDetail),
    /// Any other unsuccessful API response.
    #[error("api request failed: {0}")]
    Api(ErrorDetail),
    /// Transport-level failure, nothing came back.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// No personal access token has been entered yet.
    #[error("no personal access token is configured")]
    MissingApiKey,
    #[error("background task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// `true` for errors the UI should answer with a re-authentication
    /// prompt instead of a generic diagnostic dump.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_display_joins_present_fields() {
        let detail = ErrorDetail {
            status: Some("401".to_string()),
            title: Some("Not Authorized".to_string()),
            detail: Some("The request was not authenticated.".to_string()),
        };
        assert_eq!(
            detail.to_string(),
            "401 Not Authorized: The request was not authenticated."
        );

        let sparse = ErrorDetail {
            status: None,
            title: None,
            detail: Some("boom".to_string()),
        };
        assert_eq!(sparse.to_string(), "boom");

        assert_eq!(ErrorDetail::default().to_string(), "unknown error");
    }

    #[test]
    fn auth_errors_are_distinguished() {
        let auth = StoreError::Auth(ErrorDetail::generic(StatusCode::UNAUTHORIZED));
        let api = StoreError::Api(ErrorDetail::generic(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(auth.is_auth());
        assert!(StoreError::MissingApiKey.is_auth());
        assert!(!api.is_auth());
    }
}
