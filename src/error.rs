//! Error types for the catalog, suggestion and pipeline layers.
//!
//! Only [`PipelineError`] aborts a run. Catalog and suggestion failures are
//! absorbed by the pipeline wherever a playlist container already exists.

use thiserror::Error;

/// Failure of a single call against the Spotify Web API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The bearer credential was rejected (HTTP 401).
    #[error("access token rejected by catalog")]
    Unauthorized,

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog request timed out")]
    Timeout,

    #[error("catalog request failed: {0}")]
    Request(reqwest::Error),

    #[error("cannot decode catalog response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Request(err)
        }
    }
}

/// Failure of the language model collaborator.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("suggestion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The song list could not be parsed into the expected `{"songs": [...]}` shape.
    #[error("malformed suggestion data: {0}")]
    MalformedSuggestionData(String),
}

/// Conditions that abort a whole run before a report is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required parameter: {0}")]
    MissingInput(&'static str),

    #[error("access token rejected")]
    AuthRejected,

    #[error("failed to get user profile: {0}")]
    UserLookupFailed(CatalogError),

    #[error("failed to create playlist: {0}")]
    PlaylistCreationFailed(CatalogError),
}

impl PipelineError {
    /// Wraps a catalog error, promoting credential rejection to [`PipelineError::AuthRejected`].
    pub(crate) fn from_catalog(err: CatalogError, wrap: fn(CatalogError) -> Self) -> Self {
        match err {
            CatalogError::Unauthorized => PipelineError::AuthRejected,
            other => wrap(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },

    #[error("cannot build http client: {0}")]
    Client(#[from] reqwest::Error),
}
