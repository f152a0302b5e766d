//! # Spotify Integration Module
//!
//! This module is the catalog side of promptlist. It exposes the small set of
//! Spotify Web API operations the playlist pipeline needs behind the
//! [`CatalogClient`] trait, and implements that trait with [`SpotifyClient`], a thin
//! reqwest wrapper that carries one bearer credential for its whole lifetime.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (normalize, resolve, assemble, report)
//!          ↓
//! CatalogClient trait
//!          ↓
//! SpotifyClient
//!     ├── User (current profile)
//!     ├── Search (tracks, top-N)
//!     └── Playlist (create, add tracks, fetch)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user profile, needed for the playlist owner id
//! - `GET /search?type=track` - Track search used by the resolver
//! - `POST /users/{user_id}/playlists` - Create the empty playlist
//! - `POST /playlists/{playlist_id}/tracks` - Append tracks
//! - `GET /playlists/{playlist_id}` - Fetch the hydrated playlist
//!
//! ## Error Handling
//!
//! Every call returns a [`CatalogError`]. HTTP 401 maps to
//! [`CatalogError::Unauthorized`], any other non-success status to
//! [`CatalogError::Status`] with the response body attached, and a request that
//! exceeds the configured timeout to [`CatalogError::Timeout`]. Nothing is retried;
//! the pipeline decides whether a failure is fatal or a skip.
//!
//! ## Credentials
//!
//! The client never acquires or refreshes tokens. Whoever constructs it supplies a
//! bearer token obtained elsewhere.

mod playlist;
mod search;
mod user;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    config::CatalogConfig,
    error::{CatalogError, ConfigError},
    types::{AddTrackToPlaylistResponse, CreatePlaylistRequest, CreatePlaylistResponse, Playlist, Track, User},
};

/// Operations the pipeline needs from a track catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn current_user(&self) -> Result<User, CatalogError>;

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError>;

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, CatalogError>;

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError>;
}

/// Spotify Web API client bound to a single access token.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    /// Creates a client for `config.api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig, token: impl Into<String>) -> Result<Self, ConfigError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(http, &config.api_url, token))
    }

    /// Creates a client reusing an existing connection pool.
    pub fn with_client(http: Client, api_url: &str, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{uri}{path}", uri = self.api_url, path = path)
    }
}

/// Turns non-success responses into [`CatalogError`]s.
async fn check(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(CatalogError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn current_user(&self) -> Result<User, CatalogError> {
        self.get_current_user().await
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        self.search(query, limit).await
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        self.create(owner_id, request).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, CatalogError> {
        self.add_uris(playlist_id, uris).await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        self.fetch(playlist_id).await
    }
}
