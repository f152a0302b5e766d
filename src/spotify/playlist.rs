use tracing::debug;

use super::{SpotifyClient, check};
use crate::{
    error::CatalogError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Playlist,
    },
};

impl SpotifyClient {
    /// Creates an empty playlist owned by `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - Spotify user id, usually taken from `GET /me`
    /// * `request` - Name, description and visibility of the new playlist
    ///
    /// # Errors
    ///
    /// Any non-success status is returned as a [`CatalogError`]; the caller treats
    /// it as fatal since there is nothing to fill without a container.
    pub async fn create(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let api_url = self.url(&format!("/users/{user_id}/playlists", user_id = owner_id));

        let response = self
            .http
            .post(&api_url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        Ok(check(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?)
    }

    /// Appends `uris` to the end of a playlist, in order.
    ///
    /// Spotify accepts at most 100 URIs per call; the pipeline sends one at a time.
    /// A success status means the tracks were added, whatever the body holds.
    pub async fn add_uris(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, CatalogError> {
        let api_url = self.url(&format!("/playlists/{id}/tracks", id = playlist_id));
        let request = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(&api_url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let body = check(response).await?.text().await?;
        let added = serde_json::from_str::<AddTrackToPlaylistResponse>(&body).unwrap_or_else(|e| {
            debug!(playlist_id, error = %e, "add tracks response without snapshot");
            AddTrackToPlaylistResponse::default()
        });

        Ok(added)
    }

    /// Fetches a playlist including its track items.
    pub async fn fetch(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        let api_url = self.url(&format!("/playlists/{id}", id = playlist_id));

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(check(response).await?.json::<Playlist>().await?)
    }
}
