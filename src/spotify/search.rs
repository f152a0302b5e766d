use tracing::debug;

use super::{SpotifyClient, check};
use crate::{
    error::CatalogError,
    types::{SearchResponse, Track},
};

impl SpotifyClient {
    /// Searches the catalog for tracks matching `query`.
    ///
    /// The query is passed through verbatim, so Spotify field filters such as
    /// `artist:` work. Results keep the catalog's ranking; an empty vector means
    /// the search succeeded but found nothing.
    ///
    /// # Arguments
    ///
    /// * `query` - Free text search query
    /// * `limit` - Maximum number of tracks to return (1-50)
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unauthorized`] for a rejected token
    /// - [`CatalogError::Status`] for any other non-success status
    /// - [`CatalogError::Timeout`] if the configured timeout elapses
    ///
    /// # Example
    ///
    /// ```ignore
    /// let tracks = client.search("Yesterday", 1).await?;
    /// if let Some(track) = tracks.first() {
    ///     println!("{}", track.uri);
    /// }
    /// ```
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(self.url("/search"))
            .bearer_auth(&self.token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await?;

        let result = check(response).await?.json::<SearchResponse>().await?;
        let items = result.tracks.map(|page| page.items).unwrap_or_default();
        debug!(query, hits = items.len(), "track search finished");

        Ok(items)
    }
}
