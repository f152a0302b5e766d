use tracing::{info, warn};

use crate::{
    error::{CatalogError, PipelineError},
    spotify::CatalogClient,
    types::{CreatePlaylistRequest, PlaylistDraft, ResolvedTrack},
};

pub const DEFAULT_TITLE: &str = "Promptlist Mix";

/// Picks the playlist title, falling back when the suggestion is unusable.
///
/// Surrounding whitespace and one matching pair of wrapping quotes are removed
/// since language models like to wrap a lone title in them.
pub fn playlist_title(suggested: Option<&str>, fallback: &str) -> String {
    let cleaned = suggested
        .map(|title| strip_wrapping_quotes(title.trim()).trim())
        .filter(|title| !title.is_empty());

    match cleaned {
        Some(title) => title.to_string(),
        None if !fallback.trim().is_empty() => fallback.trim().to_string(),
        None => DEFAULT_TITLE.to_string(),
    }
}

fn strip_wrapping_quotes(title: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&quote| title.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(title)
}

pub fn playlist_description(prompt: &str) -> String {
    format!("A Promptlist playlist | AI prompt used: {}", prompt)
}

/// Creates the empty playlist every accepted track is appended to.
///
/// # Errors
///
/// [`PipelineError::PlaylistCreationFailed`] for any failed create call, or
/// [`PipelineError::AuthRejected`] if the token was refused.
pub async fn create_draft(
    title: &str,
    prompt: &str,
    owner_id: &str,
    is_public: bool,
    catalog: &dyn CatalogClient,
) -> Result<PlaylistDraft, PipelineError> {
    let request = CreatePlaylistRequest {
        name: title.to_string(),
        description: playlist_description(prompt),
        public: is_public,
        collaborative: false,
    };

    let created = catalog
        .create_playlist(owner_id, &request)
        .await
        .map_err(|e| PipelineError::from_catalog(e, PipelineError::PlaylistCreationFailed))?;

    info!(playlist_id = %created.id, title, "empty playlist created");

    Ok(PlaylistDraft {
        id: created.id,
        title: request.name,
        description: request.description,
        is_public,
        added_uris: Vec::new(),
    })
}

/// Adds one track to the end of the draft.
///
/// `draft.added_uris` only grows when the catalog accepted the track, so it always
/// mirrors what was actually appended.
pub async fn append(
    draft: &mut PlaylistDraft,
    track: &ResolvedTrack,
    catalog: &dyn CatalogClient,
) -> Result<(), CatalogError> {
    let uris = [track.uri.clone()];
    match catalog.add_tracks(&draft.id, &uris).await {
        Ok(_) => {
            draft.added_uris.push(track.uri.clone());
            info!(title = %track.candidate.title, uri = %track.uri, "added to playlist");
            Ok(())
        }
        Err(e) => {
            warn!(title = %track.candidate.title, error = %e, "failed to add to playlist");
            Err(e)
        }
    }
}
