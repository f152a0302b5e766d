use tracing::{info, warn};

use super::{MatchPolicy, PipelineOptions, QueryMode};
use crate::{
    error::{CatalogError, PipelineError},
    spotify::CatalogClient,
    types::{ResolvedTrack, SongCandidate, Track},
};

/// Only the top hit is ever considered.
pub const SEARCH_LIMIT: u32 = 1;

/// What a single catalog lookup produced for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedTrack),
    /// The search succeeded but returned nothing.
    NotFound,
    /// The top hit was rejected by [`MatchPolicy::RequireArtist`].
    Mismatch,
    /// The search call failed or timed out.
    TransientError(String),
}

pub fn build_query(candidate: &SongCandidate, mode: QueryMode) -> String {
    match (mode, candidate.artist.as_deref()) {
        (QueryMode::TitleAndArtist, Some(artist)) => {
            format!("{} artist:{}", candidate.title, artist)
        }
        _ => candidate.title.clone(),
    }
}

/// Looks `candidate` up in the catalog and picks at most one track.
///
/// Exactly one search is issued with a limit of one. Under
/// [`MatchPolicy::FirstResult`] the first hit is accepted as is. Search failures
/// come back as [`Resolution::TransientError`] so the caller can skip and carry on.
///
/// # Errors
///
/// Only a rejected credential is an error ([`PipelineError::AuthRejected`]); every
/// later call would fail the same way.
pub async fn resolve(
    candidate: &SongCandidate,
    catalog: &dyn CatalogClient,
    options: &PipelineOptions,
) -> Result<Resolution, PipelineError> {
    let query = build_query(candidate, options.query_mode);

    let hits = match catalog.search_tracks(&query, SEARCH_LIMIT).await {
        Ok(hits) => hits,
        Err(CatalogError::Unauthorized) => return Err(PipelineError::AuthRejected),
        Err(e) => {
            warn!(title = %candidate.title, error = %e, "skipping, search failed");
            return Ok(Resolution::TransientError(e.to_string()));
        }
    };

    let Some(hit) = hits.into_iter().next() else {
        info!(title = %candidate.title, "no match found, skipping");
        return Ok(Resolution::NotFound);
    };

    if options.match_policy == MatchPolicy::RequireArtist && !artist_matches(candidate, &hit) {
        info!(title = %candidate.title, uri = %hit.uri, "top hit has a different artist, skipping");
        return Ok(Resolution::Mismatch);
    }

    info!(title = %candidate.title, uri = %hit.uri, "found track");
    Ok(Resolution::Resolved(ResolvedTrack {
        candidate: candidate.clone(),
        track_id: hit.id,
        uri: hit.uri,
    }))
}

/// A candidate without an artist matches anything.
fn artist_matches(candidate: &SongCandidate, hit: &Track) -> bool {
    let Some(wanted) = candidate.artist.as_deref() else {
        return true;
    };
    let wanted = wanted.trim().to_lowercase();
    hit.artists
        .iter()
        .any(|artist| artist.name.trim().to_lowercase() == wanted)
}
