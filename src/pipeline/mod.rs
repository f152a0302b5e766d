//! # Playlist Pipeline
//!
//! Turns a prompt into a populated playlist:
//!
//! ```text
//! GET /me ──► title suggestion ──► create empty playlist
//!                                        │
//!          song suggestions ──► normalize ┘
//!                                        │
//!          for each candidate, in order: resolve ──► append
//!                                        │
//!                       re-fetch playlist ──► summarize
//! ```
//!
//! Candidates are handled strictly one after another so the playlist grows in
//! proposal order and a half-finished run still leaves a usable playlist behind.
//! Only the failures listed in [`PipelineError`] stop a run; a missing or
//! unaddable song is recorded in the report and the loop moves on.

pub mod assemble;
pub mod normalize;
pub mod report;
pub mod resolve;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{info, warn};

pub use normalize::NormalizeOptions;
pub use report::Tally;
pub use resolve::Resolution;

use crate::{
    error::{CatalogError, PipelineError},
    spotify::CatalogClient,
    suggest::SuggestionSource,
    types::{FailureReason, PlaylistDraft, ResolutionReport, ResolvedTrack, SongCandidate},
};

/// What to do when a resolved track is already in the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicatePolicy {
    /// Append it again.
    #[default]
    Allow,
    /// Record it as a skipped candidate.
    #[value(alias = "skip")]
    SkipRepeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueryMode {
    /// Search by title only.
    #[default]
    Title,
    /// Narrow the search with an `artist:` filter when the candidate names one.
    TitleAndArtist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MatchPolicy {
    /// Accept the top hit unconditionally.
    #[default]
    FirstResult,
    /// Reject the top hit unless one of its artists matches the candidate's.
    RequireArtist,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub playlist_public: bool,
    pub max_candidates: usize,
    pub dedupe_candidates: bool,
    pub duplicate_policy: DuplicatePolicy,
    pub query_mode: QueryMode,
    pub match_policy: MatchPolicy,
    pub fallback_title: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            playlist_public: false,
            max_candidates: 50,
            dedupe_candidates: false,
            duplicate_policy: DuplicatePolicy::default(),
            query_mode: QueryMode::default(),
            match_policy: MatchPolicy::default(),
            fallback_title: assemble::DEFAULT_TITLE.to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_candidates: self.max_candidates,
            dedupe: self.dedupe_candidates,
        }
    }
}

/// Inputs of one run, as posted to the generate playlist endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            access_token: Some(access_token.into()),
        }
    }

    /// Returns the trimmed prompt and access token.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MissingInput`] if either is absent or blank.
    pub fn validate(&self) -> Result<(&str, &str), PipelineError> {
        let prompt = non_blank(self.prompt.as_deref()).ok_or(PipelineError::MissingInput("prompt"))?;
        let token = non_blank(self.access_token.as_deref())
            .ok_or(PipelineError::MissingInput("accessToken"))?;
        Ok((prompt, token))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Result of handling one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Added(ResolvedTrack),
    Skipped(FailureReason),
}

/// Hooks for following a run as it happens. All methods default to no-ops.
pub trait RunObserver: Send + Sync {
    fn draft_created(&self, _draft: &PlaylistDraft) {}

    fn candidate_finished(
        &self,
        _index: usize,
        _total: usize,
        _candidate: &SongCandidate,
        _outcome: &StepOutcome,
    ) {
    }
}

impl RunObserver for () {}

/// Runs the whole prompt-to-playlist pipeline.
///
/// # Arguments
///
/// * `request` - Prompt and bearer token; both must be non-blank
/// * `catalog` - Catalog client authenticated with the request's token
/// * `suggestions` - Source of the title and the song list
/// * `options` - Playlist visibility, normalization and matching policies
/// * `observer` - Progress hooks, `&()` when nobody is watching
///
/// # Errors
///
/// Fails only before the playlist exists (missing input, user lookup, creation) or
/// when the catalog rejects the token. Everything else ends up in the report:
/// a broken song list becomes `suggestion_error` with zero candidates, a failed
/// final fetch becomes `hydration_error` with the draft standing in.
pub async fn generate_playlist(
    request: &GenerateRequest,
    catalog: &dyn CatalogClient,
    suggestions: &dyn SuggestionSource,
    options: &PipelineOptions,
    observer: &dyn RunObserver,
) -> Result<ResolutionReport, PipelineError> {
    let (prompt, _) = request.validate()?;

    info!("getting user profile");
    let user = catalog
        .current_user()
        .await
        .map_err(|e| PipelineError::from_catalog(e, PipelineError::UserLookupFailed))?;

    let suggested_title = match suggestions.suggest_title(prompt).await {
        Ok(title) => title,
        Err(e) => {
            warn!(error = %e, "title suggestion failed, using fallback title");
            None
        }
    };
    let title = assemble::playlist_title(suggested_title.as_deref(), &options.fallback_title);

    let mut draft =
        assemble::create_draft(&title, prompt, &user.id, options.playlist_public, catalog).await?;
    observer.draft_created(&draft);

    let (candidates, suggestion_error) = match suggestions.suggest_songs(prompt).await {
        Ok(Some(raw)) => match normalize::normalize(&raw, &options.normalize_options()) {
            Ok(candidates) => (candidates, None),
            Err(e) => {
                warn!(error = %e, "cannot parse song suggestions, continuing with an empty list");
                (Vec::new(), Some(e.to_string()))
            }
        },
        Ok(None) => {
            info!("no song suggestions returned, continuing with an empty list");
            (Vec::new(), None)
        }
        Err(e) => {
            warn!(error = %e, "song suggestion failed, continuing with an empty list");
            (Vec::new(), Some(e.to_string()))
        }
    };

    let total = candidates.len();
    let mut tally = Tally::default();
    for (index, candidate) in candidates.iter().enumerate() {
        let outcome = step(candidate, &mut draft, catalog, options).await?;
        observer.candidate_finished(index, total, candidate, &outcome);
        tally.record(candidate, &outcome);
    }

    info!(
        playlist_id = %draft.id,
        found = tally.successes,
        total,
        "all candidates processed"
    );

    let hydrated = catalog.get_playlist(&draft.id).await.map_err(|e| {
        warn!(error = %e, "failed to fetch final playlist, returning draft");
        e.to_string()
    });

    Ok(report::summarize(draft, hydrated, tally, total, suggestion_error))
}

/// Resolves one candidate and appends the hit.
async fn step(
    candidate: &SongCandidate,
    draft: &mut PlaylistDraft,
    catalog: &dyn CatalogClient,
    options: &PipelineOptions,
) -> Result<StepOutcome, PipelineError> {
    let track = match resolve::resolve(candidate, catalog, options).await? {
        Resolution::Resolved(track) => track,
        Resolution::NotFound => return Ok(StepOutcome::Skipped(FailureReason::NotFound)),
        Resolution::Mismatch => return Ok(StepOutcome::Skipped(FailureReason::ArtistMismatch)),
        Resolution::TransientError(e) => {
            return Ok(StepOutcome::Skipped(FailureReason::SearchFailed(e)));
        }
    };

    if options.duplicate_policy == DuplicatePolicy::SkipRepeated
        && draft.added_uris.contains(&track.uri)
    {
        info!(title = %candidate.title, uri = %track.uri, "already in playlist, skipping");
        return Ok(StepOutcome::Skipped(FailureReason::DuplicateTrack));
    }

    match assemble::append(draft, &track, catalog).await {
        Ok(()) => Ok(StepOutcome::Added(track)),
        Err(CatalogError::Unauthorized) => Err(PipelineError::AuthRejected),
        Err(e) => Ok(StepOutcome::Skipped(FailureReason::AddFailed(e.to_string()))),
    }
}
