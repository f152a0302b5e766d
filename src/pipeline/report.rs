use super::StepOutcome;
use crate::types::{
    CandidateFailure, FailureTableRow, GeneratePlaylistResponse, Playlist, PlaylistBody,
    PlaylistDraft, ResolutionReport, SongCandidate,
};

/// Running count of step outcomes during a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally {
    pub successes: usize,
    pub failures: Vec<CandidateFailure>,
}

impl Tally {
    pub fn record(&mut self, candidate: &SongCandidate, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Added(_) => self.successes += 1,
            StepOutcome::Skipped(reason) => self.failures.push(CandidateFailure {
                candidate: candidate.clone(),
                reason: reason.clone(),
            }),
        }
    }

    pub fn attempted(&self) -> usize {
        self.successes + self.failures.len()
    }
}

/// Builds the final report. Pure aggregation, no I/O.
///
/// `hydrated` is the result of re-fetching the playlist; on failure the report
/// keeps the draft and records the reason as an advisory.
pub fn summarize(
    draft: PlaylistDraft,
    hydrated: Result<Playlist, String>,
    tally: Tally,
    total_candidates: usize,
    suggestion_error: Option<String>,
) -> ResolutionReport {
    debug_assert!(tally.successes <= total_candidates);
    debug_assert_eq!(tally.successes, draft.added_uris.len());

    let (playlist, hydration_error) = match hydrated {
        Ok(playlist) => (Some(playlist), None),
        Err(e) => (None, Some(e)),
    };

    ResolutionReport {
        draft,
        playlist,
        tracks_found: tally.successes,
        total_suggested: total_candidates,
        failures: tally.failures,
        suggestion_error,
        hydration_error,
    }
}

impl ResolutionReport {
    pub fn to_response(&self) -> GeneratePlaylistResponse<'_> {
        let playlist = match &self.playlist {
            Some(playlist) => PlaylistBody::Hydrated(playlist),
            None => PlaylistBody::Draft(&self.draft),
        };

        GeneratePlaylistResponse {
            success: true,
            playlist,
            tracks_found: self.tracks_found,
            total_suggested: self.total_suggested,
            failures: &self.failures,
            suggestion_error: self.suggestion_error.as_deref(),
            hydration_error: self.hydration_error.as_deref(),
        }
    }

    pub fn failure_rows(&self) -> Vec<FailureTableRow> {
        self.failures
            .iter()
            .map(|failure| FailureTableRow {
                title: failure.candidate.title.clone(),
                artist: failure.candidate.artist.clone().unwrap_or_default(),
                reason: failure.reason.to_string(),
            })
            .collect()
    }
}
