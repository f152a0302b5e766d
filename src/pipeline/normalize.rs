use std::collections::HashSet;

use serde_json::Value;

use crate::{error::SuggestionError, types::SongCandidate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Upper bound on the number of candidates kept. `0` disables the cap.
    pub max_candidates: usize,
    /// Drop repeated `(title, artist)` pairs, compared case-insensitively.
    pub dedupe: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            dedupe: false,
        }
    }
}

/// Parses the suggestion service's raw song list into candidates.
///
/// The payload must be a JSON object with a `songs` array. Entries without a
/// usable title are dropped, titles and artists are trimmed and the service's
/// ordering is kept as is. A payload wrapped in a Markdown code fence is accepted.
///
/// # Errors
///
/// Returns [`SuggestionError::MalformedSuggestionData`] if the payload is not JSON
/// or has no `songs` array. Callers continue with an empty list in that case.
///
/// # Example
///
/// ```ignore
/// let raw = r#"{"songs": [{"title": " Yesterday ", "artist": "The Beatles"}, {"title": ""}]}"#;
/// let candidates = normalize(raw, &NormalizeOptions::default())?;
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(candidates[0].title, "Yesterday");
/// ```
pub fn normalize(raw: &str, options: &NormalizeOptions) -> Result<Vec<SongCandidate>, SuggestionError> {
    let payload: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| SuggestionError::MalformedSuggestionData(e.to_string()))?;

    let songs = payload
        .get("songs")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SuggestionError::MalformedSuggestionData("missing \"songs\" array".to_string())
        })?;

    let candidates = songs
        .iter()
        .filter_map(|song| {
            let title = song.get("title").and_then(Value::as_str)?;
            let artist = song.get("artist").and_then(Value::as_str);
            Some(SongCandidate::new(title, artist))
        })
        .collect();

    Ok(normalize_candidates(candidates, options))
}

/// Cleans an already typed candidate list.
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_candidates(
    candidates: Vec<SongCandidate>,
    options: &NormalizeOptions,
) -> Vec<SongCandidate> {
    let mut seen = HashSet::new();
    let cap = match options.max_candidates {
        0 => usize::MAX,
        n => n,
    };

    candidates
        .into_iter()
        .filter_map(|candidate| {
            let title = candidate.title.trim();
            if title.is_empty() {
                return None;
            }
            let artist = candidate
                .artist
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty());
            Some(SongCandidate::new(title, artist))
        })
        .filter(|candidate| {
            !options.dedupe
                || seen.insert((
                    candidate.title.to_lowercase(),
                    candidate.artist.as_ref().map(|a| a.to_lowercase()),
                ))
        })
        .take(cap)
        .collect()
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
