use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

/// A playlist as returned by `GET /playlists/{id}`, including its track items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub tracks: PlaylistTracks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// A song proposed by the suggestion service, not yet verified against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongCandidate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

impl SongCandidate {
    pub fn new(title: impl Into<String>, artist: Option<&str>) -> Self {
        Self {
            title: title.into(),
            artist: artist.map(str::to_string),
        }
    }
}

impl fmt::Display for SongCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{} - {}", self.title, artist),
            None => write!(f, "{}", self.title),
        }
    }
}

/// A candidate matched to a concrete catalog track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub candidate: SongCandidate,
    pub track_id: String,
    pub uri: String,
}

/// The playlist container while it is being filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub added_uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum FailureReason {
    NotFound,
    SearchFailed(String),
    ArtistMismatch,
    DuplicateTrack,
    AddFailed(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "no match"),
            FailureReason::SearchFailed(e) => write!(f, "search failed: {}", e),
            FailureReason::ArtistMismatch => write!(f, "artist mismatch"),
            FailureReason::DuplicateTrack => write!(f, "already added"),
            FailureReason::AddFailed(e) => write!(f, "add failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub candidate: SongCandidate,
    pub reason: FailureReason,
}

/// Outcome of a whole run.
///
/// `playlist` holds the hydrated playlist when the final fetch succeeded; otherwise
/// callers fall back to `draft` and `hydration_error` says why.
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub draft: PlaylistDraft,
    pub playlist: Option<Playlist>,
    pub tracks_found: usize,
    pub total_suggested: usize,
    pub failures: Vec<CandidateFailure>,
    pub suggestion_error: Option<String>,
    pub hydration_error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlaylistBody<'a> {
    Hydrated(&'a Playlist),
    Draft(&'a PlaylistDraft),
}

/// Response body of the generate playlist operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlaylistResponse<'a> {
    pub success: bool,
    pub playlist: PlaylistBody<'a>,
    pub tracks_found: usize,
    pub total_suggested: usize,
    pub failures: &'a [CandidateFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydration_error: Option<&'a str>,
}

#[derive(Tabled)]
pub struct FailureTableRow {
    pub title: String,
    pub artist: String,
    pub reason: String,
}
