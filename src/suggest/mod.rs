//! Language model collaborator.
//!
//! The pipeline asks it for two things: a short playlist title and a raw song list.
//! Both are plain text as far as this module is concerned; turning the song list
//! into candidates is the normalizer's job.

mod openai;

use async_trait::async_trait;

pub use openai::OpenAiClient;

use crate::error::SuggestionError;

/// Source of playlist titles and song suggestions for a free-text prompt.
///
/// `Ok(None)` means the service answered without any content.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest_title(&self, prompt: &str) -> Result<Option<String>, SuggestionError>;

    /// Returns the raw song list, expected to be JSON shaped like
    /// `{"songs": [{"title": "...", "artist": "..."}]}`.
    async fn suggest_songs(&self, prompt: &str) -> Result<Option<String>, SuggestionError>;
}
