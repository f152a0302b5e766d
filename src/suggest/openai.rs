use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::SuggestionSource;
use crate::{
    config::SuggestionConfig,
    error::{ConfigError, SuggestionError},
    types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat},
};

const TITLE_PROMPT: &str = "You name playlists. Read the user's text, interpret the mood, \
sound or feeling it conveys, and answer with one catchy title of at most four words. \
Playful or nonsensical input still deserves a meaningful title: 'hehehe' could become \
'Laughs & Giggles Mix'. Reply with the title only.";

const TITLE_TEMPERATURE: f32 = 0.9;
const SONGS_TEMPERATURE: f32 = 0.7;

/// Client for an OpenAI compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: Client,
    config: SuggestionConfig,
}

impl OpenAiClient {
    pub fn new(config: &SuggestionConfig) -> Result<Self, ConfigError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn songs_prompt(&self) -> String {
        format!(
            "You are a music expert. Pick exactly {count} distinct songs that fit the user's \
description, weighing its mood and feeling and sometimes the lyrics. Answer with a JSON \
object of the form {{\"songs\": [{{\"title\": \"song name\", \"artist\": \"artist name\"}}]}} \
holding exactly {count} entries and nothing else.",
            count = self.config.song_count
        )
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Option<String>, SuggestionError> {
        let api_url = format!(
            "{url}/chat/completions",
            url = self.config.api_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&api_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response.json::<ChatCompletionResponse>().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty());

        Ok(content)
    }

    fn request(&self, system: String, prompt: &str, temperature: f32, json: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature,
            response_format: json.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl SuggestionSource for OpenAiClient {
    async fn suggest_title(&self, prompt: &str) -> Result<Option<String>, SuggestionError> {
        let request = self.request(TITLE_PROMPT.to_string(), prompt, TITLE_TEMPERATURE, false);
        let title = self.complete(&request).await?;
        debug!(?title, "title suggestion received");
        Ok(title)
    }

    async fn suggest_songs(&self, prompt: &str) -> Result<Option<String>, SuggestionError> {
        let request = self.request(self.songs_prompt(), prompt, SONGS_TEMPERATURE, true);
        let songs = self.complete(&request).await?;
        debug!(bytes = songs.as_ref().map_or(0, String::len), "song suggestions received");
        Ok(songs)
    }
}
