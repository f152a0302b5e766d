use std::{env, time::Duration};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error, info,
    management::TokenManager,
    pipeline::{
        self, DuplicatePolicy, GenerateRequest, MatchPolicy, PipelineOptions, QueryMode,
        RunObserver, StepOutcome,
    },
    spotify::SpotifyClient,
    success,
    suggest::OpenAiClient,
    types::{PlaylistDraft, SongCandidate},
    warning,
};

/// Command line overrides for the pipeline options read from the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineFlags {
    /// Make the playlist public
    #[clap(long)]
    pub public: bool,

    /// Maximum number of suggested songs to process (0 for no limit)
    #[clap(long)]
    pub max_candidates: Option<usize>,

    /// Drop repeated title/artist pairs from the suggestions
    #[clap(long)]
    pub dedupe: bool,

    /// What to do when a track is already in the playlist
    #[clap(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,

    /// How the catalog search query is built
    #[clap(long, value_enum)]
    pub query: Option<QueryMode>,

    /// How the top search hit is accepted
    #[clap(long = "match", value_enum)]
    pub match_policy: Option<MatchPolicy>,
}

impl PipelineFlags {
    pub fn apply(&self, options: &mut PipelineOptions) {
        options.playlist_public |= self.public;
        options.dedupe_candidates |= self.dedupe;
        if let Some(max) = self.max_candidates {
            options.max_candidates = max;
        }
        if let Some(policy) = self.duplicates {
            options.duplicate_policy = policy;
        }
        if let Some(mode) = self.query {
            options.query_mode = mode;
        }
        if let Some(policy) = self.match_policy {
            options.match_policy = policy;
        }
    }
}

struct SpinnerObserver {
    pb: ProgressBar,
}

impl RunObserver for SpinnerObserver {
    fn draft_created(&self, draft: &PlaylistDraft) {
        self.pb
            .set_message(format!("Playlist \"{}\" created, asking for songs...", draft.title));
    }

    fn candidate_finished(
        &self,
        index: usize,
        total: usize,
        candidate: &SongCandidate,
        outcome: &StepOutcome,
    ) {
        let status = match outcome {
            StepOutcome::Added(_) => "added".to_string(),
            StepOutcome::Skipped(reason) => format!("skipped, {}", reason),
        };
        self.pb.set_message(format!(
            "{candidate}: {status} ({current}/{total})",
            candidate = candidate,
            status = status,
            current = index + 1,
            total = total
        ));
    }
}

/// Generates a playlist for `prompt` and prints the outcome.
///
/// The access token is taken from `token`, then from `SPOTIFY_ACCESS_TOKEN`, then
/// from the cached token file. With `json` set the response body of the HTTP
/// endpoint is printed instead of the human readable summary.
pub async fn generate(prompt: String, token: Option<String>, flags: PipelineFlags, json: bool) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    flags.apply(&mut config.pipeline);

    let token = match resolve_token(token).await {
        Some(token) => token,
        None => error!(
            "No access token. Pass --token, set SPOTIFY_ACCESS_TOKEN or place a token at {}",
            TokenManager::token_path().display()
        ),
    };

    let catalog = match SpotifyClient::new(&config.catalog, token.clone()) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };
    let suggestions = match OpenAiClient::new(&config.suggestions) {
        Ok(client) => client,
        Err(e) => error!("Cannot create suggestion client: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Creating playlist...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    let observer = SpinnerObserver { pb: pb.clone() };

    let request = GenerateRequest::new(prompt, token);
    let result = pipeline::generate_playlist(
        &request,
        &catalog,
        &suggestions,
        &config.pipeline,
        &observer,
    )
    .await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => error!("Cannot generate playlist: {}", e),
    };

    if json {
        match serde_json::to_string_pretty(&report.to_response()) {
            Ok(body) => println!("{}", body),
            Err(e) => error!("Cannot serialize report: {}", e),
        }
        return;
    }

    success!(
        "Playlist \"{}\" ready: https://open.spotify.com/playlist/{}",
        report.draft.title,
        report.draft.id
    );
    info!(
        "Found {} of {} suggested songs",
        report.tracks_found,
        report.total_suggested
    );

    if let Some(e) = &report.suggestion_error {
        warning!("Song suggestions unusable: {}", e);
    }
    if let Some(e) = &report.hydration_error {
        warning!("Cannot fetch final playlist: {}", e);
    }
    if !report.failures.is_empty() {
        println!("{}", Table::new(report.failure_rows()));
    }
}

async fn resolve_token(flag: Option<String>) -> Option<String> {
    let explicit = flag
        .or_else(|| env::var("SPOTIFY_ACCESS_TOKEN").ok())
        .filter(|t| !t.trim().is_empty());
    if explicit.is_some() {
        return explicit;
    }

    let manager = TokenManager::load().await.ok()?;
    if manager.is_expired() {
        warning!("Cached access token looks expired, Spotify may reject it.");
    }
    Some(manager.access_token().to_string())
}
