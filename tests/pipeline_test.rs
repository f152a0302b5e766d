use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use promptlist::{
    error::{CatalogError, PipelineError, SuggestionError},
    pipeline::{
        DuplicatePolicy, GenerateRequest, MatchPolicy, PipelineOptions, QueryMode, RunObserver,
        StepOutcome, generate_playlist,
    },
    spotify::CatalogClient,
    suggest::SuggestionSource,
    types::{
        AddTrackToPlaylistResponse, Artist, CreatePlaylistRequest, CreatePlaylistResponse,
        FailureReason, Playlist, PlaylistDraft, PlaylistItem, PlaylistTracks, SongCandidate, Track,
        User,
    },
};

// How the fake catalog answers a search query
#[derive(Clone)]
enum Search {
    Hit(Track),
    Empty,
    Fail(u16),
    Timeout,
    Unauthorized,
}

#[derive(Default)]
struct FakeCatalog {
    fail_user: bool,
    create_status: Option<u16>,
    searches: HashMap<String, Search>,
    failing_adds: HashSet<String>,
    fail_hydration: bool,
    queries: Mutex<Vec<String>>,
    created: Mutex<Vec<CreatePlaylistRequest>>,
    appended: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn with_hits(titles: &[&str]) -> Self {
        let mut catalog = FakeCatalog::default();
        for title in titles {
            catalog = catalog.search(title, Search::Hit(track(title, "Someone")));
        }
        catalog
    }

    fn search(mut self, query: &str, answer: Search) -> Self {
        self.searches.insert(query.to_string(), answer);
        self
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn appended(&self) -> Vec<String> {
        self.appended.lock().unwrap().clone()
    }

    fn created(&self) -> Vec<CreatePlaylistRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn current_user(&self) -> Result<User, CatalogError> {
        if self.fail_user {
            return Err(CatalogError::Status {
                status: 500,
                body: "down".to_string(),
            });
        }
        Ok(User {
            id: "dj".to_string(),
            display_name: Some("DJ".to_string()),
        })
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        assert_eq!(limit, 1);
        self.queries.lock().unwrap().push(query.to_string());
        match self.searches.get(query).cloned().unwrap_or(Search::Empty) {
            Search::Hit(track) => Ok(vec![track]),
            Search::Empty => Ok(Vec::new()),
            Search::Fail(status) => Err(CatalogError::Status {
                status,
                body: "search failed".to_string(),
            }),
            Search::Timeout => Err(CatalogError::Timeout),
            Search::Unauthorized => Err(CatalogError::Unauthorized),
        }
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        assert_eq!(owner_id, "dj");
        self.created.lock().unwrap().push(request.clone());
        if let Some(status) = self.create_status {
            return Err(CatalogError::Status {
                status,
                body: "nope".to_string(),
            });
        }
        Ok(CreatePlaylistResponse {
            id: "pl1".to_string(),
            name: request.name.clone(),
            description: Some(request.description.clone()),
            public: Some(request.public),
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, CatalogError> {
        assert_eq!(playlist_id, "pl1");
        assert_eq!(uris.len(), 1);
        if self.failing_adds.contains(&uris[0]) {
            return Err(CatalogError::Status {
                status: 403,
                body: "forbidden".to_string(),
            });
        }
        self.appended.lock().unwrap().extend(uris.iter().cloned());
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: Some("snap".to_string()),
        })
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        if self.fail_hydration {
            return Err(CatalogError::Timeout);
        }
        let created = self.created();
        let items = self
            .appended()
            .into_iter()
            .map(|uri| PlaylistItem {
                added_at: None,
                track: Some(Track {
                    id: uri.trim_start_matches("spotify:track:").to_string(),
                    name: uri.clone(),
                    uri,
                    artists: Vec::new(),
                    album: None,
                }),
            })
            .collect::<Vec<_>>();

        Ok(Playlist {
            id: playlist_id.to_string(),
            name: created[0].name.clone(),
            description: Some(created[0].description.clone()),
            public: Some(created[0].public),
            collaborative: false,
            snapshot_id: Some("snap".to_string()),
            tracks: PlaylistTracks {
                total: items.len() as u32,
                items,
            },
        })
    }
}

enum Songs {
    Raw(&'static str),
    Nothing,
    Fail,
}

struct FakeSuggestions {
    title: Option<&'static str>,
    title_fails: bool,
    songs: Songs,
}

impl FakeSuggestions {
    fn songs(raw: &'static str) -> Self {
        Self {
            title: Some("Rainy Day Mix"),
            title_fails: false,
            songs: Songs::Raw(raw),
        }
    }
}

#[async_trait]
impl SuggestionSource for FakeSuggestions {
    async fn suggest_title(&self, _prompt: &str) -> Result<Option<String>, SuggestionError> {
        if self.title_fails {
            return Err(SuggestionError::Status {
                status: 429,
                body: "slow down".to_string(),
            });
        }
        Ok(self.title.map(str::to_string))
    }

    async fn suggest_songs(&self, _prompt: &str) -> Result<Option<String>, SuggestionError> {
        match self.songs {
            Songs::Raw(raw) => Ok(Some(raw.to_string())),
            Songs::Nothing => Ok(None),
            Songs::Fail => Err(SuggestionError::Status {
                status: 500,
                body: "model overloaded".to_string(),
            }),
        }
    }
}

fn track(title: &str, artist: &str) -> Track {
    let id = title.to_lowercase().replace(' ', "-");
    Track {
        uri: format!("spotify:track:{}", id),
        id,
        name: title.to_string(),
        artists: vec![Artist {
            id: format!("{}-id", artist),
            name: artist.to_string(),
        }],
        album: None,
    }
}

fn request() -> GenerateRequest {
    GenerateRequest::new("rainy sunday with coffee", "BQC-token")
}

async fn run(
    catalog: &FakeCatalog,
    suggestions: &FakeSuggestions,
    options: &PipelineOptions,
) -> Result<promptlist::types::ResolutionReport, PipelineError> {
    generate_playlist(&request(), catalog, suggestions, options, &()).await
}

#[tokio::test]
async fn test_single_song_is_found_and_added() {
    let catalog = FakeCatalog::with_hits(&["Yesterday"]);
    let suggestions = FakeSuggestions::songs(r#"{"songs": [{"title": "Yesterday"}]}"#);

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 1);
    assert_eq!(report.total_suggested, 1);
    assert!(report.failures.is_empty());
    assert_eq!(report.draft.added_uris, vec!["spotify:track:yesterday"]);
    assert_eq!(catalog.appended(), vec!["spotify:track:yesterday"]);
    assert_eq!(catalog.queries(), vec!["Yesterday"]);

    let playlist = report.playlist.expect("hydrated playlist");
    assert_eq!(playlist.tracks.items.len(), 1);
    assert!(report.hydration_error.is_none());
    assert!(report.suggestion_error.is_none());
}

#[tokio::test]
async fn test_failed_search_skips_only_that_candidate() {
    let catalog = FakeCatalog::with_hits(&["One", "Three"]).search("Two", Search::Fail(502));
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "One"}, {"title": "Two", "artist": "B"}, {"title": "Three"}]}"#,
    );

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 2);
    assert_eq!(report.total_suggested, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].candidate, SongCandidate::new("Two", Some("B")));
    assert!(matches!(report.failures[0].reason, FailureReason::SearchFailed(_)));
    assert_eq!(
        report.draft.added_uris,
        vec!["spotify:track:one", "spotify:track:three"]
    );
}

#[tokio::test]
async fn test_playlist_creation_failure_is_fatal() {
    let catalog = FakeCatalog {
        create_status: Some(500),
        ..FakeCatalog::with_hits(&["Yesterday"])
    };
    let suggestions = FakeSuggestions::songs(r#"{"songs": [{"title": "Yesterday"}]}"#);

    let err = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::PlaylistCreationFailed(CatalogError::Status { status: 500, .. })
    ));
    assert!(catalog.queries().is_empty());
    assert!(catalog.appended().is_empty());
}

#[tokio::test]
async fn test_malformed_suggestions_still_create_playlist() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions::songs("Sure! Here are some songs: Yesterday, Creep");

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 0);
    assert_eq!(report.total_suggested, 0);
    assert_eq!(catalog.created().len(), 1);
    assert!(
        report
            .suggestion_error
            .as_deref()
            .unwrap()
            .starts_with("malformed suggestion data")
    );
    assert!(report.playlist.is_some());
}

#[tokio::test]
async fn test_failed_suggestion_call_is_advisory() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions {
        title: Some("Mix"),
        title_fails: false,
        songs: Songs::Fail,
    };

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.total_suggested, 0);
    assert!(report.suggestion_error.unwrap().contains("model overloaded"));
}

#[tokio::test]
async fn test_no_suggestion_content_is_not_an_error() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions {
        title: Some("Mix"),
        title_fails: false,
        songs: Songs::Nothing,
    };

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 0);
    assert_eq!(report.total_suggested, 0);
    assert!(report.suggestion_error.is_none());
}

#[tokio::test]
async fn test_empty_song_list() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions::songs(r#"{"songs": []}"#);

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 0);
    assert_eq!(report.total_suggested, 0);
    assert!(report.failures.is_empty());
    assert!(report.suggestion_error.is_none());
    assert_eq!(catalog.created().len(), 1);
}

#[tokio::test]
async fn test_duplicates_are_appended_twice_by_default() {
    let catalog = FakeCatalog::with_hits(&["Yesterday"]);
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "Yesterday", "artist": "The Beatles"}, {"title": "Yesterday", "artist": "Boyz II Men"}]}"#,
    );

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tracks_found, 2);
    assert_eq!(catalog.appended().len(), 2);
    assert_eq!(report.draft.added_uris[0], report.draft.added_uris[1]);
}

#[tokio::test]
async fn test_duplicates_skipped_when_configured() {
    let catalog = FakeCatalog::with_hits(&["Yesterday"]);
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "Yesterday", "artist": "The Beatles"}, {"title": "Yesterday", "artist": "Boyz II Men"}]}"#,
    );
    let options = PipelineOptions {
        duplicate_policy: DuplicatePolicy::SkipRepeated,
        ..PipelineOptions::default()
    };

    let report = run(&catalog, &suggestions, &options).await.unwrap();

    assert_eq!(report.tracks_found, 1);
    assert_eq!(report.total_suggested, 2);
    assert_eq!(catalog.appended().len(), 1);
    assert_eq!(report.failures[0].reason, FailureReason::DuplicateTrack);
    assert_eq!(report.failures[0].candidate.artist.as_deref(), Some("Boyz II Men"));
}

#[tokio::test]
async fn test_counts_add_up_and_order_follows_proposals() {
    let catalog = FakeCatalog {
        failing_adds: HashSet::from(["spotify:track:d".to_string()]),
        ..FakeCatalog::with_hits(&["A", "C", "D", "F"])
            .search("B", Search::Empty)
            .search("E", Search::Timeout)
    };
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "F"}, {"title": "A"}, {"title": "B"}, {"title": "C"}, {"title": "D"}, {"title": "E"}]}"#,
    );

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert_eq!(report.total_suggested, 6);
    assert_eq!(report.tracks_found + report.failures.len(), 6);
    assert_eq!(report.draft.added_uris.len(), report.tracks_found);
    assert_eq!(
        report.draft.added_uris,
        vec!["spotify:track:f", "spotify:track:a", "spotify:track:c"]
    );
    assert_eq!(catalog.queries(), vec!["F", "A", "B", "C", "D", "E"]);

    let reasons: Vec<_> = report
        .failures
        .iter()
        .map(|f| (f.candidate.title.as_str(), &f.reason))
        .collect();
    assert_eq!(reasons[0], ("B", &FailureReason::NotFound));
    assert!(matches!(reasons[1], ("D", FailureReason::AddFailed(_))));
    assert!(matches!(reasons[2], ("E", FailureReason::SearchFailed(_))));
}

#[tokio::test]
async fn test_missing_inputs_make_no_calls() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions::songs(r#"{"songs": []}"#);

    let err = generate_playlist(
        &GenerateRequest::new("   ", "BQC-token"),
        &catalog,
        &suggestions,
        &PipelineOptions::default(),
        &(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput("prompt")));

    let err = generate_playlist(
        &GenerateRequest {
            prompt: Some("rainy".to_string()),
            access_token: None,
        },
        &catalog,
        &suggestions,
        &PipelineOptions::default(),
        &(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput("accessToken")));

    assert!(catalog.created().is_empty());
}

#[tokio::test]
async fn test_user_lookup_failure_is_fatal() {
    let catalog = FakeCatalog {
        fail_user: true,
        ..FakeCatalog::default()
    };
    let suggestions = FakeSuggestions::songs(r#"{"songs": []}"#);

    let err = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::UserLookupFailed(_)));
    assert!(catalog.created().is_empty());
}

#[tokio::test]
async fn test_rejected_token_mid_run_aborts() {
    let catalog = FakeCatalog::with_hits(&["One"]).search("Two", Search::Unauthorized);
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "One"}, {"title": "Two"}, {"title": "Three"}]}"#,
    );

    let err = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::AuthRejected));
    assert_eq!(catalog.appended(), vec!["spotify:track:one"]);
    assert_eq!(catalog.queries(), vec!["One", "Two"]);
}

#[tokio::test]
async fn test_hydration_failure_returns_draft() {
    let catalog = FakeCatalog {
        fail_hydration: true,
        ..FakeCatalog::with_hits(&["Yesterday"])
    };
    let suggestions = FakeSuggestions::songs(r#"{"songs": [{"title": "Yesterday"}]}"#);

    let report = run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    assert!(report.playlist.is_none());
    assert_eq!(report.hydration_error.as_deref(), Some("catalog request timed out"));
    assert_eq!(report.tracks_found, 1);

    let body = serde_json::to_value(report.to_response()).unwrap();
    assert_eq!(body["playlist"]["id"], "pl1");
    assert_eq!(body["playlist"]["title"], "Rainy Day Mix");
}

#[tokio::test]
async fn test_playlist_request_uses_title_and_prompt() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions {
        title: Some("  \"Coffee & Rain\"  "),
        title_fails: false,
        songs: Songs::Nothing,
    };

    run(&catalog, &suggestions, &PipelineOptions::default())
        .await
        .unwrap();

    let created = catalog.created();
    assert_eq!(created[0].name, "Coffee & Rain");
    assert_eq!(
        created[0].description,
        "A Promptlist playlist | AI prompt used: rainy sunday with coffee"
    );
    assert!(!created[0].public);
    assert!(!created[0].collaborative);
}

#[tokio::test]
async fn test_title_failure_falls_back() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions {
        title: None,
        title_fails: true,
        songs: Songs::Nothing,
    };
    let options = PipelineOptions {
        fallback_title: "Lazy Mix".to_string(),
        playlist_public: true,
        ..PipelineOptions::default()
    };

    let report = run(&catalog, &suggestions, &options).await.unwrap();

    assert_eq!(catalog.created()[0].name, "Lazy Mix");
    assert!(catalog.created()[0].public);
    assert_eq!(report.draft.title, "Lazy Mix");
    assert!(report.draft.is_public);
}

#[tokio::test]
async fn test_require_artist_rejects_mismatched_hit() {
    let catalog = FakeCatalog::default()
        .search("Yesterday", Search::Hit(track("Yesterday", "Boyz II Men")))
        .search("Creep", Search::Hit(track("Creep", "Radiohead")));
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "Yesterday", "artist": "The Beatles"}, {"title": "Creep", "artist": "radiohead"}]}"#,
    );
    let options = PipelineOptions {
        match_policy: MatchPolicy::RequireArtist,
        ..PipelineOptions::default()
    };

    let report = run(&catalog, &suggestions, &options).await.unwrap();

    assert_eq!(report.tracks_found, 1);
    assert_eq!(report.failures[0].reason, FailureReason::ArtistMismatch);
    assert_eq!(report.draft.added_uris, vec!["spotify:track:creep"]);
}

#[tokio::test]
async fn test_title_and_artist_query_mode() {
    let catalog = FakeCatalog::default();
    let suggestions = FakeSuggestions::songs(
        r#"{"songs": [{"title": "Yesterday", "artist": "The Beatles"}, {"title": "Creep"}]}"#,
    );
    let options = PipelineOptions {
        query_mode: QueryMode::TitleAndArtist,
        ..PipelineOptions::default()
    };

    run(&catalog, &suggestions, &options).await.unwrap();

    assert_eq!(
        catalog.queries(),
        vec!["Yesterday artist:The Beatles", "Creep"]
    );
}

#[tokio::test]
async fn test_max_candidates_caps_the_run() {
    let catalog = FakeCatalog::with_hits(&["A", "B", "C"]);
    let suggestions =
        FakeSuggestions::songs(r#"{"songs": [{"title": "A"}, {"title": "B"}, {"title": "C"}]}"#);
    let options = PipelineOptions {
        max_candidates: 2,
        ..PipelineOptions::default()
    };

    let report = run(&catalog, &suggestions, &options).await.unwrap();

    assert_eq!(report.total_suggested, 2);
    assert_eq!(catalog.queries(), vec!["A", "B"]);
}

#[derive(Default)]
struct CountingObserver {
    drafts: AtomicUsize,
    steps: Mutex<Vec<(usize, usize, bool)>>,
}

impl RunObserver for CountingObserver {
    fn draft_created(&self, draft: &PlaylistDraft) {
        assert!(draft.added_uris.is_empty());
        self.drafts.fetch_add(1, Ordering::SeqCst);
    }

    fn candidate_finished(
        &self,
        index: usize,
        total: usize,
        _candidate: &SongCandidate,
        outcome: &StepOutcome,
    ) {
        let added = matches!(outcome, StepOutcome::Added(_));
        self.steps.lock().unwrap().push((index, total, added));
    }
}

#[tokio::test]
async fn test_observer_sees_every_step() {
    let catalog = FakeCatalog::with_hits(&["A"]);
    let suggestions = FakeSuggestions::songs(r#"{"songs": [{"title": "A"}, {"title": "B"}]}"#);
    let observer = CountingObserver::default();

    generate_playlist(
        &request(),
        &catalog,
        &suggestions,
        &PipelineOptions::default(),
        &observer,
    )
    .await
    .unwrap();

    assert_eq!(observer.drafts.load(Ordering::SeqCst), 1);
    assert_eq!(
        *observer.steps.lock().unwrap(),
        vec![(0, 2, true), (1, 2, false)]
    );
}
