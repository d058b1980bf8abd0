mod common;

use moodmatch::{
    error::ApiError,
    management::MoodHistory,
    openai::PromptClient,
    orchestrator::PlaylistOrchestrator,
    spotify::{SpotifyClient, auth::SharedAuth},
    types::{MoodQuery, PlaylistEvent},
};
use tokio::sync::mpsc;

use common::{
    MockBehavior, MockServer, authenticated_flow, spawn_mock, spawn_mock_with, temp_path,
    unauthenticated_flow,
};

fn orchestrator(mock: &MockServer, auth: SharedAuth, history: MoodHistory) -> PlaylistOrchestrator {
    let config = mock.config();
    PlaylistOrchestrator::new(
        PromptClient::new(config.openai),
        SpotifyClient::new(&config.spotify.api_url, auth),
        history,
    )
}

async fn run(
    orchestrator: &mut PlaylistOrchestrator,
    query: &MoodQuery,
) -> (Result<moodmatch::types::PlaylistOutcome, ApiError>, Vec<PlaylistEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = orchestrator.generate(query, &tx).await;
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (result, events)
}

#[tokio::test]
async fn test_generate_creates_and_fills_playlist() {
    let mock = spawn_mock().await;
    let auth = authenticated_flow(&mock.config()).await;
    let history_path = temp_path("history.json");
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(history_path.clone()));
    let query = MoodQuery::new("rainy day", Some("🌧️".to_string())).unwrap();

    let (result, events) = run(&mut orchestrator, &query).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.playlist_id, "pl-1");
    assert_eq!(outcome.name, "Mood: rainy day 🌧️");
    assert_eq!(outcome.description, "Cozy acoustic tunes for a rainy day");
    assert_eq!(
        outcome.url.as_deref(),
        Some("https://open.spotify.com/playlist/pl-1")
    );
    assert_eq!(outcome.tracks_added, 2);
    assert_eq!(outcome.unresolved, vec!["Lost Song - Nobody"]);

    assert_eq!(
        events,
        vec![
            PlaylistEvent::DescriptionReady("Cozy acoustic tunes for a rainy day".to_string()),
            PlaylistEvent::PlaylistCreated {
                id: "pl-1".to_string(),
                name: "Mood: rainy day 🌧️".to_string(),
            },
            PlaylistEvent::TracksSuggested(3),
            PlaylistEvent::TrackUnresolved("Lost Song - Nobody".to_string()),
            PlaylistEvent::TracksAdded(2),
        ]
    );

    let created = mock.recorder.to_path("/v1/users/user-1/playlists");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].body["description"], "Cozy acoustic tunes for a rainy day");

    let added = mock.recorder.to_path("/v1/playlists/pl-1/tracks");
    assert_eq!(added.len(), 1);
    assert_eq!(
        added[0].body["uris"],
        serde_json::json!([
            "spotify:track:track-Song_A_artist-Artist_A",
            "spotify:track:track-Song_B_artist-Artist_B",
        ])
    );

    let history = MoodHistory::load(history_path).await.unwrap();
    assert_eq!(history.entries(), ["rainy day"]);
}

#[tokio::test]
async fn test_steps_run_in_order() {
    let mock = spawn_mock().await;
    let auth = authenticated_flow(&mock.config()).await;
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(temp_path("history.json")));
    let query = MoodQuery::new("focus", None).unwrap();

    run(&mut orchestrator, &query).await.0.unwrap();

    let paths: Vec<String> = mock.recorder.all().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/openai/chat/completions",
            "/v1/me",
            "/v1/users/user-1/playlists",
            "/openai/chat/completions",
            "/v1/search",
            "/v1/search",
            "/v1/search",
            "/v1/playlists/pl-1/tracks",
        ]
    );
}

#[tokio::test]
async fn test_generate_without_login_creates_nothing() {
    let mock = spawn_mock().await;
    let auth = unauthenticated_flow(&mock.config()).await;
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(temp_path("history.json")));
    let query = MoodQuery::new("happy", None).unwrap();

    let (result, _) = run(&mut orchestrator, &query).await;

    assert!(matches!(result, Err(ApiError::NotAuthenticated)));
    assert!(
        mock.recorder
            .all()
            .iter()
            .all(|r| !r.path.starts_with("/v1/"))
    );
    // the mood is remembered even though the action failed
    assert_eq!(orchestrator.history().entries(), ["happy"]);
}

#[tokio::test]
async fn test_failed_track_addition_leaves_empty_playlist() {
    let mock = spawn_mock_with(MockBehavior {
        fail_add_tracks: true,
        ..MockBehavior::default()
    })
    .await;
    let auth = authenticated_flow(&mock.config()).await;
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(temp_path("history.json")));
    let query = MoodQuery::new("angry", None).unwrap();

    let (result, events) = run(&mut orchestrator, &query).await;

    match result {
        Err(ApiError::RequestFailed { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    assert!(events.iter().any(|e| matches!(e, PlaylistEvent::PlaylistCreated { .. })));
    assert!(!events.iter().any(|e| matches!(e, PlaylistEvent::TracksAdded(_))));
    // no retries
    assert_eq!(mock.recorder.to_path("/v1/playlists/pl-1/tracks").len(), 1);
}

#[tokio::test]
async fn test_empty_completion_stops_before_playlist() {
    let mock = spawn_mock_with(MockBehavior {
        empty_choices: true,
        ..MockBehavior::default()
    })
    .await;
    let auth = authenticated_flow(&mock.config()).await;
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(temp_path("history.json")));
    let query = MoodQuery::new("sleepy", None).unwrap();

    let (result, events) = run(&mut orchestrator, &query).await;

    assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    assert!(events.is_empty());
    assert!(mock.recorder.to_path("/v1/users/user-1/playlists").is_empty());
}

#[tokio::test]
async fn test_repeated_mood_moves_to_front() {
    let mock = spawn_mock().await;
    let auth = authenticated_flow(&mock.config()).await;
    let mut orchestrator = orchestrator(&mock, auth, MoodHistory::new(temp_path("history.json")));

    for mood in ["calm", "energetic", "calm"] {
        let query = MoodQuery::new(mood, None).unwrap();
        run(&mut orchestrator, &query).await.0.unwrap();
    }

    assert_eq!(orchestrator.history().entries(), ["calm", "energetic"]);
}
