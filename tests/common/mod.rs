#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use moodmatch::{
    config::{Config, OpenAiConfig, SpotifyConfig},
    management::TokenStore,
    spotify::auth::{AuthorizationFlow, SharedAuth},
    types::Credential,
};
use reqwest::Url;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn push(&self, request: Recorded) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn to_path(&self, path: &str) -> Vec<Recorded> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }
}

#[derive(Clone, Copy, Default)]
pub struct MockBehavior {
    pub fail_add_tracks: bool,
    pub empty_choices: bool,
    pub null_content: bool,
}

#[derive(Clone)]
struct MockState {
    recorder: Recorder,
    behavior: MockBehavior,
}

pub struct MockServer {
    pub base: String,
    pub recorder: Recorder,
}

impl MockServer {
    pub fn config(&self) -> Config {
        config_for(&self.base)
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Fake Spotify accounts service, Web API and chat-completion endpoint.
pub async fn spawn_mock() -> MockServer {
    spawn_mock_with(MockBehavior::default()).await
}

pub async fn spawn_mock_with(behavior: MockBehavior) -> MockServer {
    let recorder = Recorder::default();
    let state = MockState {
        recorder: recorder.clone(),
        behavior,
    };

    let router = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me", get(me))
        .route("/v1/users/{user_id}/playlists", post(create_playlist))
        .route("/v1/playlists/{playlist_id}/tracks", post(add_tracks))
        .route("/v1/search", get(search))
        .route("/openai/chat/completions", post(chat))
        .with_state(state);

    MockServer {
        base: serve(router).await,
        recorder,
    }
}

pub fn config_for(base: &str) -> Config {
    Config {
        spotify: SpotifyConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: Url::parse(REDIRECT_URI).unwrap(),
            auth_url: Url::parse("https://accounts.example.com/authorize").unwrap(),
            token_url: Url::parse(&format!("{}/api/token", base)).unwrap(),
            api_url: Url::parse(&format!("{}/v1", base)).unwrap(),
        },
        openai: OpenAiConfig {
            api_key: "sk-test".to_string(),
            api_url: format!("{}/openai", base),
            model: "gpt-3.5-turbo".to_string(),
        },
        server_addr: "127.0.0.1:0".to_string(),
    }
}

/// A fresh path under the system temp dir; nothing exists there yet.
pub fn temp_path(file: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("moodmatch-test-{}", rand::random::<u64>()))
        .join(file)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A flow that starts out authenticated with access token `A`.
pub async fn authenticated_flow(config: &Config) -> SharedAuth {
    let store = TokenStore::new(temp_path("token.json"));
    store
        .persist(&Credential {
            access_token: "A".to_string(),
            refresh_token: "B".to_string(),
            expires_at: now() + 3600,
        })
        .await
        .unwrap();

    AuthorizationFlow::new(config.spotify.clone(), store)
        .await
        .unwrap()
        .shared()
}

pub async fn unauthenticated_flow(config: &Config) -> SharedAuth {
    AuthorizationFlow::new(
        config.spotify.clone(),
        TokenStore::new(temp_path("token.json")),
    )
    .await
    .unwrap()
    .shared()
}

fn record(
    state: &MockState,
    method: &str,
    path: String,
    params: HashMap<String, String>,
    body: Value,
    headers: &HeaderMap,
) {
    state.recorder.push(Recorded {
        method: method.to_string(),
        path,
        params,
        body,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
}

fn bearer(headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value.starts_with("Bearer ") && value.len() > 7 => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn token(
    State(state): State<MockState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    record(&state, "POST", "/api/token".to_string(), form.clone(), Value::Null, &headers);

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => match form.get("code").map(String::as_str) {
            Some("bad-code") => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid_grant"}).to_string(),
            ),
            Some("garbled") => (StatusCode::OK, "<html>oops</html>".to_string()),
            Some("long-lived") => (
                StatusCode::OK,
                json!({"access_token": "A", "token_type": "Bearer", "refresh_token": "B", "expires_in": u64::MAX})
                    .to_string(),
            ),
            _ => (
                StatusCode::OK,
                json!({"access_token": "A", "token_type": "Bearer", "refresh_token": "B", "expires_in": 3600})
                    .to_string(),
            ),
        },
        Some("refresh_token") => (
            StatusCode::OK,
            json!({"access_token": "A2", "token_type": "Bearer", "expires_in": 3600}).to_string(),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            json!({"error": "unsupported_grant_type"}).to_string(),
        ),
    }
}

async fn me(State(state): State<MockState>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    record(&state, "GET", "/v1/me".to_string(), HashMap::new(), Value::Null, &headers);
    bearer(&headers)?;
    Ok(Json(json!({"id": "user-1", "display_name": "Tester"})))
}

async fn create_playlist(
    State(state): State<MockState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    record(
        &state,
        "POST",
        format!("/v1/users/{}/playlists", user_id),
        HashMap::new(),
        body.clone(),
        &headers,
    );
    bearer(&headers)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": "pl-1",
            "name": body["name"],
            "description": body["description"],
            "public": false,
            "external_urls": {"spotify": "https://open.spotify.com/playlist/pl-1"}
        })),
    ))
}

async fn add_tracks(
    State(state): State<MockState>,
    Path(playlist_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    record(
        &state,
        "POST",
        format!("/v1/playlists/{}/tracks", playlist_id),
        HashMap::new(),
        body,
        &headers,
    );
    bearer(&headers)?;

    if state.behavior.fail_add_tracks {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok((StatusCode::CREATED, Json(json!({"snapshot_id": "snap-1"}))))
}

async fn search(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    record(&state, "GET", "/v1/search".to_string(), params.clone(), Value::Null, &headers);
    bearer(&headers)?;

    let q = params.get("q").cloned().unwrap_or_default();
    if q.contains("Nobody") {
        return Ok(Json(json!({"tracks": {"items": []}})));
    }

    let id = q.replace(' ', "_").replace(':', "-");
    Ok(Json(json!({
        "tracks": {
            "items": [{"id": id, "name": q, "uri": format!("spotify:track:{}", id)}]
        }
    })))
}

pub const DESCRIPTION_REPLY: &str = "  Cozy acoustic tunes for a rainy day  ";
pub const SUGGESTIONS_REPLY: &str = "1. Song A - Artist A\n\n- Song B - Artist B\nLost Song - Nobody\n";

async fn chat(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(
        &state,
        "POST",
        "/openai/chat/completions".to_string(),
        HashMap::new(),
        body.clone(),
        &headers,
    );

    if state.behavior.empty_choices {
        return Json(json!({"choices": []}));
    }
    if state.behavior.null_content {
        return Json(json!({
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "no"}}]
        }));
    }

    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    let content = if system.contains("descriptions") {
        DESCRIPTION_REPLY
    } else {
        SUGGESTIONS_REPLY
    };

    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}
