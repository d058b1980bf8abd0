use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::{
    cli::load_auth,
    config::Config,
    error,
    management::MoodHistory,
    openai::PromptClient,
    orchestrator::PlaylistOrchestrator,
    spotify::SpotifyClient,
    success,
    types::{MAX_MOOD_LENGTH, MoodQuery, PlaylistEvent},
    warning,
};

pub async fn generate(config: &Config, mood: String, emoji: Option<String>) {
    let query = match MoodQuery::new(&mood, emoji) {
        Ok(query) => query,
        Err(e) => error!("{}", e),
    };
    if mood.trim().chars().count() > MAX_MOOD_LENGTH {
        warning!(
            "Mood shortened to {} characters: \"{}\"",
            MAX_MOOD_LENGTH,
            query.mood
        );
    }

    let auth = load_auth(config).await;
    if !auth.lock().await.is_authenticated() {
        error!("Not authenticated. Please run moodmatch auth");
    }

    let history = match MoodHistory::load(MoodHistory::default_path()).await {
        Ok(history) => history,
        Err(e) => {
            warning!("Mood history unreadable, starting a new one. Err: {}", e);
            MoodHistory::new(MoodHistory::default_path())
        }
    };

    let mut orchestrator = PlaylistOrchestrator::new(
        PromptClient::new(config.openai.clone()),
        SpotifyClient::new(&config.spotify.api_url, auth),
        history,
    );

    let pb = ProgressBar::new_spinner();
    pb.set_message("Writing playlist description...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move { orchestrator.generate(&query, &tx).await });

    // events arrive in completion order; the channel closes when the task ends
    while let Some(event) = rx.recv().await {
        render(&pb, event);
    }
    pb.finish_and_clear();

    match task.await {
        Ok(Ok(outcome)) => {
            success!(
                "Playlist \"{}\" is ready with {} tracks.",
                outcome.name,
                outcome.tracks_added
            );
            if let Some(url) = outcome.url {
                println!("{}", url);
            }
        }
        Ok(Err(e)) => {
            warning!("{}", e);
            error!("Could not generate a playlist. Please try again.");
        }
        Err(e) => error!("Task join error: {}", e),
    }
}

fn render(pb: &ProgressBar, event: PlaylistEvent) {
    match event {
        PlaylistEvent::DescriptionReady(description) => {
            pb.suspend(|| success!("Description: {}", description));
            pb.set_message("Creating playlist...");
        }
        PlaylistEvent::PlaylistCreated { name, .. } => {
            pb.suspend(|| success!("Created playlist \"{}\"", name));
            pb.set_message("Picking tracks...");
        }
        PlaylistEvent::TracksSuggested(count) => {
            pb.set_message(format!("Looking up {} suggested tracks...", count));
        }
        PlaylistEvent::TrackUnresolved(suggestion) => {
            pb.suspend(|| warning!("Not found on Spotify: {}", suggestion));
        }
        PlaylistEvent::TracksAdded(count) => {
            pb.suspend(|| success!("Added {} tracks", count));
        }
    }
}
