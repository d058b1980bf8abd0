//! One "mood to playlist" action.
//!
//! The steps run strictly one after another:
//!
//! 1. remember the mood in the history
//! 2. description (chat completion)
//! 3. `GET /me`, then create the playlist
//! 4. track suggestions (chat completion)
//! 5. search each suggestion for a track URI
//! 6. add the resolved tracks
//!
//! Progress goes out as [`PlaylistEvent`]s on an mpsc channel, in the order
//! the steps complete, so the UI loop can render them without touching the
//! orchestrator. The first error ends the action. Nothing is rolled back: a
//! playlist created in step 3 stays (empty) when a later step fails.

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    error::ApiError,
    management::MoodHistory,
    openai::PromptClient,
    spotify::SpotifyClient,
    types::{MoodQuery, PlaylistEvent, PlaylistOutcome},
    utils,
};

pub struct PlaylistOrchestrator {
    prompts: PromptClient,
    music: SpotifyClient,
    history: MoodHistory,
}

impl PlaylistOrchestrator {
    pub fn new(prompts: PromptClient, music: SpotifyClient, history: MoodHistory) -> Self {
        PlaylistOrchestrator {
            prompts,
            music,
            history,
        }
    }

    pub fn history(&self) -> &MoodHistory {
        &self.history
    }

    pub async fn generate(
        &mut self,
        query: &MoodQuery,
        events: &UnboundedSender<PlaylistEvent>,
    ) -> Result<PlaylistOutcome, ApiError> {
        self.history.add(&query.mood);
        self.history.persist().await?;

        let emoji = query.emoji.as_deref();

        let description = self.prompts.describe_playlist(&query.mood, emoji).await?;
        emit(events, PlaylistEvent::DescriptionReady(description.clone()));

        let user_id = self.music.fetch_current_user_id().await?;
        let name = query.playlist_name();
        let playlist = self
            .music
            .create_playlist(&user_id, &name, &description)
            .await?;
        emit(
            events,
            PlaylistEvent::PlaylistCreated {
                id: playlist.id.clone(),
                name: playlist.name.clone(),
            },
        );

        let suggestions = self.prompts.suggest_tracks(&query.mood, emoji).await?;
        emit(events, PlaylistEvent::TracksSuggested(suggestions.len()));

        let mut uris = Vec::new();
        let mut unresolved = Vec::new();
        for suggestion in suggestions {
            match self
                .music
                .search_track(&utils::search_query_for(&suggestion))
                .await?
            {
                Some(uri) if !uris.contains(&uri) => uris.push(uri),
                Some(_) => {}
                None => {
                    emit(events, PlaylistEvent::TrackUnresolved(suggestion.clone()));
                    unresolved.push(suggestion);
                }
            }
        }

        self.music.add_tracks(&playlist.id, &uris).await?;
        emit(events, PlaylistEvent::TracksAdded(uris.len()));

        Ok(PlaylistOutcome {
            playlist_id: playlist.id,
            name: playlist.name,
            description,
            url: playlist.external_urls.spotify,
            tracks_added: uris.len(),
            unresolved,
        })
    }
}

// A closed receiver only means nobody is watching anymore.
fn emit(events: &UnboundedSender<PlaylistEvent>, event: PlaylistEvent) {
    let _ = events.send(event);
}
