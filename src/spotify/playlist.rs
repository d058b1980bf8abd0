use crate::{
    error::{ApiError, read_json},
    spotify::SpotifyClient,
    types::{AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, Playlist},
};

/// Upper bound the Web API accepts for one "add items" request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    /// Creates a private playlist for `user_id`.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, ApiError> {
        let token = self.access_token().await?;

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };

        let response = self
            .http
            .post(self.endpoint(&["users", user_id, "playlists"]))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Appends tracks to a playlist, in batches of [`MAX_TRACKS_PER_REQUEST`].
    ///
    /// An empty list sends nothing. A failing batch stops the call; batches
    /// sent before it stay in the playlist.
    pub async fn add_tracks(&self, playlist_id: &str, track_uris: &[String]) -> Result<(), ApiError> {
        let token = self.access_token().await?;

        for chunk in track_uris.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };

            let response = self
                .http
                .post(self.endpoint(&["playlists", playlist_id, "tracks"]))
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?;

            let _: AddTrackToPlaylistResponse = read_json(response).await?;
        }

        Ok(())
    }
}
