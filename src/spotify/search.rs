use crate::{
    error::{ApiError, read_json},
    spotify::SpotifyClient,
    types::SearchResponse,
};

impl SpotifyClient {
    /// URI of the best match for `query`, or `None` when Spotify finds nothing.
    pub async fn search_track(&self, query: &str) -> Result<Option<String>, ApiError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.endpoint(&["search"]))
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .bearer_auth(token)
            .send()
            .await?;

        let result: SearchResponse = read_json(response).await?;
        Ok(result.tracks.items.into_iter().next().map(|t| t.uri))
    }
}
