use crate::{
    error::{ApiError, read_json},
    spotify::SpotifyClient,
    types::UserProfile,
};

impl SpotifyClient {
    /// Id of the user the credential belongs to (`GET /me`).
    pub async fn fetch_current_user_id(&self) -> Result<String, ApiError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.endpoint(&["me"]))
            .bearer_auth(token)
            .send()
            .await?;

        let profile: UserProfile = read_json(response).await?;
        Ok(profile.id)
    }
}
