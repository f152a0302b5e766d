use super::{SpotifyClient, check};
use crate::{error::CatalogError, types::User};

impl SpotifyClient {
    /// Fetches the profile of the user the token belongs to.
    pub async fn get_current_user(&self) -> Result<User, CatalogError> {
        let response = self
            .http
            .get(self.url("/me"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(check(response).await?.json::<User>().await?)
    }
}
