use async_trait::async_trait;

use super::client::ApiClient;
use super::models::{CreateReleaseData, RecordId, Release};
use super::ReleaseApi;
use crate::errors::ApiError;

#[async_trait]
impl ReleaseApi for ApiClient {
    async fn list_releases(&self) -> Result<serde_json::Value, ApiError> {
        self.get_value("releases/").await
    }

    async fn create_release(&self, data: &CreateReleaseData) -> Result<Release, ApiError> {
        let release: Release = self.post_json("releases/", data).await?;
        tracing::info!(id = %release.id, platform = %release.platform, version = %release.version, "created release");
        Ok(release)
    }

    async fn update_release(
        &self,
        id: &RecordId,
        data: &CreateReleaseData,
    ) -> Result<Release, ApiError> {
        let url = self.item_url("releases/", id.as_str())?;
        let release: Release = self.put_json(url, data).await?;
        tracing::info!(%id, "updated release");
        Ok(release)
    }

    async fn delete_release(&self, id: &RecordId) -> Result<(), ApiError> {
        self.delete(self.item_url("releases/", id.as_str())?).await?;
        tracing::info!(%id, "deleted release");
        Ok(())
    }
}
