use async_trait::async_trait;
use chrono::NaiveDate;

use super::client::ApiClient;
use super::models::{MetricsData, VolumePoint};
use super::MetricsApi;
use crate::dates::format_query;
use crate::errors::ApiError;

fn range_query(start: NaiveDate, end: NaiveDate) -> [(&'static str, String); 2] {
    [("start_date", format_query(start)), ("end_date", format_query(end))]
}

#[async_trait]
impl MetricsApi for ApiClient {
    async fn metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<MetricsData, ApiError> {
        self.get_json("metrics/", &range_query(start, end)).await
    }

    async fn deployment_volume(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VolumePoint>, ApiError> {
        self.get_json("metrics/deployment-volume", &range_query(start, end))
            .await
    }
}
