use crate::api::{CreateReleaseData, RecordId, Release, ReleaseApi};
use crate::banner::ErrorBanner;
use crate::errors::{ApiError, FormError};

use super::form::ReleaseForm;
use super::view::ReleaseListView;

pub const LOAD_FAILED: &str = "Failed to load releases";
pub const CREATE_FAILED: &str = "Failed to create release";
pub const UPDATE_FAILED: &str = "Failed to update release";
pub const DELETE_FAILED: &str = "Failed to delete release";

/// The releases page: list view, error banner, and the API behind them.
///
/// Every successful mutation reloads the full list instead of patching the
/// cached copy. A failed call sets the banner and leaves the view as it was.
pub struct ReleasePage<A> {
    api: A,
    view: ReleaseListView,
    banner: ErrorBanner,
}

impl<A: ReleaseApi> ReleasePage<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: ReleaseListView::new(),
            banner: ErrorBanner::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &ReleaseListView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ReleaseListView {
        &mut self.view
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn banner_mut(&mut self) -> &mut ErrorBanner {
        &mut self.banner
    }

    /// Fetch the list. Returns whether it succeeded; failures go to the banner.
    pub async fn refresh(&mut self) -> bool {
        let result = match self.api.list_releases().await {
            Ok(value) => self.view.load_from_value(value),
            Err(e) => Err(e),
        };
        match result {
            Ok(count) => {
                tracing::debug!(count, "loaded releases");
                self.banner.dismiss();
                true
            }
            Err(e) => {
                tracing::debug!("release list failed: {}", e);
                self.banner.show_api_error(&e, LOAD_FAILED);
                false
            }
        }
    }

    pub async fn create(&mut self, form: &ReleaseForm) -> Result<Release, FormError> {
        let data = match form.to_create_data() {
            Ok(data) => data,
            Err(e) => {
                self.banner.show(e.to_string());
                return Err(e.into());
            }
        };
        let created = self.api.create_release(&data).await;
        let release = self.after_mutation(created, CREATE_FAILED).await?;
        Ok(release)
    }

    /// Send an already confirmed edit.
    pub async fn update(
        &mut self,
        id: &RecordId,
        data: &CreateReleaseData,
    ) -> Result<Release, FormError> {
        let updated = self.api.update_release(id, data).await;
        let release = self.after_mutation(updated, UPDATE_FAILED).await?;
        Ok(release)
    }

    pub async fn delete(&mut self, id: &RecordId) -> Result<(), FormError> {
        let deleted = self.api.delete_release(id).await;
        self.after_mutation(deleted, DELETE_FAILED).await?;
        Ok(())
    }

    async fn after_mutation<T>(
        &mut self,
        result: Result<T, ApiError>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.refresh().await;
                Ok(value)
            }
            Err(e) => {
                self.banner.show_api_error(&e, fallback);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Platform, ReleaseType};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use reqwest::StatusCode;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeReleases {
        rows: Mutex<Vec<Value>>,
        list_calls: Mutex<usize>,
        fail_list: bool,
        fail_mutations: bool,
    }

    impl FakeReleases {
        fn with_rows(rows: Vec<Value>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Default::default()
            }
        }

        fn list_calls(&self) -> usize {
            *self.list_calls.lock().unwrap()
        }

        fn reject(&self) -> Result<(), ApiError> {
            if self.fail_mutations {
                return Err(ApiError::Server {
                    status: StatusCode::BAD_REQUEST,
                    message: "Version already exists".into(),
                });
            }
            Ok(())
        }
    }

    fn row(id: u32, version: &str) -> Value {
        json!({
            "id": id,
            "platform": "Roku",
            "release_type": "release",
            "is_successful": true,
            "version": version,
            "rollout_date": "2024-05-01T00:00:00Z",
        })
    }

    #[async_trait]
    impl ReleaseApi for FakeReleases {
        async fn list_releases(&self) -> Result<Value, ApiError> {
            *self.list_calls.lock().unwrap() += 1;
            if self.fail_list {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            Ok(Value::Array(self.rows.lock().unwrap().clone()))
        }

        async fn create_release(&self, data: &CreateReleaseData) -> Result<Release, ApiError> {
            self.reject()?;
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as u32 + 1;
            let created = row(id, &data.version);
            rows.push(created.clone());
            Ok(serde_json::from_value(created).unwrap())
        }

        async fn update_release(
            &self,
            id: &RecordId,
            data: &CreateReleaseData,
        ) -> Result<Release, ApiError> {
            self.reject()?;
            let mut rows = self.rows.lock().unwrap();
            let target = rows
                .iter_mut()
                .find(|r| r["id"].to_string() == id.0)
                .unwrap();
            target["version"] = json!(data.version);
            Ok(serde_json::from_value(target.clone()).unwrap())
        }

        async fn delete_release(&self, id: &RecordId) -> Result<(), ApiError> {
            self.reject()?;
            self.rows.lock().unwrap().retain(|r| r["id"].to_string() != id.0);
            Ok(())
        }
    }

    fn filled_form() -> ReleaseForm {
        let mut form = ReleaseForm::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        form.platform = Some(Platform::Roku);
        form.release_type = Some(ReleaseType::Release);
        form.version = "4.0.0".into();
        form
    }

    #[tokio::test]
    async fn refresh_failure_uses_fallback_text() {
        let api = FakeReleases {
            fail_list: true,
            ..Default::default()
        };
        let mut page = ReleasePage::new(api);
        assert!(!page.refresh().await);
        assert_eq!(page.banner().message(), Some(LOAD_FAILED));
        assert!(page.view().releases().is_empty());
    }

    #[tokio::test]
    async fn create_reloads_the_list() {
        let api = FakeReleases::with_rows(vec![row(1, "1.0.0")]);
        let mut page = ReleasePage::new(api);
        page.refresh().await;

        let created = page.create(&filled_form()).await.unwrap();
        assert_eq!(created.version, "4.0.0");
        assert_eq!(page.api().list_calls(), 2);
        assert_eq!(page.view().releases().len(), 2);
        assert!(!page.banner().is_visible());
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let api = FakeReleases::default();
        let mut page = ReleasePage::new(api);
        let mut form = filled_form();
        form.version.clear();

        let err = page.create(&form).await.unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
        assert_eq!(page.banner().message(), Some("Version is required"));
        assert!(page.api().rows.lock().unwrap().is_empty());
        assert_eq!(page.api().list_calls(), 0);
    }

    #[tokio::test]
    async fn update_and_delete_reload() {
        let api = FakeReleases::with_rows(vec![row(1, "1.0.0"), row(2, "2.0.0")]);
        let mut page = ReleasePage::new(api);
        page.refresh().await;

        let mut form = ReleaseForm::from_release(&page.view().releases()[0]);
        form.version = "1.0.1".into();
        let data = form.to_create_data().unwrap();
        page.update(&RecordId::from("1"), &data).await.unwrap();
        assert_eq!(page.view().releases()[0].version, "1.0.1");

        page.delete(&RecordId::from("2")).await.unwrap();
        assert_eq!(page.view().releases().len(), 1);
        assert_eq!(page.api().list_calls(), 3);
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cached_list_and_shows_server_message() {
        let api = FakeReleases {
            rows: Mutex::new(vec![row(1, "1.0.0")]),
            fail_mutations: true,
            ..Default::default()
        };
        let mut page = ReleasePage::new(api);
        page.refresh().await;

        let err = page.delete(&RecordId::from("1")).await.unwrap_err();
        assert!(matches!(err, FormError::Api(_)));
        assert_eq!(page.banner().message(), Some("Version already exists"));
        assert_eq!(page.view().releases().len(), 1);
        assert_eq!(page.api().list_calls(), 1);
    }
}
