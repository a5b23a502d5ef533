//! REST client for the DORA backend.
//!
//! | Module     | Endpoints                                               |
//! |------------|---------------------------------------------------------|
//! | `auth`     | `auth/register`, `auth/login`, `auth/logout`, `auth/status` |
//! | `releases` | `releases/`, `releases/{id}`                            |
//! | `metrics`  | `metrics/`, `metrics/deployment-volume`                 |
//!
//! The view models never talk to [`ApiClient`] directly; they go through the
//! [`AuthApi`], [`ReleaseApi`] and [`MetricsApi`] traits so they can be
//! exercised against in-memory fakes.

pub mod auth;
pub mod client;
pub mod metrics;
pub mod models;
pub mod releases;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use client::ApiClient;
pub use models::{
    AuthStatus, CreateReleaseData, LinkKind, LoginResponse, MetricSummary, MetricsData, Platform,
    RecordId, Release, ReleaseType, VolumePoint,
};

use crate::errors::ApiError;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ApiError>;
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn auth_status(&self) -> Result<AuthStatus, ApiError>;
}

#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Raw list payload; the view model decides what a non-array means.
    async fn list_releases(&self) -> Result<serde_json::Value, ApiError>;
    async fn create_release(&self, data: &CreateReleaseData) -> Result<Release, ApiError>;
    async fn update_release(&self, id: &RecordId, data: &CreateReleaseData)
    -> Result<Release, ApiError>;
    async fn delete_release(&self, id: &RecordId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait MetricsApi: Send + Sync {
    async fn metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<MetricsData, ApiError>;
    async fn deployment_volume(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VolumePoint>, ApiError>;
}
