use chrono::{Duration, NaiveDate};

use crate::api::{MetricSummary, MetricsApi, MetricsData};
use crate::banner::ErrorBanner;

pub const LOAD_FAILED: &str = "Failed to load metrics data";
pub const UNAVAILABLE_TEXT: &str = "Unable to load data";

pub const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    DeploymentFrequency,
    LeadTime,
    TimeToRestore,
    ChangeFailureRate,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::DeploymentFrequency,
        MetricKind::LeadTime,
        MetricKind::TimeToRestore,
        MetricKind::ChangeFailureRate,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MetricKind::DeploymentFrequency => "Deployment Frequency",
            MetricKind::LeadTime => "Lead Time for Changes",
            MetricKind::TimeToRestore => "Time to Restore Service",
            MetricKind::ChangeFailureRate => "Change Failure Rate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::DeploymentFrequency => "per day",
            MetricKind::LeadTime | MetricKind::TimeToRestore => "hours",
            MetricKind::ChangeFailureRate => "%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricKind::DeploymentFrequency => "Compared to previous period",
            MetricKind::LeadTime => "Time from commit to deploy",
            MetricKind::TimeToRestore => "Recovery time after failures",
            MetricKind::ChangeFailureRate => "Failed deployments percentage",
        }
    }

    pub fn summary(self, data: &MetricsData) -> Option<&MetricSummary> {
        match self {
            MetricKind::DeploymentFrequency => data.deployment_frequency.as_ref(),
            MetricKind::LeadTime => data.lead_time.as_ref(),
            MetricKind::TimeToRestore => data.time_to_restore.as_ref(),
            MetricKind::ChangeFailureRate => data.change_failure_rate.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardState {
    Available { value: f64, trend: f64 },
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCard {
    pub kind: MetricKind,
    pub state: CardState,
}

impl MetricCard {
    /// A card needs both a value and a trend; anything less is unavailable.
    pub fn from_data(kind: MetricKind, data: Option<&MetricsData>) -> Self {
        let state = data
            .and_then(|d| kind.summary(d))
            .and_then(|s| Some((s.value?, s.trend?)))
            .filter(|(value, trend)| value.is_finite() && trend.is_finite())
            .map_or(CardState::Unavailable, |(value, trend)| CardState::Available {
                value,
                trend,
            });
        Self { kind, state }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, CardState::Available { .. })
    }

    /// `12.50 per day`, or the unavailable text.
    pub fn value_text(&self) -> String {
        match self.state {
            CardState::Available { value, .. } => format!("{:.2} {}", value, self.kind.unit()),
            CardState::Unavailable => UNAVAILABLE_TEXT.to_string(),
        }
    }

    /// `+4.20%` / `-1.00%`. Only positive trends get a sign.
    pub fn trend_text(&self) -> Option<String> {
        match self.state {
            CardState::Available { trend, .. } if trend > 0.0 => Some(format!("+{:.2}%", trend)),
            CardState::Available { trend, .. } => Some(format!("{:.2}%", trend)),
            CardState::Unavailable => None,
        }
    }

    pub fn trending_up(&self) -> Option<bool> {
        match self.state {
            CardState::Available { trend, .. } => Some(trend > 0.0),
            CardState::Unavailable => None,
        }
    }

    pub fn footer(&self) -> Option<String> {
        self.trending_up().map(|up| {
            format!("Trending {} this period", if up { "up" } else { "down" })
        })
    }
}

/// The metrics half of the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardView {
    start: NaiveDate,
    end: NaiveDate,
    data: Option<MetricsData>,
    banner: ErrorBanner,
}

impl DashboardView {
    /// Window of `days` ending `today`.
    pub fn new(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days),
            end: today,
            data: None,
            banner: ErrorBanner::new(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Change the window. The caller reloads afterwards.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = start;
        self.end = end;
    }

    pub fn data(&self) -> Option<&MetricsData> {
        self.data.as_ref()
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn banner_mut(&mut self) -> &mut ErrorBanner {
        &mut self.banner
    }

    /// Fetch metrics for the current window.
    ///
    /// On failure the previous data is dropped so every card reads as
    /// unavailable, and the banner shows the server message or fallback.
    pub async fn load(&mut self, api: &dyn MetricsApi) -> bool {
        match api.metrics(self.start, self.end).await {
            Ok(data) => {
                self.data = Some(data);
                self.banner.dismiss();
                true
            }
            Err(e) => {
                tracing::debug!(start = %self.start, end = %self.end, "metrics failed: {}", e);
                self.data = None;
                self.banner.show_api_error(&e, LOAD_FAILED);
                false
            }
        }
    }

    pub fn cards(&self) -> Vec<MetricCard> {
        MetricKind::ALL
            .into_iter()
            .map(|kind| MetricCard::from_data(kind, self.data.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VolumePoint;
    use crate::errors::ApiError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeMetrics {
        response: Result<serde_json::Value, StatusCode>,
        seen: Mutex<Option<(NaiveDate, NaiveDate)>>,
    }

    impl FakeMetrics {
        fn ok(body: serde_json::Value) -> Self {
            Self {
                response: Ok(body),
                seen: Mutex::new(None),
            }
        }

        fn failing(status: StatusCode) -> Self {
            Self {
                response: Err(status),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl MetricsApi for FakeMetrics {
        async fn metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<MetricsData, ApiError> {
            *self.seen.lock().unwrap() = Some((start, end));
            match &self.response {
                Ok(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                Err(status) => Err(ApiError::Status { status: *status }),
            }
        }

        async fn deployment_volume(
            &self,
            _: NaiveDate,
            _: NaiveDate,
        ) -> Result<Vec<VolumePoint>, ApiError> {
            unreachable!()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn default_window_is_last_thirty_days() {
        let view = DashboardView::new(today(), DEFAULT_RANGE_DAYS);
        assert_eq!(view.start(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(view.end(), today());
    }

    #[test]
    fn card_text() {
        let up = MetricCard {
            kind: MetricKind::DeploymentFrequency,
            state: CardState::Available {
                value: 1.5,
                trend: 12.3456,
            },
        };
        assert_eq!(up.value_text(), "1.50 per day");
        assert_eq!(up.trend_text().as_deref(), Some("+12.35%"));
        assert_eq!(up.footer().as_deref(), Some("Trending up this period"));

        let down = MetricCard {
            kind: MetricKind::ChangeFailureRate,
            state: CardState::Available {
                value: 20.0,
                trend: -3.0,
            },
        };
        assert_eq!(down.value_text(), "20.00 %");
        assert_eq!(down.trend_text().as_deref(), Some("-3.00%"));
        assert_eq!(down.footer().as_deref(), Some("Trending down this period"));
    }

    #[test]
    fn card_without_trend_is_unavailable() {
        let data: MetricsData = serde_json::from_value(json!({
            "lead_time": {"value": 10.0},
            "time_to_restore": {"value": 2.0, "trend": 0.0}
        }))
        .unwrap();
        let lead = MetricCard::from_data(MetricKind::LeadTime, Some(&data));
        assert_eq!(lead.state, CardState::Unavailable);
        assert_eq!(lead.value_text(), UNAVAILABLE_TEXT);
        assert!(lead.footer().is_none());

        let restore = MetricCard::from_data(MetricKind::TimeToRestore, Some(&data));
        assert!(restore.is_available());
        assert_eq!(restore.trend_text().as_deref(), Some("0.00%"));
    }

    #[tokio::test]
    async fn load_queries_the_window() {
        let api = FakeMetrics::ok(json!({
            "deployment_frequency": {"value": 3.0, "trend": 5.0, "history": []}
        }));
        let mut view = DashboardView::new(today(), 7);
        assert!(view.load(&api).await);
        assert_eq!(
            *api.seen.lock().unwrap(),
            Some((NaiveDate::from_ymd_opt(2024, 6, 23).unwrap(), today()))
        );
        let available: Vec<bool> = view.cards().iter().map(MetricCard::is_available).collect();
        assert_eq!(available, vec![true, false, false, false]);
    }

    #[tokio::test]
    async fn failed_fetch_without_body_shows_fallback_and_unavailable_cards() {
        let mut view = DashboardView::new(today(), DEFAULT_RANGE_DAYS);
        let ok = FakeMetrics::ok(json!({
            "lead_time": {"value": 1.0, "trend": 1.0}
        }));
        view.load(&ok).await;

        let failing = FakeMetrics::failing(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!view.load(&failing).await);
        assert_eq!(view.banner().message(), Some(LOAD_FAILED));
        assert!(view.cards().iter().all(|c| c.value_text() == UNAVAILABLE_TEXT));
    }
}
