use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates;

// ── Enum-like strings ─────────────────────────────────────────────────

/// Target platform of a release.
///
/// Unknown names from the backend are kept verbatim in `Other` rather than
/// rejected, so a new platform never breaks the release list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Android,
    Samsung,
    Roku,
    Xbox,
    Ps4,
    Ps5,
    Other(String),
}

impl Platform {
    /// The six platforms the dashboard charts and offers in the form.
    pub const KNOWN: [Platform; 6] = [
        Platform::Android,
        Platform::Samsung,
        Platform::Roku,
        Platform::Xbox,
        Platform::Ps4,
        Platform::Ps5,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Android => "Android",
            Platform::Samsung => "Samsung",
            Platform::Roku => "Roku",
            Platform::Xbox => "Xbox",
            Platform::Ps4 => "PS4",
            Platform::Ps5 => "PS5",
            Platform::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Other(_))
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        Platform::KNOWN
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(raw.trim()))
            .cloned()
            .unwrap_or(Platform::Other(raw))
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.as_str().to_string()
    }
}

impl std::str::FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of deployment event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReleaseType {
    Release,
    Rollback,
    Other(String),
}

impl ReleaseType {
    pub const KNOWN: [ReleaseType; 2] = [ReleaseType::Release, ReleaseType::Rollback];

    pub fn as_str(&self) -> &str {
        match self {
            ReleaseType::Release => "release",
            ReleaseType::Rollback => "rollback",
            ReleaseType::Other(name) => name,
        }
    }
}

impl From<String> for ReleaseType {
    fn from(raw: String) -> Self {
        ReleaseType::KNOWN
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw.trim()))
            .cloned()
            .unwrap_or(ReleaseType::Other(raw))
    }
}

impl From<ReleaseType> for String {
    fn from(t: ReleaseType) -> Self {
        t.as_str().to_string()
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ReleaseType::from(s.to_string()))
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a backend record. The backend sends integers; older
/// builds sent strings. Both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

// ── Releases ──────────────────────────────────────────────────────────

/// A logged deployment event, as returned by `GET releases/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: RecordId,
    pub platform: Platform,
    pub release_type: ReleaseType,
    pub is_successful: bool,
    pub version: String,
    #[serde(
        deserialize_with = "dates::deserialize_datetime",
        serialize_with = "dates::serialize_datetime"
    )]
    pub rollout_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mcm_link: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub ci_job_link: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub commit_list_link: Option<String>,
}

impl Release {
    /// Decode a release list, treating anything that is not an array
    /// (null, an object, an empty body) as "no releases".
    pub fn list_from_value(value: serde_json::Value) -> Result<Vec<Release>, serde_json::Error> {
        match value {
            serde_json::Value::Array(_) => serde_json::from_value(value),
            _ => Ok(Vec::new()),
        }
    }

    pub fn link(&self, kind: LinkKind) -> Option<&str> {
        match kind {
            LinkKind::Mcm => self.mcm_link.as_deref(),
            LinkKind::CiJob => self.ci_job_link.as_deref(),
            LinkKind::Commits => self.commit_list_link.as_deref(),
        }
    }
}

/// The three optional links a release may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Mcm,
    CiJob,
    Commits,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::Mcm, LinkKind::CiJob, LinkKind::Commits];

    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Mcm => "MCM",
            LinkKind::CiJob => "CI Job",
            LinkKind::Commits => "Commits",
        }
    }
}

impl std::str::FromStr for LinkKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mcm" => Ok(LinkKind::Mcm),
            "ci" | "ci-job" | "ci_job" => Ok(LinkKind::CiJob),
            "commits" | "commit-list" | "commit_list" => Ok(LinkKind::Commits),
            _ => anyhow::bail!("Invalid link '{}'. Valid values: mcm, ci, commits", s),
        }
    }
}

/// Body of `POST releases/` and `PUT releases/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReleaseData {
    pub platform: Platform,
    pub release_type: ReleaseType,
    pub is_successful: bool,
    pub version: String,
    /// ISO-8601, midnight UTC.
    pub rollout_date: String,
    pub mcm_link: String,
    pub ci_job_link: String,
    pub commit_list_link: String,
}

// ── Auth ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInfo {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
}

// ── Metrics ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    pub value: f64,
}

/// One DORA metric: current value, trend versus the prior period, history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub trend: Option<f64>,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

/// Response of `GET metrics/`. A metric that is missing or not shaped like
/// a summary decodes as `None` instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsData {
    #[serde(default, deserialize_with = "lenient_summary")]
    pub deployment_frequency: Option<MetricSummary>,
    #[serde(default, deserialize_with = "lenient_summary")]
    pub lead_time: Option<MetricSummary>,
    #[serde(default, deserialize_with = "lenient_summary")]
    pub time_to_restore: Option<MetricSummary>,
    #[serde(default, deserialize_with = "lenient_summary")]
    pub change_failure_rate: Option<MetricSummary>,
}

/// One row of `GET metrics/deployment-volume`: a date plus per-platform counts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolumePoint {
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: BTreeMap<String, serde_json::Value>,
}

impl VolumePoint {
    /// Count for one platform; absent or non-numeric values count as zero.
    pub fn count(&self, platform: &Platform) -> f64 {
        self.counts
            .get(platform.as_str())
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn lenient_summary<'de, D>(deserializer: D) -> Result<Option<MetricSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::Object(_) => Ok(serde_json::from_value(raw).ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn release_decodes_numeric_id_and_http_date() {
        let release: Release = serde_json::from_value(json!({
            "id": 7,
            "platform": "Xbox",
            "release_type": "rollback",
            "is_successful": false,
            "version": "2.1.0",
            "rollout_date": "Thu, 15 Feb 2024 00:00:00 GMT",
            "mcm_link": "",
            "ci_job_link": null
        }))
        .unwrap();
        assert_eq!(release.id, RecordId("7".into()));
        assert_eq!(release.platform, Platform::Xbox);
        assert_eq!(release.release_type, ReleaseType::Rollback);
        assert!(!release.is_successful);
        assert_eq!(
            release.rollout_date.date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
        assert!(release.mcm_link.is_none());
        assert!(release.ci_job_link.is_none());
        assert!(release.commit_list_link.is_none());
    }

    #[test]
    fn unknown_platform_is_kept_verbatim() {
        let p: Platform = serde_json::from_value(json!("Switch")).unwrap();
        assert_eq!(p, Platform::Other("Switch".into()));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("Switch"));
        assert!(!p.is_known());
    }

    #[test]
    fn platform_names_round_trip_case_insensitively() {
        assert_eq!("ps5".parse::<Platform>().unwrap(), Platform::Ps5);
        assert_eq!(Platform::Ps4.to_string(), "PS4");
        assert_eq!(
            serde_json::to_value(Platform::Samsung).unwrap(),
            json!("Samsung")
        );
    }

    #[test]
    fn list_from_non_array_is_empty() {
        assert!(Release::list_from_value(json!(null)).unwrap().is_empty());
        assert!(Release::list_from_value(json!({"error": "x"})).unwrap().is_empty());
        assert!(Release::list_from_value(json!("releases")).unwrap().is_empty());
    }

    #[test]
    fn list_from_array_decodes_each_release() {
        let list = Release::list_from_value(json!([
            {"id": "a", "platform": "Android", "release_type": "release",
             "is_successful": true, "version": "1.0", "rollout_date": "2024-01-10"}
        ]))
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id.to_string(), "a");
    }

    #[test]
    fn metrics_tolerate_scalar_and_missing_entries() {
        let data: MetricsData = serde_json::from_value(json!({
            "deployment_frequency": 2.5,
            "lead_time": {"value": 24.0, "trend": -3.5, "history": []},
            "change_failure_rate": {"value": 12.0}
        }))
        .unwrap();
        assert!(data.deployment_frequency.is_none());
        assert_eq!(data.lead_time.as_ref().unwrap().value, Some(24.0));
        assert!(data.time_to_restore.is_none());
        assert!(data.change_failure_rate.as_ref().unwrap().trend.is_none());
    }

    #[test]
    fn volume_point_counts_missing_and_non_numeric_as_zero() {
        let point: VolumePoint = serde_json::from_value(json!({
            "date": "2024-03-01",
            "Android": 3,
            "Roku": "n/a",
            "PS5": 1.0
        }))
        .unwrap();
        assert_eq!(point.count(&Platform::Android), 3.0);
        assert_eq!(point.count(&Platform::Roku), 0.0);
        assert_eq!(point.count(&Platform::Xbox), 0.0);
        assert_eq!(point.count(&Platform::Ps5), 1.0);
    }

    #[test]
    fn link_kind_parsing() {
        assert_eq!("ci".parse::<LinkKind>().unwrap(), LinkKind::CiJob);
        assert_eq!("MCM".parse::<LinkKind>().unwrap(), LinkKind::Mcm);
        assert!("jira".parse::<LinkKind>().is_err());
    }

    #[test]
    fn auth_status_defaults_to_unauthenticated() {
        let status: AuthStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!status.authenticated);
    }
}
