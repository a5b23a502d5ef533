//! Deployment-volume chart.
//!
//! The last 90 days are fetched once. Switching between 7, 30 and 90 days
//! or between platforms only re-slices what is already held.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{Duration, NaiveDate};

use crate::api::{MetricsApi, Platform, VolumePoint};
use crate::dates::DateRange;
use crate::errors::ApiError;

pub const FETCH_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    Days7,
    Days30,
    #[default]
    Days90,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Days90, TimeRange::Days30, TimeRange::Days7];

    pub fn days(self) -> i64 {
        match self {
            TimeRange::Days7 => 7,
            TimeRange::Days30 => 30,
            TimeRange::Days90 => 90,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TimeRange::Days7 => "7d",
            TimeRange::Days30 => "30d",
            TimeRange::Days90 => "90d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Days7 => "Last 7 days",
            TimeRange::Days30 => "Last 30 days",
            TimeRange::Days90 => "Last 3 months",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" | "7" => Ok(TimeRange::Days7),
            "30d" | "30" => Ok(TimeRange::Days30),
            "90d" | "90" | "3m" => Ok(TimeRange::Days90),
            _ => bail!("Invalid time range '{}'. Valid values: 7d, 30d, 90d", s),
        }
    }
}

/// Which series the chart shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeriesSelection {
    /// Sum of the known platforms per date.
    #[default]
    Total,
    Platform(Platform),
}

impl SeriesSelection {
    pub fn label(&self) -> &str {
        match self {
            SeriesSelection::Total => "Total",
            SeriesSelection::Platform(p) => p.as_str(),
        }
    }
}

impl FromStr for SeriesSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("total") {
            return Ok(SeriesSelection::Total);
        }
        let platform = Platform::from(s.to_string());
        if !platform.is_known() {
            let names: Vec<&str> = Platform::KNOWN.iter().map(|p| p.as_str()).collect();
            bail!(
                "Unknown platform '{}'. Valid values: Total, {}",
                s,
                names.join(", ")
            );
        }
        Ok(SeriesSelection::Platform(platform))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

#[derive(Debug, Clone)]
pub struct VolumeChart {
    today: NaiveDate,
    points: Vec<VolumePoint>,
    range: TimeRange,
    selection: SeriesSelection,
}

impl VolumeChart {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            points: Vec::new(),
            range: TimeRange::default(),
            selection: SeriesSelection::default(),
        }
    }

    /// `(today - 90 days, today)`
    pub fn fetch_window(&self) -> (NaiveDate, NaiveDate) {
        (self.today - Duration::days(FETCH_WINDOW_DAYS), self.today)
    }

    pub async fn load(&mut self, api: &dyn MetricsApi) -> Result<usize, ApiError> {
        let (start, end) = self.fetch_window();
        let points = api.deployment_volume(start, end).await?;
        tracing::debug!(count = points.len(), "loaded deployment volume");
        self.set_points(points);
        Ok(self.points.len())
    }

    pub fn set_points(&mut self, mut points: Vec<VolumePoint>) {
        points.sort_by_key(|p| p.date);
        self.points = points;
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
    }

    pub fn selection(&self) -> &SeriesSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: SeriesSelection) {
        self.selection = selection;
    }

    /// Points inside `[today - N days, today]` for the selected series.
    pub fn series(&self) -> ChartSeries {
        let window = DateRange::last_days(self.today, self.range.days());
        let points = self
            .points
            .iter()
            .filter(|p| window.contains(p.date))
            .map(|p| ChartPoint {
                date: p.date,
                value: match &self.selection {
                    SeriesSelection::Total => Platform::KNOWN.iter().map(|pl| p.count(pl)).sum(),
                    SeriesSelection::Platform(platform) => p.count(platform),
                },
            })
            .collect();
        ChartSeries {
            label: self.selection.label().to_string(),
            points,
        }
    }
}
