//! DORA metrics: the four summary cards and the deployment-volume chart.

pub mod dashboard;
pub mod volume;

pub use dashboard::{CardState, DashboardView, MetricCard, MetricKind};
pub use volume::{ChartPoint, ChartSeries, SeriesSelection, TimeRange, VolumeChart};
