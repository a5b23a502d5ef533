//! Release list view model.
//!
//! Holds the releases fetched from `GET releases/` and derives the table
//! from them in a fixed order: date range, column filters, sort, page.
//! Nothing here talks to the network; mutations go through
//! [`ReleasePage`](super::ReleasePage), which reloads the whole list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::api::{Platform, RecordId, Release, ReleaseType};
use crate::dates::DateRange;
use crate::errors::ApiError;

/// Rows-per-page choices offered by the table footer.
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Releases whose rollout date falls inside `range`, in their original order.
pub fn filter_by_date_range(releases: &[Release], range: DateRange) -> Vec<&Release> {
    releases
        .iter()
        .filter(|r| range.contains_datetime(&r.rollout_date))
        .collect()
}

// ── Columns ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Platform,
    ReleaseType,
    Status,
    Version,
    RolloutDate,
    Links,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Platform,
        Column::ReleaseType,
        Column::Status,
        Column::Version,
        Column::RolloutDate,
        Column::Links,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::Platform => "platform",
            Column::ReleaseType => "release_type",
            Column::Status => "status",
            Column::Version => "version",
            Column::RolloutDate => "rollout_date",
            Column::Links => "links",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Platform => "Platform",
            Column::ReleaseType => "Type",
            Column::Status => "Status",
            Column::Version => "Version",
            Column::RolloutDate => "Rollout Date",
            Column::Links => "Links",
        }
    }

    pub fn is_sortable(self) -> bool {
        self != Column::Links
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "platform" => Ok(Column::Platform),
            "release_type" | "type" => Ok(Column::ReleaseType),
            "status" | "is_successful" => Ok(Column::Status),
            "version" => Ok(Column::Version),
            "rollout_date" | "date" => Ok(Column::RolloutDate),
            "links" => Ok(Column::Links),
            _ => bail!(
                "Unknown column '{}'. Valid columns: platform, release_type, status, version, rollout_date, links",
                s
            ),
        }
    }
}

// ── Filters ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Failed,
}

impl StatusFilter {
    pub fn matches(self, is_successful: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Success => is_successful,
            StatusFilter::Failed => !is_successful,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "success" | "successful" => Ok(StatusFilter::Success),
            "failed" | "failure" => Ok(StatusFilter::Failed),
            _ => bail!("Invalid status '{}'. Valid values: all, success, failed", s),
        }
    }
}

/// Per-column filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilters {
    pub platform: Option<Platform>,
    pub release_type: Option<ReleaseType>,
    pub status: StatusFilter,
}

impl ColumnFilters {
    pub fn matches(&self, release: &Release) -> bool {
        self.platform.as_ref().is_none_or(|p| *p == release.platform)
            && self
                .release_type
                .as_ref()
                .is_none_or(|t| *t == release.release_type)
            && self.status.matches(release.is_successful)
    }
}

// ── Sorting ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortState {
    fn compare(&self, a: &Release, b: &Release) -> Ordering {
        let ord = match self.column {
            Column::Platform => cmp_ignore_case(a.platform.as_str(), b.platform.as_str()),
            Column::ReleaseType => cmp_ignore_case(a.release_type.as_str(), b.release_type.as_str()),
            Column::Status => a.is_successful.cmp(&b.is_successful),
            Column::Version => natural_cmp(&a.version, &b.version),
            Column::RolloutDate => a.rollout_date.cmp(&b.rollout_date),
            Column::Links => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// `column` or `column:asc|desc`.
impl FromStr for SortState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (col, dir) = match s.split_once(':') {
            Some((col, dir)) => (col, Some(dir)),
            None => (s, None),
        };
        let column: Column = col.parse()?;
        if !column.is_sortable() {
            bail!("Column '{}' cannot be sorted", column);
        }
        let direction = match dir.map(|d| d.trim().to_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(d) => bail!("Invalid sort direction '{}'. Valid values: asc, desc", d),
        };
        Ok(SortState { column, direction })
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Compare so that `1.10.0` sorts after `1.9.0`: digit runs compare by value.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => {
                        let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    _ => cmp_ignore_case(x, y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Split into alternating runs of ASCII digits and everything else.
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

// ── View model ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ReleaseListView {
    releases: Vec<Release>,
    date_range: DateRange,
    filters: ColumnFilters,
    sort: Option<SortState>,
    page_index: usize,
    page_size: usize,
    visible: Vec<Column>,
}

impl Default for ReleaseListView {
    fn default() -> Self {
        Self {
            releases: Vec::new(),
            date_range: DateRange::default(),
            filters: ColumnFilters::default(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            visible: Column::ALL.to_vec(),
        }
    }
}

impl ReleaseListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list with a raw `GET releases/` payload.
    ///
    /// Anything other than an array is an empty list. Returns the number of
    /// releases loaded.
    pub fn load_from_value(&mut self, value: serde_json::Value) -> Result<usize, ApiError> {
        let releases =
            Release::list_from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.set_releases(releases);
        Ok(self.releases.len())
    }

    pub fn set_releases(&mut self, releases: Vec<Release>) {
        self.releases = releases;
        self.clamp_page();
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn find(&self, id: &RecordId) -> Option<&Release> {
        self.releases.iter().find(|r| &r.id == id)
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.page_index = 0;
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: ColumnFilters) {
        self.filters = filters;
        self.page_index = 0;
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if !PAGE_SIZES.contains(&size) {
            bail!(
                "Invalid page size {}. Valid sizes: {}",
                size,
                PAGE_SIZES.map(|s| s.to_string()).join(", ")
            );
        }
        self.page_size = size;
        self.page_index = 0;
        Ok(())
    }

    pub fn visible_columns(&self) -> &[Column] {
        &self.visible
    }

    /// Show only `columns`, kept in table order. An empty selection shows all.
    pub fn set_visible_columns(&mut self, columns: &[Column]) {
        self.visible = if columns.is_empty() {
            Column::ALL.to_vec()
        } else {
            Column::ALL
                .into_iter()
                .filter(|c| columns.contains(c))
                .collect()
        };
    }

    /// Rows after the date range and column filters, unsorted.
    pub fn filtered(&self) -> Vec<&Release> {
        filter_by_date_range(&self.releases, self.date_range)
            .into_iter()
            .filter(|r| self.filters.matches(r))
            .collect()
    }

    /// Filtered rows in sort order. The sort is stable.
    pub fn sorted(&self) -> Vec<&Release> {
        let mut rows = self.filtered();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }
        rows
    }

    pub fn row_count(&self) -> usize {
        self.filtered().len()
    }

    /// Never less than one, so an empty table still reads "Page 1 of 1".
    pub fn page_count(&self) -> usize {
        self.row_count().div_ceil(self.page_size).max(1)
    }

    /// Zero-based.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Jump to a zero-based page, clamped to the last page.
    pub fn set_page(&mut self, index: usize) {
        self.page_index = index.min(self.page_count() - 1);
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// The rows on the current page.
    pub fn page_rows(&self) -> Vec<&Release> {
        self.sorted()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// "all" followed by each platform in the data, first-seen order.
    pub fn platform_options(&self) -> Vec<String> {
        options(self.releases.iter().map(|r| r.platform.as_str()))
    }

    pub fn release_type_options(&self) -> Vec<String> {
        options(self.releases.iter().map(|r| r.release_type.as_str()))
    }

    fn clamp_page(&mut self) {
        self.page_index = self.page_index.min(self.page_count() - 1);
    }
}

fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out = vec!["all".to_string()];
    for value in values {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}
