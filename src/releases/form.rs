//! Create/edit form for a single release.
//!
//! Creating submits straight away. Editing first produces the list of
//! changed fields so the caller can ask for confirmation; only a confirmed
//! edit is sent.

use std::fmt;

use chrono::NaiveDate;

use crate::api::{CreateReleaseData, Platform, Release, ReleaseType};
use crate::dates;
use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseForm {
    pub platform: Option<Platform>,
    pub release_type: Option<ReleaseType>,
    pub is_successful: bool,
    pub version: String,
    /// As typed: `YYYY-MM-DD`.
    pub rollout_date: String,
    pub mcm_link: String,
    pub ci_job_link: String,
    pub commit_list_link: String,
}

impl ReleaseForm {
    /// Blank form for a new release: successful, dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            platform: None,
            release_type: None,
            is_successful: true,
            version: String::new(),
            rollout_date: dates::format_query(today),
            mcm_link: String::new(),
            ci_job_link: String::new(),
            commit_list_link: String::new(),
        }
    }

    /// Form pre-filled from an existing release.
    pub fn from_release(release: &Release) -> Self {
        Self {
            platform: Some(release.platform.clone()),
            release_type: Some(release.release_type.clone()),
            is_successful: release.is_successful,
            version: release.version.clone(),
            rollout_date: dates::format_query(release.rollout_date.date_naive()),
            mcm_link: release.mcm_link.clone().unwrap_or_default(),
            ci_job_link: release.ci_job_link.clone().unwrap_or_default(),
            commit_list_link: release.commit_list_link.clone().unwrap_or_default(),
        }
    }

    pub fn set_rollout_date(&mut self, date: NaiveDate) {
        self.rollout_date = dates::format_query(date);
    }

    /// Check required fields and build the request body.
    ///
    /// The date goes out as midnight UTC; empty links go out as `""`.
    pub fn to_create_data(&self) -> Result<CreateReleaseData, ValidationError> {
        let platform = self.platform.clone().ok_or(ValidationError::MissingPlatform)?;
        let release_type = self
            .release_type
            .clone()
            .ok_or(ValidationError::MissingReleaseType)?;
        let version = self.version.trim();
        if version.is_empty() {
            return Err(ValidationError::EmptyVersion);
        }
        let date = self.parsed_date()?;

        Ok(CreateReleaseData {
            platform,
            release_type,
            is_successful: self.is_successful,
            version: version.to_string(),
            rollout_date: dates::to_iso_midnight(date),
            mcm_link: self.mcm_link.trim().to_string(),
            ci_job_link: self.ci_job_link.trim().to_string(),
            commit_list_link: self.commit_list_link.trim().to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_create_data().map(|_| ())
    }

    /// Validate and decide how the submission proceeds in `mode`.
    pub fn submit(&self, mode: &FormMode) -> Result<Submission, ValidationError> {
        let data = self.to_create_data()?;
        Ok(match mode {
            FormMode::Create => Submission::Immediate(data),
            FormMode::Edit(original) => {
                let changes = changes_between(original, &data);
                Submission::NeedsConfirmation { data, changes }
            }
        })
    }

    fn parsed_date(&self) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(self.rollout_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.rollout_date.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Release),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Immediate(CreateReleaseData),
    /// Edit: show `changes`, then send `data` once confirmed. The list may
    /// be empty; confirming still sends the unchanged record.
    NeedsConfirmation {
        data: CreateReleaseData,
        changes: Vec<FieldChange>,
    },
}

impl Submission {
    pub fn data(&self) -> &CreateReleaseData {
        match self {
            Submission::Immediate(data) | Submission::NeedsConfirmation { data, .. } => data,
        }
    }
}

// ── Change list ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Platform,
    ReleaseType,
    SuccessStatus,
    Version,
    RolloutDate,
    McmLink,
    CiJobLink,
    CommitListLink,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Platform => "Platform",
            Field::ReleaseType => "Release Type",
            Field::SuccessStatus => "Success Status",
            Field::Version => "Version",
            Field::RolloutDate => "Rollout Date",
            Field::McmLink => "MCM Link",
            Field::CiJobLink => "CI Job Link",
            Field::CommitListLink => "Commit List Link",
        }
    }
}

/// One changed field. `None` renders as "None".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Field,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {}",
            self.field.label(),
            self.old.as_deref().unwrap_or("None"),
            self.new.as_deref().unwrap_or("None")
        )
    }
}

/// Every field of `edited` that differs from `original`, in form order.
///
/// Rollout dates compare as millisecond UTC ISO strings, so resetting a
/// stored time of day to midnight is listed. Empty and missing links are
/// the same.
pub fn changes_between(original: &Release, edited: &CreateReleaseData) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut push = |field, old: Option<String>, new: Option<String>| {
        if old != new {
            changes.push(FieldChange { field, old, new });
        }
    };

    push(
        Field::Platform,
        Some(original.platform.to_string()),
        Some(edited.platform.to_string()),
    );
    push(
        Field::ReleaseType,
        Some(original.release_type.to_string()),
        Some(edited.release_type.to_string()),
    );
    push(
        Field::SuccessStatus,
        Some(yes_no(original.is_successful)),
        Some(yes_no(edited.is_successful)),
    );
    push(
        Field::Version,
        Some(original.version.clone()),
        Some(edited.version.clone()),
    );
    let date_changed = dates::to_iso_millis(&original.rollout_date) != edited.rollout_date;
    let (old_date, new_date) = if date_changed {
        let new_date = dates::parse_datetime(&edited.rollout_date)
            .map(|dt| dates::format_display_instant(&dt))
            .unwrap_or_else(|| edited.rollout_date.clone());
        (
            Some(dates::format_display_instant(&original.rollout_date)),
            Some(new_date),
        )
    } else {
        (None, None)
    };
    push(Field::RolloutDate, old_date, new_date);
    push(
        Field::McmLink,
        link(original.mcm_link.as_deref()),
        link(Some(edited.mcm_link.as_str())),
    );
    push(
        Field::CiJobLink,
        link(original.ci_job_link.as_deref()),
        link(Some(edited.ci_job_link.as_str())),
    );
    push(
        Field::CommitListLink,
        link(original.commit_list_link.as_deref()),
        link(Some(edited.commit_list_link.as_str())),
    );

    changes
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn link(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn original() -> Release {
        serde_json::from_value(json!({
            "id": 5,
            "platform": "Android",
            "release_type": "release",
            "is_successful": true,
            "version": "3.1.0",
            "rollout_date": "2024-04-02T14:45:00Z",
            "mcm_link": "https://mcm/1",
            "ci_job_link": "",
        }))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn new_form_defaults() {
        let form = ReleaseForm::new(today());
        assert!(form.is_successful);
        assert_eq!(form.rollout_date, "2024-06-01");
        assert!(form.platform.is_none());
    }

    #[test]
    fn validation_order_and_messages() {
        let mut form = ReleaseForm::new(today());
        assert_eq!(form.validate(), Err(ValidationError::MissingPlatform));
        form.platform = Some(Platform::Roku);
        assert_eq!(form.validate(), Err(ValidationError::MissingReleaseType));
        form.release_type = Some(ReleaseType::Release);
        form.version = "   ".into();
        assert_eq!(form.validate(), Err(ValidationError::EmptyVersion));
        form.version = "1.0".into();
        form.rollout_date = "04/02/2024".into();
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidDate("04/02/2024".into()))
        );
    }

    #[test]
    fn create_data_uses_midnight_and_empty_links() {
        let mut form = ReleaseForm::new(today());
        form.platform = Some(Platform::Ps5);
        form.release_type = Some(ReleaseType::Rollback);
        form.version = " 9.9 ".into();

        match form.submit(&FormMode::Create).unwrap() {
            Submission::Immediate(data) => {
                assert_eq!(data.rollout_date, "2024-06-01T00:00:00.000Z");
                assert_eq!(data.version, "9.9");
                assert_eq!(data.mcm_link, "");
                let body = serde_json::to_value(&data).unwrap();
                assert_eq!(body["platform"], "PS5");
                assert_eq!(body["release_type"], "rollback");
            }
            other => panic!("expected immediate submission, got {:?}", other),
        }
    }

    fn edit_changes(release: Release, form: &ReleaseForm) -> Vec<FieldChange> {
        match form.submit(&FormMode::Edit(release)).unwrap() {
            Submission::NeedsConfirmation { changes, .. } => changes,
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[test]
    fn resetting_time_of_day_is_listed_as_a_change() {
        let release = original();
        let form = ReleaseForm::from_release(&release);
        assert_eq!(form.rollout_date, "2024-04-02");
        assert_eq!(
            form.to_create_data().unwrap().rollout_date,
            "2024-04-02T00:00:00.000Z"
        );

        let changes = edit_changes(release, &form);
        assert_eq!(changes.len(), 1, "unexpected changes: {:?}", changes);
        assert_eq!(changes[0].field, Field::RolloutDate);
        assert_eq!(
            changes[0].to_string(),
            "Rollout Date: Apr 02, 2024 14:45 UTC → Apr 02, 2024"
        );
    }

    #[test]
    fn unchanged_midnight_release_has_no_changes() {
        let mut release = original();
        release.rollout_date = dates::parse_datetime("2024-04-02T00:00:00Z").unwrap();
        let form = ReleaseForm::from_release(&release);
        let changes = edit_changes(release, &form);
        assert!(changes.is_empty(), "unexpected changes: {:?}", changes);
        assert_eq!(form.to_create_data().unwrap().ci_job_link, "");
    }

    #[test]
    fn one_entry_per_changed_field() {
        let release = original();
        let mut form = ReleaseForm::from_release(&release);
        form.platform = Some(Platform::Xbox);
        form.is_successful = false;
        form.rollout_date = "2024-04-03".into();
        form.mcm_link = String::new();
        form.commit_list_link = "https://git/compare".into();

        let submission = form.submit(&FormMode::Edit(release)).unwrap();
        let Submission::NeedsConfirmation { changes, .. } = submission else {
            panic!("edit must need confirmation");
        };
        let lines: Vec<String> = changes.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Platform: Android → Xbox",
                "Success Status: Yes → No",
                "Rollout Date: Apr 02, 2024 14:45 UTC → Apr 03, 2024",
                "MCM Link: https://mcm/1 → None",
                "Commit List Link: None → https://git/compare",
            ]
        );
    }
}
