use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Where an application currently stands. Not a workflow: any status can
/// be amended to any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Applied,
        Status::Interview,
        Status::Offer,
        Status::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
        }
    }

    /// Next status in selector order, wrapping around
    pub fn next(&self) -> Status {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Status {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::ValidationError(format!(
                    "unknown status '{}', expected one of Applied, Interview, Offer, Rejected",
                    wanted
                ))
            })
    }
}

/// Positional identifier: the index a record got when it was appended.
/// Only meaningful for the session that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One job application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub application_date: NaiveDate,
    pub company: String,
    pub position: String,
    pub platform: String,
    pub salary_range: String,
    pub status: Status,
    /// File name of the attached CV, the content itself is never kept
    pub cv_file: Option<String>,
}

/// What the "add application" form hands over, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub application_date: Option<NaiveDate>,
    pub company: String,
    pub position: String,
    pub platform: String,
    pub salary_range: String,
    pub status: Option<Status>,
    pub cv_file: Option<String>,
}

/// Earliest date the form accepts
pub fn min_application_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// CV formats the upload field accepts
pub const CV_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

impl ApplicationDraft {
    /// Check the draft and turn it into a record
    pub fn validate(self) -> crate::Result<ApplicationRecord> {
        let application_date = self
            .application_date
            .ok_or_else(|| Error::ValidationError("application date is required".to_string()))?;

        if application_date < min_application_date() {
            return Err(Error::ValidationError(format!(
                "application date {} is before {}",
                application_date,
                min_application_date()
            )));
        }

        let status = self
            .status
            .ok_or_else(|| Error::ValidationError("status is required".to_string()))?;

        let cv_file = match self.cv_file.map(|name| name.trim().to_string()) {
            Some(name) if name.is_empty() => None,
            Some(name) => {
                if !has_cv_extension(&name) {
                    return Err(Error::ValidationError(format!(
                        "CV '{}' must be a .pdf or .docx file",
                        name
                    )));
                }
                Some(name)
            }
            None => None,
        };

        Ok(ApplicationRecord {
            application_date,
            company: self.company,
            position: self.position,
            platform: self.platform,
            salary_range: self.salary_range,
            status,
            cv_file,
        })
    }
}

fn has_cv_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| CV_EXTENSIONS.iter().any(|ok| ok.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
