// Session controller - owns the record store and fronts every user action
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::export::Exporter;
use crate::models::{ApplicationDraft, ApplicationRecord, RecordId, Status};
use crate::providers::{
    EmailAttachment, Notifier, OutgoingEmail, RepositoryLister, RepositoryListing,
};
use crate::store::RecordStore;
use crate::summary::{summarize_by_status, ReportPeriod, StatusSummary, WeekStart};
use crate::Result;

pub const WEEKLY_SUBJECT: &str = "Weekly Job Application Report";
pub const WEEKLY_BODY: &str = "Please find attached the weekly job application report.";
pub const CSV_MIME: &str = "text/csv";

/// A rendered CSV report, ready to download or attach
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub period: ReportPeriod,
    pub file_name: &'static str,
    pub csv: String,
    pub rows: usize,
}

/// One user's session: the store plus the collaborators it reaches out to.
///
/// External failures come back as errors and never touch the store, so a
/// failed repo listing or email leaves everything else usable.
pub struct Dashboard {
    store: RecordStore,
    lister: Box<dyn RepositoryLister>,
    notifier: Box<dyn Notifier>,
    week_start: WeekStart,
}

impl Dashboard {
    pub fn new(
        lister: Box<dyn RepositoryLister>,
        notifier: Box<dyn Notifier>,
        week_start: WeekStart,
    ) -> Self {
        Self {
            store: RecordStore::new(),
            lister,
            notifier,
            week_start,
        }
    }

    pub fn add_application(&mut self, draft: ApplicationDraft) -> Result<RecordId> {
        self.store.add_record(draft)
    }

    pub fn amend_status(&mut self, id: RecordId, status: Status) -> Result<()> {
        self.store.amend_status(id, status)
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        self.store.list_all()
    }

    pub fn summary(&self) -> StatusSummary {
        summarize_by_status(self.store.list_all())
    }

    pub fn report(&self, period: ReportPeriod, today: NaiveDate) -> Report {
        let rows = period.select(self.store.list_all(), today, self.week_start);

        Report {
            period,
            file_name: period.file_name(),
            csv: Exporter::to_csv(&rows),
            rows: rows.len(),
        }
    }

    /// "Download": write the report into `dir`
    pub fn save_report(&self, period: ReportPeriod, today: NaiveDate, dir: &Path) -> Result<PathBuf> {
        let rows = period.select(self.store.list_all(), today, self.week_start);
        Exporter::write_report(&rows, period, dir)
    }

    pub async fn list_repositories(&self, token: &str) -> Result<RepositoryListing> {
        self.lister.list_repositories(token).await.inspect_err(|e| {
            tracing::warn!("Repository listing failed: {}", e);
        })
    }

    /// Mail this week's report to `recipient`
    pub async fn send_weekly_report(&self, recipient: &str, today: NaiveDate) -> Result<()> {
        let report = self.report(ReportPeriod::Weekly, today);

        let email = OutgoingEmail {
            subject: WEEKLY_SUBJECT.to_string(),
            body: WEEKLY_BODY.to_string(),
            recipient: recipient.trim().to_string(),
            attachment: Some(EmailAttachment {
                filename: report.file_name.to_string(),
                mime_type: CSV_MIME.to_string(),
                bytes: report.csv.into_bytes(),
            }),
        };

        tracing::info!("Sending weekly report ({} rows)", report.rows);

        self.notifier.send(email).await.inspect_err(|e| {
            tracing::warn!("Weekly report not sent: {}", e);
        })
    }
}
