use std::sync::{Arc, Mutex};

use apptrack_core::providers::{
    Notifier, OutgoingEmail, RepoSummary, RepositoryLister, RepositoryListing,
};
use apptrack_core::{
    ApplicationDraft, Dashboard, Error, RecordId, ReportPeriod, Status, WeekStart,
};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};

/// Accepts exactly one token, rejects everything else
struct FakeGitHub;

#[async_trait]
impl RepositoryLister for FakeGitHub {
    async fn list_repositories(&self, token: &str) -> apptrack_core::Result<RepositoryListing> {
        if token != "good-token" {
            return Err(Error::AuthError("Bad credentials".to_string()));
        }
        Ok(RepositoryListing {
            login: "jane".to_string(),
            repos: vec![
                RepoSummary {
                    name: "portfolio".to_string(),
                    stars: 10,
                    forks: 2,
                    open_issues: 0,
                    description: None,
                    url: "https://github.com/jane/portfolio".to_string(),
                    is_private: false,
                },
                RepoSummary {
                    name: "dotfiles".to_string(),
                    stars: 1,
                    forks: 0,
                    open_issues: 3,
                    description: Some("configs".to_string()),
                    url: "https://github.com/jane/dotfiles".to_string(),
                    is_private: false,
                },
            ],
        })
    }
}

/// Records what it was asked to send
#[derive(Clone, Default)]
struct Outbox {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

#[async_trait]
impl Notifier for Outbox {
    async fn send(&self, email: OutgoingEmail) -> apptrack_core::Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(on: NaiveDate, company: &str, status: Status) -> ApplicationDraft {
    ApplicationDraft {
        application_date: Some(on),
        company: company.to_string(),
        position: "Engineer".to_string(),
        platform: "LinkedIn".to_string(),
        salary_range: "100-120k".to_string(),
        status: Some(status),
        cv_file: None,
    }
}

fn new_dashboard(outbox: Outbox) -> Dashboard {
    Dashboard::new(Box::new(FakeGitHub), Box::new(outbox), WeekStart::Monday)
}

#[test]
fn test_n_records_listed_in_insertion_order() {
    let mut dash = new_dashboard(Outbox::default());
    let names = ["Acme", "Globex", "Initech", "Umbrella", "Hooli"];

    for (i, name) in names.iter().enumerate() {
        let id = dash
            .add_application(draft(date(2024, 2, 1 + i as u32), name, Status::Applied))
            .unwrap();
        assert_eq!(id, RecordId(i));
    }

    let listed: Vec<_> = dash.records().iter().map(|r| r.company.as_str()).collect();
    assert_eq!(listed, names);
}

#[test]
fn test_acme_amend_scenario() {
    let mut dash = new_dashboard(Outbox::default());
    let id = dash
        .add_application(draft(date(2024, 1, 10), "Acme", Status::Applied))
        .unwrap();
    let before = dash.records()[0].clone();

    dash.amend_status(id, "Interview".parse().unwrap()).unwrap();

    let after = &dash.records()[0];
    assert_eq!(after.status, Status::Interview);
    assert_eq!(after.company, before.company);
    assert_eq!(after.position, before.position);
    assert_eq!(after.platform, before.platform);
    assert_eq!(after.salary_range, before.salary_range);
    assert_eq!(after.application_date, before.application_date);
    assert_eq!(dash.summary().counts(), &[(Status::Interview, 1)]);
}

#[test]
fn test_amend_unknown_id_leaves_store_alone() {
    let mut dash = new_dashboard(Outbox::default());
    dash.add_application(draft(date(2024, 1, 10), "Acme", Status::Applied))
        .unwrap();
    let before = dash.records().to_vec();

    let err = dash.amend_status(RecordId(7), Status::Offer).unwrap_err();
    assert!(matches!(err, Error::NotFound { id: 7, .. }));
    assert_eq!(dash.records(), before.as_slice());
}

#[test]
fn test_summary_matches_value_counts() {
    let mut dash = new_dashboard(Outbox::default());
    let d = date(2024, 1, 10);
    dash.add_application(draft(d, "A", Status::Applied)).unwrap();
    dash.add_application(draft(d, "B", Status::Applied)).unwrap();
    dash.add_application(draft(d, "C", Status::Offer)).unwrap();

    let summary = dash.summary();
    assert_eq!(summary.counts(), &[(Status::Applied, 2), (Status::Offer, 1)]);
    assert_eq!(summary.get(Status::Interview), None);
    assert_eq!(summary.get(Status::Rejected), None);
}

#[test]
fn test_weekly_report_splits_on_week_start() {
    let mut dash = new_dashboard(Outbox::default());
    // Thursday
    let today = date(2024, 5, 16);
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);

    dash.add_application(draft(monday - Duration::days(1), "Before", Status::Applied))
        .unwrap();
    dash.add_application(draft(monday, "OnMonday", Status::Applied))
        .unwrap();
    dash.add_application(draft(today, "Today", Status::Applied))
        .unwrap();

    let report = dash.report(ReportPeriod::Weekly, today);
    assert_eq!(report.rows, 2);
    assert!(!report.csv.contains("Before"));
    assert!(report.csv.contains("OnMonday"));
    assert!(report.csv.contains("Today"));
}

#[tokio::test]
async fn test_bad_token_does_not_break_the_dashboard() {
    let mut dash = new_dashboard(Outbox::default());
    let today = date(2024, 1, 12);
    dash.add_application(draft(date(2024, 1, 10), "Acme", Status::Applied))
        .unwrap();

    let err = dash.list_repositories("nope").await.unwrap_err();
    assert!(matches!(err, Error::AuthError(_)));
    assert!(err.to_string().contains("Bad credentials"));

    assert_eq!(dash.records().len(), 1);
    assert_eq!(dash.summary().total(), 1);
    assert!(dash.report(ReportPeriod::Weekly, today).csv.contains("Acme"));

    let listing = dash.list_repositories("good-token").await.unwrap();
    let names: Vec<_> = listing.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["portfolio", "dotfiles"]);
}

#[tokio::test]
async fn test_weekly_email_goes_out_with_csv() {
    let outbox = Outbox::default();
    let mut dash = new_dashboard(outbox.clone());
    let today = date(2024, 5, 16);
    dash.add_application(draft(today, "Acme", Status::Offer)).unwrap();

    dash.send_weekly_report("me@example.com", today).await.unwrap();

    let sent = outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Weekly Job Application Report");
    let attachment = sent[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "weekly_job_applications.csv");
    assert_eq!(attachment.mime_type, "text/csv");
    assert_eq!(
        String::from_utf8(attachment.bytes.clone()).unwrap(),
        dash.report(ReportPeriod::Weekly, today).csv
    );
}
