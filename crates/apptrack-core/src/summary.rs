// Derived views over the record store: status counts and date windows
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ApplicationRecord, Status};

/// Status frequencies, most common first.
///
/// Only statuses that actually occur are listed. Equal counts keep the order
/// in which the statuses were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    counts: Vec<(Status, usize)>,
}

/// One wedge of the distribution chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub status: Status,
    pub count: usize,
    pub percent: f64,
}

impl StatusSummary {
    pub fn counts(&self) -> &[(Status, usize)] {
        &self.counts
    }

    pub fn get(&self, status: Status) -> Option<usize> {
        self.counts
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Label + share of the total for every present status
    pub fn slices(&self) -> Vec<ChartSlice> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        self.counts
            .iter()
            .map(|&(status, count)| ChartSlice {
                status,
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect()
    }
}

pub fn summarize_by_status(records: &[ApplicationRecord]) -> StatusSummary {
    let mut counts: Vec<(Status, usize)> = Vec::new();

    for record in records {
        match counts.iter_mut().find(|(s, _)| *s == record.status) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.status, 1)),
        }
    }

    // Stable sort, so ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    StatusSummary { counts }
}

/// Records dated `start <= date < end`, or `start <= date` when there is no end
pub fn filter_by_date_range(
    records: &[ApplicationRecord],
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Vec<ApplicationRecord> {
    records
        .iter()
        .filter(|r| r.application_date >= start)
        .filter(|r| end.map_or(true, |end| r.application_date < end))
        .cloned()
        .collect()
}

/// First day of the reporting week
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// ISO weeks
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(&self) -> chrono::Weekday {
        match self {
            WeekStart::Monday => chrono::Weekday::Mon,
            WeekStart::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Most recent week start on or before `today`
pub fn week_start(today: NaiveDate, start: WeekStart) -> NaiveDate {
    let today_idx = today.weekday().num_days_from_monday() as i64;
    let start_idx = start.weekday().num_days_from_monday() as i64;
    let back = (today_idx - start_idx).rem_euclid(7);
    today - Duration::days(back)
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// The two downloadable reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

impl ReportPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "Weekly",
            ReportPeriod::Monthly => "Monthly",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly_job_applications.csv",
            ReportPeriod::Monthly => "monthly_job_applications.csv",
        }
    }

    /// Inclusive lower bound of the window containing `today`
    pub fn start(&self, today: NaiveDate, week: WeekStart) -> NaiveDate {
        match self {
            ReportPeriod::Weekly => week_start(today, week),
            ReportPeriod::Monthly => month_start(today),
        }
    }

    /// Records falling in the window; the window is open-ended so entries
    /// dated in the future still show up, same as the table does
    pub fn select(
        &self,
        records: &[ApplicationRecord],
        today: NaiveDate,
        week: WeekStart,
    ) -> Vec<ApplicationRecord> {
        filter_by_date_range(records, self.start(today, week), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(on: NaiveDate, status: Status) -> ApplicationRecord {
        ApplicationRecord {
            application_date: on,
            company: format!("Co {}", on),
            position: "Dev".to_string(),
            platform: "Indeed".to_string(),
            salary_range: String::new(),
            status,
            cv_file: None,
        }
    }

    #[test]
    fn test_summary_omits_absent_statuses() {
        let d = date(2024, 1, 1);
        let records = vec![
            record(d, Status::Applied),
            record(d, Status::Applied),
            record(d, Status::Offer),
        ];

        let summary = summarize_by_status(&records);
        assert_eq!(summary.counts(), &[(Status::Applied, 2), (Status::Offer, 1)]);
        assert_eq!(summary.get(Status::Interview), None);
        assert_eq!(summary.get(Status::Rejected), None);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_summary_orders_by_count_then_first_seen() {
        let d = date(2024, 1, 1);
        let records = vec![
            record(d, Status::Rejected),
            record(d, Status::Interview),
            record(d, Status::Offer),
            record(d, Status::Offer),
            record(d, Status::Interview),
        ];

        let summary = summarize_by_status(&records);
        assert_eq!(
            summary.counts(),
            &[
                (Status::Interview, 2),
                (Status::Offer, 2),
                (Status::Rejected, 1)
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_by_status(&[]);
        assert!(summary.is_empty());
        assert!(summary.slices().is_empty());
    }

    #[test]
    fn test_slices_add_up() {
        let d = date(2024, 1, 1);
        let records = vec![
            record(d, Status::Applied),
            record(d, Status::Applied),
            record(d, Status::Offer),
            record(d, Status::Rejected),
        ];

        let slices = summarize_by_status(&records).slices();
        assert_eq!(slices[0].status, Status::Applied);
        assert!((slices[0].percent - 50.0).abs() < 1e-9);
        let total: f64 = slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_date_range_bounds() {
        let records = vec![
            record(date(2024, 5, 1), Status::Applied),
            record(date(2024, 5, 10), Status::Applied),
            record(date(2024, 5, 20), Status::Offer),
            record(date(2024, 5, 9), Status::Rejected),
        ];

        let open = filter_by_date_range(&records, date(2024, 5, 9), None);
        let days: Vec<_> = open.iter().map(|r| r.application_date.day()).collect();
        assert_eq!(days, vec![10, 20, 9]);

        let closed = filter_by_date_range(&records, date(2024, 5, 9), Some(date(2024, 5, 20)));
        let days: Vec<_> = closed.iter().map(|r| r.application_date.day()).collect();
        assert_eq!(days, vec![10, 9]);
    }

    #[test]
    fn test_iso_week_start() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(date(2024, 5, 15), WeekStart::Monday), date(2024, 5, 13));
        // Monday maps to itself
        assert_eq!(week_start(date(2024, 5, 13), WeekStart::Monday), date(2024, 5, 13));
        // Sunday goes back six days in ISO weeks
        assert_eq!(week_start(date(2024, 5, 19), WeekStart::Monday), date(2024, 5, 13));
        // Week start across a month boundary
        assert_eq!(week_start(date(2024, 6, 2), WeekStart::Monday), date(2024, 5, 27));
    }

    #[test]
    fn test_sunday_week_start() {
        assert_eq!(week_start(date(2024, 5, 15), WeekStart::Sunday), date(2024, 5, 12));
        assert_eq!(week_start(date(2024, 5, 19), WeekStart::Sunday), date(2024, 5, 19));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(month_start(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn test_weekly_selection_excludes_last_week() {
        let today = date(2024, 5, 15);
        let records = vec![
            record(today, Status::Applied),
            record(today - Duration::days(8), Status::Applied),
        ];

        let weekly = ReportPeriod::Weekly.select(&records, today, WeekStart::Monday);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].application_date, today);
    }

    #[test]
    fn test_monthly_selection() {
        let today = date(2024, 5, 15);
        let records = vec![
            record(date(2024, 4, 30), Status::Applied),
            record(date(2024, 5, 1), Status::Offer),
            record(date(2024, 5, 14), Status::Applied),
        ];

        let monthly = ReportPeriod::Monthly.select(&records, today, WeekStart::Monday);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].status, Status::Offer);
    }

    #[test]
    fn test_report_file_names() {
        assert_eq!(ReportPeriod::Weekly.file_name(), "weekly_job_applications.csv");
        assert_eq!(ReportPeriod::Monthly.file_name(), "monthly_job_applications.csv");
    }
}
