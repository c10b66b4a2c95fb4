use crate::models::ApplicationRecord;
use crate::summary::ReportPeriod;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column names, in output order
pub const CSV_HEADER: [&str; 7] = [
    "Application Date",
    "Company",
    "Position",
    "Platform",
    "Salary Range",
    "Status",
    "CV File",
];

/// Exporter for application reports
pub struct Exporter;

impl Exporter {
    /// Render records as CSV: header row, then one row per record in the
    /// order given. No index column.
    pub fn to_csv(records: &[ApplicationRecord]) -> String {
        let mut output = String::new();

        output.push_str(&CSV_HEADER.join(","));
        output.push('\n');

        for record in records {
            let row = [
                record.application_date.format("%Y-%m-%d").to_string(),
                Self::escape_csv(&record.company),
                Self::escape_csv(&record.position),
                Self::escape_csv(&record.platform),
                Self::escape_csv(&record.salary_range),
                record.status.label().to_string(),
                Self::escape_csv(record.cv_file.as_deref().unwrap_or("")),
            ];
            output.push_str(&row.join(","));
            output.push('\n');
        }

        output
    }

    /// Write a report into `dir` under the period's file name
    pub fn write_report<P: AsRef<Path>>(
        records: &[ApplicationRecord],
        period: ReportPeriod,
        dir: P,
    ) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(period.file_name());
        let content = Self::to_csv(records);

        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;

        tracing::info!(
            "Wrote {} report with {} applications to {}",
            period.label(),
            records.len(),
            path.display()
        );

        Ok(path)
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
