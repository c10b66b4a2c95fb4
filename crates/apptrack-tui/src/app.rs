// TUI application state and key handling
use apptrack_core::providers::{RepoSummary, RepositoryListing};
use apptrack_core::{
    ApplicationDraft, Dashboard, Error, RecordId, ReportPeriod, Status,
};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,            // Browsing the table / repo list
    AddingApplication, // Filling in the new application form
    AmendingStatus,    // Picking a new status for the selected row
    EnteringToken,     // Typing the GitHub token (masked)
    EnteringRecipient, // Typing the weekly report recipient
}

/// Which list j/k moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Applications,
    Repositories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-line feedback shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Work the event loop has to await on behalf of the app
#[derive(PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    FetchRepositories(String),
    SendWeeklyReport(String),
}

// Printing the action must never reveal the token
impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::None => write!(f, "None"),
            Action::Quit => write!(f, "Quit"),
            Action::FetchRepositories(_) => write!(f, "FetchRepositories(<token>)"),
            Action::SendWeeklyReport(to) => write!(f, "SendWeeklyReport({})", to),
        }
    }
}

pub const FORM_LABELS: [&str; 7] = [
    "Company Name",
    "Job Title",
    "Applied Date",
    "Platform Applied On",
    "Salary Range",
    "Status",
    "CV File (pdf/docx, optional)",
];

const STATUS_FIELD: usize = 5;

/// The "Add New Job Application" form
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    pub company: String,
    pub job_title: String,
    pub applied_date: String,
    pub platform: String,
    pub salary_range: String,
    pub status: Status,
    pub cv_file: String,
    pub cursor: usize,
}

impl ApplicationForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            company: String::new(),
            job_title: String::new(),
            applied_date: today.format("%Y-%m-%d").to_string(),
            platform: String::new(),
            salary_range: String::new(),
            status: Status::Applied,
            cv_file: String::new(),
            cursor: 0,
        }
    }

    /// Text value shown for a field
    pub fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.company,
            1 => &self.job_title,
            2 => &self.applied_date,
            3 => &self.platform,
            4 => &self.salary_range,
            STATUS_FIELD => self.status.label(),
            _ => &self.cv_file,
        }
    }

    /// Buffer under the cursor, `None` on the status selector
    fn current_text_mut(&mut self) -> Option<&mut String> {
        match self.cursor {
            0 => Some(&mut self.company),
            1 => Some(&mut self.job_title),
            2 => Some(&mut self.applied_date),
            3 => Some(&mut self.platform),
            4 => Some(&mut self.salary_range),
            STATUS_FIELD => None,
            _ => Some(&mut self.cv_file),
        }
    }

    pub fn on_status_field(&self) -> bool {
        self.cursor == STATUS_FIELD
    }

    pub fn next_field(&mut self) {
        self.cursor = (self.cursor + 1) % FORM_LABELS.len();
    }

    pub fn previous_field(&mut self) {
        self.cursor = (self.cursor + FORM_LABELS.len() - 1) % FORM_LABELS.len();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.current_text_mut() {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.current_text_mut() {
            text.pop();
        }
    }

    /// Turn what was typed into a draft; only the date needs parsing here,
    /// the store does the rest of the validation
    pub fn to_draft(&self) -> apptrack_core::Result<ApplicationDraft> {
        let raw_date = self.applied_date.trim();
        let application_date = if raw_date.is_empty() {
            None
        } else {
            Some(NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
                Error::ValidationError(format!("'{}' is not a YYYY-MM-DD date", raw_date))
            })?)
        };

        let cv_file = Some(self.cv_file.trim().to_string()).filter(|s| !s.is_empty());

        Ok(ApplicationDraft {
            application_date,
            company: self.company.trim().to_string(),
            position: self.job_title.trim().to_string(),
            platform: self.platform.trim().to_string(),
            salary_range: self.salary_range.trim().to_string(),
            status: Some(self.status),
            cv_file,
        })
    }
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub form: ApplicationForm,
    pub selected_record: usize,
    pub amend_choice: Status,
    pub token_input: String,
    pub recipient_input: String,
    pub default_recipient: String,
    pub repositories: Option<RepositoryListing>,
    pub selected_repo: usize,
    pub notice: Option<Notice>,
    pub loading: Option<String>,
    pub output_dir: PathBuf,
    /// Fixed date for tests; otherwise the local date at the time of each action
    pub today_override: Option<NaiveDate>,
}

impl App {
    pub fn new(output_dir: PathBuf, default_recipient: Option<String>) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: Focus::Applications,
            form: ApplicationForm::new(today),
            selected_record: 0,
            amend_choice: Status::Applied,
            token_input: String::new(),
            recipient_input: String::new(),
            default_recipient: default_recipient.unwrap_or_default(),
            repositories: None,
            selected_repo: 0,
            notice: None,
            loading: None,
            output_dir,
            today_override: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self.form = ApplicationForm::new(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Route a key press; anything that needs the network comes back as an
    /// `Action` for the event loop to await
    pub fn handle_key(&mut self, key: KeyEvent, dashboard: &mut Dashboard) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key.code, dashboard),
            InputMode::AddingApplication => {
                self.handle_form_key(key.code, dashboard);
                Action::None
            }
            InputMode::AmendingStatus => {
                self.handle_amend_key(key.code, dashboard);
                Action::None
            }
            InputMode::EnteringToken => self.handle_token_key(key.code),
            InputMode::EnteringRecipient => self.handle_recipient_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, dashboard: &mut Dashboard) -> Action {
        match code {
            KeyCode::Char('q') => {
                self.quit();
                return Action::Quit;
            }
            KeyCode::Char('n') => {
                self.form = ApplicationForm::new(self.today());
                self.input_mode = InputMode::AddingApplication;
            }
            KeyCode::Char('a') => self.start_amend(dashboard),
            KeyCode::Char('w') => self.save_report(dashboard, ReportPeriod::Weekly),
            KeyCode::Char('m') => self.save_report(dashboard, ReportPeriod::Monthly),
            KeyCode::Char('g') => {
                self.token_input.clear();
                self.input_mode = InputMode::EnteringToken;
            }
            KeyCode::Char('e') => {
                self.recipient_input = self.default_recipient.clone();
                self.input_mode = InputMode::EnteringRecipient;
            }
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(dashboard),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Esc => self.notice = None,
            _ => {}
        }
        Action::None
    }

    fn handle_form_key(&mut self, code: KeyCode, dashboard: &mut Dashboard) {
        match code {
            KeyCode::Esc => self.enter_normal_mode(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Left if self.form.on_status_field() => {
                self.form.status = self.form.status.previous();
            }
            KeyCode::Right | KeyCode::Char(' ') if self.form.on_status_field() => {
                self.form.status = self.form.status.next();
            }
            KeyCode::Enter => self.submit_form(dashboard),
            KeyCode::Char(c) => self.form.push_char(c),
            KeyCode::Backspace => self.form.pop_char(),
            _ => {}
        }
    }

    fn handle_amend_key(&mut self, code: KeyCode, dashboard: &mut Dashboard) {
        match code {
            KeyCode::Esc => self.enter_normal_mode(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.amend_choice = self.amend_choice.previous();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.amend_choice = self.amend_choice.next();
            }
            KeyCode::Enter => self.apply_amend(dashboard),
            _ => {}
        }
    }

    fn handle_token_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.token_input.clear();
                self.enter_normal_mode();
            }
            KeyCode::Enter => {
                self.enter_normal_mode();
                let token = std::mem::take(&mut self.token_input);
                if token.trim().is_empty() {
                    self.notice = Some(Notice::error("Enter a GitHub token to list repositories"));
                } else {
                    self.loading = Some("Fetching GitHub repositories...".to_string());
                    return Action::FetchRepositories(token);
                }
            }
            KeyCode::Char(c) => self.token_input.push(c),
            KeyCode::Backspace => {
                self.token_input.pop();
            }
            _ => {}
        }
        Action::None
    }

    fn handle_recipient_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => self.enter_normal_mode(),
            KeyCode::Enter => {
                self.enter_normal_mode();
                let recipient = self.recipient_input.trim().to_string();
                if recipient.is_empty() {
                    self.notice = Some(Notice::error("Enter a recipient email address"));
                } else {
                    self.loading = Some(format!("Sending weekly report to {}...", recipient));
                    return Action::SendWeeklyReport(recipient);
                }
            }
            KeyCode::Char(c) => self.recipient_input.push(c),
            KeyCode::Backspace => {
                self.recipient_input.pop();
            }
            _ => {}
        }
        Action::None
    }

    pub fn submit_form(&mut self, dashboard: &mut Dashboard) {
        let result = self
            .form
            .to_draft()
            .and_then(|draft| dashboard.add_application(draft));

        match result {
            Ok(id) => {
                self.selected_record = id.index();
                self.focus = Focus::Applications;
                self.notice = Some(Notice::success("Job application added successfully!"));
                self.enter_normal_mode();
            }
            // Stay in the form so nothing typed is lost
            Err(e) => {
                tracing::debug!("Form rejected: {}", e);
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn start_amend(&mut self, dashboard: &Dashboard) {
        match dashboard.records().get(self.selected_record) {
            Some(record) => {
                self.amend_choice = record.status;
                self.input_mode = InputMode::AmendingStatus;
            }
            None => self.notice = Some(Notice::error("No application selected to amend")),
        }
    }

    pub fn apply_amend(&mut self, dashboard: &mut Dashboard) {
        let status = self.amend_choice;
        match dashboard.amend_status(RecordId(self.selected_record), status) {
            Ok(()) => self.notice = Some(Notice::success(format!("Status amended to {}", status))),
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
        self.enter_normal_mode();
    }

    pub fn save_report(&mut self, dashboard: &Dashboard, period: ReportPeriod) {
        match dashboard.save_report(period, self.today(), &self.output_dir) {
            Ok(path) => {
                tracing::info!("Saved {} report to {}", period.label(), path.display());
                self.notice = Some(Notice::success(format!(
                    "{} report saved to {}",
                    period.label(),
                    path.display()
                )));
            }
            Err(e) => self.notice = Some(Notice::error(format!("Failed to save report: {}", e))),
        }
    }

    pub fn set_repositories(&mut self, result: apptrack_core::Result<RepositoryListing>) {
        self.loading = None;
        match result {
            Ok(listing) => {
                self.notice = Some(Notice::success(format!(
                    "{} repositories for {}",
                    listing.repos.len(),
                    listing.login
                )));
                self.repositories = Some(listing);
                self.selected_repo = 0;
                self.focus = Focus::Repositories;
            }
            Err(e) => {
                self.notice = Some(Notice::error(format!("Failed to fetch GitHub data: {}", e)));
            }
        }
    }

    pub fn set_email_result(&mut self, result: apptrack_core::Result<()>) {
        self.loading = None;
        self.notice = Some(match result {
            Ok(()) => Notice::success("Weekly report sent successfully!"),
            Err(e) => Notice::error(format!("Failed to send email: {}", e)),
        });
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Applications => Focus::Repositories,
            Focus::Repositories => Focus::Applications,
        };
    }

    fn select_next(&mut self, dashboard: &Dashboard) {
        match self.focus {
            Focus::Applications => {
                let len = dashboard.records().len();
                if len > 0 {
                    self.selected_record = (self.selected_record + 1).min(len - 1);
                }
            }
            Focus::Repositories => {
                let len = self.repositories.as_ref().map_or(0, |l| l.repos.len());
                if len > 0 {
                    self.selected_repo = (self.selected_repo + 1).min(len - 1);
                }
            }
        }
    }

    fn select_previous(&mut self) {
        match self.focus {
            Focus::Applications => self.selected_record = self.selected_record.saturating_sub(1),
            Focus::Repositories => self.selected_repo = self.selected_repo.saturating_sub(1),
        }
    }

    pub fn selected_repository(&self) -> Option<&RepoSummary> {
        self.repositories
            .as_ref()
            .and_then(|listing| listing.repos.get(self.selected_repo))
    }

    /// Masked rendering of the token buffer
    pub fn masked_token(&self) -> String {
        "•".repeat(self.token_input.chars().count())
    }
}
