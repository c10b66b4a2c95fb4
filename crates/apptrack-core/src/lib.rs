// Core business logic: the application records and everything derived from them
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod providers;
pub mod session;
pub mod store;
pub mod summary;

pub use config::Config;
pub use error::Error;
pub use export::Exporter;
pub use models::{ApplicationDraft, ApplicationRecord, RecordId, Status};
pub use session::{Dashboard, Report};
pub use store::RecordStore;
pub use summary::{ReportPeriod, StatusSummary, WeekStart};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
