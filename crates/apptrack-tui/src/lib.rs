// Terminal dashboard for the application tracker

pub mod app;
pub mod chart;
pub mod runner;
pub mod ui;

pub use app::{Action, App, Focus, InputMode};
pub use runner::run_tui;
