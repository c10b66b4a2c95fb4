// TUI event loop and terminal management
use crate::app::{Action, App};
use apptrack_core::Dashboard;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub async fn run_tui(mut app: App, mut dashboard: Dashboard) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut dashboard).await;

    // Restore terminal even if the loop bailed out
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dashboard: &mut Dashboard,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| crate::ui::render(f, app, dashboard))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key, dashboard) {
            Action::None => {}
            Action::Quit => break,
            Action::FetchRepositories(token) => {
                // Show the spinner text before blocking on the request
                terminal.draw(|f| crate::ui::render(f, app, dashboard))?;
                let result = dashboard.list_repositories(&token).await;
                app.set_repositories(result);
            }
            Action::SendWeeklyReport(recipient) => {
                terminal.draw(|f| crate::ui::render(f, app, dashboard))?;
                let result = dashboard.send_weekly_report(&recipient, app.today()).await;
                app.set_email_result(result);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
