// UI rendering logic
use crate::app::{App, Focus, InputMode, NoticeKind, FORM_LABELS};
use crate::chart;
use apptrack_core::{Dashboard, Status};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Applications table
            Constraint::Length(9), // Chart + repositories
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, dashboard, chunks[0]);
    render_records(frame, app, dashboard, chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_chart(frame, dashboard, bottom[0]);
    render_repositories(frame, app, bottom[1]);

    render_status_bar(frame, app, chunks[3]);

    match app.input_mode {
        InputMode::AddingApplication => render_form(frame, app, frame.area()),
        InputMode::AmendingStatus => render_amend_popup(frame, app, frame.area()),
        InputMode::EnteringToken => render_prompt(
            frame,
            " GitHub Token ",
            &app.masked_token(),
            "Personal access token, used for this request only",
            frame.area(),
        ),
        InputMode::EnteringRecipient => render_prompt(
            frame,
            " Email Weekly Report ",
            &app.recipient_input,
            "Recipient email address",
            frame.area(),
        ),
        InputMode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let summary = dashboard.summary();

    let mut spans = vec![
        Span::styled(
            "Job Application Tracker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} total", summary.total()),
            Style::default().fg(Color::Gray),
        ),
    ];
    for (status, count) in summary.counts() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{}: {}", status, count),
            Style::default().fg(chart::status_color(*status)),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_records(frame: &mut Frame, app: &App, dashboard: &Dashboard, area: Rect) {
    let records = dashboard.records();
    let focused = app.focus == Focus::Applications;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Job Applications ")
        .border_style(focus_style(focused));

    if records.is_empty() {
        let empty = Paragraph::new("No applications yet. Press 'n' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        ["Date", "Company", "Job Title", "Platform", "Salary", "Status", "CV"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows = records.iter().map(|record| {
        Row::new(vec![
            Cell::from(record.application_date.format("%Y-%m-%d").to_string()),
            Cell::from(record.company.clone()),
            Cell::from(record.position.clone()),
            Cell::from(record.platform.clone()),
            Cell::from(record.salary_range.clone()),
            Cell::from(record.status.label())
                .style(Style::default().fg(chart::status_color(record.status))),
            Cell::from(record.cv_file.clone().unwrap_or_default()),
        ])
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Percentage(14),
        Constraint::Percentage(12),
        Constraint::Length(9),
        Constraint::Percentage(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_record.min(records.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_chart(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Applications by Status ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slices = dashboard.summary().slices();
    if slices.is_empty() {
        let empty = Paragraph::new("Nothing to chart yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let segments = chart::segments(&slices, inner.width);
    let bar: Vec<Span> = segments
        .iter()
        .map(|seg| {
            Span::styled(
                "█".repeat(seg.width as usize),
                Style::default().fg(chart::status_color(seg.status)),
            )
        })
        .collect();

    let mut lines = vec![Line::from(bar.clone()), Line::from(bar), Line::from("")];
    for seg in &segments {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(chart::status_color(seg.status))),
            Span::raw(seg.label.clone()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_repositories(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Repositories;
    let title = match &app.repositories {
        Some(listing) => format!(" GitHub: {} ", listing.login),
        None => " GitHub Repositories ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(focus_style(focused));

    let listing = match &app.repositories {
        Some(listing) if !listing.repos.is_empty() => listing,
        Some(_) => {
            frame.render_widget(Paragraph::new("No repositories").block(block), area);
            return;
        }
        None => {
            let hint = Paragraph::new("Press 'g' and enter a token to list your repositories")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(hint, area);
            return;
        }
    };

    let items: Vec<ListItem> = listing
        .repos
        .iter()
        .map(|repo| {
            let mut spans = vec![Span::styled(
                repo.name.clone(),
                Style::default().fg(Color::Cyan),
            )];
            if repo.is_private {
                spans.push(Span::styled(" (private)", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("  ★ {}", repo.stars),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(format!("  ⑂ {}", repo.forks)));
            spans.push(Span::styled(
                format!("  issues {}", repo.open_issues),
                Style::default().fg(Color::Magenta),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let mut state = ListState::default();
    state.select(Some(app.selected_repo.min(listing.repos.len() - 1)));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    // Detail line for the highlighted repository
    if let Some(repo) = app.selected_repository() {
        let detail = vec![
            Line::from(Span::styled(
                repo.description.clone().unwrap_or_else(|| "No description".to_string()),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                repo.url.clone(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            )),
        ];
        frame.render_widget(Paragraph::new(detail), chunks[1]);
    }
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for (i, label) in FORM_LABELS.iter().enumerate() {
        let active = i == app.form.cursor;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = if i == 5 {
            let status = app.form.status;
            Span::styled(
                format!("< {} >", status),
                Style::default().fg(chart::status_color(status)),
            )
        } else {
            Span::raw(app.form.value(i).to_string())
        };

        let mut spans = vec![
            Span::styled(if active { "> " } else { "  " }, label_style),
            Span::styled(format!("{:<30}", label), label_style),
            value,
        ];
        if active && i != 5 {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "TAB/↑↓: field | ←→: status | ENTER: add | ESC: cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add New Job Application ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(form, popup_area);
}

fn render_amend_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(40, 30, area);
    frame.render_widget(Clear, popup_area);

    let options: Vec<Span> = Status::ALL
        .iter()
        .flat_map(|status| {
            let style = if *status == app.amend_choice {
                Style::default()
                    .fg(Color::Black)
                    .bg(chart::status_color(*status))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(chart::status_color(*status))
            };
            [Span::styled(format!(" {} ", status), style), Span::raw(" ")]
        })
        .collect();

    let lines = vec![
        Line::from(format!("Application #{}", app.selected_record)),
        Line::from(""),
        Line::from(options),
        Line::from(""),
        Line::from(Span::styled(
            "←→: choose | ENTER: apply | ESC: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Amend Status ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(popup, popup_area);
}

fn render_prompt(frame: &mut Frame, title: &str, value: &str, hint: &str, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled(value, Style::default().fg(Color::Yellow)),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
    ];

    let prompt = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(prompt, popup_area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(loading) = &app.loading {
        Span::styled(loading.as_str(), Style::default().fg(Color::Cyan))
    } else if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        Span::styled(notice.text.as_str(), Style::default().fg(color))
    } else {
        match app.input_mode {
            InputMode::AddingApplication => Span::styled(
                "NEW APPLICATION | ENTER: add | ESC: cancel",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::AmendingStatus => Span::styled(
                "AMEND | ←→: status | ENTER: apply | ESC: cancel",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::EnteringToken | InputMode::EnteringRecipient => Span::styled(
                "INPUT | ENTER: submit | ESC: cancel",
                Style::default().fg(Color::Green),
            ),
            InputMode::Normal => Span::raw(
                "n: new | a: amend | j/k: navigate | TAB: focus | w/m: save weekly/monthly CSV | e: email report | g: GitHub | q: quit",
            ),
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
