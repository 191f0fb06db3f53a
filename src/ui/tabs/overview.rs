//! Overview tab: stat tiles over the most recent requests.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::RequestStatus;
use crate::ui::styles;
use crate::utils::format::{format_date, truncate};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_stat_tiles(frame, app, chunks[0]);
    render_recent_requests(frame, app, chunks[1]);
}

fn render_stat_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &app.stats;
    let cells = [
        ("Total", stats.total, styles::title_style()),
        ("Active", stats.active, styles::status_style(Some(RequestStatus::InProgress))),
        ("Pending", stats.pending, styles::status_style(Some(RequestStatus::Pending))),
        ("Completed", stats.completed, styles::status_style(Some(RequestStatus::Completed))),
    ];

    for (i, (label, value, style)) in cells.iter().enumerate() {
        let block = Block::default()
            .title(format!(" {} ", label))
            .borders(Borders::ALL)
            .border_style(styles::muted_style());

        let content = Line::from(Span::styled(format!("{}", value), *style));
        let paragraph = Paragraph::new(content)
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, tiles[i]);
    }
}

fn render_recent_requests(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if app.requests.is_empty() {
        lines.push(Line::from(Span::styled(
            if app.loading {
                "Loading..."
            } else {
                "No maintenance requests found."
            },
            styles::muted_style(),
        )));
    }

    for request in app.requests.iter().take(8) {
        let category = request.category_name().unwrap_or("Uncategorized");
        lines.push(Line::from(vec![
            Span::styled(format!("#{:<4}", request.issue_id), styles::muted_style()),
            Span::raw(format!("{:<40}", truncate(&request.description, 38))),
            Span::styled(
                format!("{:<14}", request.status_name()),
                styles::status_style(request.current_status()),
            ),
            Span::styled(
                format!("{} · {}", category, format_date(&request.submission_timestamp)),
                styles::muted_style(),
            ),
        ]));
    }

    let block = Block::default()
        .title(" Recent Requests ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
