use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, FormFocus, LoginFocus, Tab};
use crate::models::CATEGORY_CHOICES;

use super::styles;
use super::tabs::{overview, requests, users};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }
    if matches!(app.state, AppState::NewRequest) {
        render_new_request_overlay(frame, app);
    }
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }
    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.demo_mode {
        format!("  dormdesk · {} (demo)", app.role.dashboard_title())
    } else {
        format!("  dormdesk · {}", app.role.dashboard_title())
    };
    let right = match app.user {
        Some(ref user) => format!("{}  [?] Help", user.name),
        None => "[?] Help".to_string(),
    };

    let padding = (area.width as usize).saturating_sub(title.len() + right.len() + 3);
    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in app.tabs().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Overview => overview::render(frame, app, area),
        Tab::Requests => requests::render(frame, app, area),
        Tab::Users => users::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Errors take precedence over status notes; both dismiss with Esc
    let left = if let Some(ref error) = app.error_message {
        Span::styled(format!(" {} ", error), styles::error_style())
    } else if let Some(ref message) = app.status_message {
        Span::styled(format!(" {} ", message), styles::success_style())
    } else if app.loading {
        Span::styled(" Loading... ".to_string(), styles::muted_style())
    } else {
        Span::raw(String::new())
    };

    let shortcuts = " [r]efresh | [o] logout | [q]uit ";
    let padding = (area.width as usize)
        .saturating_sub(left.content.len() + shortcuts.len());

    let line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding)),
        Span::styled(shortcuts, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

/// Centered overlay rect, clamped to the frame.
fn overlay_area(frame: &Frame, width: u16, height: u16) -> Rect {
    let frame_area = frame.area();
    let width = width.min(frame_area.width);
    let height = height.min(frame_area.height);
    Rect {
        x: (frame_area.width - width) / 2,
        y: (frame_area.height - height) / 2,
        width,
        height,
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = overlay_area(frame, 52, 11);
    frame.render_widget(Clear, area);

    let email_focus = app.login_focus == LoginFocus::Email;
    let masked: String = "*".repeat(app.login_password.chars().count());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                if email_focus { "> Email:    " } else { "  Email:    " },
                styles::border_style(email_focus),
            ),
            Span::raw(app.login_email.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                if email_focus { "  Password: " } else { "> Password: " },
                styles::border_style(!email_focus),
            ),
            Span::raw(masked),
        ]),
        Line::from(""),
    ];

    if app.loading {
        lines.push(Line::from(Span::styled(
            "  Signing in...",
            styles::muted_style(),
        )));
    } else if let Some(ref error) = app.login_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab: switch field | Enter: sign in | Ctrl+C: quit",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Sign In ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_new_request_overlay(frame: &mut Frame, app: &App) {
    let area = overlay_area(frame, 60, 12);
    frame.render_widget(Clear, area);

    let focus_marker = |focused: bool| if focused { "> " } else { "  " };
    let category = CATEGORY_CHOICES[app.form_category].1;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}Description:  ", focus_marker(app.form_focus == FormFocus::Description)),
                styles::border_style(app.form_focus == FormFocus::Description),
            ),
            Span::raw(app.form_description.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}Availability: ", focus_marker(app.form_focus == FormFocus::Availability)),
                styles::border_style(app.form_focus == FormFocus::Availability),
            ),
            Span::raw(app.form_availability.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}Category:     ", focus_marker(app.form_focus == FormFocus::Category)),
                styles::border_style(app.form_focus == FormFocus::Category),
            ),
            Span::styled(format!("< {} >", category), styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab: next field | Space: cycle category (when focused)",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "  Enter: submit | Esc: cancel",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" New Maintenance Request ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = overlay_area(frame, 56, 16);
    frame.render_widget(Clear, area);

    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc.to_string(), styles::help_desc_style()),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        key("1-3", "Switch tab"),
        key("j/k, ↑/↓", "Move selection"),
        key("PgUp/PgDn", "Move selection by page"),
        key("r", "Refresh from server"),
        key("o", "Logout"),
        key("Esc", "Dismiss message / close overlay"),
        key("q", "Quit"),
    ];

    if app.role.can_transition() {
        lines.push(Line::from(""));
        lines.push(key("i", "Mark selected request in progress"));
        lines.push(key("v", "Mark selected request under review"));
        lines.push(key("c", "Mark selected request complete"));
        lines.push(key("p", "Reopen selected completed request"));
    } else {
        lines.push(Line::from(""));
        lines.push(key("n", "Submit a new maintenance request"));
    }

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = overlay_area(frame, 30, 5);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw("  Quit dormdesk? (y/n)")),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left),
        area,
    );
}
