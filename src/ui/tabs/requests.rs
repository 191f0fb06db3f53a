//! Requests tab: the request list with a detail pane beside it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, StatusAction};
use crate::ui::styles;
use crate::utils::format::{format_cost, format_datetime, truncate};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_request_list(frame, app, chunks[0]);
    render_request_detail(frame, app, chunks[1]);
}

fn render_request_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .requests
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let line = Line::from(vec![
                Span::styled(format!("#{:<4}", request.issue_id), styles::muted_style()),
                Span::raw(format!("{:<34}", truncate(&request.description, 32))),
                Span::styled(
                    request.status_name().to_string(),
                    styles::status_style(request.current_status()),
                ),
            ]);

            let style = if i == app.request_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = if app.loading {
        " Requests (loading...) ".to_string()
    } else {
        format!(" Requests ({}) ", app.requests.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !app.requests.is_empty() {
        state.select(Some(app.request_selection));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_request_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_request() {
        Some(request) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Status: ", styles::highlight_style()),
                    Span::styled(
                        request.status_name().to_string(),
                        styles::status_style(request.current_status()),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Category: ", styles::highlight_style()),
                    Span::raw(request.category_name().unwrap_or("Uncategorized").to_string()),
                ]),
            ];

            if let Some(room) = request.room_number() {
                let location = match request.hall_name() {
                    Some(hall) => format!("{}, {}", room, hall),
                    None => room.to_string(),
                };
                lines.push(Line::from(vec![
                    Span::styled("Room: ", styles::highlight_style()),
                    Span::raw(location),
                ]));
            }
            if let Some(student) = request.student_name() {
                lines.push(Line::from(vec![
                    Span::styled("Student: ", styles::highlight_style()),
                    Span::raw(student.to_string()),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(request.description.clone()));
            lines.push(Line::from(""));

            if let Some(ref availability) = request.availability {
                lines.push(Line::from(vec![
                    Span::styled("Availability: ", styles::highlight_style()),
                    Span::raw(availability.clone()),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("Submitted: ", styles::highlight_style()),
                Span::raw(format_datetime(&request.submission_timestamp)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Updated: ", styles::highlight_style()),
                Span::raw(format_datetime(&request.last_updated)),
            ]));
            if let Some(ref completed) = request.completion_timestamp {
                lines.push(Line::from(vec![
                    Span::styled("Completed: ", styles::highlight_style()),
                    Span::raw(format_datetime(completed)),
                ]));
            }
            if request.estimated_cost.is_some() || request.actual_cost.is_some() {
                lines.push(Line::from(vec![
                    Span::styled("Cost: ", styles::highlight_style()),
                    Span::raw(format!(
                        "{} estimated / {} actual",
                        format_cost(request.estimated_cost),
                        format_cost(request.actual_cost)
                    )),
                ]));
            }

            // Action hints for roles that may move the lifecycle
            if app.role.can_transition() {
                lines.push(Line::from(""));
                let status = request.current_status();
                let hints: Vec<(&str, StatusAction)> = [
                    ("[i]", StatusAction::InProgress),
                    ("[v]", StatusAction::UnderReview),
                    ("[c]", StatusAction::Complete),
                    ("[p]", StatusAction::Reopen),
                ]
                .into_iter()
                .filter(|(_, action)| action.offered_for(status))
                .collect();

                let mut spans = Vec::new();
                for (i, (key, action)) in hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" | ", styles::muted_style()));
                    }
                    spans.push(Span::styled(*key, styles::help_key_style()));
                    spans.push(Span::raw(format!(" {}", action.label())));
                }
                lines.push(Line::from(spans));
            }

            (format!(" Request #{} ", request.issue_id), lines)
        }
        None => (
            " No Request Selected ".to_string(),
            vec![Line::from(Span::styled(
                if app.loading {
                    "Loading..."
                } else {
                    "Select a request from the list"
                },
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
