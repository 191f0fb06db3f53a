//! Users tab (admin only): the account roster.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let phone = user.phone_number.as_deref().unwrap_or("—");
            let line = Line::from(vec![
                Span::raw(format!("{:<24}", truncate(&user.name, 22))),
                Span::styled(format!("{:<14}", user.role), styles::highlight_style()),
                Span::raw(format!("{:<30}", truncate(&user.email, 28))),
                Span::styled(phone.to_string(), styles::muted_style()),
            ]);

            let style = if i == app.user_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Users ({}) ", app.users.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !app.users.is_empty() {
        state.select(Some(app.user_selection));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
