//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes.
//! Mutating operations are awaited in place, so a follow-up read
//! always observes the completed mutation.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_description_char, can_add_email_char, can_add_password_char, App, AppState, FormFocus,
    LoginFocus, StatusAction, Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Overlays capture input first
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }
    if matches!(app.state, AppState::NewRequest) {
        return handle_new_request_input(app, key).await;
    }
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Esc => app.dismiss_messages(),

        // Tabs
        KeyCode::Char('1') => app.select_tab(0),
        KeyCode::Char('2') => app.select_tab(1),
        KeyCode::Char('3') => app.select_tab(2),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),

        // Selection
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),

        // Data
        KeyCode::Char('r') => app.refresh().await,
        KeyCode::Char('o') => app.logout(),

        // Student submission
        KeyCode::Char('n') if !app.role.can_transition() => app.start_new_request(),

        // Lifecycle transitions, offered on the requests tab only
        KeyCode::Char('i') if app.current_tab == Tab::Requests => {
            app.transition_selected(StatusAction::InProgress).await
        }
        KeyCode::Char('v') if app.current_tab == Tab::Requests => {
            app.transition_selected(StatusAction::UnderReview).await
        }
        KeyCode::Char('c') if app.current_tab == Tab::Requests => {
            app.transition_selected(StatusAction::Complete).await
        }
        KeyCode::Char('p') if app.current_tab == Tab::Requests => {
            app.transition_selected(StatusAction::Reopen).await
        }

        _ => {}
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Email,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.submit_login().await,
        },
        KeyCode::Backspace => {
            match app.login_focus {
                LoginFocus::Email => app.login_email.pop(),
                LoginFocus::Password => app.login_password.pop(),
            };
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email if can_add_email_char(&app.login_email) => {
                app.login_email.push(c);
            }
            LoginFocus::Password if can_add_password_char(&app.login_password) => {
                app.login_password.push(c);
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_new_request_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Tab => {
            app.form_focus = match app.form_focus {
                FormFocus::Description => FormFocus::Availability,
                FormFocus::Availability => FormFocus::Category,
                FormFocus::Category => FormFocus::Description,
            };
        }
        KeyCode::Enter => app.submit_new_request().await,
        KeyCode::Backspace => {
            match app.form_focus {
                FormFocus::Description => app.form_description.pop(),
                FormFocus::Availability => app.form_availability.pop(),
                FormFocus::Category => None,
            };
        }
        KeyCode::Char(' ') if app.form_focus == FormFocus::Category => {
            app.cycle_form_category();
        }
        KeyCode::Char(c) => match app.form_focus {
            FormFocus::Description if can_add_description_char(&app.form_description) => {
                app.form_description.push(c);
            }
            FormFocus::Availability if can_add_description_char(&app.form_availability) => {
                app.form_availability.push(c);
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}
