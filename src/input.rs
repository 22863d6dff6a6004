//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Keys depend on the current
//! screen: form screens route printable characters into the focused field,
//! the other screens use single-letter commands.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a match arm in the handler for the screen that should react.
//! 3. Update the help text in [`crate::ui::help`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::feed::ViewFilter;
use crate::nav::Screen;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.nav.current() {
        Screen::Login | Screen::Register | Screen::AddProduct | Screen::Profile => {
            handle_form_key(app, key)
        }
        Screen::Home => handle_home_key(app, key),
        Screen::ProductList => handle_list_key(app, key),
        Screen::ProductDetails(_) => handle_details_key(app, key),
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') && app.nav.current() == &Screen::Login {
            app.open_register();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.back(),
        KeyCode::Enter => match app.nav.current() {
            Screen::Login => app.submit_login(),
            Screen::Register => app.submit_register(),
            Screen::AddProduct => app.submit_product(),
            Screen::Profile => app.save_profile(),
            _ => {}
        },
        code => {
            let Some(form) = app.active_form() else {
                return;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
                KeyCode::Backspace => form.delete_char(),
                KeyCode::Char(c) => form.insert_char(c),
                _ => {}
            }
        }
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('p') => app.open_product_list(),
        KeyCode::Char('a') => app.open_add_product(),
        KeyCode::Char('n') => app.notify(),
        KeyCode::Char('u') => app.open_profile(),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.back(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('1') => app.select_filter(ViewFilter::All),
        KeyCode::Char('2') => app.select_filter(ViewFilter::Favorites),
        KeyCode::Char('3') => app.select_filter(ViewFilter::Added),
        KeyCode::Char('f') | KeyCode::Char(' ') => app.toggle_favorite(),
        KeyCode::Enter => app.open_details(),
        _ => {}
    }
}

fn handle_details_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.back(),
        KeyCode::Char('f') => app.toggle_favorite(),
        _ => {}
    }
}
