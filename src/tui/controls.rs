//! Keyboard input handling for the dashboard.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('c') | KeyCode::Enter => app.trigger_selected(Instant::now()),
        KeyCode::Char('r') => app.reset(),
        _ => {}
    }
}
