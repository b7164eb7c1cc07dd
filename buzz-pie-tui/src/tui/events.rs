use crate::tui::app::{App, ConsumerState, View};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // raw mode swallows SIGINT, so Ctrl-C arrives here as a key
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.consumer_state == ConsumerState::Running {
            app.interrupt();
        } else {
            app.should_quit = true;
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc if app.view == View::Help => app.view = View::Chart,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('s') => app.interrupt(),
        KeyCode::Char('t') => app.cycle_theme(),
        _ => {}
    }
}
