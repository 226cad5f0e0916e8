use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search
        (_, KeyCode::Esc) => {
            app.controller.set_search("");
            app.mode = Mode::Navigate;
        }

        // Keep the search and go back to the list
        (_, KeyCode::Enter) => {
            app.mode = Mode::Navigate;
        }

        (_, KeyCode::Backspace) => {
            let mut search = app.controller.view.search.clone();
            search.pop();
            app.controller.set_search(search);
        }

        // Clear the whole input
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.controller.set_search("");
        }

        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            let mut search = app.controller.view.search.clone();
            search.push(c);
            app.controller.set_search(search);
        }

        _ => return,
    }
    app.cursor = 0;
    app.scroll_offset = 0;
}
