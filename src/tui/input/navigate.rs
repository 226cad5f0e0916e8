use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::is_list;
use crate::model::view::Tab;
use crate::ops::controller::Notice;
use crate::tui::app::{App, FormField, FormKind, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Tabs
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.move_tab(1),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.move_tab(-1),

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor = app.cursor.saturating_add(1);
            app.clamp_cursor();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = usize::MAX;
            app.clamp_cursor();
        }

        // Row actions
        KeyCode::Char(' ') => {
            if let Some(id) = app.selected_id() {
                let result = app.controller.request_toggle_completed(&id);
                submit(app, result);
            }
        }
        KeyCode::Char('*') => {
            if let Some(id) = app.selected_id() {
                let result = app.controller.request_toggle_important(&id);
                submit(app, result);
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_id() {
                let result = app.controller.request_delete(&id);
                submit(app, result);
            }
        }

        // Forms
        KeyCode::Char('a') => {
            if app.controller.view.tab == Tab::CreateList {
                open_form(app, FormKind::List);
            } else {
                open_form(app, FormKind::Task);
            }
        }
        KeyCode::Char('n') => open_form(app, FormKind::List),
        KeyCode::Char('+') => open_item_form(app),

        // View
        KeyCode::Char('f') => {
            app.controller.cycle_filter();
            app.clamp_cursor();
        }
        KeyCode::Char('/') => app.mode = Mode::Search,
        KeyCode::Esc => {
            app.controller.set_search("");
            app.clamp_cursor();
        }
        KeyCode::Char('r') => {
            let load = app.controller.request_load();
            app.send(load);
        }
        _ => {}
    }
}

fn submit<E: Into<Notice>>(app: &mut App, result: Result<crate::api::Request, E>) {
    match result {
        Ok(request) => app.send(request),
        Err(e) => app.notify(e.into()),
    }
}

fn open_form(app: &mut App, kind: FormKind) {
    app.form_field = FormField::Text;
    app.mode = Mode::Form(kind);
}

/// Items go to the list behind the active tab, or to the selected row when
/// that row is itself a list.
fn open_item_form(app: &mut App) {
    let target = app.controller.current_list().map(|t| t.id.clone()).or_else(|| {
        app.selected()
            .filter(|t| t.looks_like_list() && is_list(&t.category, &app.controller.list_names))
            .map(|t| t.id.clone())
    });
    match target {
        Some(id) => {
            app.item_target = Some(id);
            open_form(app, FormKind::Item);
        }
        None => app.notify(Notice::new("Open a list to add items")),
    }
}
