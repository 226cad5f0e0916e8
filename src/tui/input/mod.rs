mod form;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use form::handle_form;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // The notice popup blocks everything until dismissed
    if app.notice.is_some() {
        app.notice = None;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form(kind) => handle_form(app, kind, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CreateKind, Request};
    use crate::model::task::Change;
    use crate::model::view::{Tab, TaskFilter};
    use crate::tui::app::FormKind;
    use crate::tui::render::test_helpers::{app_with_tasks, task};
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, key(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn toggle_issues_one_update_per_press() {
        let mut app = app_with_tasks(vec![task("1", "Buy milk", "groceries")]);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.outbox.len(), 1);
        match &app.outbox[0] {
            Request::Update { record, change } => {
                assert_eq!(*change, Change::Completed(true));
                assert!(record.completed);
                assert_eq!(record.task, "Buy milk");
            }
            other => panic!("unexpected request {:?}", other),
        }
        // Nothing changes locally until the outcome arrives
        assert!(!app.controller.tasks[0].completed);
    }

    #[test]
    fn add_form_submits_create() {
        let mut app = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form(FormKind::Task));
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2025-07-04");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "18:30");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.outbox.len(), 1);
        match &app.outbox[0] {
            Request::Create { payload, kind } => {
                assert_eq!(*kind, CreateKind::Task);
                assert_eq!(payload.task, "Buy milk");
                assert_eq!(payload.due_date_time, "2025-07-04T18:30");
                assert!(payload.is_important);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn empty_form_raises_notice_without_request() {
        let mut app = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(app.outbox.is_empty());
        assert_eq!(
            app.notice.as_ref().map(|n| n.message.as_str()),
            Some("Task text cannot be empty")
        );
        // Any key dismisses the notice and returns to the form
        press(&mut app, KeyCode::Char('x'));
        assert!(app.notice.is_none());
        assert_eq!(app.mode, Mode::Form(FormKind::Task));
        assert!(app.controller.form.draft.text.is_empty());
    }

    #[test]
    fn new_list_form() {
        let mut app = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Form(FormKind::List));
        type_text(&mut app, "Reading");
        press(&mut app, KeyCode::Enter);
        match &app.outbox[0] {
            Request::Create { payload, kind } => {
                assert_eq!(*kind, CreateKind::List);
                assert_eq!(payload.category, "Reading");
                assert_eq!(payload.items, Some(Vec::new()));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn append_item_on_list_tab() {
        let mut app = app_with_tasks(vec![task("r", "Reading", "Reading")]);
        app.controller.set_tab(Tab::from("Reading"));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.mode, Mode::Form(FormKind::Item));
        type_text(&mut app, "Buy pen");
        press(&mut app, KeyCode::Enter);
        match &app.outbox[0] {
            Request::Update { record, change } => {
                assert_eq!(*change, Change::Items(vec!["Buy pen".into()]));
                assert_eq!(record.id, "r");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn append_item_outside_list_tab_is_refused() {
        let mut app = app_with_tasks(vec![task("1", "Buy milk", "groceries")]);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.notice.is_some());
    }

    #[test]
    fn search_filters_live_and_esc_clears() {
        let mut app = app_with_tasks(vec![
            task("1", "Buy milk", "groceries"),
            task("2", "Fix sink", "home"),
        ]);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "MIL");
        assert_eq!(app.visible().len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.controller.view.search, "MIL");
        press(&mut app, KeyCode::Esc);
        assert!(app.controller.view.search.is_empty());
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn tab_and_filter_keys() {
        let mut app = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.controller.view.tab, Tab::Today);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.controller.view.tab, Tab::All);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.controller.view.filter, TaskFilter::Active);
    }

    #[test]
    fn delete_and_reload() {
        let mut app = app_with_tasks(vec![task("1", "Buy milk", "groceries")]);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(
            app.outbox,
            vec![Request::Delete { id: "1".into() }, Request::Load]
        );
    }

    #[test]
    fn quit() {
        let mut app = app_with_tasks(vec![]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
