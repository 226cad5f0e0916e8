use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::controller::Notice;
use crate::tui::app::{App, FormField, FormKind, Mode};

pub(super) fn handle_form(app: &mut App, kind: FormKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            cancel(app, kind);
            return;
        }
        KeyCode::Enter => {
            submit(app, kind);
            return;
        }
        KeyCode::Tab if kind == FormKind::Task => {
            app.form_field = app.form_field.next();
            return;
        }
        KeyCode::BackTab if kind == FormKind::Task => {
            app.form_field = app.form_field.prev();
            return;
        }
        _ => {}
    }

    // The importance field is a checkbox
    if kind == FormKind::Task && app.form_field == FormField::Important {
        if matches!(key.code, KeyCode::Char(' ') | KeyCode::Char('x')) {
            let draft = &mut app.controller.form.draft;
            draft.important = !draft.important;
        }
        return;
    }

    let Some(buffer) = field_buffer(app, kind) else {
        return;
    };
    match key.code {
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => buffer.clear(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buffer.push(c),
        _ => {}
    }
}

/// Text buffer behind the focused field
fn field_buffer(app: &mut App, kind: FormKind) -> Option<&mut String> {
    let form = &mut app.controller.form;
    match kind {
        FormKind::List => Some(&mut form.new_list),
        FormKind::Item => Some(&mut form.new_item),
        FormKind::Task => match app.form_field {
            FormField::Text => Some(&mut form.draft.text),
            FormField::Date => Some(&mut form.draft.date),
            FormField::Time => Some(&mut form.draft.time),
            FormField::Important => None,
        },
    }
}

fn submit(app: &mut App, kind: FormKind) {
    let controller = &app.controller;
    let result = match kind {
        FormKind::Task => controller.request_create(Local::now().naive_local()),
        FormKind::List => controller.request_create_list(),
        FormKind::Item => match app.item_target.as_deref() {
            Some(id) => controller.request_append_item(id),
            None => {
                app.mode = Mode::Navigate;
                return;
            }
        },
    };
    match result {
        // The form stays filled until the server confirms
        Ok(request) => {
            app.send(request);
            app.mode = Mode::Navigate;
        }
        Err(e) => app.notify(Notice::from(e)),
    }
}

fn cancel(app: &mut App, kind: FormKind) {
    let form = &mut app.controller.form;
    match kind {
        FormKind::Task => form.draft.clear(),
        FormKind::List => form.new_list.clear(),
        FormKind::Item => {
            form.new_item.clear();
            app.item_target = None;
        }
    }
    app.form_field = FormField::Text;
    app.mode = Mode::Navigate;
}
