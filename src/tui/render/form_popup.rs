use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::task::display_name;
use crate::model::view::Tab;
use crate::tui::app::{App, FormField, FormKind};
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

const LABEL_WIDTH: usize = 8;

/// Render the add-task, new-list or add-item form over the content area
pub fn render_form_popup(frame: &mut Frame, app: &App, kind: FormKind, area: Rect) {
    let bg = app.theme.background;
    let popup_w: u16 = 52.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let form = &app.controller.form;

    let mut lines: Vec<Line> = Vec::new();
    let title = match kind {
        FormKind::Task => " New task ".to_string(),
        FormKind::List => " New list ".to_string(),
        FormKind::Item => {
            let list = app
                .item_target
                .as_deref()
                .and_then(|id| app.controller.find(id))
                .map(|t| display_name(&t.category))
                .unwrap_or_default();
            format!(" Add to {} ", list)
        }
    };

    match kind {
        FormKind::Task => {
            let draft = &form.draft;
            lines.push(field_line(app, "Task", &draft.text, "", app.form_field == FormField::Text, inner_w));
            lines.push(field_line(app, "Date", &draft.date, "YYYY-MM-DD", app.form_field == FormField::Date, inner_w));
            lines.push(field_line(app, "Time", &draft.time, "HH:MM", app.form_field == FormField::Time, inner_w));
            lines.push(checkbox_line(
                app,
                "Important",
                draft.important || app.controller.view.tab == Tab::Important,
                app.form_field == FormField::Important,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", destination_hint(app)),
                Style::default().fg(app.theme.dim).bg(bg),
            )));
        }
        FormKind::List => {
            lines.push(field_line(app, "Name", &form.new_list, "", true, inner_w));
        }
        FormKind::Item => {
            lines.push(field_line(app, "Item", &form.new_item, "", true, inner_w));
        }
    }

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

/// Where a new task will land, given the active tab
fn destination_hint(app: &App) -> String {
    match &app.controller.view.tab {
        Tab::Category(name) => format!("Adds to {}", display_name(name)),
        Tab::Today => "Due today unless a date is given".into(),
        Tab::Important => "Marked important".into(),
        _ => match &app.controller.form.draft.category {
            Some(c) => format!("Adds to {}", display_name(c)),
            None => "Adds to General".into(),
        },
    }
}

fn field_line<'a>(
    app: &App,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    inner_w: usize,
) -> Line<'a> {
    let bg = app.theme.background;
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let mut spans = vec![Span::styled(
        format!(" {:<width$}", format!("{}:", label), width = LABEL_WIDTH),
        label_style,
    )];

    // Keep the tail of long input visible, leaving room for the cursor
    let room = inner_w.saturating_sub(LABEL_WIDTH + 2);
    if value.is_empty() && !focused {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        let shown = if unicode::display_width(value) > room {
            let rev: String = value.chars().rev().collect();
            unicode::truncate_to_width(&rev, room).chars().rev().collect()
        } else {
            value.to_string()
        };
        spans.push(Span::styled(
            shown,
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}

fn checkbox_line<'a>(app: &App, label: &str, checked: bool, focused: bool) -> Line<'a> {
    let bg = app.theme.background;
    let style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(Span::styled(format!(" {} {}", mark, label), style))
}
