use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Task, is_list};
use crate::model::view::Tab;
use crate::ops::filter::due_date;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{due_label, spans_width};
use super::push_highlighted_spans;

/// Columns before the title: " [x] ★ "
const PREFIX_WIDTH: usize = 7;

/// Render the task list for the active tab
pub fn render_task_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    if let Some(message) = empty_message(app) {
        let empty = Paragraph::new(format!(" {}", message))
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width as usize;
    let height = area.height as usize;

    // Each task contributes its row plus one row per list item
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_span = (0, 0);
    {
        let visible = app.visible();
        let cursor = app.cursor.min(visible.len().saturating_sub(1));
        let show_category = !app.controller.on_list_tab();
        for (i, task) in visible.iter().enumerate() {
            let selected = i == cursor;
            let first = lines.len();
            lines.push(task_line(app, task, selected, show_category, width));
            if task.looks_like_list() && is_list(&task.category, &app.controller.list_names) {
                for item in &task.items {
                    lines.push(item_line(app, item, selected, width));
                }
            }
            if selected {
                cursor_span = (first, lines.len() - 1);
            }
        }
    }

    // Keep the whole cursor entry on screen, its first row above all
    let (first, last) = cursor_span;
    if first < app.scroll_offset {
        app.scroll_offset = first;
    } else if last >= app.scroll_offset + height {
        app.scroll_offset = (last + 1).saturating_sub(height).min(first);
    }

    let shown: Vec<Line> = lines
        .into_iter()
        .skip(app.scroll_offset)
        .take(height)
        .collect();
    let paragraph = Paragraph::new(shown).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Placeholder text when there are no rows to draw
fn empty_message(app: &App) -> Option<String> {
    let controller = &app.controller;
    if controller.view.tab == Tab::CreateList {
        return Some("Press a to create a new list.".into());
    }
    if !controller.loaded {
        return Some(if app.in_flight > 0 {
            "Loading tasks\u{2026}".into()
        } else {
            "Could not load tasks. Press r to retry.".into()
        });
    }
    if !app.visible().is_empty() {
        return None;
    }
    if controller.view.search.is_empty() {
        Some("No tasks here. Press a to add one.".into())
    } else {
        Some(format!(
            "No tasks match \u{201c}{}\u{201d}",
            controller.view.search
        ))
    }
}

fn task_line<'a>(
    app: &App,
    task: &Task,
    selected: bool,
    show_category: bool,
    width: usize,
) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let plain = Style::default().fg(theme.text).bg(row_bg);

    let check_style = if task.completed {
        Style::default().fg(theme.green).bg(row_bg)
    } else {
        plain
    };
    let mut spans = vec![
        Span::styled(" ", plain),
        Span::styled(if task.completed { "[x]" } else { "[ ]" }, check_style),
        Span::styled(" ", plain),
        if task.is_important {
            Span::styled("\u{2605}", Style::default().fg(theme.yellow).bg(row_bg))
        } else {
            Span::styled(" ", plain)
        },
        Span::styled(" ", plain),
    ];

    // Right side: due date, then category
    let mut right: Vec<Span> = Vec::new();
    if task.is_planned() {
        let overdue = !task.completed && due_date(&task.due_date_time).is_some_and(|d| d < app.today);
        let color = if overdue { theme.red } else { theme.dim };
        right.push(Span::styled(
            format!("  {}", due_label(&task.due_date_time)),
            Style::default().fg(color).bg(row_bg),
        ));
    }
    if show_category {
        right.push(Span::styled(
            format!("  #{}", task.category),
            Style::default()
                .fg(theme.category_color(&task.category))
                .bg(row_bg),
        ));
    }
    right.push(Span::styled(" ", plain));

    let title_width = width.saturating_sub(PREFIX_WIDTH + spans_width(&right));
    let title = unicode::truncate_to_width(&task.task, title_width);
    let mut title_style = if selected {
        Style::default().fg(theme.text_bright).bg(row_bg)
    } else {
        plain
    };
    if task.completed {
        title_style = title_style
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    let highlight = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let search_re = app.search_re();
    push_highlighted_spans(&mut spans, &title, title_style, highlight, search_re.as_ref());

    let pad = title_width.saturating_sub(unicode::display_width(&title));
    if pad > 0 {
        spans.push(Span::styled(" ".repeat(pad), plain));
    }
    spans.extend(right);
    Line::from(spans)
}

fn item_line<'a>(app: &App, item: &str, selected: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let indent = " ".repeat(PREFIX_WIDTH);
    let text = unicode::truncate_to_width(item, width.saturating_sub(PREFIX_WIDTH + 3));
    let mut spans = vec![
        Span::styled(indent, Style::default().bg(row_bg)),
        Span::styled("\u{2022} ", Style::default().fg(theme.purple).bg(row_bg)),
        Span::styled(text, Style::default().fg(theme.text).bg(row_bg)),
    ];
    let used = spans_width(&spans);
    if selected && used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(row_bg),
        ));
    }
    Line::from(spans)
}
