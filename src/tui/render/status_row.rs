use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, FormKind, Mode};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if app.in_flight > 0 {
                spans.push(Span::styled(
                    "syncing\u{2026}",
                    Style::default().fg(app.theme.purple).bg(bg),
                ));
            }
            let hint = if app.show_key_hints {
                "a add  space done  * star  d delete  / search  ? help"
            } else {
                ""
            };
            (spans, hint)
        }
        Mode::Search => {
            // Search prompt: /pattern▌
            let spans = vec![
                Span::styled(
                    format!("/{}", app.controller.view.search),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            (spans, "Enter keep  Esc clear")
        }
        Mode::Form(kind) => {
            let hint = match kind {
                FormKind::Task => "Tab next field  Enter save  Esc cancel",
                FormKind::List | FormKind::Item => "Enter save  Esc cancel",
            };
            (Vec::new(), hint)
        }
    };

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_hints_and_sync_marker() {
        let mut app = app_with_tasks(vec![]);
        assert!(render(&app).ends_with("? help"));
        app.in_flight = 2;
        assert!(render(&app).starts_with("syncing"));
        app.show_key_hints = false;
        assert_eq!(render(&app), "syncing\u{2026}");
    }

    #[test]
    fn search_prompt() {
        let mut app = app_with_tasks(vec![]);
        app.mode = Mode::Search;
        app.controller.set_search("mil");
        let out = render(&app);
        assert!(out.starts_with("/mil\u{258C}"));
        assert!(out.ends_with("Esc clear"));
    }
}
