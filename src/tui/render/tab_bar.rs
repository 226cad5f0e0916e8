use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::view::{Tab, TaskFilter};
use crate::ops::filter::FilterCounts;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::spans_width;

/// Render the tab bar: one tab per view, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Label of a tab with its task count, e.g. ` Groceries 3 `
fn tab_label(app: &App, tab: &Tab, counts: &FilterCounts) -> String {
    let count = counts.for_tab(tab).or_else(|| {
        tab.category().map(|name| {
            app.controller
                .tasks
                .iter()
                .filter(|t| t.category == name)
                .count()
        })
    });
    match count {
        Some(n) if n > 0 => format!(" {} {} ", tab.label(), n),
        _ => format!(" {} ", tab.label()),
    }
}

/// First tab to draw so that the active tab fits in `width` cells
fn first_visible(widths: &[usize], active: usize, width: usize) -> usize {
    let mut start = 0;
    // +1 for the separator after each tab, +2 for the overflow marker
    while start < active {
        let used: usize = widths[start..=active].iter().map(|w| w + 1).sum();
        let marker = if start > 0 { 2 } else { 0 };
        if used + marker <= width {
            break;
        }
        start += 1;
    }
    start
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let counts = FilterCounts::compute(&app.controller.tasks, app.today);
    let tabs = app.controller.tabs();
    let active = app.tab_index();

    let labels: Vec<String> = tabs.iter().map(|t| tab_label(app, t, &counts)).collect();
    let widths: Vec<usize> = labels.iter().map(|l| unicode::display_width(l)).collect();
    let start = first_visible(&widths, active, area.width as usize);

    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    if start > 0 {
        spans.push(Span::styled(
            "\u{2039} ",
            Style::default().fg(app.theme.purple).bg(bg),
        ));
    }

    for (i, (tab, label)) in tabs.iter().zip(labels).enumerate().skip(start) {
        let is_current = i == active;
        let style = if *tab == Tab::CreateList && !is_current {
            Style::default().fg(app.theme.purple).bg(bg)
        } else {
            tab_style(app, is_current)
        };
        spans.push(Span::styled(label, style));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;
    let controller = &app.controller;

    // Right-aligned indicator: sub-filter, search, progress
    let mut indicator_spans: Vec<Span> = Vec::new();
    if controller.filter_applies() && controller.view.filter != TaskFilter::All {
        indicator_spans.push(Span::styled(
            "filter: ",
            Style::default().fg(app.theme.purple).bg(bg),
        ));
        indicator_spans.push(Span::styled(
            controller.view.filter.label(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        indicator_spans.push(Span::styled(" ", Style::default().bg(bg)));
    }
    if !controller.view.search.is_empty() {
        indicator_spans.push(Span::styled(
            format!("/{} ", controller.view.search),
            Style::default().fg(app.theme.search_match_bg).bg(bg),
        ));
    }
    if controller.loaded && controller.view.tab != Tab::CreateList {
        let pct = controller.progress(app.today);
        let color = if pct >= 100.0 {
            app.theme.green
        } else {
            app.theme.text
        };
        indicator_spans.push(Span::styled(
            format!("{:.0}% done", pct),
            Style::default().fg(color).bg(bg),
        ));
    }

    let indicator_width = spans_width(&indicator_spans);
    // +2: one space before indicator, one space after (right edge buffer)
    let separator_end = if indicator_width > 0 {
        width.saturating_sub(indicator_width + 2)
    } else {
        width
    };

    let mut sep_text = String::with_capacity(separator_end * 3);
    for col in 0..separator_end {
        if sep_cols.contains(&col) {
            sep_text.push('\u{2534}');
        } else {
            sep_text.push('\u{2500}');
        }
    }

    let mut spans = vec![Span::styled(sep_text, Style::default().fg(dim).bg(bg))];
    if indicator_width > 0 {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.extend(indicator_spans);
    }

    let sep_widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 2, |frame, area| render_tab_bar(frame, app, area))
    }

    #[test]
    fn tabs_show_counts() {
        let mut done = task("2", "Fix sink", "home");
        done.completed = true;
        let app = app_with_tasks(vec![task("1", "Buy milk", "groceries"), done]);
        let out = render(&app);
        let first = out.lines().next().unwrap_or_default();
        assert!(first.starts_with(" All 2 \u{2502} Today \u{2502}"));
        assert!(first.contains(" Completed 1 "));
    }

    #[test]
    fn separator_shows_filter_and_progress() {
        let mut done = task("2", "Fix sink", "home");
        done.completed = true;
        let mut app = app_with_tasks(vec![task("1", "Buy milk", "groceries"), done]);
        app.controller.set_filter(TaskFilter::Active);
        let out = render(&app);
        let second = out.lines().nth(1).unwrap_or_default();
        assert!(second.contains("filter: active"));
        // Only the active task is visible, so nothing is done
        assert!(second.ends_with("0% done"));
    }

    #[test]
    fn filter_hidden_where_it_does_not_apply() {
        let mut app = app_with_tasks(vec![task("1", "Buy milk", "groceries")]);
        app.controller.set_filter(TaskFilter::Completed);
        app.controller.set_tab(Tab::Today);
        let out = render(&app);
        assert!(!out.contains("filter:"));
    }

    #[test]
    fn active_tab_scrolled_into_view() {
        let mut app = app_with_tasks(vec![task("r", "Reading", "Reading")]);
        app.controller.set_tab(Tab::CreateList);
        let out = render_to_string(40, 2, |frame, area| render_tab_bar(frame, &app, area));
        let first = out.lines().next().unwrap_or_default();
        assert!(first.starts_with("\u{2039}"));
        assert!(first.contains("+ List"));
        assert!(!first.contains(" All "));
    }

    #[test]
    fn first_visible_keeps_active_tab() {
        let widths = [5, 5, 5, 5];
        assert_eq!(first_visible(&widths, 0, 10), 0);
        assert_eq!(first_visible(&widths, 3, 100), 0);
        // Four tabs need 24 cells; in 14, start at the third (6 + 6 + marker)
        assert_eq!(first_visible(&widths, 3, 14), 2);
    }
}
