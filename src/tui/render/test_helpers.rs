use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::Outcome;
use crate::model::task::Task;
use crate::ops::controller::Controller;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A plain active task with no due date.
pub fn task(id: &str, text: &str, category: &str) -> Task {
    Task {
        id: id.into(),
        task: text.into(),
        completed: false,
        category: category.into(),
        due_date_time: String::new(),
        is_important: false,
        items: Vec::new(),
    }
}

/// Build an App as if `tasks` had just been loaded, on a fixed day (2025-06-03).
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let mut controller = Controller::new();
    controller.apply(Outcome::Loaded(Ok(tasks)));
    let mut app = App::new(controller, Theme::default());
    app.today = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    app
}
