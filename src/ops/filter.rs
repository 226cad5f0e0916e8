use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;

use crate::model::task::{Task, is_list};
use crate::model::view::{Tab, TaskFilter, ViewState};

/// Calendar date of a `dueDateTime` value, or `None` when empty or unparseable.
///
/// Accepts RFC 3339 (converted to local time), `YYYY-MM-DDTHH:MM[:SS]`,
/// `YYYY-MM-DD HH:MM` and a bare `YYYY-MM-DD`.
pub fn due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Tab predicate
fn matches_tab(task: &Task, tab: &Tab, today: NaiveDate) -> bool {
    match tab {
        Tab::All => true,
        Tab::Today => due_date(&task.due_date_time) == Some(today),
        Tab::Important => task.is_important,
        Tab::Planned => task.is_planned(),
        Tab::Completed => task.completed,
        Tab::CreateList => false,
        Tab::Category(name) => task.category == *name,
    }
}

/// Whether the completion sub-filter applies on this tab
pub fn filter_applies(tab: &Tab, list_names: &IndexSet<String>) -> bool {
    match tab {
        Tab::Today | Tab::CreateList => false,
        Tab::Category(name) => !is_list(name, list_names),
        _ => true,
    }
}

fn matches_filter(task: &Task, filter: TaskFilter) -> bool {
    match filter {
        TaskFilter::All => true,
        TaskFilter::Active => !task.completed,
        TaskFilter::Completed => task.completed,
    }
}

/// Case-insensitive substring match. `needle` must already be lowercased.
fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty() || task.task.to_lowercase().contains(needle)
}

/// Derive the visible tasks for a view, in collection order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    view: &ViewState,
    list_names: &IndexSet<String>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let use_filter = filter_applies(&view.tab, list_names);
    let needle = view.search.to_lowercase();
    tasks
        .iter()
        .filter(|t| matches_tab(t, &view.tab, today))
        .filter(|t| !use_filter || matches_filter(t, view.filter))
        .filter(|t| matches_search(t, &needle))
        .collect()
}

/// Percentage of completed tasks in a filtered set; 0 when the set is empty.
pub fn progress(tasks: &[&Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    done as f64 / tasks.len() as f64 * 100.0
}

/// Number of tasks on each fixed tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub today: usize,
    pub important: usize,
    pub planned: usize,
    pub completed: usize,
}

impl FilterCounts {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut counts = FilterCounts::default();
        for task in tasks {
            counts.all += 1;
            if matches_tab(task, &Tab::Today, today) {
                counts.today += 1;
            }
            if task.is_important {
                counts.important += 1;
            }
            if task.is_planned() {
                counts.planned += 1;
            }
            if task.completed {
                counts.completed += 1;
            }
        }
        counts
    }

    /// Count for a fixed tab; category tabs are counted by the caller
    pub fn for_tab(&self, tab: &Tab) -> Option<usize> {
        match tab {
            Tab::All => Some(self.all),
            Tab::Today => Some(self.today),
            Tab::Important => Some(self.important),
            Tab::Planned => Some(self.planned),
            Tab::Completed => Some(self.completed),
            Tab::CreateList | Tab::Category(_) => None,
        }
    }
}
