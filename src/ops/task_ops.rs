use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexSet;

use crate::model::task::{
    Change, FALLBACK_CATEGORY, NewTask, Task, is_default_category, is_list,
};
use crate::model::view::Tab;

/// Format of a combined due timestamp (local time, minute precision)
pub const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Error type for task operations rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task text cannot be empty")]
    EmptyText,
    #[error("List name cannot be empty")]
    EmptyListName,
    #[error("Item text cannot be empty")]
    EmptyItem,
    #[error("A list or category named {0} already exists")]
    DuplicateList(String),
    #[error("{0} is the name of a built-in tab")]
    ReservedListName(String),
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),
    #[error("Task not found: {0}")]
    NotFound(String),
}

/// Form fields of a task being composed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    /// `YYYY-MM-DD`, may be empty
    pub date: String,
    /// `HH:MM`, may be empty
    pub time: String,
    pub important: bool,
    /// Explicit category; the active tab's category wins when it has one
    pub category: Option<String>,
}

impl TaskDraft {
    /// Reset every field except the category choice
    pub fn clear(&mut self) {
        self.text.clear();
        self.date.clear();
        self.time.clear();
        self.important = false;
    }
}

/// Resolve the category a new task goes into.
fn resolve_category(draft: &TaskDraft, tab: &Tab, list_names: &IndexSet<String>) -> String {
    let wanted = tab.category().or(draft.category.as_deref());
    match wanted {
        Some(c) if is_default_category(c) || is_list(c, list_names) => c.to_string(),
        _ => FALLBACK_CATEGORY.to_string(),
    }
}

/// Combine the date and time fields into a `dueDateTime` value.
pub fn combine_due(
    date: &str,
    time: &str,
    from_today_tab: bool,
    now: NaiveDateTime,
) -> Result<String, TaskError> {
    let date = date.trim();
    let time = time.trim();

    let parsed_date = if date.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| TaskError::InvalidDate(date.to_string()))?,
        )
    };
    let parsed_time = if time.is_empty() {
        None
    } else {
        Some(
            NaiveTime::parse_from_str(time, "%H:%M")
                .map_err(|_| TaskError::InvalidTime(time.to_string()))?,
        )
    };

    let due = match (parsed_date, parsed_time) {
        (Some(d), Some(t)) => Some(d.and_time(t)),
        (Some(d), None) => Some(d.and_time(NaiveTime::MIN)),
        (None, Some(t)) => Some(now.date().and_time(t)),
        (None, None) if from_today_tab => Some(now),
        (None, None) => None,
    };
    Ok(due
        .map(|dt| dt.format(DUE_FORMAT).to_string())
        .unwrap_or_default())
}

/// Build the create payload for a plain task.
pub fn build_new_task(
    draft: &TaskDraft,
    tab: &Tab,
    list_names: &IndexSet<String>,
    now: NaiveDateTime,
) -> Result<NewTask, TaskError> {
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    let due_date_time = combine_due(&draft.date, &draft.time, *tab == Tab::Today, now)?;
    Ok(NewTask {
        task: text.to_string(),
        category: resolve_category(draft, tab, list_names),
        due_date_time,
        is_important: draft.important || *tab == Tab::Important,
        items: None,
    })
}

/// Build the create payload for a list container.
pub fn build_new_list(name: &str, list_names: &IndexSet<String>) -> Result<NewTask, TaskError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskError::EmptyListName);
    }
    if is_list(name, list_names) || is_default_category(name) {
        return Err(TaskError::DuplicateList(name.to_string()));
    }
    if Tab::is_reserved(name) {
        return Err(TaskError::ReservedListName(name.to_string()));
    }
    Ok(NewTask {
        task: name.to_string(),
        category: name.to_string(),
        due_date_time: String::new(),
        is_important: false,
        items: Some(Vec::new()),
    })
}

pub fn toggled_completed(task: &Task) -> Change {
    Change::Completed(!task.completed)
}

pub fn toggled_important(task: &Task) -> Change {
    Change::Important(!task.is_important)
}

/// The items of list `id` with `text` appended.
pub fn appended_item(
    tasks: &[Task],
    id: &str,
    text: &str,
    list_names: &IndexSet<String>,
) -> Result<Change, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyItem);
    }
    let list = find_list(tasks, id, list_names)?;
    let mut items = list.items.clone();
    items.push(text.to_string());
    Ok(Change::Items(items))
}

/// Look up a task in the local collection.
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task, TaskError> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Look up a list container; plain tasks and list members do not count.
pub fn find_list<'a>(
    tasks: &'a [Task],
    id: &str,
    list_names: &IndexSet<String>,
) -> Result<&'a Task, TaskError> {
    tasks
        .iter()
        .find(|t| t.id == id && t.looks_like_list() && is_list(&t.category, list_names))
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}
