//! View-state controller: the task collection as last seen from the server,
//! the list-name set, the current view selection, and the form fields.
//!
//! Intents are turned into [`Request`]s without touching state; state only
//! changes when [`Controller::apply`] receives a successful [`Outcome`].

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;

use crate::api::{CreateKind, Outcome, Request};
use crate::model::task::{Change, DEFAULT_CATEGORIES, Task, is_list};
use crate::model::view::{Tab, TaskFilter, ViewState};
use crate::ops::filter::{filter_applies, filter_tasks, progress};
use crate::ops::task_ops::{self, TaskDraft, TaskError};

/// A failure to show the user once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
        }
    }
}

impl From<TaskError> for Notice {
    fn from(err: TaskError) -> Self {
        Notice::new(err.to_string())
    }
}

/// Transient form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub draft: TaskDraft,
    pub new_list: String,
    pub new_item: String,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub tasks: Vec<Task>,
    /// User lists, in creation order
    pub list_names: IndexSet<String>,
    pub view: ViewState,
    pub form: FormState,
    /// Whether a load has succeeded at least once
    pub loaded: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Whether the active tab shows a user list
    pub fn on_list_tab(&self) -> bool {
        self.view
            .tab
            .category()
            .is_some_and(|c| is_list(c, &self.list_names))
    }

    /// The list record behind the active tab, if it is a list tab
    pub fn current_list(&self) -> Option<&Task> {
        let name = self.view.tab.category()?;
        if !is_list(name, &self.list_names) {
            return None;
        }
        self.tasks
            .iter()
            .find(|t| t.category == name && t.looks_like_list())
    }

    // -----------------------------------------------------------------------
    // View selection
    // -----------------------------------------------------------------------

    /// Tabs in display order
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![
            Tab::All,
            Tab::Today,
            Tab::Important,
            Tab::Planned,
            Tab::Completed,
        ];
        tabs.extend(DEFAULT_CATEGORIES.iter().map(|c| Tab::Category(c.to_string())));
        tabs.extend(self.list_names.iter().cloned().map(Tab::Category));
        tabs.push(Tab::CreateList);
        tabs
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.view.tab = tab;
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.view.filter = filter;
    }

    pub fn cycle_filter(&mut self) {
        self.view.filter = self.view.filter.next();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
    }

    /// Whether the sub-filter has any effect on the active tab
    pub fn filter_applies(&self) -> bool {
        filter_applies(&self.view.tab, &self.list_names)
    }

    /// Tasks visible under the current view
    pub fn visible(&self, today: NaiveDate) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.view, &self.list_names, today)
    }

    /// Completion percentage of the visible tasks
    pub fn progress(&self, today: NaiveDate) -> f64 {
        progress(&self.visible(today))
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    pub fn request_load(&self) -> Request {
        Request::Load
    }

    /// Create a task from the draft fields.
    pub fn request_create(&self, now: NaiveDateTime) -> Result<Request, TaskError> {
        let payload =
            task_ops::build_new_task(&self.form.draft, &self.view.tab, &self.list_names, now)?;
        Ok(Request::Create {
            payload,
            kind: CreateKind::Task,
        })
    }

    /// Create a list named by the list-name field.
    pub fn request_create_list(&self) -> Result<Request, TaskError> {
        let payload = task_ops::build_new_list(&self.form.new_list, &self.list_names)?;
        Ok(Request::Create {
            payload,
            kind: CreateKind::List,
        })
    }

    pub fn request_toggle_completed(&self, id: &str) -> Result<Request, TaskError> {
        let task = task_ops::find_task(&self.tasks, id)?;
        let change = task_ops::toggled_completed(task);
        Ok(Request::Update {
            record: task.with_change(&change),
            change,
        })
    }

    pub fn request_toggle_important(&self, id: &str) -> Result<Request, TaskError> {
        let task = task_ops::find_task(&self.tasks, id)?;
        let change = task_ops::toggled_important(task);
        Ok(Request::Update {
            record: task.with_change(&change),
            change,
        })
    }

    /// Append the item field to list `id`.
    pub fn request_append_item(&self, id: &str) -> Result<Request, TaskError> {
        let change =
            task_ops::appended_item(&self.tasks, id, &self.form.new_item, &self.list_names)?;
        let task = task_ops::find_list(&self.tasks, id, &self.list_names)?;
        Ok(Request::Update {
            record: task.with_change(&change),
            change,
        })
    }

    pub fn request_delete(&self, id: &str) -> Result<Request, TaskError> {
        let task = task_ops::find_task(&self.tasks, id)?;
        Ok(Request::Delete {
            id: task.id.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Outcomes
    // -----------------------------------------------------------------------

    /// Merge an outcome into state. Failures leave state untouched and come
    /// back as a notice, except a failed load, which is only logged.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Notice> {
        if let Some(err) = outcome.error() {
            tracing::warn!(error = %err, "{}", outcome.fallback_message());
            if matches!(outcome, Outcome::Loaded(_)) {
                return None;
            }
            let message = err
                .server_message()
                .unwrap_or(outcome.fallback_message())
                .to_string();
            return Some(Notice::new(message));
        }

        match outcome {
            Outcome::Loaded(Ok(tasks)) => self.replace_all(tasks),
            Outcome::Created {
                kind,
                result: Ok(task),
            } => self.insert_created(kind, task),
            Outcome::Updated {
                id,
                change,
                result: Ok(()),
            } => match self.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    tracing::debug!(id = %id, field = change.field(), "merged update");
                    if matches!(change, Change::Items(_)) {
                        self.form.new_item.clear();
                    }
                    change.apply_to(task);
                }
                None => tracing::debug!(id = %id, "update for a task no longer present"),
            },
            Outcome::Deleted { id, result: Ok(()) } => self.remove(&id),
            // Errors were handled above
            _ => {}
        }
        None
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        tracing::info!(count = tasks.len(), "loaded tasks");
        self.list_names = tasks
            .iter()
            .filter(|t| t.looks_like_list())
            .map(|t| t.category.clone())
            .collect();
        self.tasks = tasks;
        self.loaded = true;
    }

    fn insert_created(&mut self, kind: CreateKind, task: Task) {
        tracing::info!(id = %task.id, ?kind, "created");
        if kind == CreateKind::List {
            self.list_names.insert(task.category.clone());
            self.view.tab = Tab::Category(task.category.clone());
            self.form.new_list.clear();
        } else {
            self.form.draft.clear();
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    fn remove(&mut self, id: &str) {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "delete for a task no longer present");
            return;
        };
        let removed = self.tasks.remove(pos);
        tracing::info!(id, "deleted");
        // Members of a list share its category; only the container owns the name
        if removed.looks_like_list() && is_list(&removed.category, &self.list_names) {
            self.list_names.shift_remove(&removed.category);
            if self.view.tab.category() == Some(removed.category.as_str()) {
                self.view.tab = Tab::All;
            }
        }
    }
}
