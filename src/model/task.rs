use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Categories every task can belong to without creating a list
pub const DEFAULT_CATEGORIES: [&str; 5] = ["general", "work", "home", "groceries", "movies"];

/// Category used when a task names no category, or one that does not exist
pub const FALLBACK_CATEGORY: &str = "general";

/// A task record as the backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend-assigned identifier
    pub id: String,
    /// Display text
    pub task: String,
    #[serde(default)]
    pub completed: bool,
    /// A default category or a user list name
    #[serde(default = "default_category")]
    pub category: String,
    /// ISO 8601 timestamp, or empty when the task has no due date
    #[serde(default)]
    pub due_date_time: String,
    #[serde(default)]
    pub is_important: bool,
    /// Entries of a list container (empty for plain tasks)
    #[serde(default)]
    pub items: Vec<String>,
}

fn default_category() -> String {
    FALLBACK_CATEGORY.to_string()
}

impl Task {
    /// Whether the task has a due date at all
    pub fn is_planned(&self) -> bool {
        !self.due_date_time.trim().is_empty()
    }

    /// Whether this record looks like a list container: its text is its own category
    /// and that category is not one of the defaults.
    pub fn looks_like_list(&self) -> bool {
        self.task == self.category && !is_default_category(&self.category)
    }

    /// Return a copy of this record with one change applied
    pub fn with_change(&self, change: &Change) -> Task {
        let mut updated = self.clone();
        change.apply_to(&mut updated);
        updated
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task: String,
    pub category: String,
    pub due_date_time: String,
    pub is_important: bool,
    /// Present only when creating a list container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

/// The single field an update changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Completed(bool),
    Important(bool),
    Items(Vec<String>),
}

impl Change {
    /// Write this change into a record
    pub fn apply_to(&self, task: &mut Task) {
        match self {
            Change::Completed(v) => task.completed = *v,
            Change::Important(v) => task.is_important = *v,
            Change::Items(items) => task.items = items.clone(),
        }
    }

    /// The backend field name this change touches
    pub fn field(&self) -> &'static str {
        match self {
            Change::Completed(_) => "completed",
            Change::Important(_) => "isImportant",
            Change::Items(_) => "items",
        }
    }
}

/// Whether `category` names a user list.
pub fn is_list(category: &str, list_names: &IndexSet<String>) -> bool {
    list_names.contains(category)
}

pub fn is_default_category(category: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&category)
}

/// Display form of a tab or category name: first letter capitalized.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
