use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::display_name;

/// Which slice of the collection is on screen
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tab {
    #[default]
    All,
    /// Tasks due on the current calendar date
    Today,
    Important,
    /// Tasks with any due date
    Planned,
    Completed,
    /// The list-creation form
    CreateList,
    /// A default category or a user list, by exact name
    Category(String),
}

impl Tab {
    /// Name used on the command line and in persisted state
    pub fn name(&self) -> &str {
        match self {
            Tab::All => "all",
            Tab::Today => "today",
            Tab::Important => "important",
            Tab::Planned => "planned",
            Tab::Completed => "completed",
            Tab::CreateList => "create-list",
            Tab::Category(name) => name,
        }
    }

    /// Tab label as rendered (capitalized)
    pub fn label(&self) -> String {
        match self {
            Tab::CreateList => "+ List".to_string(),
            other => display_name(other.name()),
        }
    }

    /// Whether `name` parses as a built-in tab rather than a category
    pub fn is_reserved(name: &str) -> bool {
        !matches!(Tab::from(name), Tab::Category(_))
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Tab::Category(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for Tab {
    fn from(s: &str) -> Self {
        match s {
            "all" => Tab::All,
            "today" => Tab::Today,
            "important" => Tab::Important,
            "planned" => Tab::Planned,
            "completed" => Tab::Completed,
            "create-list" => Tab::CreateList,
            other => Tab::Category(other.to_string()),
        }
    }
}

impl From<String> for Tab {
    fn from(s: String) -> Self {
        Tab::from(s.as_str())
    }
}

impl From<Tab> for String {
    fn from(tab: Tab) -> Self {
        tab.name().to_string()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Completion sub-filter applied within a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        }
    }

    /// all → active → completed → all
    pub fn next(self) -> TaskFilter {
        match self {
            TaskFilter::All => TaskFilter::Active,
            TaskFilter::Active => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::All,
        }
    }

    pub fn parse(s: &str) -> Result<TaskFilter, String> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            _ => Err(format!(
                "invalid filter: {} (expected all, active, completed)",
                s
            )),
        }
    }
}

/// The selection a task view is derived from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub tab: Tab,
    pub filter: TaskFilter,
    pub search: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_round_trip() {
        for name in ["all", "today", "important", "planned", "completed", "create-list"] {
            assert_eq!(Tab::from(name).name(), name);
        }
        assert_eq!(Tab::from("Reading"), Tab::Category("Reading".into()));
        // Category names are case-sensitive; "All" is a category, not the all tab
        assert_eq!(Tab::from("All"), Tab::Category("All".into()));
    }

    #[test]
    fn tab_labels_are_capitalized_for_display_only() {
        let tab = Tab::from("groceries");
        assert_eq!(tab.label(), "Groceries");
        assert_eq!(tab.name(), "groceries");
        assert_eq!(Tab::CreateList.label(), "+ List");
    }

    #[test]
    fn tab_serializes_as_name() {
        let json = serde_json::to_string(&Tab::Category("work".into())).unwrap();
        assert_eq!(json, "\"work\"");
        let tab: Tab = serde_json::from_str("\"today\"").unwrap();
        assert_eq!(tab, Tab::Today);
    }

    #[test]
    fn filter_cycles() {
        assert_eq!(TaskFilter::All.next(), TaskFilter::Active);
        assert_eq!(TaskFilter::Active.next(), TaskFilter::Completed);
        assert_eq!(TaskFilter::Completed.next(), TaskFilter::All);
    }

    #[test]
    fn filter_parse() {
        assert_eq!(TaskFilter::parse("active"), Ok(TaskFilter::Active));
        assert_eq!(TaskFilter::parse("done"), Ok(TaskFilter::Completed));
        assert!(TaskFilter::parse("open").is_err());
    }
}
