use indexmap::IndexSet;
use serde::Serialize;

use crate::model::task::{Task, is_list};
use crate::ops::filter::FilterCounts;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub task: String,
    pub completed: bool,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub important: bool,
    pub is_list: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub tab: String,
    pub filter: String,
    pub search: String,
    pub progress: f64,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ListInfoJson {
    pub id: String,
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub all: usize,
    pub today: usize,
    pub important: usize,
    pub planned: usize,
    pub completed: usize,
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, list_names: &IndexSet<String>) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        task: task.task.clone(),
        completed: task.completed,
        category: task.category.clone(),
        due: task.is_planned().then(|| task.due_date_time.clone()),
        important: task.is_important,
        is_list: is_list(&task.category, list_names),
        items: task.items.clone(),
    }
}

pub fn stats_to_json(counts: &FilterCounts, progress: f64) -> StatsJson {
    StatsJson {
        all: counts.all,
        today: counts.today,
        important: counts.important,
        planned: counts.planned,
        completed: counts.completed,
        progress,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let star = if task.is_important { "* " } else { "" };
    let due = if task.is_planned() {
        format!(" due:{}", task.due_date_time)
    } else {
        String::new()
    };
    format!(
        "[{}] {} {}{} #{}{}",
        check_char(task),
        task.id,
        star,
        task.task,
        task.category,
        due
    )
}

/// Format a task, followed by its items when it is a list
pub fn format_task_entry(task: &Task, list_names: &IndexSet<String>) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    if is_list(&task.category, list_names) {
        for item in &task.items {
            lines.push(format!("    - {}", item));
        }
    }
    lines
}

/// `progress: 25% (1/4)`
pub fn format_progress(tasks: &[&Task], progress: f64) -> String {
    let done = tasks.iter().filter(|t| t.completed).count();
    format!("progress: {:.0}% ({}/{})", progress, done, tasks.len())
}

pub fn format_stats(counts: &FilterCounts, progress: f64) -> Vec<String> {
    vec![
        format!("all        {:>4}", counts.all),
        format!("today      {:>4}", counts.today),
        format!("important  {:>4}", counts.important),
        format!("planned    {:>4}", counts.planned),
        format!("completed  {:>4}", counts.completed),
        format!("progress   {:>3.0}%", progress),
    ]
}
