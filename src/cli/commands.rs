use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("[x] todoey v", env!("CARGO_PKG_VERSION"), " - your task list, from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task service base URL (overrides config and TODOEY_SERVER)
    #[arg(short = 's', long, global = true)]
    pub server: Option<String>,

    /// Path to config.toml
    #[arg(short = 'c', long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in a tab
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Toggle a task's completion
    Done(IdArgs),
    /// Toggle a task's importance
    Star(IdArgs),
    /// Delete a task (or a list)
    Rm(IdArgs),
    /// Create a list
    NewList(NewListArgs),
    /// Append an item to a list
    Item(ItemArgs),
    /// Show user lists
    Lists,
    /// Show per-tab counts and progress
    Stats,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Tab: all, today, important, planned, completed, or a category/list name
    #[arg(long, default_value = "all")]
    pub tab: String,
    /// Sub-filter: all, active, completed
    #[arg(long, default_value = "all")]
    pub filter: String,
    /// Case-insensitive text search
    #[arg(long, default_value = "")]
    pub search: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Category or list name (unknown names fall back to general)
    #[arg(long)]
    pub category: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Due time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
    /// Mark as important
    #[arg(long)]
    pub important: bool,
    /// Add as due today (now, unless --time is given)
    #[arg(long)]
    pub today: bool,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct NewListArgs {
    /// List name
    pub name: String,
}

#[derive(Args)]
pub struct ItemArgs {
    /// ID of the list task
    pub list_id: String,
    /// Item text
    pub text: String,
}
