use std::path::PathBuf;

use chrono::Local;

use crate::api::{self, HttpTaskApi, Outcome, Request, TaskApi};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, SERVER_ENV};
use crate::io::logging::{LogTarget, init_tracing};
use crate::model::config::AppConfig;
use crate::model::task::Task;
use crate::model::view::{Tab, TaskFilter};
use crate::ops::controller::Controller;
use crate::ops::filter::{FilterCounts, progress};
use crate::ops::task_ops::TaskDraft;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Resolve config from `--config`, `--server` and the environment.
pub fn load_settings(
    config_path: Option<&str>,
    server: Option<&str>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(config_io::default_config_path);
    let mut config = config_io::load_config(&path)?;
    let env = std::env::var(SERVER_ENV).ok();
    config_io::apply_server_override(&mut config, server, env.as_deref());
    Ok(config)
}

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = load_settings(cli.config.as_deref(), cli.server.as_deref())?;
    init_tracing(&config.logging, LogTarget::Stderr)?;

    let api = HttpTaskApi::new(&config.server);
    tracing::debug!(base_url = api.base_url(), "using task service");
    let mut session = Session::new(api);

    match cli.command {
        None => {
            eprintln!("no command given (try `td --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&mut session, args, json),
            Commands::Lists => cmd_lists(&mut session, json),
            Commands::Stats => cmd_stats(&mut session, json),

            // Write commands
            Commands::Add(args) => cmd_add(&mut session, args, json),
            Commands::Done(args) => cmd_done(&mut session, args, json),
            Commands::Star(args) => cmd_star(&mut session, args, json),
            Commands::Rm(args) => cmd_rm(&mut session, args),
            Commands::NewList(args) => cmd_new_list(&mut session, args, json),
            Commands::Item(args) => cmd_item(&mut session, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A controller driven synchronously against an API, one request at a time.
pub struct Session<A: TaskApi> {
    api: A,
    pub controller: Controller,
}

impl<A: TaskApi> Session<A> {
    pub fn new(api: A) -> Self {
        Session {
            api,
            controller: Controller::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load the collection. Unlike the TUI, a CLI command cannot go on
    /// without it, so a failed load is an error here.
    pub fn fetch(&mut self) -> Result<(), String> {
        match self.api.list() {
            Ok(tasks) => {
                self.controller.apply(Outcome::Loaded(Ok(tasks)));
                Ok(())
            }
            Err(e) => Err(e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failed to fetch tasks ({})", e))),
        }
    }

    /// Execute one request and merge its outcome.
    pub fn run(&mut self, request: Request) -> Result<(), String> {
        let outcome = api::execute(&self.api, request);
        match self.controller.apply(outcome) {
            Some(notice) => Err(notice.message),
            None => Ok(()),
        }
    }

    /// Execute a create and return the id the server assigned.
    pub fn run_create(&mut self, request: Request) -> Result<String, String> {
        let outcome = api::execute(&self.api, request);
        let id = match &outcome {
            Outcome::Created {
                result: Ok(task), ..
            } => Some(task.id.clone()),
            _ => None,
        };
        if let Some(notice) = self.controller.apply(outcome) {
            return Err(notice.message);
        }
        id.ok_or_else(|| "server returned no task".to_string())
    }

    fn task(&self, id: &str) -> Result<&Task, String> {
        self.controller
            .find(id)
            .ok_or_else(|| format!("Task not found: {}", id))
    }
}

fn print_task(session: &Session<impl TaskApi>, task: &Task, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let names = &session.controller.list_names;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task, names))?);
    } else {
        for line in format_task_entry(task, names) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

pub fn cmd_list(
    session: &mut Session<impl TaskApi>,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = TaskFilter::parse(&args.filter)?;
    session.fetch()?;

    let controller = &mut session.controller;
    controller.set_tab(Tab::from(args.tab.as_str()));
    controller.set_filter(filter);
    controller.set_search(args.search);

    let today = Local::now().date_naive();
    let visible = controller.visible(today);
    let pct = progress(&visible);

    if json {
        let out = TaskListJson {
            tab: controller.view.tab.to_string(),
            filter: controller.view.filter.label().to_string(),
            search: controller.view.search.clone(),
            progress: pct,
            tasks: visible
                .iter()
                .map(|t| task_to_json(t, &controller.list_names))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for task in &visible {
            for line in format_task_entry(task, &controller.list_names) {
                println!("{}", line);
            }
        }
        if !visible.is_empty() {
            println!();
        }
        println!("{}", format_progress(&visible, pct));
    }
    Ok(())
}

pub fn cmd_lists(session: &mut Session<impl TaskApi>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let controller = &session.controller;

    let lists: Vec<ListInfoJson> = controller
        .list_names
        .iter()
        .filter_map(|name| {
            controller
                .tasks
                .iter()
                .find(|t| t.category == *name && t.task == *name)
                .map(|t| ListInfoJson {
                    id: t.id.clone(),
                    name: name.clone(),
                    items: t.items.clone(),
                })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
    } else if lists.is_empty() {
        println!("no lists");
    } else {
        for list in &lists {
            println!("{}  {} ({} items)", list.id, list.name, list.items.len());
        }
    }
    Ok(())
}

pub fn cmd_stats(session: &mut Session<impl TaskApi>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let today = Local::now().date_naive();
    let controller = &session.controller;
    let counts = FilterCounts::compute(&controller.tasks, today);
    let all: Vec<&Task> = controller.tasks.iter().collect();
    let pct = progress(&all);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats_to_json(&counts, pct))?);
    } else {
        for line in format_stats(&counts, pct) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

pub fn cmd_add(
    session: &mut Session<impl TaskApi>,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let controller = &mut session.controller;
    controller.form.draft = TaskDraft {
        text: args.text,
        date: args.date.unwrap_or_default(),
        time: args.time.unwrap_or_default(),
        important: args.important,
        category: args.category,
    };
    controller.set_tab(if args.today { Tab::Today } else { Tab::All });

    let request = controller.request_create(Local::now().naive_local())?;
    let id = session.run_create(request)?;
    print_task(session, session.task(&id)?, json)
}

pub fn cmd_done(session: &mut Session<impl TaskApi>, args: IdArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let request = session.controller.request_toggle_completed(&args.id)?;
    session.run(request)?;
    print_task(session, session.task(&args.id)?, json)
}

pub fn cmd_star(session: &mut Session<impl TaskApi>, args: IdArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let request = session.controller.request_toggle_important(&args.id)?;
    session.run(request)?;
    print_task(session, session.task(&args.id)?, json)
}

pub fn cmd_rm(session: &mut Session<impl TaskApi>, args: IdArgs) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    let request = session.controller.request_delete(&args.id)?;
    session.run(request)?;
    println!("deleted {}", args.id);
    Ok(())
}

pub fn cmd_new_list(
    session: &mut Session<impl TaskApi>,
    args: NewListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    session.controller.form.new_list = args.name;
    let request = session.controller.request_create_list()?;
    let id = session.run_create(request)?;
    print_task(session, session.task(&id)?, json)
}

pub fn cmd_item(session: &mut Session<impl TaskApi>, args: ItemArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.fetch()?;
    session.controller.form.new_item = args.text;
    let request = session.controller.request_append_item(&args.list_id)?;
    session.run(request)?;
    print_task(session, session.task(&args.list_id)?, json)
}
