use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::api::{Gateway, HttpTaskApi, Outcome, Request};
use crate::io::logging::{LogTarget, init_tracing};
use crate::model::config::AppConfig;
use crate::model::task::{Task, is_default_category, is_list};
use crate::model::view::Tab;
use crate::ops::controller::{Controller, Notice};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search; the view filters live
    Search,
    /// Filling in a form
    Form(FormKind),
}

/// Which form is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Task,
    List,
    Item,
}

/// Focused field of the task form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Date,
    Time,
    Important,
}

impl FormField {
    pub fn next(self) -> FormField {
        match self {
            FormField::Text => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Important,
            FormField::Important => FormField::Text,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Text => FormField::Important,
            FormField::Date => FormField::Text,
            FormField::Time => FormField::Date,
            FormField::Important => FormField::Time,
        }
    }
}

/// Main application state
pub struct App {
    pub controller: Controller,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the visible tasks
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Help overlay visible
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Blocking error popup; any key dismisses it
    pub notice: Option<Notice>,
    /// Focused field while the task form is open
    pub form_field: FormField,
    /// List the item form appends to
    pub item_target: Option<String>,
    /// Requests produced by input, waiting to be handed to the gateway
    pub outbox: Vec<Request>,
    /// Requests sent whose outcome has not arrived
    pub in_flight: usize,
    /// Date the "today" tab is computed against
    pub today: NaiveDate,
}

impl App {
    pub fn new(controller: Controller, theme: Theme) -> Self {
        App {
            controller,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            show_help: false,
            show_key_hints: true,
            notice: None,
            form_field: FormField::Text,
            item_target: None,
            outbox: Vec::new(),
            in_flight: 0,
            today: Local::now().date_naive(),
        }
    }

    /// Tasks under the current view
    pub fn visible(&self) -> Vec<&Task> {
        self.controller.visible(self.today)
    }

    /// Task under the cursor
    pub fn selected(&self) -> Option<&Task> {
        self.visible().get(self.cursor).copied()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected().map(|t| t.id.clone())
    }

    /// Index of the active tab within the tab list
    pub fn tab_index(&self) -> usize {
        let tabs = self.controller.tabs();
        tabs.iter()
            .position(|t| *t == self.controller.view.tab)
            .unwrap_or(0)
    }

    /// Switch tab by offset, wrapping around
    pub fn move_tab(&mut self, delta: isize) {
        let tabs = self.controller.tabs();
        let len = tabs.len() as isize;
        let idx = (self.tab_index() as isize + delta).rem_euclid(len) as usize;
        self.controller.set_tab(tabs[idx].clone());
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Keep the cursor on a visible row
    pub fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Case-insensitive regex for highlighting the search text in titles
    pub fn search_re(&self) -> Option<Regex> {
        let search = &self.controller.view.search;
        if search.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(search))).ok()
    }

    /// Queue a request for the gateway
    pub fn send(&mut self, request: Request) {
        self.outbox.push(request);
    }

    /// Show a blocking error popup
    pub fn notify(&mut self, notice: Notice) {
        tracing::info!(message = %notice.message, "notice");
        self.notice = Some(notice);
    }

    /// Merge a gateway outcome, then fix up view state around it
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        let was_load = matches!(outcome, Outcome::Loaded(Ok(_)));
        if let Some(notice) = self.controller.apply(outcome) {
            self.notify(notice);
        }
        if was_load {
            self.drop_stale_tab();
        }
        self.clamp_cursor();
    }

    /// A restored tab naming a list that no longer exists falls back to All
    fn drop_stale_tab(&mut self) {
        if let Tab::Category(name) = &self.controller.view.tab
            && !is_default_category(name)
            && !is_list(name, &self.controller.list_names)
        {
            tracing::debug!(tab = %name, "restored tab no longer exists");
            self.controller.set_tab(Tab::All);
        }
    }
}

/// Restore UI state from state.json
pub fn restore_ui_state(app: &mut App, dir: &Path) {
    use crate::io::state::read_ui_state;

    let ui_state = match read_ui_state(dir) {
        Some(s) => s,
        None => return,
    };
    app.controller.view.tab = ui_state.tab;
    app.controller.view.filter = ui_state.filter;
    app.controller.view.search = ui_state.search;
}

/// Save UI state to state.json
pub fn save_ui_state(app: &App, dir: &Path) {
    use crate::io::state::{UiState, write_ui_state};

    let view = &app.controller.view;
    let ui_state = UiState {
        tab: view.tab.clone(),
        filter: view.filter,
        search: view.search.clone(),
    };
    if let Err(e) = write_ui_state(dir, &ui_state) {
        tracing::debug!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(config: &AppConfig, state_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&config.logging, LogTarget::File)?;

    let api = HttpTaskApi::new(&config.server);
    tracing::info!(base_url = api.base_url(), "starting TUI");
    let mut gateway = Gateway::spawn(api)?;

    let mut app = App::new(Controller::new(), Theme::from_config(&config.ui));
    app.show_key_hints = config.ui.show_key_hints;

    // Restore saved UI state, then load
    restore_ui_state(&mut app, &state_dir);
    let load = app.controller.request_load();
    app.send(load);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut gateway, &state_dir);

    // Save UI state before exit
    save_ui_state(&app, &state_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: &mut Gateway,
    state_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        for request in app.outbox.drain(..) {
            gateway.submit(request);
        }
        for outcome in gateway.drain() {
            app.apply_outcome(outcome);
        }
        app.in_flight = gateway.in_flight();
        app.today = Local::now().date_naive();

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app, state_dir);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
