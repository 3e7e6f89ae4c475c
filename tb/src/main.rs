//! Taskboard - terminal client for a remote task list
//!
//! CLI entry point: one command per invocation against the task service.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use taskboard::api::{HttpTaskApi, ListQuery};
use taskboard::cli::{Cli, Command, EditArgs, ThemeChange};
use taskboard::config::Config;
use taskboard::domain::{Filter, NewTask, TaskId};
use taskboard::notify::{Level, Notification, NotificationBus};
use taskboard::prefs::{PreferenceStore, system_prefers_dark};
use taskboard::render::{self, Palette};
use taskboard::store::{StoreResult, TaskStore};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("taskboard.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!("Taskboard loaded config: base-url={}", config.api.base_url);

    let prefs = PreferenceStore::open(config.display.resolved_preferences_path());

    let api = HttpTaskApi::from_config(&config.api).context("Failed to create task service client")?;
    let bus = NotificationBus::with_default_capacity();
    let mut printer = Printer::new(&bus);
    let store = TaskStore::new(Arc::new(api), bus);
    let palette = Palette::for_theme(prefs.is_dark().unwrap_or_else(|e| {
        warn!(error = %e, "main: could not read preferences, using terminal default");
        system_prefers_dark()
    }));

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    let ok = match cli.command {
        Command::List { filter, search } => {
            debug!(%filter, ?search, "main: matched List command");
            cmd_list(&store, filter, search, &palette).await
        }
        Command::Show { id } => {
            debug!(%id, "main: matched Show command");
            cmd_show(&store, &parse_id(&id), &palette).await
        }
        Command::Add { title, description } => {
            debug!(%title, "main: matched Add command");
            cmd_add(&store, &mut printer, title, description).await
        }
        Command::Edit(args) => {
            debug!(?args, "main: matched Edit command");
            cmd_edit(&store, &mut printer, &args).await?
        }
        Command::Toggle { id } => {
            debug!(%id, "main: matched Toggle command");
            cmd_toggle(&store, &parse_id(&id)).await
        }
        Command::Rm { id } => {
            debug!(%id, "main: matched Rm command");
            store.delete(&parse_id(&id)).await.is_ok()
        }
        Command::Theme { dark, light, toggle } => {
            debug!(dark, light, toggle, "main: matched Theme command");
            cmd_theme(&prefs, ThemeChange::from_flags(dark, light, toggle))?;
            true
        }
    };

    store.close();
    printer.flush();

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Prints notifications in the order they were emitted
struct Printer {
    rx: broadcast::Receiver<Notification>,
}

impl Printer {
    fn new(bus: &NotificationBus) -> Self {
        Self { rx: bus.subscribe() }
    }

    fn flush(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(notification) => print_notification(&notification),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Printer::flush: notifications dropped");
                }
                Err(_) => break,
            }
        }
    }
}

fn print_notification(notification: &Notification) {
    let line = render::notification_line(notification);
    match notification.level {
        Level::Success => println!("{}", line),
        Level::Error => eprintln!("{}", line),
    }
}

fn parse_id(raw: &str) -> TaskId {
    let Ok(id) = raw.parse::<TaskId>();
    id
}

fn succeeded<T>(result: &StoreResult<T>) -> bool {
    if let Err(e) = result {
        debug!(error = %e, "succeeded: operation failed");
    }
    result.is_ok()
}

/// List tasks under a filter, with counts for every filter
async fn cmd_list(store: &TaskStore, filter: Filter, search: Option<String>, palette: &Palette) -> bool {
    debug!(%filter, ?search, "cmd_list: called");
    store.set_filter(filter);

    let mut query = ListQuery::default().with_ordering("-created_at");
    if let Some(search) = search {
        query = query.with_search(search);
    }
    let result = store.fetch_with(&query).await;
    if !succeeded(&result) {
        return false;
    }

    let state = store.snapshot();
    let visible = state.visible();
    if visible.is_empty() {
        println!("{}", "No tasks".dimmed());
    }
    for task in visible {
        println!("{}", render::task_line(task, palette));
    }
    println!();
    println!("{}", render::counts_line(&state.counts(), state.filter, palette));
    true
}

async fn cmd_show(store: &TaskStore, id: &TaskId, palette: &Palette) -> bool {
    debug!(%id, "cmd_show: called");
    match store.fetch_one(id).await {
        Ok(task) => {
            print!("{}", render::task_detail(&task, palette));
            true
        }
        Err(_) => false,
    }
}

async fn cmd_add(store: &TaskStore, printer: &mut Printer, title: String, description: Option<String>) -> bool {
    debug!(%title, "cmd_add: called");
    let draft = NewTask::new(title, description);
    if let Err(e) = draft.validate() {
        debug!(error = %e, "cmd_add: draft rejected locally");
        print_notification(&Notification::error(e.to_string()));
        return false;
    }

    let result = store.create(draft).await;
    printer.flush();
    if let Ok(task) = &result {
        println!("Created task {}", task.id.to_string().cyan());
    }
    succeeded(&result)
}

async fn cmd_edit(store: &TaskStore, printer: &mut Printer, args: &EditArgs) -> Result<bool> {
    debug!(?args, "cmd_edit: called");
    let patch = args.to_patch();
    if patch.is_empty() {
        return Err(eyre::eyre!(
            "Nothing to change: pass --title, --description or --clear-description"
        ));
    }
    if let Err(e) = patch.validate() {
        debug!(error = %e, "cmd_edit: patch rejected locally");
        print_notification(&Notification::error(e.to_string()));
        return Ok(false);
    }

    let result = store.update(&parse_id(&args.id), patch).await;
    printer.flush();
    Ok(succeeded(&result))
}

/// Toggle against the service's current value rather than a guess
async fn cmd_toggle(store: &TaskStore, id: &TaskId) -> bool {
    debug!(%id, "cmd_toggle: called");
    let current = match store.fetch_one(id).await {
        Ok(task) => task.completed,
        Err(_) => return false,
    };
    succeeded(&store.toggle_complete(id, current).await)
}

fn cmd_theme(prefs: &PreferenceStore, change: ThemeChange) -> Result<()> {
    debug!(?change, path = %prefs.path().display(), "cmd_theme: called");
    let dark = match change {
        ThemeChange::Show => prefs.is_dark()?,
        ThemeChange::Dark => {
            prefs.set_dark(true)?;
            true
        }
        ThemeChange::Light => {
            prefs.set_dark(false)?;
            false
        }
        ThemeChange::Toggle => prefs.toggle()?,
    };
    println!("Theme: {}", if dark { "dark".bright_cyan() } else { "light".blue() });
    Ok(())
}
