//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Filter, TaskPatch};

/// Taskboard - terminal client for a remote task list
#[derive(Parser)]
#[command(
    name = "tb",
    about = "Terminal client for a remote task list service",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks
    List {
        /// Show all, active or completed tasks
        #[arg(short, long, default_value = "all")]
        filter: Filter,

        /// Only tasks whose title or description contains TEXT
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,
    },

    /// Show one task
    Show {
        /// Task ID
        id: String,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit a task's title or description
    Edit(EditArgs),

    /// Flip a task between active and completed
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task ID
        id: String,
    },

    /// Show or change the light/dark preference
    Theme {
        #[arg(long, conflicts_with_all = ["light", "toggle"])]
        dark: bool,

        #[arg(long, conflicts_with = "toggle")]
        light: bool,

        #[arg(long)]
        toggle: bool,
    },
}

/// Arguments of `tb edit`
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
}

impl EditArgs {
    /// Patch carrying only the fields that were given
    pub fn to_patch(&self) -> TaskPatch {
        debug!(?self, "EditArgs::to_patch: called");
        let description = if self.clear_description {
            Some(None)
        } else {
            self.description
                .as_ref()
                .map(|d| Some(d.trim().to_string()).filter(|d| !d.is_empty()))
        };
        TaskPatch {
            title: self.title.as_ref().map(|t| t.trim().to_string()),
            description,
            completed: None,
        }
    }
}

/// Requested change to the display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    Show,
    Dark,
    Light,
    Toggle,
}

impl ThemeChange {
    pub fn from_flags(dark: bool, light: bool, toggle: bool) -> Self {
        match (dark, light, toggle) {
            (true, _, _) => Self::Dark,
            (_, true, _) => Self::Light,
            (_, _, true) => Self::Toggle,
            _ => Self::Show,
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskboard")
        .join("logs")
        .join("taskboard.log");
    debug!(?path, "get_log_path: returning path");
    path
}
