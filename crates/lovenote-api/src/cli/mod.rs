//! CLI command definitions and dispatch for the `lovenote` binary.
//!
//! Uses clap derive macros for argument parsing. Commands read like the
//! actions a visitor takes (`lovenote confess`, `lovenote show <code>`);
//! moderation lives under `lovenote admin`.

pub mod admin;
pub mod confess;
pub mod confession;
pub mod countdown;
pub mod draft;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Send and read anonymous Valentine's confessions.
#[derive(Parser)]
#[command(name = "lovenote", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "LOVENOTE_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a confession with the step-by-step wizard.
    Confess {
        /// Keep the message exactly as written (skip enhancement).
        #[arg(long)]
        no_enhance: bool,
    },

    /// Open a confession by its 8-character code.
    Show {
        /// Retrieval code, case-insensitive.
        code: String,
    },

    /// Browse the newest confessions.
    Feed {
        /// Maximum number of confessions.
        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Number of confessions to skip.
        #[arg(long)]
        offset: Option<i64>,
    },

    /// Find confessions by college, department, year or name.
    Search {
        #[arg(long)]
        college: Option<String>,

        #[arg(long)]
        department: Option<String>,

        /// Year or batch, e.g. "2nd Year".
        #[arg(long)]
        year: Option<String>,

        /// Matches the sender name or the recipient hint.
        #[arg(long)]
        name: Option<String>,
    },

    /// React to a confession (hearts, smiles, tears).
    React {
        code: String,

        /// Reaction type; `love`, `sweet` and `touched` also work.
        reaction: String,
    },

    /// Moderation and statistics.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Inspect or discard the saved wizard draft.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Time left until the confessions are delivered.
    Countdown,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 3000, env = "LOVENOTE_PORT")]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "LOVENOTE_HOST")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List confessions, optionally of one status.
    #[command(alias = "ls")]
    List {
        /// pending, approved or rejected.
        #[arg(long)]
        status: Option<String>,
    },

    /// Publish a confession.
    Approve {
        /// Confession id (UUID).
        id: String,
    },

    /// Hide a confession from the public pages.
    Reject {
        /// Confession id (UUID).
        id: String,
    },

    /// Move a confession to any status.
    Moderate {
        id: String,
        status: String,
    },

    /// Totals for the dashboard.
    Stats,

    /// Issue an additional API key for the admin REST routes.
    IssueKey {
        /// Label stored with the key.
        #[arg(long, default_value = "cli")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Show the saved wizard draft.
    Show,

    /// Discard the saved wizard draft.
    Clear,
}

/// Print a JSON value the way every `--json` command does.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
