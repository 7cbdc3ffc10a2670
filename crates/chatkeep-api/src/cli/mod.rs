//! CLI command definitions for the `chatkeep` binary.
//!
//! `chatkeep serve` starts the REST API; the other commands inspect the
//! configuration and the session store directly.

pub mod config;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat backend that forwards messages to an LLM and keeps transcripts on disk.
#[derive(Parser)]
#[command(name = "chatkeep", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Directory holding one `<session>.json` file per session.
    #[arg(
        long,
        global = true,
        env = "CHATKEEP_STORE_DIR",
        default_value = "memory_store"
    )]
    pub store_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Static frontend directory, served when it exists.
        #[arg(long, env = "CHATKEEP_WEB_DIR", default_value = "frontend")]
        web_dir: PathBuf,
    },

    /// Show the active configuration (the API key is never printed).
    Config,

    /// Inspect or remove stored sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List stored session keys.
    #[command(alias = "ls")]
    List,

    /// Print a stored transcript.
    Show {
        /// Session ID (sanitized the same way the API does).
        session_id: String,
    },

    /// Delete a stored transcript.
    #[command(alias = "rm")]
    Delete {
        session_id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },
}
