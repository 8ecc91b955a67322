//! Command-line argument structures and enums

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Manage customer task boards and inspect edit conflicts", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the board files (overrides `local_root` from config)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all customer boards
    #[command(alias = "ls")]
    List,

    /// Show a customer's board
    Show {
        /// Customer id (case-insensitive)
        customer: String,

        /// Password hash to check; omit to open without a credential check
        #[arg(long)]
        password_hash: Option<String>,
    },

    /// Create an empty board for a new customer
    Create {
        /// Customer id (case-insensitive)
        customer: String,

        /// Hex SHA-256 of the board password
        #[arg(long)]
        password_hash: String,

        /// Name shown on the board (defaults to the customer id)
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Delete a customer's board
    Delete {
        /// Customer id (case-insensitive)
        customer: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Compare three board files and report the conflict verdict
    Diff {
        /// Board the edit started from
        original: PathBuf,

        /// The edited board
        local: PathBuf,

        /// The newest stored board
        remote: PathBuf,

        /// Version the edit started from; enables the version fast path
        #[arg(long)]
        original_version: Option<u64>,

        /// Report a conflict even if nothing changed remotely
        #[arg(long)]
        force: bool,
    },

    /// Save an edited board, reporting a conflict if someone else saved first
    Save {
        /// Customer id (case-insensitive)
        customer: String,

        /// The edited board
        local: PathBuf,

        /// Board file the edit started from
        #[arg(long)]
        baseline: PathBuf,

        /// Revision the baseline was read at (defaults to the stored board's
        /// revision when the baseline still matches its version)
        #[arg(long)]
        revision: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// How to settle a conflict: `local` or `remote`
        #[arg(long)]
        resolve: Option<String>,
    },
}
