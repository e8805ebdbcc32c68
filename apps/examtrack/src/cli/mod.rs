//! # examtrack CLI Module
//!
//! This module implements the CLI interface for examtrack.
//!
//! ## Available Commands
//!
//! - `list` - List applications (active or archived)
//! - `show` - Show one application with its stage progression
//! - `create` - Create a new application from a category template
//! - `update` - Edit one stage (status/date/score/notes)
//! - `set-date` - Set the first exam date
//! - `add-stage` / `remove-stage` / `rename-stage` - Authoring edits
//! - `apply-template` - Replace the stage list from a template
//! - `archive` - Move a selected application into history
//! - `delete` - Delete an application
//! - `templates` - List the known category templates
//! - `export` / `import` - Roster snapshots

mod commands;

use clap::{Parser, Subcommand};
use examtrack_core::TrackerError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// examtrack - exam application tracker
///
/// Tracks multi-stage exam applications from Prelims to Final Selection,
/// enforcing progression order and per-stage status rules.
#[derive(Parser, Debug)]
#[command(name = "examtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the roster store file
    #[arg(short = 'S', long, global = true, default_value = "examtrack.json")]
    pub store: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List applications
    List {
        /// List the archived history instead of active applications
        #[arg(short, long)]
        archived: bool,
    },

    /// Show one application with its stage progression
    Show {
        /// Application id
        #[arg(short, long)]
        id: u64,
    },

    /// Create a new application
    Create {
        /// Application name ("IBPS PO 2026")
        #[arg(short, long)]
        name: String,

        /// Category key (see `templates`); unknown keys get the generic
        /// template
        #[arg(short, long)]
        category: String,

        /// Exam fee in whole currency units
        #[arg(long, default_value = "0")]
        fee: u32,

        /// Payment status (paid, pending, free)
        #[arg(long, default_value = "pending")]
        payment: String,

        /// Exam center or city
        #[arg(long, default_value = "")]
        place: String,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,

        /// First exam date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Custom stage names replacing the category template
        /// (comma-separated)
        #[arg(long, value_delimiter = ',')]
        stages: Option<Vec<String>>,
    },

    /// Edit one stage of an application
    Update {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Stage number (1-based, as shown by `show`)
        #[arg(short, long)]
        stage: usize,

        /// New status (regular stages: pending, cleared, not-cleared,
        /// n/a; final stage: pending, selected, not-selected)
        #[arg(long)]
        status: Option<String>,

        /// Stage date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text score ("78/100")
        #[arg(long)]
        score: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Set the first exam date (writes stage 1's date)
    SetDate {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Insert a stage before the final stage
    AddStage {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Stage name (defaults to "Stage N")
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove a stage (never the final stage)
    RemoveStage {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Stage number (1-based)
        #[arg(short, long)]
        stage: usize,
    },

    /// Rename a stage
    RenameStage {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Stage number (1-based)
        #[arg(short, long)]
        stage: usize,

        /// New stage name
        #[arg(short, long)]
        name: String,
    },

    /// Replace the stage list from a category template
    ApplyTemplate {
        /// Application id
        #[arg(short, long)]
        id: u64,

        /// Category key
        #[arg(short, long)]
        category: String,
    },

    /// Move a selected application into history
    Archive {
        /// Application id
        #[arg(short, long)]
        id: u64,
    },

    /// Delete an application (active or archived)
    Delete {
        /// Application id
        #[arg(short, long)]
        id: u64,
    },

    /// List the known category templates
    Templates {
        /// Show a single category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Export the roster snapshot
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (canonical, json)
        #[arg(short = 't', long, default_value = "canonical")]
        format: String,
    },

    /// Import a roster snapshot, replacing the store
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrackerError> {
    let store = cli.store.as_path();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::List { archived }) => cmd_list(store, json_mode, archived),
        Some(Commands::Show { id }) => cmd_show(store, json_mode, id),
        Some(Commands::Create {
            name,
            category,
            fee,
            payment,
            place,
            notes,
            date,
            stages,
        }) => cmd_create(
            store, json_mode, name, category, fee, &payment, place, notes, date, stages,
        ),
        Some(Commands::Update {
            id,
            stage,
            status,
            date,
            score,
            notes,
        }) => cmd_update(store, json_mode, id, stage, status, date, score, notes),
        Some(Commands::SetDate { id, date }) => cmd_set_date(store, json_mode, id, &date),
        Some(Commands::AddStage { id, name }) => cmd_add_stage(store, json_mode, id, name),
        Some(Commands::RemoveStage { id, stage }) => cmd_remove_stage(store, json_mode, id, stage),
        Some(Commands::RenameStage { id, stage, name }) => {
            cmd_rename_stage(store, json_mode, id, stage, name)
        }
        Some(Commands::ApplyTemplate { id, category }) => {
            cmd_apply_template(store, json_mode, id, &category)
        }
        Some(Commands::Archive { id }) => cmd_archive(store, json_mode, id),
        Some(Commands::Delete { id }) => cmd_delete(store, json_mode, id),
        Some(Commands::Templates { category }) => cmd_templates(json_mode, category.as_deref()),
        Some(Commands::Export { output, format }) => cmd_export(store, &output, &format),
        Some(Commands::Import { input }) => cmd_import(store, &input),
        None => {
            // No subcommand - list active applications by default
            cmd_list(store, json_mode, false)
        }
    }
}
