//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, delete::DeleteArgs, history::HistoryArgs, item_form::AddArgs,
    item_form::EditArgs, list::ListArgs, report::ReportArgs, show::ShowArgs,
};
use crate::core::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(author, version, propagate_version = true)]
#[command(about = "Browse, edit and audit inventory items held by a remote API")]
#[command(
    long_about = "Stockpile keeps a local view of a remote inventory in sync with the server.\n\n\
                  Items can be listed and searched, created and edited with validation, \
                  deleted, traced through their audit history and printed as a report."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Base URL of the items API
    #[arg(long, global = true, env = "STOCKPILE_API_URL")]
    pub api_url: Option<String>,

    /// Config file to read instead of the per-user default
    #[arg(long, global = true, env = "STOCKPILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalOpts {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            config_path: self.config.clone(),
            no_color: self.no_color,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table on a terminal
    #[default]
    Auto,
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values with a header row
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List inventory items
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a single item
    Show(ShowArgs),

    /// Create a new item
    #[command(visible_alias = "new")]
    Add(AddArgs),

    /// Edit an existing item
    Edit(EditArgs),

    /// Delete an item
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Show the audit trail for an item
    #[command(visible_alias = "log")]
    History(HistoryArgs),

    /// Render a printable HTML inventory report
    Report(ReportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
