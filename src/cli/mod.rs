//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod formatters;
pub mod output;

/// Skill Vault - skills, progress, badges and team leaderboards on a local ledger
#[derive(Parser, Debug)]
#[command(name = "sv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, plain)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Force plain output (no colors)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/skill-vault/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State snapshot path (default: .skill-vault/state.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format from flags.
    ///
    /// `--plain` wins, then `--output-format`, then `--machine`. `None` means
    /// no flag was given and the configured format applies.
    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        if self.plain {
            return Some(OutputFormat::Plain);
        }
        if let Some(fmt) = self.output_format {
            return Some(fmt);
        }
        if self.machine {
            return Some(OutputFormat::Json);
        }
        None
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a fresh vault and write its genesis snapshot
    Init(commands::init::InitArgs),

    /// Submit a block of transactions
    Submit(commands::submit::SubmitArgs),

    /// Run a read-only query against the current state
    Query(commands::query::QueryArgs),

    /// Show vault summary and state root
    Status(commands::status::StatusArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plain_beats_explicit_format() {
        let cli = Cli::parse_from(["sv", "--plain", "-O", "json", "status"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Plain));
    }

    #[test]
    fn machine_flag_means_json() {
        let cli = Cli::parse_from(["sv", "-m", "status"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Json));
        let cli = Cli::parse_from(["sv", "status"]);
        assert_eq!(cli.output_format(), None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sv", "query", "skill", "1", "--state", "/tmp/s.json", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/s.json")));
    }
}
