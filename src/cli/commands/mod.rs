//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod init;
pub mod query;
pub mod status;
pub mod submit;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Submit(args) => submit::run(ctx, args),
        Commands::Query(args) => query::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
    }
}
