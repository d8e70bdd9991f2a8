//! sv - Skill Vault CLI
//!
//! Register skills, record progress, award badges and track team totals.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skill_vault::Result;
use skill_vault::app::AppContext;
use skill_vault::cli::output::emit_json_error;
use skill_vault::cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let requested = cli.output_format();
    init_tracing(&cli, requested);

    let mut json_errors = requested.is_some_and(|format| format.is_machine_readable());
    match run(&cli, &mut json_errors) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json_errors {
                // JSON mode: structured error envelope on stdout
                emit_json_error(&e);
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, json_errors: &mut bool) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    *json_errors = ctx.robot_mode();
    if ctx.output_format == OutputFormat::Plain {
        colored::control::set_override(false);
    }
    skill_vault::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli, requested: Option<OutputFormat>) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skill_vault=info",
        1 => "info,skill_vault=debug",
        2 => "debug,skill_vault=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if requested.is_some_and(|format| format.is_machine_readable()) {
        // JSON logging for machine output
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_ansi(requested != Some(OutputFormat::Plain))
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
