//! Shared per-invocation context for CLI commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::storage::StateStore;

/// Default data directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = ".skill-vault";

pub struct AppContext {
    pub sv_root: PathBuf,
    pub config: Config,
    pub store: StateStore,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sv_root = resolve_root();
        let config = Config::load(cli.config.as_deref(), &sv_root)?;

        let output_format = match cli.output_format() {
            Some(format) => format,
            None => config.output.format.parse()?,
        };

        let state_path = cli
            .state
            .clone()
            .unwrap_or_else(|| config.state_path(&sv_root));
        let store = StateStore::new(
            state_path,
            Duration::from_millis(config.state.lock_timeout_ms),
        );

        Ok(Self {
            sv_root,
            config,
            store,
            output_format,
            quiet: cli.quiet,
        })
    }

    #[must_use]
    pub const fn robot_mode(&self) -> bool {
        self.output_format.is_machine_readable()
    }

    #[must_use]
    pub fn state_path(&self) -> &Path {
        self.store.path()
    }
}

fn resolve_root() -> PathBuf {
    std::env::var_os("SV_ROOT")
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
}
