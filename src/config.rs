use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{MembershipPolicy, Principal};
use crate::error::{Result, VaultError};
use crate::vault::{DEFAULT_MAX_DESCRIPTION_LEN, DEFAULT_MAX_NAME_LEN, VaultPolicy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, sv_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SV_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => return Err(VaultError::ConfigNotFound(path)),
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(sv_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skill-vault/config.toml"))
    }

    fn load_project(sv_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&sv_root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| VaultError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| VaultError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.vault {
            self.vault.merge(patch);
        }
        if let Some(patch) = patch.state {
            self.state.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("SV_OWNER") {
            self.vault.owner = Some(value);
        }
        if let Some(value) = env_string("SV_MEMBERSHIP") {
            self.vault.membership = value.parse()?;
        }
        if let Some(value) = env_usize("SV_MAX_NAME_LEN")? {
            self.vault.max_name_len = value;
        }
        if let Some(value) = env_usize("SV_MAX_DESCRIPTION_LEN")? {
            self.vault.max_description_len = value;
        }

        if let Some(value) = env_string("SV_STATE_PATH") {
            self.state.path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_u64("SV_LOCK_TIMEOUT_MS")? {
            self.state.lock_timeout_ms = value;
        }

        if let Some(value) = env_string("SV_OUTPUT_FORMAT") {
            self.output.format = value;
        }

        Ok(())
    }

    /// Deployment policy described by the `[vault]` section.
    pub fn vault_policy(&self) -> Result<VaultPolicy> {
        if self.vault.max_name_len == 0 {
            return Err(VaultError::Config("vault.max_name_len must be positive".to_string()));
        }
        Ok(VaultPolicy {
            membership: self.vault.membership,
            max_name_len: self.vault.max_name_len,
            max_description_len: self.vault.max_description_len,
        })
    }

    /// Configured owner, failing with `MissingConfig` when unset.
    pub fn owner(&self) -> Result<Principal> {
        self.vault
            .owner
            .as_deref()
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
            .map(Principal::new)
            .ok_or_else(|| VaultError::MissingConfig("vault.owner".to_string()))
    }

    /// Snapshot path, defaulting to `<sv_root>/state.json`.
    #[must_use]
    pub fn state_path(&self, sv_root: &Path) -> PathBuf {
        self.state
            .path
            .clone()
            .unwrap_or_else(|| sv_root.join("state.json"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub membership: MembershipPolicy,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

const fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

const fn default_max_description_len() -> usize {
    DEFAULT_MAX_DESCRIPTION_LEN
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            owner: None,
            membership: MembershipPolicy::Single,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
        }
    }
}

impl VaultConfig {
    fn merge(&mut self, patch: VaultPatch) {
        if let Some(value) = patch.owner {
            self.owner = Some(value);
        }
        if let Some(value) = patch.membership {
            self.membership = value;
        }
        if let Some(value) = patch.max_name_len {
            self.max_name_len = value;
        }
        if let Some(value) = patch.max_description_len {
            self.max_description_len = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub lock_timeout_ms: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: None,
            lock_timeout_ms: 5_000,
        }
    }
}

impl StateConfig {
    fn merge(&mut self, patch: StatePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
        if let Some(value) = patch.lock_timeout_ms {
            self.lock_timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    vault: Option<VaultPatch>,
    state: Option<StatePatch>,
    output: Option<OutputPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct VaultPatch {
    owner: Option<String>,
    membership: Option<MembershipPolicy>,
    max_name_len: Option<usize>,
    max_description_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct StatePatch {
    path: Option<PathBuf>,
    lock_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputPatch {
    format: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|err| {
            VaultError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u64>().map(Some).map_err(|err| {
            VaultError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
