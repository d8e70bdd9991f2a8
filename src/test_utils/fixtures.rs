use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use crate::core::{BadgeId, Principal, SkillId, TeamId};
use crate::ledger::Ledger;
use crate::storage::StateStore;
use crate::vault::{SkillVault, VaultPolicy};

/// Name of the deploying account in every fixture.
pub const DEPLOYER: &str = "deployer";

/// `wallet_<n>`, the conventional non-owner test accounts.
#[must_use]
pub fn wallet(n: usize) -> Principal {
    Principal::new(format!("wallet_{n}"))
}

/// A deployed vault with shorthand helpers for the common setup steps.
///
/// Helpers panic on rejection; use the vault directly to test failures.
pub struct VaultFixture {
    pub vault: SkillVault,
    pub deployer: Principal,
}

impl VaultFixture {
    pub fn new() -> Self {
        Self::with_policy(VaultPolicy::default())
    }

    pub fn with_policy(policy: VaultPolicy) -> Self {
        let deployer = Principal::new(DEPLOYER);
        Self {
            vault: SkillVault::deploy(deployer.clone(), policy),
            deployer,
        }
    }

    pub fn skill(&mut self, name: &str) -> SkillId {
        self.vault
            .register_skill(&self.deployer, name, &format!("{name} skill"))
            .expect("register skill as deployer")
    }

    pub fn badge(&mut self, skill_id: SkillId, required_progress: u64, name: &str) -> BadgeId {
        self.vault
            .create_badge(&self.deployer, skill_id, required_progress, name)
            .expect("create badge as deployer")
    }

    pub fn team(&mut self, creator: &Principal, name: &str) -> TeamId {
        self.vault
            .create_team(creator, name)
            .expect("create team")
    }

    pub fn join(&mut self, user: &Principal, team_id: TeamId) {
        self.vault.join_team(user, team_id).expect("join team");
    }

    pub fn progress(&mut self, user: &Principal, skill_id: SkillId, value: u64) {
        self.vault
            .update_skill_progress(user, skill_id, value)
            .expect("update progress");
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::new(self.vault)
    }
}

impl Default for VaultFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Isolated data directory with a state store inside it.
pub struct StateFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub store: StateStore,
}

impl StateFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join(".skill-vault");
        let store = StateStore::new(root.join("state.json"), Duration::from_millis(200));
        println!("[FIXTURE] State root directory: {}", root.display());
        Self {
            temp_dir,
            root,
            store,
        }
    }

    /// Write `ledger` as the current snapshot.
    pub fn seed(&self, ledger: &Ledger) {
        self.store.save(ledger).expect("seed state snapshot");
    }

    /// Write a config file under the data directory.
    pub fn write_config(&self, content: &str) -> PathBuf {
        std::fs::create_dir_all(&self.root).expect("Failed to create root dir");
        let path = self.root.join("config.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }
}

impl Default for StateFixture {
    fn default() -> Self {
        Self::new()
    }
}
