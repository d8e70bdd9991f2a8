//! The vault: explicit store object holding every table.
//!
//! Each public mutating method is one state transition. It validates
//! everything it needs first and only then writes, so a rejected request
//! leaves the vault exactly as it was (id counters included).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::{
    AccessGuard, Badge, BadgeCatalog, BadgeId, MembershipPolicy, Principal, ProgressLedger, Skill,
    SkillId, SkillProgress, SkillRegistry, SkillTotal, TeamDirectory, TeamId, TeamView,
};
use crate::error::{Result, VaultError};

/// Default bound for names (skills, teams, badges).
pub const DEFAULT_MAX_NAME_LEN: usize = 64;
/// Default bound for skill descriptions.
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 256;

/// Deployment-time rules. Fixed for the lifetime of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPolicy {
    pub membership: MembershipPolicy,
    pub max_name_len: usize,
    pub max_description_len: usize,
}

impl Default for VaultPolicy {
    fn default() -> Self {
        Self {
            membership: MembershipPolicy::default(),
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillVault {
    guard: AccessGuard,
    policy: VaultPolicy,
    skills: SkillRegistry,
    progress: ProgressLedger,
    badges: BadgeCatalog,
    teams: TeamDirectory,
}

impl SkillVault {
    /// Deploy an empty vault owned by `owner`.
    #[must_use]
    pub fn deploy(owner: Principal, policy: VaultPolicy) -> Self {
        info!(owner = %owner, membership = %policy.membership, "Deploying vault");
        Self {
            guard: AccessGuard::new(owner),
            policy,
            skills: SkillRegistry::new(),
            progress: ProgressLedger::new(),
            badges: BadgeCatalog::new(),
            teams: TeamDirectory::new(),
        }
    }

    #[must_use]
    pub const fn owner(&self) -> &Principal {
        self.guard.owner()
    }

    #[must_use]
    pub const fn policy(&self) -> &VaultPolicy {
        &self.policy
    }

    // =========================================================================
    // Skill Registry
    // =========================================================================

    pub fn register_skill(
        &mut self,
        caller: &Principal,
        name: &str,
        description: &str,
    ) -> Result<SkillId> {
        self.guard.assert_owner(caller)?;
        check_len("name", name, self.policy.max_name_len)?;
        check_len("description", description, self.policy.max_description_len)?;

        let id = self.skills.insert(name.to_string(), description.to_string())?;
        info!(skill_id = id, name, "Registered skill");
        Ok(id)
    }

    pub fn get_skill(&self, skill_id: SkillId) -> Result<&Skill> {
        self.skills.require(skill_id)
    }

    // =========================================================================
    // Progress Ledger
    // =========================================================================

    /// Raise the caller's progress for a skill and adjust their team totals.
    pub fn update_skill_progress(
        &mut self,
        caller: &Principal,
        skill_id: SkillId,
        new_progress: u64,
    ) -> Result<u64> {
        self.skills.require(skill_id)?;
        let change = self.progress.plan(caller, skill_id, new_progress)?;
        let totals = self.teams.plan_progress(caller, change)?;

        self.progress.apply(caller, change);
        debug!(
            caller = %caller,
            skill_id,
            old = change.old,
            new = change.new,
            teams = totals.len(),
            "Updated progress"
        );
        self.teams.apply_progress(skill_id, totals);
        Ok(new_progress)
    }

    #[must_use]
    pub fn get_skill_progress(&self, user: &Principal, skill_id: SkillId) -> SkillProgress {
        SkillProgress {
            progress: self.progress.get(user, skill_id),
        }
    }

    // =========================================================================
    // Badge Catalog
    // =========================================================================

    pub fn create_badge(
        &mut self,
        caller: &Principal,
        skill_id: SkillId,
        required_progress: u64,
        name: &str,
    ) -> Result<BadgeId> {
        self.guard.assert_owner(caller)?;
        self.skills.require(skill_id)?;
        check_len("name", name, self.policy.max_name_len)?;

        let id = self.badges.insert(skill_id, required_progress, name.to_string())?;
        info!(badge_id = id, skill_id, required_progress, "Created badge");
        Ok(id)
    }

    /// Badges for `skill_id` the user qualifies for, ascending by threshold.
    #[must_use]
    pub fn get_earned_badges(&self, user: &Principal, skill_id: SkillId) -> Vec<Badge> {
        self.badges.earned(skill_id, self.progress.get(user, skill_id))
    }

    pub fn get_badge(&self, badge_id: BadgeId) -> Result<&Badge> {
        self.badges.require(badge_id)
    }

    pub fn get_skill_badges(&self, skill_id: SkillId) -> Result<Vec<Badge>> {
        self.skills.require(skill_id)?;
        Ok(self.badges.for_skill(skill_id))
    }

    // =========================================================================
    // Team Directory
    // =========================================================================

    pub fn create_team(&mut self, caller: &Principal, name: &str) -> Result<TeamId> {
        check_len("name", name, self.policy.max_name_len)?;
        let id = self.teams.create(
            caller,
            name.to_string(),
            self.policy.membership,
            &self.progress,
        )?;
        info!(team_id = id, creator = %caller, "Created team");
        Ok(id)
    }

    pub fn join_team(&mut self, caller: &Principal, team_id: TeamId) -> Result<()> {
        self.teams
            .join(caller, team_id, self.policy.membership, &self.progress)?;
        info!(team_id, member = %caller, "Joined team");
        Ok(())
    }

    /// Totals for every registered skill, ascending by skill id.
    pub fn get_team_leaderboard(&self, team_id: TeamId) -> Result<Vec<SkillTotal>> {
        self.teams.leaderboard(team_id, self.skills.ids())
    }

    pub fn get_team(&self, team_id: TeamId) -> Result<TeamView> {
        self.teams.view(team_id).ok_or(VaultError::TeamNotFound(team_id))
    }

    pub fn get_team_skill_total(&self, team_id: TeamId, skill_id: SkillId) -> Result<u64> {
        self.teams.require(team_id)?;
        Ok(self.teams.total(team_id, skill_id))
    }

    #[must_use]
    pub fn get_member_teams(&self, user: &Principal) -> Vec<TeamId> {
        self.teams.teams_of(user).collect()
    }

    // =========================================================================
    // Counters
    // =========================================================================

    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.badges.len()
    }

    /// Registered skill ids, ascending.
    pub fn skill_ids(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.skills.ids()
    }

    /// Members of a team, ascending.
    pub fn team_members(&self, team_id: TeamId) -> impl Iterator<Item = &Principal> {
        self.teams.members_of(team_id)
    }

    /// Hex SHA-256 over the canonical JSON encoding of the whole vault.
    pub fn state_root(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(VaultError::InvalidInput {
            field,
            reason: format!("{len} characters exceeds maximum of {max}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn deployer() -> Principal {
        Principal::new("deployer")
    }

    fn wallet(n: u8) -> Principal {
        Principal::new(format!("wallet_{n}"))
    }

    fn vault() -> SkillVault {
        SkillVault::deploy(deployer(), VaultPolicy::default())
    }

    #[test]
    fn owner_only_skill_registration() {
        let mut vault = vault();
        assert_eq!(
            vault
                .register_skill(&deployer(), "Programming", "Software development skills")
                .unwrap(),
            1
        );
        let err = vault
            .register_skill(&wallet(1), "Design", "Design skills")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::OwnerOnly);
        assert!(matches!(vault.get_skill(2), Err(VaultError::SkillNotFound(2))));
        assert_eq!(vault.register_skill(&deployer(), "Design", "").unwrap(), 2);
    }

    #[test]
    fn over_long_name_rejected_before_mutation() {
        let mut vault = vault();
        let long = "x".repeat(DEFAULT_MAX_NAME_LEN + 1);
        let before = vault.clone();
        let err = vault.register_skill(&deployer(), &long, "").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(vault, before);

        let exact = "x".repeat(DEFAULT_MAX_NAME_LEN);
        assert_eq!(vault.register_skill(&deployer(), &exact, "").unwrap(), 1);
    }

    #[test]
    fn owner_check_precedes_input_validation() {
        let mut vault = vault();
        let long = "x".repeat(500);
        let err = vault.register_skill(&wallet(1), &long, "").unwrap_err();
        assert_eq!(err.code(), ErrorCode::OwnerOnly);
    }

    #[test]
    fn progress_requires_existing_skill() {
        let mut vault = vault();
        let err = vault.update_skill_progress(&wallet(1), 1, 10).unwrap_err();
        assert_eq!(err.code().numeric(), 101);
        assert_eq!(vault.get_skill_progress(&wallet(1), 1).progress, 0);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut vault = vault();
        vault.register_skill(&deployer(), "Programming", "").unwrap();
        assert_eq!(vault.update_skill_progress(&wallet(1), 1, 50).unwrap(), 50);

        let err = vault.update_skill_progress(&wallet(1), 1, 40).unwrap_err();
        assert_eq!(err.code().numeric(), 103);
        assert_eq!(vault.get_skill_progress(&wallet(1), 1).progress, 50);

        assert_eq!(vault.update_skill_progress(&wallet(1), 1, 50).unwrap(), 50);
    }

    #[test]
    fn team_totals_follow_member_progress() {
        let mut vault = vault();
        vault.register_skill(&deployer(), "Programming", "").unwrap();
        vault.create_team(&wallet(1), "Team Alpha").unwrap();
        vault.join_team(&wallet(2), 1).unwrap();

        vault.update_skill_progress(&wallet(1), 1, 50).unwrap();
        vault.update_skill_progress(&wallet(2), 1, 20).unwrap();
        vault.update_skill_progress(&wallet(1), 1, 60).unwrap();
        assert_eq!(vault.get_team_skill_total(1, 1).unwrap(), 80);

        let board = vault.get_team_leaderboard(1).unwrap();
        assert_eq!(board, vec![SkillTotal { skill_id: 1, total: 80 }]);
    }

    #[test]
    fn non_member_progress_does_not_touch_teams() {
        let mut vault = vault();
        vault.register_skill(&deployer(), "Programming", "").unwrap();
        vault.create_team(&wallet(1), "Team Alpha").unwrap();
        vault.update_skill_progress(&wallet(3), 1, 99).unwrap();
        assert_eq!(vault.get_team_skill_total(1, 1).unwrap(), 0);
    }

    #[test]
    fn leaderboard_lists_every_skill_in_order() {
        let mut vault = vault();
        for name in ["a", "b", "c"] {
            vault.register_skill(&deployer(), name, "").unwrap();
        }
        vault.create_team(&wallet(1), "Team Alpha").unwrap();
        vault.update_skill_progress(&wallet(1), 2, 5).unwrap();
        let totals: Vec<(SkillId, u64)> = vault
            .get_team_leaderboard(1)
            .unwrap()
            .into_iter()
            .map(|row| (row.skill_id, row.total))
            .collect();
        assert_eq!(totals, vec![(1, 0), (2, 5), (3, 0)]);
        assert!(matches!(
            vault.get_team_leaderboard(2),
            Err(VaultError::TeamNotFound(2))
        ));
    }

    #[test]
    fn badge_creation_is_owner_gated_and_checks_skill() {
        let mut vault = vault();
        let err = vault.create_badge(&deployer(), 1, 25, "Bronze").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SkillNotFound);

        vault.register_skill(&deployer(), "Programming", "").unwrap();
        let err = vault.create_badge(&wallet(1), 1, 25, "Bronze").unwrap_err();
        assert_eq!(err.code(), ErrorCode::OwnerOnly);

        assert_eq!(vault.create_badge(&deployer(), 1, 25, "Bronze").unwrap(), 1);
        assert_eq!(vault.create_badge(&deployer(), 1, 50, "Silver").unwrap(), 2);
    }

    #[test]
    fn earned_badges_follow_progress() {
        let mut vault = vault();
        vault.register_skill(&deployer(), "Programming", "").unwrap();
        vault.create_badge(&deployer(), 1, 50, "Silver").unwrap();
        vault.create_badge(&deployer(), 1, 25, "Bronze").unwrap();

        vault.update_skill_progress(&wallet(2), 1, 10).unwrap();
        assert!(vault.get_earned_badges(&wallet(2), 1).is_empty());

        vault.update_skill_progress(&wallet(1), 1, 60).unwrap();
        let names: Vec<String> = vault
            .get_earned_badges(&wallet(1), 1)
            .into_iter()
            .map(|badge| badge.name)
            .collect();
        assert_eq!(names, vec!["Bronze", "Silver"]);
    }

    #[test]
    fn failed_creation_does_not_consume_ids() {
        let mut vault = vault();
        vault.register_skill(&wallet(1), "x", "").unwrap_err();
        assert_eq!(vault.register_skill(&deployer(), "x", "").unwrap(), 1);

        vault.create_badge(&wallet(1), 1, 1, "b").unwrap_err();
        assert_eq!(vault.create_badge(&deployer(), 1, 1, "b").unwrap(), 1);

        vault.create_team(&wallet(1), &"t".repeat(65)).unwrap_err();
        assert_eq!(vault.create_team(&wallet(1), "t").unwrap(), 1);
    }

    #[test]
    fn state_root_changes_with_state() {
        let mut vault = vault();
        let empty = vault.state_root().unwrap();
        assert_eq!(empty.len(), 64);
        assert_eq!(empty, vault.clone().state_root().unwrap());

        vault.register_skill(&deployer(), "Programming", "").unwrap();
        assert_ne!(vault.state_root().unwrap(), empty);
    }
}
