//! Team directory: teams, memberships and per-team skill totals.
//!
//! A team's total for a skill is the sum of its members' progress for that
//! skill. Totals are maintained as counters: joins add the joiner's existing
//! progress, progress writes add their delta to every team of the writer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::progress::{ProgressChange, ProgressLedger};
use super::{Principal, SkillId, TeamId};
use crate::error::{Result, VaultError};

/// Whether an identity may belong to more than one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipPolicy {
    /// At most one team per identity. Creating or joining a second team fails.
    #[default]
    Single,
    /// Any number of teams per identity; only re-joining the same team fails.
    Multi,
}

impl MembershipPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for MembershipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipPolicy {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "single" | "one" => Ok(Self::Single),
            "multi" | "many" => Ok(Self::Multi),
            _ => Err(VaultError::Config(format!(
                "invalid membership policy {value} (expected single|multi)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub creator: Principal,
}

/// Team record together with its current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    pub creator: Principal,
    pub members: Vec<Principal>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTotal {
    pub skill_id: SkillId,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDirectory {
    last_id: TeamId,
    teams: BTreeMap<TeamId, Team>,
    members: BTreeMap<TeamId, BTreeSet<Principal>>,
    memberships: BTreeMap<Principal, BTreeSet<TeamId>>,
    totals: BTreeMap<TeamId, BTreeMap<SkillId, u64>>,
}

impl TeamDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> Result<TeamId> {
        self.last_id
            .checked_add(1)
            .ok_or_else(|| VaultError::Overflow("team id counter".to_string()))
    }

    #[must_use]
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn require(&self, id: TeamId) -> Result<&Team> {
        self.get(id).ok_or(VaultError::TeamNotFound(id))
    }

    #[must_use]
    pub fn view(&self, id: TeamId) -> Option<TeamView> {
        let team = self.teams.get(&id)?;
        Some(TeamView {
            id: team.id,
            name: team.name.clone(),
            creator: team.creator.clone(),
            members: self.members_of(id).cloned().collect(),
        })
    }

    /// Members of a team in ascending principal order.
    pub fn members_of(&self, id: TeamId) -> impl Iterator<Item = &Principal> {
        self.members.get(&id).into_iter().flatten()
    }

    /// Teams a principal belongs to, ascending.
    pub fn teams_of(&self, user: &Principal) -> impl Iterator<Item = TeamId> + '_ {
        self.memberships.get(user).into_iter().flatten().copied()
    }

    #[must_use]
    pub fn is_member(&self, id: TeamId, user: &Principal) -> bool {
        self.members.get(&id).is_some_and(|set| set.contains(user))
    }

    #[must_use]
    pub fn total(&self, id: TeamId, skill_id: SkillId) -> u64 {
        self.totals
            .get(&id)
            .and_then(|skills| skills.get(&skill_id))
            .copied()
            .unwrap_or(0)
    }

    /// Check the policy allows `caller` to enter a team (new or existing).
    fn check_admission(
        &self,
        caller: &Principal,
        target: Option<TeamId>,
        policy: MembershipPolicy,
    ) -> Result<()> {
        if let Some(team_id) = target {
            if self.is_member(team_id, caller) {
                return Err(VaultError::AlreadyMember {
                    caller: caller.clone(),
                    team_id,
                });
            }
        }
        if policy == MembershipPolicy::Single {
            if let Some(team_id) = self.teams_of(caller).next() {
                return Err(VaultError::AlreadyMember {
                    caller: caller.clone(),
                    team_id,
                });
            }
        }
        Ok(())
    }

    /// New totals for `team_id` once `user` (with the given progress) joins.
    fn plan_join_totals(
        &self,
        team_id: TeamId,
        user: &Principal,
        progress: &ProgressLedger,
    ) -> Result<Vec<(SkillId, u64)>> {
        progress
            .skills_of(user)
            .filter(|(_, value)| *value > 0)
            .map(|(skill_id, value)| {
                self.total(team_id, skill_id)
                    .checked_add(value)
                    .map(|total| (skill_id, total))
                    .ok_or_else(|| {
                        VaultError::Overflow(format!("team {team_id} total for skill {skill_id}"))
                    })
            })
            .collect()
    }

    /// Create a team with `caller` as first member.
    ///
    /// The caller's existing progress seeds the team totals.
    pub(crate) fn create(
        &mut self,
        caller: &Principal,
        name: String,
        policy: MembershipPolicy,
        progress: &ProgressLedger,
    ) -> Result<TeamId> {
        self.check_admission(caller, None, policy)?;
        let id = self.next_id()?;
        let seeded = self.plan_join_totals(id, caller, progress)?;

        self.teams.insert(
            id,
            Team {
                id,
                name,
                creator: caller.clone(),
            },
        );
        self.last_id = id;
        self.admit(id, caller, seeded);
        Ok(id)
    }

    pub(crate) fn join(
        &mut self,
        caller: &Principal,
        team_id: TeamId,
        policy: MembershipPolicy,
        progress: &ProgressLedger,
    ) -> Result<()> {
        self.require(team_id)?;
        self.check_admission(caller, Some(team_id), policy)?;
        let totals = self.plan_join_totals(team_id, caller, progress)?;
        self.admit(team_id, caller, totals);
        Ok(())
    }

    fn admit(&mut self, team_id: TeamId, user: &Principal, totals: Vec<(SkillId, u64)>) {
        self.members.entry(team_id).or_default().insert(user.clone());
        self.memberships.entry(user.clone()).or_default().insert(team_id);
        self.set_totals(team_id, totals);
    }

    /// New totals for every team of `user` once `change` applies.
    pub(crate) fn plan_progress(
        &self,
        user: &Principal,
        change: ProgressChange,
    ) -> Result<Vec<(TeamId, u64)>> {
        let delta = change.delta();
        if delta == 0 {
            return Ok(Vec::new());
        }
        self.teams_of(user)
            .map(|team_id| {
                self.total(team_id, change.skill_id)
                    .checked_add(delta)
                    .map(|total| (team_id, total))
                    .ok_or_else(|| {
                        VaultError::Overflow(format!(
                            "team {team_id} total for skill {}",
                            change.skill_id
                        ))
                    })
            })
            .collect()
    }

    pub(crate) fn apply_progress(&mut self, skill_id: SkillId, totals: Vec<(TeamId, u64)>) {
        for (team_id, total) in totals {
            self.totals.entry(team_id).or_default().insert(skill_id, total);
        }
    }

    fn set_totals(&mut self, team_id: TeamId, totals: Vec<(SkillId, u64)>) {
        if totals.is_empty() {
            return;
        }
        let entry = self.totals.entry(team_id).or_default();
        for (skill_id, total) in totals {
            entry.insert(skill_id, total);
        }
    }

    /// Totals of a team for the given skills, in the order given.
    pub fn leaderboard(
        &self,
        team_id: TeamId,
        skills: impl IntoIterator<Item = SkillId>,
    ) -> Result<Vec<SkillTotal>> {
        self.require(team_id)?;
        Ok(skills
            .into_iter()
            .map(|skill_id| SkillTotal {
                skill_id,
                total: self.total(team_id, skill_id),
            })
            .collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
