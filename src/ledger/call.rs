//! Requests, their typed results, and dispatch onto the vault.

use serde::{Deserialize, Serialize};

use crate::core::{
    Badge, BadgeId, Principal, Skill, SkillId, SkillProgress, SkillTotal, TeamId, TeamView,
};
use crate::error::Result;
use crate::vault::SkillVault;

/// One callable operation with its positional parameters.
///
/// The caller is not part of the call; it travels on the [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Call {
    RegisterSkill {
        name: String,
        #[serde(default)]
        description: String,
    },
    GetSkill {
        skill_id: SkillId,
    },
    UpdateSkillProgress {
        skill_id: SkillId,
        new_progress: u64,
    },
    GetSkillProgress {
        user: Principal,
        skill_id: SkillId,
    },
    CreateBadge {
        skill_id: SkillId,
        required_progress: u64,
        name: String,
    },
    GetEarnedBadges {
        user: Principal,
        skill_id: SkillId,
    },
    GetSkillBadges {
        skill_id: SkillId,
    },
    GetBadge {
        badge_id: BadgeId,
    },
    CreateTeam {
        name: String,
    },
    JoinTeam {
        team_id: TeamId,
    },
    GetTeam {
        team_id: TeamId,
    },
    GetTeamLeaderboard {
        team_id: TeamId,
    },
    GetTeamSkillTotal {
        team_id: TeamId,
        skill_id: SkillId,
    },
    GetMemberTeams {
        user: Principal,
    },
}

impl Call {
    /// Wire name of the operation (e.g., "update-skill-progress").
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegisterSkill { .. } => "register-skill",
            Self::GetSkill { .. } => "get-skill",
            Self::UpdateSkillProgress { .. } => "update-skill-progress",
            Self::GetSkillProgress { .. } => "get-skill-progress",
            Self::CreateBadge { .. } => "create-badge",
            Self::GetEarnedBadges { .. } => "get-earned-badges",
            Self::GetSkillBadges { .. } => "get-skill-badges",
            Self::GetBadge { .. } => "get-badge",
            Self::CreateTeam { .. } => "create-team",
            Self::JoinTeam { .. } => "join-team",
            Self::GetTeam { .. } => "get-team",
            Self::GetTeamLeaderboard { .. } => "get-team-leaderboard",
            Self::GetTeamSkillTotal { .. } => "get-team-skill-total",
            Self::GetMemberTeams { .. } => "get-member-teams",
        }
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        !matches!(
            self,
            Self::RegisterSkill { .. }
                | Self::UpdateSkillProgress { .. }
                | Self::CreateBadge { .. }
                | Self::CreateTeam { .. }
                | Self::JoinTeam { .. }
        )
    }
}

/// A call submitted on behalf of `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Principal,
    pub call: Call,
}

impl Transaction {
    pub fn new(sender: impl Into<Principal>, call: Call) -> Self {
        Self {
            sender: sender.into(),
            call,
        }
    }
}

/// Typed success value of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// Freshly allocated skill, team or badge id
    Id(u64),
    /// Plain unsigned result (stored progress, team total)
    Uint(u64),
    Unit,
    Skill(Skill),
    Progress(SkillProgress),
    Badge(Badge),
    Badges(Vec<Badge>),
    Leaderboard(Vec<SkillTotal>),
    Team(TeamView),
    Teams(Vec<TeamId>),
}

/// Execute one call against the vault as `sender`.
pub fn dispatch(vault: &mut SkillVault, sender: &Principal, call: &Call) -> Result<Outcome> {
    let outcome = match call {
        Call::RegisterSkill { name, description } => {
            Outcome::Id(vault.register_skill(sender, name, description)?)
        }
        Call::GetSkill { skill_id } => Outcome::Skill(vault.get_skill(*skill_id)?.clone()),
        Call::UpdateSkillProgress {
            skill_id,
            new_progress,
        } => Outcome::Uint(vault.update_skill_progress(sender, *skill_id, *new_progress)?),
        Call::GetSkillProgress { user, skill_id } => {
            Outcome::Progress(vault.get_skill_progress(user, *skill_id))
        }
        Call::CreateBadge {
            skill_id,
            required_progress,
            name,
        } => Outcome::Id(vault.create_badge(sender, *skill_id, *required_progress, name)?),
        Call::GetEarnedBadges { user, skill_id } => {
            Outcome::Badges(vault.get_earned_badges(user, *skill_id))
        }
        Call::GetSkillBadges { skill_id } => Outcome::Badges(vault.get_skill_badges(*skill_id)?),
        Call::GetBadge { badge_id } => Outcome::Badge(vault.get_badge(*badge_id)?.clone()),
        Call::CreateTeam { name } => Outcome::Id(vault.create_team(sender, name)?),
        Call::JoinTeam { team_id } => {
            vault.join_team(sender, *team_id)?;
            Outcome::Unit
        }
        Call::GetTeam { team_id } => Outcome::Team(vault.get_team(*team_id)?),
        Call::GetTeamLeaderboard { team_id } => {
            Outcome::Leaderboard(vault.get_team_leaderboard(*team_id)?)
        }
        Call::GetTeamSkillTotal { team_id, skill_id } => {
            Outcome::Uint(vault.get_team_skill_total(*team_id, *skill_id)?)
        }
        Call::GetMemberTeams { user } => Outcome::Teams(vault.get_member_teams(user)),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::VaultPolicy;

    #[test]
    fn call_parses_from_kebab_case_op() {
        let json = r#"{ "op": "update-skill-progress", "skill_id": 1, "new_progress": 60 }"#;
        let call: Call = serde_json::from_str(json).unwrap();
        assert_eq!(
            call,
            Call::UpdateSkillProgress {
                skill_id: 1,
                new_progress: 60
            }
        );
        assert_eq!(call.name(), "update-skill-progress");
        assert!(!call.is_read_only());
    }

    #[test]
    fn register_skill_description_defaults_to_empty() {
        let call: Call = serde_json::from_str(r#"{ "op": "register-skill", "name": "Rust" }"#).unwrap();
        assert_eq!(
            call,
            Call::RegisterSkill {
                name: "Rust".into(),
                description: String::new()
            }
        );
    }

    #[test]
    fn unknown_op_is_rejected() {
        let result: std::result::Result<Call, _> =
            serde_json::from_str(r#"{ "op": "delete-skill", "skill_id": 1 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn dispatch_read_only_calls_leave_vault_unchanged() {
        let owner = Principal::new("deployer");
        let mut vault = SkillVault::deploy(owner.clone(), VaultPolicy::default());
        dispatch(
            &mut vault,
            &owner,
            &Call::RegisterSkill {
                name: "Programming".into(),
                description: String::new(),
            },
        )
        .unwrap();
        let before = vault.clone();

        let reads = [
            Call::GetSkill { skill_id: 1 },
            Call::GetSkillProgress {
                user: owner.clone(),
                skill_id: 1,
            },
            Call::GetEarnedBadges {
                user: owner.clone(),
                skill_id: 1,
            },
            Call::GetMemberTeams { user: owner.clone() },
        ];
        for call in &reads {
            assert!(call.is_read_only());
            dispatch(&mut vault, &owner, call).unwrap();
        }
        assert_eq!(vault, before);
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(Outcome::Id(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "id", "value": 3 }));
        let json = serde_json::to_value(Outcome::Unit).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "unit" }));
    }
}
