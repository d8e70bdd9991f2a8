//! sv query - Read-only views over the current state

use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::cli::formatters::format_outcome;
use crate::cli::output::emit_json;
use crate::core::{BadgeId, Principal, SkillId, TeamId};
use crate::error::Result;
use crate::ledger::Call;

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub query: QueryCommand,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Skill metadata
    Skill { skill_id: SkillId },
    /// Stored progress of a user on a skill
    Progress { user: String, skill_id: SkillId },
    /// Badges of a skill a user currently qualifies for
    Earned { user: String, skill_id: SkillId },
    /// Every badge defined for a skill
    Badges { skill_id: SkillId },
    /// One badge by id
    Badge { badge_id: BadgeId },
    /// Per-skill progress totals of a team
    Leaderboard { team_id: TeamId },
    /// Team name, creator and members
    Team { team_id: TeamId },
    /// Teams a user belongs to
    MemberTeams { user: String },
    /// Team total for a single skill
    Total { team_id: TeamId, skill_id: SkillId },
}

impl QueryCommand {
    #[must_use]
    pub fn to_call(&self) -> Call {
        match self {
            Self::Skill { skill_id } => Call::GetSkill {
                skill_id: *skill_id,
            },
            Self::Progress { user, skill_id } => Call::GetSkillProgress {
                user: Principal::new(user.as_str()),
                skill_id: *skill_id,
            },
            Self::Earned { user, skill_id } => Call::GetEarnedBadges {
                user: Principal::new(user.as_str()),
                skill_id: *skill_id,
            },
            Self::Badges { skill_id } => Call::GetSkillBadges {
                skill_id: *skill_id,
            },
            Self::Badge { badge_id } => Call::GetBadge {
                badge_id: *badge_id,
            },
            Self::Leaderboard { team_id } => Call::GetTeamLeaderboard { team_id: *team_id },
            Self::Team { team_id } => Call::GetTeam { team_id: *team_id },
            Self::MemberTeams { user } => Call::GetMemberTeams {
                user: Principal::new(user.as_str()),
            },
            Self::Total { team_id, skill_id } => Call::GetTeamSkillTotal {
                team_id: *team_id,
                skill_id: *skill_id,
            },
        }
    }
}

pub fn run(ctx: &AppContext, args: &QueryArgs) -> Result<()> {
    let call = args.query.to_call();
    debug_assert!(call.is_read_only());

    // Work on a loaded copy; nothing is written back.
    let mut ledger = ctx.store.load()?;
    let sender = ledger.vault.owner().clone();
    let outcome = ledger.call(&sender, &call)?;

    if ctx.robot_mode() {
        return emit_json(&outcome);
    }
    println!("{}", format_outcome(&outcome));
    Ok(())
}
