//! Render a typed [`Outcome`] as terminal text

use std::fmt::Write;

use colored::Colorize;

use crate::core::{Badge, SkillTotal};
use crate::ledger::Outcome;

/// Multi-line rendering of a successful call result.
#[must_use]
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Id(id) => format!("{} {id}", "id".dimmed()),
        Outcome::Uint(value) => value.to_string(),
        Outcome::Unit => "ok".green().to_string(),
        Outcome::Skill(skill) => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", skill.name.bold());
            let _ = writeln!(out, "{}: {}", "ID".dimmed(), skill.id);
            if !skill.description.is_empty() {
                let _ = writeln!(out);
                let _ = write!(out, "{}", skill.description);
            }
            out.trim_end().to_string()
        }
        Outcome::Progress(progress) => {
            format!("{}: {}", "Progress".dimmed(), progress.progress)
        }
        Outcome::Badge(badge) => badge_line(badge),
        Outcome::Badges(badges) if badges.is_empty() => "no badges".dimmed().to_string(),
        Outcome::Badges(badges) => badges
            .iter()
            .map(badge_line)
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Leaderboard(rows) => leaderboard(rows),
        Outcome::Team(team) => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", team.name.bold());
            let _ = writeln!(out, "{}: {}", "ID".dimmed(), team.id);
            let _ = writeln!(out, "{}: {}", "Creator".dimmed(), team.creator);
            let _ = write!(out, "{} ({})", "Members".dimmed(), team.members.len());
            for member in &team.members {
                let _ = write!(out, "\n  {member}");
            }
            out
        }
        Outcome::Teams(ids) if ids.is_empty() => "no teams".dimmed().to_string(),
        Outcome::Teams(ids) => ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn badge_line(badge: &Badge) -> String {
    format!(
        "{:>4}  {:<24} skill {} at {}",
        badge.id,
        badge.name.bold(),
        badge.skill_id,
        badge.required_progress.to_string().cyan()
    )
}

fn leaderboard(rows: &[SkillTotal]) -> String {
    if rows.is_empty() {
        return "no skills registered".dimmed().to_string();
    }
    let mut out = format!("{:>8}  {:>12}", "SKILL".bold(), "TOTAL".bold());
    for row in rows {
        let _ = write!(out, "\n{:>8}  {:>12}", row.skill_id, row.total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Principal, TeamView};

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        let out = f();
        colored::control::unset_override();
        out
    }

    #[test]
    fn leaderboard_lists_rows() {
        let text = plain(|| {
            format_outcome(&Outcome::Leaderboard(vec![
                SkillTotal { skill_id: 1, total: 80 },
                SkillTotal { skill_id: 2, total: 0 },
            ]))
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with('1'));
        assert!(lines[1].ends_with("80"));
    }

    #[test]
    fn empty_badges_message() {
        let text = plain(|| format_outcome(&Outcome::Badges(Vec::new())));
        assert_eq!(text, "no badges");
    }

    #[test]
    fn team_lists_members() {
        let team = TeamView {
            id: 1,
            name: "Team Alpha".into(),
            creator: Principal::new("wallet_1"),
            members: vec![Principal::new("wallet_1"), Principal::new("wallet_2")],
        };
        let text = plain(|| format_outcome(&Outcome::Team(team)));
        assert!(text.contains("Members (2)"));
        assert!(text.contains("  wallet_2"));
    }
}
