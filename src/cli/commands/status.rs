//! sv status - Vault summary

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::core::Principal;
use crate::error::Result;
use crate::vault::VaultPolicy;

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Serialize)]
struct StatusReport<'a> {
    state_path: String,
    height: u64,
    owner: &'a Principal,
    policy: &'a VaultPolicy,
    skills: usize,
    badges: usize,
    teams: usize,
    state_root: String,
}

pub fn run(ctx: &AppContext, _args: &StatusArgs) -> Result<()> {
    let ledger = ctx.store.load()?;
    let vault = &ledger.vault;
    let report = StatusReport {
        state_path: ctx.state_path().display().to_string(),
        height: ledger.height,
        owner: vault.owner(),
        policy: vault.policy(),
        skills: vault.skill_count(),
        badges: vault.badge_count(),
        teams: vault.team_count(),
        state_root: vault.state_root()?,
    };

    if ctx.robot_mode() {
        return emit_json(&report);
    }

    println!("{}", "Skill Vault".bold());
    println!("{}: {}", "State".dimmed(), report.state_path);
    println!("{}: {}", "Height".dimmed(), report.height);
    println!("{}: {}", "Owner".dimmed(), report.owner);
    println!(
        "{}: {} (names up to {}, descriptions up to {})",
        "Policy".dimmed(),
        report.policy.membership,
        report.policy.max_name_len,
        report.policy.max_description_len
    );
    println!(
        "{}: {} skills, {} badges, {} teams",
        "Counts".dimmed(),
        report.skills,
        report.badges,
        report.teams
    );
    println!("{}: {}", "State root".dimmed(), report.state_root);
    Ok(())
}
