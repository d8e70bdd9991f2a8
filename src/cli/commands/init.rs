//! sv init - Deploy a fresh vault

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::core::{MembershipPolicy, Principal};
use crate::error::{Result, VaultError};
use crate::ledger::Ledger;
use crate::vault::{SkillVault, VaultPolicy};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Owner identity (defaults to vault.owner from config)
    #[arg(long)]
    pub owner: Option<String>,

    /// Team membership policy
    #[arg(long)]
    pub membership: Option<MembershipPolicy>,

    /// Maximum characters for skill, team and badge names
    #[arg(long)]
    pub max_name_len: Option<usize>,

    /// Overwrite existing state
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Serialize)]
struct InitReport<'a> {
    owner: &'a Principal,
    policy: &'a VaultPolicy,
    state_path: String,
    state_root: String,
    height: u64,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let owner = match args.owner.as_deref().map(str::trim) {
        Some("") => {
            return Err(VaultError::InvalidInput {
                field: "owner",
                reason: "must not be empty".to_string(),
            });
        }
        Some(owner) => Principal::new(owner),
        None => ctx.config.owner()?,
    };

    let mut policy = ctx.config.vault_policy()?;
    if let Some(membership) = args.membership {
        policy.membership = membership;
    }
    if let Some(max_name_len) = args.max_name_len {
        if max_name_len == 0 {
            return Err(VaultError::InvalidInput {
                field: "max_name_len",
                reason: "must be positive".to_string(),
            });
        }
        policy.max_name_len = max_name_len;
    }

    let _lock = ctx.store.lock()?;
    if ctx.store.exists() && !args.force {
        if ctx.robot_mode() {
            return Err(VaultError::InvalidInput {
                field: "state",
                reason: format!(
                    "already initialized at {} (use --force)",
                    ctx.state_path().display()
                ),
            });
        }
        println!(
            "{} Already initialized at {}",
            "!".yellow(),
            ctx.state_path().display()
        );
        println!("  Use --force to reinitialize");
        return Ok(());
    }

    let ledger = Ledger::new(SkillVault::deploy(owner, policy));
    ctx.store.save(&ledger)?;

    let report = InitReport {
        owner: ledger.vault.owner(),
        policy: ledger.vault.policy(),
        state_path: ctx.state_path().display().to_string(),
        state_root: ledger.vault.state_root()?,
        height: ledger.height,
    };

    if ctx.robot_mode() {
        return emit_json(&report);
    }
    if ctx.quiet {
        return Ok(());
    }

    println!("{} Deployed vault", "✓".green().bold());
    println!("  {}: {}", "Owner".dimmed(), report.owner);
    println!("  {}: {}", "Membership".dimmed(), report.policy.membership);
    println!("  {}: {}", "State".dimmed(), report.state_path);
    println!("  {}: {}", "State root".dimmed(), report.state_root);
    Ok(())
}
