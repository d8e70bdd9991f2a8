//! sv submit - Mine one block of transactions

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;

use crate::app::AppContext;
use crate::cli::formatters::format_block_receipt;
use crate::cli::output::emit_json;
use crate::error::{Result, VaultError};
use crate::ledger::{BatchMode, Transaction};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// JSON file with transactions ("-" for stdin)
    pub file: Option<PathBuf>,

    /// Inline transaction as JSON (repeatable, appended after FILE)
    #[arg(long = "tx", value_name = "JSON")]
    pub tx: Vec<String>,

    /// Roll back the whole block if any transaction fails
    #[arg(long)]
    pub atomic: bool,
}

/// Accepted batch documents.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<Transaction>),
    Wrapped {
        transactions: Vec<Transaction>,
        #[serde(default)]
        mode: Option<BatchMode>,
    },
}

impl BatchFile {
    fn into_parts(self) -> (Vec<Transaction>, Option<BatchMode>) {
        match self {
            Self::List(transactions) => (transactions, None),
            Self::Wrapped { transactions, mode } => (transactions, mode),
        }
    }
}

pub fn run(ctx: &AppContext, args: &SubmitArgs) -> Result<()> {
    let (mut transactions, file_mode) = match &args.file {
        Some(path) => parse_batch(&read_input(path)?)?,
        None => (Vec::new(), None),
    };
    for raw in &args.tx {
        transactions.push(parse_transaction(raw)?);
    }
    if transactions.is_empty() {
        return Err(VaultError::InvalidInput {
            field: "transactions",
            reason: "no transactions given (pass FILE, - or --tx)".to_string(),
        });
    }

    let mode = if args.atomic {
        BatchMode::AllOrNothing
    } else {
        file_mode.unwrap_or_default()
    };

    let _lock = ctx.store.lock()?;
    let mut ledger = ctx.store.load()?;
    let block = ledger.mine_block(&transactions, mode)?;
    if block.committed {
        ctx.store.save(&ledger)?;
    }

    if ctx.robot_mode() {
        return emit_json(&block);
    }
    if !ctx.quiet {
        println!("{}", format_block_receipt(&block));
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    if !path.exists() {
        return Err(VaultError::InvalidInput {
            field: "file",
            reason: format!("{} does not exist", path.display()),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

fn parse_batch(raw: &str) -> Result<(Vec<Transaction>, Option<BatchMode>)> {
    let batch: BatchFile = serde_json::from_str(raw).map_err(|err| VaultError::InvalidInput {
        field: "transactions",
        reason: err.to_string(),
    })?;
    Ok(batch.into_parts())
}

fn parse_transaction(raw: &str) -> Result<Transaction> {
    serde_json::from_str(raw).map_err(|err| VaultError::InvalidInput {
        field: "tx",
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Call;

    #[test]
    fn parse_plain_array() {
        let raw = r#"[
            { "sender": "deployer", "call": { "op": "register-skill", "name": "Programming" } },
            { "sender": "wallet_1", "call": { "op": "create-team", "name": "Team Alpha" } }
        ]"#;
        let (txs, mode) = parse_batch(raw).unwrap();
        assert_eq!(txs.len(), 2);
        assert!(mode.is_none());
        assert_eq!(txs[1].call, Call::CreateTeam { name: "Team Alpha".into() });
    }

    #[test]
    fn parse_wrapped_with_mode() {
        let raw = r#"{
            "mode": "all-or-nothing",
            "transactions": [
                { "sender": "wallet_1", "call": { "op": "join-team", "team_id": 1 } }
            ]
        }"#;
        let (txs, mode) = parse_batch(raw).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(mode, Some(BatchMode::AllOrNothing));
    }

    #[test]
    fn unknown_op_is_invalid_input() {
        let raw = r#"[{ "sender": "deployer", "call": { "op": "burn-skill", "skill_id": 1 } }]"#;
        let err = parse_batch(raw).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput { field: "transactions", .. }));
    }

    #[test]
    fn inline_transaction() {
        let tx = parse_transaction(
            r#"{ "sender": "wallet_2", "call": { "op": "update-skill-progress", "skill_id": 1, "new_progress": 40 } }"#,
        )
        .unwrap();
        assert_eq!(tx.sender.as_str(), "wallet_2");
        assert!(parse_transaction("{").is_err());
    }
}
