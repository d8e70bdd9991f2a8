//! Ordered batches of transactions ("blocks") and their receipts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::call::{Call, Outcome, Transaction, dispatch};
use crate::core::Principal;
use crate::error::{Result, StructuredError, VaultError};
use crate::vault::SkillVault;

/// How failures inside a block affect their siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// Every transaction stands alone; a failure only rejects itself.
    #[default]
    Independent,
    /// The first failure rolls the whole block back and stops execution.
    AllOrNothing,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => write!(f, "independent"),
            Self::AllOrNothing => write!(f, "all-or-nothing"),
        }
    }
}

impl FromStr for BatchMode {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "all-or-nothing" | "all_or_nothing" | "atomic" => Ok(Self::AllOrNothing),
            _ => Err(VaultError::Config(format!(
                "invalid batch mode {value} (expected independent|all-or-nothing)"
            ))),
        }
    }
}

/// Result of one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub index: usize,
    pub sender: Principal,
    pub op: String,
    pub result: std::result::Result<Outcome, StructuredError>,
}

impl Receipt {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Numeric error code, if the transaction failed.
    #[must_use]
    pub fn error_code(&self) -> Option<u16> {
        self.result.as_ref().err().map(|err| err.numeric_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReceipt {
    /// Height of the chain after this block
    pub height: u64,
    pub mode: BatchMode,
    /// False when an all-or-nothing block was rolled back
    pub committed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<usize>,
    pub receipts: Vec<Receipt>,
    pub state_root: String,
}

impl BlockReceipt {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.receipts.iter().filter(|receipt| !receipt.is_ok()).count()
    }

    /// Turn a rolled-back block into an error.
    pub fn ensure_committed(&self) -> Result<()> {
        match (self.committed, self.aborted_at) {
            (false, Some(index)) => {
                let reason = self
                    .receipts
                    .get(index)
                    .and_then(|receipt| receipt.result.as_ref().err())
                    .map_or_else(|| "unknown failure".to_string(), ToString::to_string);
                Err(VaultError::BatchAborted { index, reason })
            }
            _ => Ok(()),
        }
    }
}

/// The vault together with its block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub vault: SkillVault,
    pub height: u64,
}

impl Ledger {
    #[must_use]
    pub const fn new(vault: SkillVault) -> Self {
        Self { vault, height: 0 }
    }

    /// Execute a single call outside any block (height unchanged).
    pub fn call(&mut self, sender: &Principal, call: &Call) -> Result<Outcome> {
        dispatch(&mut self.vault, sender, call)
    }

    /// Apply an ordered batch of transactions as one block.
    pub fn mine_block(&mut self, txs: &[Transaction], mode: BatchMode) -> Result<BlockReceipt> {
        let checkpoint = (mode == BatchMode::AllOrNothing).then(|| self.vault.clone());
        let mut receipts = Vec::with_capacity(txs.len());
        let mut aborted_at = None;

        for (index, tx) in txs.iter().enumerate() {
            let result = dispatch(&mut self.vault, &tx.sender, &tx.call);
            match &result {
                Ok(_) => debug!(index, op = tx.call.name(), sender = %tx.sender, "Transaction ok"),
                Err(err) => debug!(
                    index,
                    op = tx.call.name(),
                    sender = %tx.sender,
                    code = err.code().numeric(),
                    "Transaction rejected"
                ),
            }
            let failed = result.is_err();
            receipts.push(Receipt {
                index,
                sender: tx.sender.clone(),
                op: tx.call.name().to_string(),
                result: result.map_err(StructuredError::from),
            });
            if failed && mode == BatchMode::AllOrNothing {
                aborted_at = Some(index);
                break;
            }
        }

        let committed = aborted_at.is_none();
        if let (Some(index), Some(snapshot)) = (aborted_at, checkpoint) {
            warn!(index, "Rolling back all-or-nothing block");
            self.vault = snapshot;
        }
        if committed {
            self.height += 1;
        }

        let receipt = BlockReceipt {
            height: self.height,
            mode,
            committed,
            aborted_at,
            receipts,
            state_root: self.vault.state_root()?,
        };
        info!(
            height = receipt.height,
            txs = txs.len(),
            failed = receipt.failed(),
            committed,
            "Mined block"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::VaultPolicy;

    fn ledger() -> Ledger {
        Ledger::new(SkillVault::deploy(
            Principal::new("deployer"),
            VaultPolicy::default(),
        ))
    }

    fn register(sender: &str, name: &str) -> Transaction {
        Transaction::new(
            sender,
            Call::RegisterSkill {
                name: name.into(),
                description: String::new(),
            },
        )
    }

    #[test]
    fn independent_block_keeps_successes_around_failures() {
        let mut ledger = ledger();
        let block = ledger
            .mine_block(
                &[
                    register("deployer", "Programming"),
                    register("wallet_1", "Design"),
                    register("deployer", "Writing"),
                ],
                BatchMode::Independent,
            )
            .unwrap();

        assert!(block.committed);
        assert_eq!(block.height, 1);
        assert_eq!(block.receipts[0].result, Ok(Outcome::Id(1)));
        assert_eq!(block.receipts[1].error_code(), Some(100));
        assert_eq!(block.receipts[2].result, Ok(Outcome::Id(2)));
        assert_eq!(block.failed(), 1);
    }

    #[test]
    fn all_or_nothing_block_rolls_back() {
        let mut ledger = ledger();
        let before = ledger.clone();
        let block = ledger
            .mine_block(
                &[
                    register("deployer", "Programming"),
                    register("wallet_1", "Design"),
                    register("deployer", "Writing"),
                ],
                BatchMode::AllOrNothing,
            )
            .unwrap();

        assert!(!block.committed);
        assert_eq!(block.aborted_at, Some(1));
        assert_eq!(block.receipts.len(), 2);
        assert_eq!(ledger, before);
        assert_eq!(block.state_root, before.vault.state_root().unwrap());

        let err = block.ensure_committed().unwrap_err();
        assert!(matches!(err, VaultError::BatchAborted { index: 1, .. }));
    }

    #[test]
    fn successful_all_or_nothing_block_commits() {
        let mut ledger = ledger();
        let block = ledger
            .mine_block(&[register("deployer", "Programming")], BatchMode::AllOrNothing)
            .unwrap();
        assert!(block.committed);
        assert!(block.ensure_committed().is_ok());
        assert_eq!(ledger.vault.skill_count(), 1);
    }

    #[test]
    fn batch_mode_parses() {
        assert_eq!("atomic".parse::<BatchMode>().unwrap(), BatchMode::AllOrNothing);
        assert_eq!("independent".parse::<BatchMode>().unwrap(), BatchMode::Independent);
        assert!("sometimes".parse::<BatchMode>().is_err());
    }
}
