//! Render a [`BlockReceipt`] as a per-transaction table

use std::fmt::Write;

use colored::Colorize;

use super::format_outcome;
use crate::ledger::BlockReceipt;

#[must_use]
pub fn format_block_receipt(block: &BlockReceipt) -> String {
    let mut out = String::new();
    let header = if block.committed {
        format!("Block {} committed", block.height).green().bold()
    } else {
        "Block rolled back".red().bold()
    };
    let _ = writeln!(
        out,
        "{header} ({} transactions, {} failed, {})",
        block.receipts.len(),
        block.failed(),
        block.mode
    );

    for receipt in &block.receipts {
        let status = match &receipt.result {
            Ok(outcome) => {
                let summary = format_outcome(outcome).replace('\n', " | ");
                format!("{} {summary}", "ok".green())
            }
            Err(err) => format!("{} {}", "err".red(), err),
        };
        let _ = writeln!(
            out,
            "  #{:<3} {:<22} {:<12} {status}",
            receipt.index,
            receipt.op,
            receipt.sender.as_str().dimmed()
        );
    }

    if let Some(index) = block.aborted_at {
        let _ = writeln!(
            out,
            "{} transaction #{index} failed; no changes were applied",
            "!".yellow()
        );
    }
    let _ = write!(out, "{}: {}", "State root".dimmed(), block.state_root);
    out
}
