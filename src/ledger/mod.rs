//! Transaction driver: calls, blocks and receipts over a [`SkillVault`].
//!
//! [`SkillVault`]: crate::vault::SkillVault

pub mod block;
pub mod call;

pub use block::{BatchMode, BlockReceipt, Ledger, Receipt};
pub use call::{Call, Outcome, Transaction, dispatch};
