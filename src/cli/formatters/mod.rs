//! Human-readable renderers for call outcomes and block receipts

mod outcome;
mod receipt;

pub use outcome::format_outcome;
pub use receipt::format_block_receipt;
