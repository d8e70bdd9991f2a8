//! Core vault types: identities, skills, progress, badges and teams

pub mod badge;
pub mod identity;
pub mod progress;
pub mod skill;
pub mod team;

pub use badge::{Badge, BadgeCatalog};
pub use identity::{AccessGuard, Principal};
pub use progress::{ProgressChange, ProgressLedger, SkillProgress};
pub use skill::{Skill, SkillRegistry};
pub use team::{MembershipPolicy, SkillTotal, Team, TeamDirectory, TeamView};

/// Sequential skill identifier, starting at 1.
pub type SkillId = u64;
/// Sequential team identifier, starting at 1.
pub type TeamId = u64;
/// Sequential badge identifier, starting at 1.
pub type BadgeId = u64;
