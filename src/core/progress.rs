//! Per-user, per-skill monotonic progress counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Principal, SkillId};
use crate::error::{Result, VaultError};

/// Progress reading returned by queries. Zero for users with no writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub progress: u64,
}

/// A validated progress write that has not been applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressChange {
    pub skill_id: SkillId,
    pub old: u64,
    pub new: u64,
}

impl ProgressChange {
    /// Amount every containing team total grows by.
    #[must_use]
    pub const fn delta(&self) -> u64 {
        self.new - self.old
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLedger {
    entries: BTreeMap<Principal, BTreeMap<SkillId, u64>>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, user: &Principal, skill_id: SkillId) -> u64 {
        self.entries
            .get(user)
            .and_then(|skills| skills.get(&skill_id))
            .copied()
            .unwrap_or(0)
    }

    /// Check a write against the stored value without mutating anything.
    pub fn plan(&self, user: &Principal, skill_id: SkillId, new: u64) -> Result<ProgressChange> {
        let old = self.get(user, skill_id);
        if new < old {
            return Err(VaultError::InvalidProgress {
                skill_id,
                current: old,
                attempted: new,
            });
        }
        Ok(ProgressChange { skill_id, old, new })
    }

    pub(crate) fn apply(&mut self, user: &Principal, change: ProgressChange) {
        self.entries
            .entry(user.clone())
            .or_default()
            .insert(change.skill_id, change.new);
    }

    /// Every (skill, progress) the user has written, ascending by skill.
    pub fn skills_of<'a>(
        &'a self,
        user: &Principal,
    ) -> impl Iterator<Item = (SkillId, u64)> + 'a {
        self.entries
            .get(user)
            .into_iter()
            .flat_map(|skills| skills.iter().map(|(id, progress)| (*id, *progress)))
    }
}
