//! Skill definitions and the owner-gated skill registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SkillId;
use crate::error::{Result, VaultError};

/// A registered skill. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Sequential skill ID, starting at 1
    pub id: SkillId,
    /// Human-readable name (not unique)
    pub name: String,
    /// Short description
    pub description: String,
}

/// Table of skills keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRegistry {
    last_id: SkillId,
    skills: BTreeMap<SkillId, Skill>,
}

impl SkillRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next successful registration will receive.
    pub fn next_id(&self) -> Result<SkillId> {
        self.last_id
            .checked_add(1)
            .ok_or_else(|| VaultError::Overflow("skill id counter".to_string()))
    }

    /// Insert a skill under the next id. Callers validate inputs first.
    pub(crate) fn insert(&mut self, name: String, description: String) -> Result<SkillId> {
        let id = self.next_id()?;
        self.skills.insert(
            id,
            Skill {
                id,
                name,
                description,
            },
        );
        self.last_id = id;
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    /// Look up a skill, failing with `SkillNotFound`.
    pub fn require(&self, id: SkillId) -> Result<&Skill> {
        self.get(id).ok_or(VaultError::SkillNotFound(id))
    }

    /// Registered skill ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.skills.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
