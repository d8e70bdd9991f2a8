//! Badge catalog: named progress thresholds per skill.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{BadgeId, SkillId};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: BadgeId,
    pub skill_id: SkillId,
    pub required_progress: u64,
    pub name: String,
}

impl Badge {
    /// Earned when progress meets or exceeds the threshold.
    #[must_use]
    pub const fn is_earned_at(&self, progress: u64) -> bool {
        self.required_progress <= progress
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCatalog {
    last_id: BadgeId,
    badges: BTreeMap<BadgeId, Badge>,
    /// Badge ids per skill in insertion order (thresholds are unsorted)
    by_skill: BTreeMap<SkillId, Vec<BadgeId>>,
}

impl BadgeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> Result<BadgeId> {
        self.last_id
            .checked_add(1)
            .ok_or_else(|| VaultError::Overflow("badge id counter".to_string()))
    }

    /// Insert a badge under the next id. The skill must already be known to exist.
    pub(crate) fn insert(
        &mut self,
        skill_id: SkillId,
        required_progress: u64,
        name: String,
    ) -> Result<BadgeId> {
        let id = self.next_id()?;
        self.badges.insert(
            id,
            Badge {
                id,
                skill_id,
                required_progress,
                name,
            },
        );
        self.by_skill.entry(skill_id).or_default().push(id);
        self.last_id = id;
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: BadgeId) -> Option<&Badge> {
        self.badges.get(&id)
    }

    pub fn require(&self, id: BadgeId) -> Result<&Badge> {
        self.get(id).ok_or(VaultError::BadgeNotFound(id))
    }

    /// All badges for a skill, ascending by threshold then id.
    #[must_use]
    pub fn for_skill(&self, skill_id: SkillId) -> Vec<Badge> {
        self.scan(skill_id, |_| true)
    }

    /// Badges for a skill whose threshold is at or below `progress`.
    ///
    /// Every badge registered for the skill is examined.
    #[must_use]
    pub fn earned(&self, skill_id: SkillId, progress: u64) -> Vec<Badge> {
        self.scan(skill_id, |badge| badge.is_earned_at(progress))
    }

    fn scan(&self, skill_id: SkillId, keep: impl Fn(&Badge) -> bool) -> Vec<Badge> {
        self.by_skill
            .get(&skill_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.badges.get(id))
            .filter(|badge| keep(badge))
            .sorted_by_key(|badge| (badge.required_progress, badge.id))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(thresholds: &[u64]) -> BadgeCatalog {
        let mut catalog = BadgeCatalog::new();
        for (i, threshold) in thresholds.iter().enumerate() {
            catalog.insert(1, *threshold, format!("badge-{i}")).unwrap();
        }
        catalog
    }

    #[test]
    fn earned_includes_exact_threshold() {
        let catalog = catalog_with(&[25, 50]);
        let earned = catalog.earned(1, 50);
        assert_eq!(earned.len(), 2);
    }

    #[test]
    fn earned_scans_past_unsorted_misses() {
        // 90 is inserted first and missed; later cheaper badges must still be found.
        let catalog = catalog_with(&[90, 10, 50, 20]);
        let thresholds: Vec<u64> = catalog
            .earned(1, 30)
            .iter()
            .map(|badge| badge.required_progress)
            .collect();
        assert_eq!(thresholds, vec![10, 20]);
    }

    #[test]
    fn earned_is_empty_below_every_threshold() {
        let catalog = catalog_with(&[25, 50]);
        assert!(catalog.earned(1, 10).is_empty());
        assert!(catalog.earned(2, 1_000).is_empty());
    }

    #[test]
    fn ties_order_by_id() {
        let catalog = catalog_with(&[5, 5, 1]);
        let ids: Vec<BadgeId> = catalog.for_skill(1).iter().map(|badge| badge.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn require_unknown_badge() {
        let catalog = BadgeCatalog::new();
        assert!(matches!(catalog.require(4), Err(VaultError::BadgeNotFound(4))));
    }
}
