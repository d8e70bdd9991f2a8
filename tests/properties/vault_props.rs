//! Random operation sequences checked against brute-force recomputation.

use std::collections::BTreeMap;

use proptest::prelude::*;

use skill_vault::core::{MembershipPolicy, Principal};
use skill_vault::error::ErrorCode;
use skill_vault::{SkillVault, VaultPolicy};

const USERS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Register { by_owner: bool },
    Progress { user: usize, skill_id: u64, value: u64 },
    Badge { by_owner: bool, skill_id: u64, threshold: u64 },
    CreateTeam { user: usize },
    Join { user: usize, team_id: u64 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|by_owner| Op::Register { by_owner }),
        (0..USERS, 0_u64..5, 0_u64..120).prop_map(|(user, skill_id, value)| Op::Progress {
            user,
            skill_id,
            value
        }),
        (any::<bool>(), 0_u64..5, 0_u64..120).prop_map(|(by_owner, skill_id, threshold)| {
            Op::Badge {
                by_owner,
                skill_id,
                threshold,
            }
        }),
        (0..USERS).prop_map(|user| Op::CreateTeam { user }),
        (0..USERS, 0_u64..5).prop_map(|(user, team_id)| Op::Join { user, team_id }),
    ]
}

fn arb_policy() -> impl Strategy<Value = MembershipPolicy> {
    prop_oneof![Just(MembershipPolicy::Single), Just(MembershipPolicy::Multi)]
}

fn user(n: usize) -> Principal {
    Principal::new(format!("wallet_{n}"))
}

fn owner() -> Principal {
    Principal::new("deployer")
}

fn progress_table(vault: &SkillVault) -> BTreeMap<(usize, u64), u64> {
    let mut table = BTreeMap::new();
    for n in 0..USERS {
        for skill_id in vault.skill_ids() {
            table.insert((n, skill_id), vault.get_skill_progress(&user(n), skill_id).progress);
        }
    }
    table
}

/// Team totals recomputed from scratch.
fn assert_totals_match_members(vault: &SkillVault) {
    for team_id in 1..=vault.team_count() as u64 {
        for skill_id in vault.skill_ids() {
            let expected: u64 = vault
                .team_members(team_id)
                .map(|member| vault.get_skill_progress(member, skill_id).progress)
                .sum();
            assert_eq!(
                vault.get_team_skill_total(team_id, skill_id).unwrap(),
                expected,
                "team {team_id} skill {skill_id}"
            );
        }
    }
}

fn assert_earned_is_threshold_subset(vault: &SkillVault) {
    for n in 0..USERS {
        for skill_id in vault.skill_ids() {
            let progress = vault.get_skill_progress(&user(n), skill_id).progress;
            let mut expected: Vec<_> = vault
                .get_skill_badges(skill_id)
                .unwrap()
                .into_iter()
                .filter(|badge| badge.required_progress <= progress)
                .collect();
            expected.sort_by_key(|badge| (badge.required_progress, badge.id));
            assert_eq!(vault.get_earned_badges(&user(n), skill_id), expected);
        }
    }
}

fn apply(vault: &mut SkillVault, op: &Op) -> Result<u64, ErrorCode> {
    let result = match op {
        Op::Register { by_owner } => {
            let caller = if *by_owner { owner() } else { user(0) };
            vault.register_skill(&caller, "Skill", "")
        }
        Op::Progress {
            user: n,
            skill_id,
            value,
        } => vault.update_skill_progress(&user(*n), *skill_id, *value),
        Op::Badge {
            by_owner,
            skill_id,
            threshold,
        } => {
            let caller = if *by_owner { owner() } else { user(1) };
            vault.create_badge(&caller, *skill_id, *threshold, "Badge")
        }
        Op::CreateTeam { user: n } => vault.create_team(&user(*n), "Team"),
        Op::Join { user: n, team_id } => vault.join_team(&user(*n), *team_id).map(|()| 0),
    };
    result.map_err(|err| err.code())
}

proptest! {
    #[test]
    fn invariants_hold_after_every_op(
        policy in arb_policy(),
        ops in prop::collection::vec(arb_op(), 1..60),
    ) {
        let mut vault = SkillVault::deploy(
            owner(),
            VaultPolicy { membership: policy, ..VaultPolicy::default() },
        );

        for op in &ops {
            let before = vault.clone();
            let progress_before = progress_table(&vault);

            match apply(&mut vault, op) {
                Ok(value) => {
                    match op {
                        Op::Register { .. } => {
                            prop_assert_eq!(value, before.skill_count() as u64 + 1);
                        }
                        Op::Badge { .. } => {
                            prop_assert_eq!(value, before.badge_count() as u64 + 1);
                        }
                        Op::CreateTeam { .. } => {
                            prop_assert_eq!(value, before.team_count() as u64 + 1);
                        }
                        _ => {}
                    }
                }
                Err(code) => {
                    prop_assert_eq!(&vault, &before, "rejected {:?} ({:?}) mutated state", op, code);
                    if let Op::Register { by_owner: false } | Op::Badge { by_owner: false, .. } = op {
                        prop_assert_eq!(code, ErrorCode::OwnerOnly);
                    }
                }
            }

            // progress never decreases
            for (key, old) in &progress_before {
                prop_assert!(progress_table(&vault)[key] >= *old);
            }
            if policy == MembershipPolicy::Single {
                for n in 0..USERS {
                    prop_assert!(vault.get_member_teams(&user(n)).len() <= 1);
                }
            }
            assert_totals_match_members(&vault);
            assert_earned_is_threshold_subset(&vault);
        }
    }

    #[test]
    fn lower_progress_always_rejected(first in 0_u64..1_000, second in 0_u64..1_000) {
        let mut vault = SkillVault::deploy(owner(), VaultPolicy::default());
        vault.register_skill(&owner(), "Programming", "").unwrap();
        vault.update_skill_progress(&user(0), 1, first).unwrap();

        let result = vault.update_skill_progress(&user(0), 1, second);
        if second < first {
            prop_assert_eq!(result.unwrap_err().code(), ErrorCode::InvalidProgress);
            prop_assert_eq!(vault.get_skill_progress(&user(0), 1).progress, first);
        } else {
            prop_assert_eq!(result.unwrap(), second);
            prop_assert_eq!(vault.get_skill_progress(&user(0), 1).progress, second);
        }
    }

    #[test]
    fn state_root_tracks_content(names in prop::collection::vec("[a-zA-Z ]{0,20}", 1..6)) {
        let mut a = SkillVault::deploy(owner(), VaultPolicy::default());
        let mut b = SkillVault::deploy(owner(), VaultPolicy::default());
        for name in &names {
            a.register_skill(&owner(), name, "").unwrap();
            b.register_skill(&owner(), name, "").unwrap();
        }
        prop_assert_eq!(a.state_root().unwrap(), b.state_root().unwrap());

        let before = a.state_root().unwrap();
        a.update_skill_progress(&user(0), 1, 1).unwrap();
        prop_assert_ne!(a.state_root().unwrap(), before);
    }
}
