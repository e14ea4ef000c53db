//! Achievement tracking: a static catalog of unlock rules and rewards, an
//! earned-id set persisted as JSON, and an evaluation pass that grants
//! rewards through the ledger and progression modules.

use std::collections::HashSet;

use log::info;

use crate::game::catalog;
use crate::game::errors::GameError;
use crate::game::ledger::{self, CurrencyKind};
use crate::game::progress::{self, ProgressConfig};
use crate::game::store::{read_json, write_json, KeyValueStore, KEY_ACHIEVEMENTS};

/// Condition that unlocks an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    LessonsCompleted { required: u32 },
    StreakDays { required: u32 },
    LevelReached { required: u32 },
    CoinsHeld { required: u64 },
}

/// Reward granted exactly once when the achievement unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementReward {
    pub xp: u32,
    pub coins: u64,
    pub gems: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: UnlockRule,
    pub reward: AchievementReward,
}

const CATALOG: &[Achievement] = &[
    Achievement {
        id: "first_step",
        name: "First Step",
        description: "Complete your first lesson",
        icon: "🎓",
        rule: UnlockRule::LessonsCompleted { required: 1 },
        reward: AchievementReward { xp: 50, coins: 50, gems: 0 },
    },
    Achievement {
        id: "bookworm",
        name: "Bookworm",
        description: "Complete 5 lessons",
        icon: "📚",
        rule: UnlockRule::LessonsCompleted { required: 5 },
        reward: AchievementReward { xp: 100, coins: 100, gems: 0 },
    },
    Achievement {
        id: "deep_diver",
        name: "Deep Diver",
        description: "Finish the whole boundaries course",
        icon: "🧠",
        rule: UnlockRule::LessonsCompleted { required: 9 },
        reward: AchievementReward { xp: 250, coins: 200, gems: 5 },
    },
    Achievement {
        id: "on_a_roll",
        name: "On a Roll",
        description: "Keep a 7-day streak",
        icon: "🔥",
        rule: UnlockRule::StreakDays { required: 7 },
        reward: AchievementReward { xp: 200, coins: 150, gems: 5 },
    },
    Achievement {
        id: "iron_will",
        name: "Iron Will",
        description: "Keep a 30-day streak",
        icon: "💪",
        rule: UnlockRule::StreakDays { required: 30 },
        reward: AchievementReward { xp: 1000, coins: 500, gems: 25 },
    },
    Achievement {
        id: "boundary_master",
        name: "Boundary Master",
        description: "Reach level 5",
        icon: "👑",
        rule: UnlockRule::LevelReached { required: 5 },
        reward: AchievementReward { xp: 500, coins: 500, gems: 20 },
    },
    Achievement {
        id: "saver",
        name: "Saver",
        description: "Hold 1000 coins at once",
        icon: "💰",
        rule: UnlockRule::CoinsHeld { required: 1000 },
        reward: AchievementReward { xp: 0, coins: 0, gems: 10 },
    },
];

/// The full achievement catalog, in display order.
pub fn achievement_catalog() -> &'static [Achievement] {
    CATALOG
}

/// Ids of achievements already earned.
pub fn earned_ids(store: &impl KeyValueStore) -> Result<HashSet<String>, GameError> {
    let ids: Vec<String> = read_json(store, KEY_ACHIEVEMENTS)?;
    Ok(ids.into_iter().collect())
}

fn rule_met(
    rule: &UnlockRule,
    lessons_done: u32,
    streak: u32,
    level: u32,
    coins: u64,
) -> bool {
    match rule {
        UnlockRule::LessonsCompleted { required } => lessons_done >= *required,
        UnlockRule::StreakDays { required } => streak >= *required,
        UnlockRule::LevelReached { required } => level >= *required,
        UnlockRule::CoinsHeld { required } => coins >= *required,
    }
}

/// Check every locked achievement against the current profile state. Newly
/// unlocked ones are persisted and their rewards granted; already-earned
/// achievements never re-trigger. Returns the newly unlocked entries.
pub fn evaluate(
    store: &impl KeyValueStore,
    progress_config: &ProgressConfig,
) -> Result<Vec<&'static Achievement>, GameError> {
    let mut earned = earned_ids(store)?;
    let lessons_done = catalog::load_completed(store)?.len() as u32;
    let snap = progress::snapshot(store, progress_config)?;
    let coins = ledger::balance(store, CurrencyKind::Coins)?;

    let mut unlocked = Vec::new();
    for achievement in CATALOG {
        if earned.contains(achievement.id) {
            continue;
        }
        if !rule_met(&achievement.rule, lessons_done, snap.streak, snap.level, coins) {
            continue;
        }
        earned.insert(achievement.id.to_string());
        info!("achievement unlocked: {}", achievement.id);
        unlocked.push(achievement);
    }

    if unlocked.is_empty() {
        return Ok(unlocked);
    }

    let mut ids: Vec<&str> = earned.iter().map(String::as_str).collect();
    ids.sort_unstable();
    write_json(store, KEY_ACHIEVEMENTS, &ids)?;

    for achievement in &unlocked {
        let reward = achievement.reward;
        if reward.coins > 0 {
            ledger::credit(store, CurrencyKind::Coins, reward.coins)?;
        }
        if reward.gems > 0 {
            ledger::credit(store, CurrencyKind::Gems, reward.gems)?;
        }
        if reward.xp > 0 {
            progress::add_xp(store, progress_config, reward.xp)?;
        }
    }

    Ok(unlocked)
}

/// Profile-screen listing: earned achievements first, then locked ones.
pub fn format_achievements(store: &impl KeyValueStore) -> Result<String, GameError> {
    let earned = earned_ids(store)?;
    let mut out = String::from("=== ACHIEVEMENTS ===\n");
    for achievement in CATALOG {
        let marker = if earned.contains(achievement.id) {
            achievement.icon
        } else {
            "🔒"
        };
        out.push_str(&format!(
            "{} {}: {}\n",
            marker, achievement.name, achievement.description
        ));
    }
    Ok(out)
}
