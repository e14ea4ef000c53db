//! Daily quests: three goals rolled per calendar day from a static pool,
//! persisted as JSON slots alongside the date they were rolled for. When
//! the stored date is stale the slots reshuffle; progress carries only
//! within the day. Completion pays a coin reward exactly once.

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::clock::{today, Clock};
use crate::game::errors::GameError;
use crate::game::ledger::{self, CurrencyKind};
use crate::game::store::{
    read_json, write_json, KeyValueStore, KEY_DAILY_QUESTS, KEY_DAILY_QUESTS_DATE,
};

/// What a quest asks the user to do today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestGoal {
    CompleteLessons { required: u32 },
    SpendEnergy { required: u32 },
    EarnCoins { required: u32 },
    /// Answer the companion's question in a chat lesson.
    TalkToCompanion,
}

impl QuestGoal {
    fn required(&self) -> u32 {
        match self {
            Self::CompleteLessons { required } | Self::SpendEnergy { required } => *required,
            Self::EarnCoins { required } => *required,
            Self::TalkToCompanion => 1,
        }
    }
}

/// Static quest definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestDef {
    pub id: &'static str,
    pub title: &'static str,
    pub goal: QuestGoal,
    pub reward_coins: u64,
}

const POOL: &[QuestDef] = &[
    QuestDef {
        id: "daily_lesson",
        title: "Complete a lesson",
        goal: QuestGoal::CompleteLessons { required: 1 },
        reward_coins: 40,
    },
    QuestDef {
        id: "double_lesson",
        title: "Complete two lessons",
        goal: QuestGoal::CompleteLessons { required: 2 },
        reward_coins: 90,
    },
    QuestDef {
        id: "spend_energy",
        title: "Spend 20 energy",
        goal: QuestGoal::SpendEnergy { required: 20 },
        reward_coins: 30,
    },
    QuestDef {
        id: "earn_coins",
        title: "Earn 50 coins",
        goal: QuestGoal::EarnCoins { required: 50 },
        reward_coins: 25,
    },
    QuestDef {
        id: "open_up",
        title: "Share your thoughts with Katya",
        goal: QuestGoal::TalkToCompanion,
        reward_coins: 35,
    },
    QuestDef {
        id: "big_spender",
        title: "Spend 30 energy",
        goal: QuestGoal::SpendEnergy { required: 30 },
        reward_coins: 50,
    },
];

/// How many quests are active per day.
pub const QUESTS_PER_DAY: usize = 3;

/// Persisted per-day quest slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSlot {
    pub quest_id: String,
    pub progress: u32,
    pub completed: bool,
}

/// Something quest progress can be recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestEvent {
    LessonCompleted,
    EnergySpent(u32),
    CoinsEarned(u32),
    CompanionReply,
}

/// Static pool the daily picks are drawn from.
pub fn quest_pool() -> &'static [QuestDef] {
    POOL
}

/// Look up a pool entry by id.
pub fn find_quest(quest_id: &str) -> Option<&'static QuestDef> {
    POOL.iter().find(|q| q.id == quest_id)
}

/// Today's quest slots, rolling fresh ones when the stored date is stale
/// (or the record is missing/corrupt).
pub fn daily_quests(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    rng: &mut impl Rng,
) -> Result<Vec<QuestSlot>, GameError> {
    let today = today(clock).format("%Y-%m-%d").to_string();
    let stored_date = store.get(KEY_DAILY_QUESTS_DATE)?;
    if stored_date.as_deref() == Some(today.as_str()) {
        let slots: Vec<QuestSlot> = read_json(store, KEY_DAILY_QUESTS)?;
        if !slots.is_empty() {
            return Ok(slots);
        }
    }

    let slots: Vec<QuestSlot> = POOL
        .choose_multiple(rng, QUESTS_PER_DAY)
        .map(|def| QuestSlot {
            quest_id: def.id.to_string(),
            progress: 0,
            completed: false,
        })
        .collect();
    write_json(store, KEY_DAILY_QUESTS, &slots)?;
    store.put(KEY_DAILY_QUESTS_DATE, &today)?;
    info!(
        "rolled daily quests: {:?}",
        slots.iter().map(|s| s.quest_id.as_str()).collect::<Vec<_>>()
    );
    Ok(slots)
}

fn event_progress(goal: &QuestGoal, event: &QuestEvent) -> u32 {
    match (goal, event) {
        (QuestGoal::CompleteLessons { .. }, QuestEvent::LessonCompleted) => 1,
        (QuestGoal::SpendEnergy { .. }, QuestEvent::EnergySpent(amount)) => *amount,
        (QuestGoal::EarnCoins { .. }, QuestEvent::CoinsEarned(amount)) => *amount,
        (QuestGoal::TalkToCompanion, QuestEvent::CompanionReply) => 1,
        _ => 0,
    }
}

/// Advance today's quests with an activity event. Quests reaching their
/// requirement are marked completed and their coin reward credited once.
/// Returns the ids of quests completed by this event.
pub fn record_event(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    rng: &mut impl Rng,
    event: QuestEvent,
) -> Result<Vec<String>, GameError> {
    let mut slots = daily_quests(store, clock, rng)?;
    let mut completed_now = Vec::new();

    for slot in &mut slots {
        if slot.completed {
            continue;
        }
        let Some(def) = find_quest(&slot.quest_id) else {
            continue;
        };
        let gained = event_progress(&def.goal, &event);
        if gained == 0 {
            continue;
        }
        slot.progress = slot.progress.saturating_add(gained);
        if slot.progress >= def.goal.required() {
            slot.completed = true;
            ledger::credit(store, CurrencyKind::Coins, def.reward_coins)?;
            info!("quest completed: {} (+{} coins)", def.id, def.reward_coins);
            completed_now.push(def.id.to_string());
        }
    }

    write_json(store, KEY_DAILY_QUESTS, &slots)?;
    Ok(completed_now)
}

/// CLI listing of today's quests with progress bars.
pub fn format_quests(slots: &[QuestSlot]) -> String {
    let mut out = String::from("=== DAILY QUESTS ===\n");
    for slot in slots {
        let Some(def) = find_quest(&slot.quest_id) else {
            continue;
        };
        let required = def.goal.required();
        let status = if slot.completed {
            "done".to_string()
        } else {
            format!("{}/{}", slot.progress.min(required), required)
        };
        out.push_str(&format!(
            "[{}] {} (+{} coins)\n",
            status, def.title, def.reward_coins
        ));
    }
    out
}
