//! Lesson content catalog and the lesson-completion flow.
//!
//! The course itself is static content; the only persisted state is the set
//! of completed lesson ids. Per-lesson status (completed / current /
//! available / locked) is derived from that set and the course order, the
//! way the original map screen presents it.

use std::collections::HashSet;

use log::info;
use rand::Rng;

use crate::game::achievements::{self, Achievement};
use crate::game::clock::Clock;
use crate::game::energy::{self, EnergyConfig};
use crate::game::errors::GameError;
use crate::game::ledger::{self, CurrencyKind};
use crate::game::progress::{self, ProgressConfig, XpGain};
use crate::game::quests::{self, QuestEvent};
use crate::game::store::{read_json, write_json, KeyValueStore, KEY_COMPLETED_LESSONS};

/// One lesson of the course. Static content, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub xp_reward: u32,
    pub coin_reward: u64,
    pub energy_cost: u32,
}

const COURSE: &[Lesson] = &[
    Lesson { id: "1", title: "What are personal boundaries?", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "2", title: "Signs of crossed boundaries", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "3", title: "How to say \"no\"", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "4", title: "Boundaries with family", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "5", title: "Boundaries with friends", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "6", title: "Digital boundaries", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "7", title: "Emotional boundaries", xp_reward: 50, coin_reward: 25, energy_cost: 10 },
    Lesson { id: "8", title: "Practice in real life", xp_reward: 75, coin_reward: 40, energy_cost: 10 },
    Lesson { id: "9", title: "Final review", xp_reward: 100, coin_reward: 50, energy_cost: 10 },
];

/// The full course, in map order.
pub fn course_catalog() -> &'static [Lesson] {
    COURSE
}

/// Look up a lesson by id.
pub fn find_lesson(lesson_id: &str) -> Option<&'static Lesson> {
    COURSE.iter().find(|l| l.id == lesson_id)
}

/// Display status of a lesson on the map screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonStatus {
    Completed,
    /// The next lesson to take.
    Current,
    /// Reachable right after the current one.
    Available,
    Locked,
}

/// Persisted set of completed lesson ids.
pub fn load_completed(store: &impl KeyValueStore) -> Result<HashSet<String>, GameError> {
    let ids: Vec<String> = read_json(store, KEY_COMPLETED_LESSONS)?;
    Ok(ids.into_iter().collect())
}

fn save_completed(
    store: &impl KeyValueStore,
    completed: &HashSet<String>,
) -> Result<(), GameError> {
    let mut ids: Vec<&str> = completed.iter().map(String::as_str).collect();
    ids.sort_unstable();
    write_json(store, KEY_COMPLETED_LESSONS, &ids)
}

/// Derive the map-screen status of every lesson: completed ones marked, the
/// first uncompleted lesson is current, the one after it available, the rest
/// locked.
pub fn lesson_statuses(
    store: &impl KeyValueStore,
) -> Result<Vec<(&'static Lesson, LessonStatus)>, GameError> {
    let completed = load_completed(store)?;
    let mut seen_current = false;
    let mut seen_available = false;
    let mut out = Vec::with_capacity(COURSE.len());
    for lesson in COURSE {
        let status = if completed.contains(lesson.id) {
            LessonStatus::Completed
        } else if !seen_current {
            seen_current = true;
            LessonStatus::Current
        } else if !seen_available {
            seen_available = true;
            LessonStatus::Available
        } else {
            LessonStatus::Locked
        };
        out.push((lesson, status));
    }
    Ok(out)
}

/// Everything granted by one lesson completion.
#[derive(Debug, Clone)]
pub struct LessonSummary {
    pub lesson_id: &'static str,
    pub xp: XpGain,
    pub coins_awarded: u64,
    pub streak: u32,
    pub achievements: Vec<&'static Achievement>,
    pub quests_completed: Vec<String>,
}

/// Result of a completion attempt.
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    Completed(Box<LessonSummary>),
    NotEnoughEnergy { required: u32, available: u32 },
    AlreadyCompleted,
}

/// Complete a lesson: spend its energy cost, record it, award XP and coins,
/// count the streak day, then run quest progress and achievement checks.
/// The one place the modules tie together.
pub fn complete_lesson(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    rng: &mut impl Rng,
    energy_config: &EnergyConfig,
    progress_config: &ProgressConfig,
    lesson_id: &str,
) -> Result<CompletionOutcome, GameError> {
    let lesson = find_lesson(lesson_id)
        .ok_or_else(|| GameError::NotFound(format!("lesson: {lesson_id}")))?;

    let mut completed = load_completed(store)?;
    if completed.contains(lesson.id) {
        return Ok(CompletionOutcome::AlreadyCompleted);
    }

    if !energy::consume(store, clock, energy_config, lesson.energy_cost)? {
        let available = energy::read_current(store, clock, energy_config)?;
        return Ok(CompletionOutcome::NotEnoughEnergy {
            required: lesson.energy_cost,
            available,
        });
    }

    completed.insert(lesson.id.to_string());
    save_completed(store, &completed)?;

    let xp = progress::add_xp(store, progress_config, lesson.xp_reward)?;
    let coins_awarded = lesson.coin_reward;
    ledger::credit(store, CurrencyKind::Coins, coins_awarded)?;
    let streak = progress::update_streak(store, clock)?;

    let mut quests_completed =
        quests::record_event(store, clock, rng, QuestEvent::LessonCompleted)?;
    quests_completed.extend(quests::record_event(
        store,
        clock,
        rng,
        QuestEvent::EnergySpent(lesson.energy_cost),
    )?);
    quests_completed.extend(quests::record_event(
        store,
        clock,
        rng,
        QuestEvent::CoinsEarned(u32::try_from(coins_awarded).unwrap_or(u32::MAX)),
    )?);

    let unlocked = achievements::evaluate(store, progress_config)?;

    info!(
        "lesson {} completed: +{} XP, +{} coins, streak {}",
        lesson.id, xp.awarded, coins_awarded, streak
    );
    Ok(CompletionOutcome::Completed(Box::new(LessonSummary {
        lesson_id: lesson.id,
        xp,
        coins_awarded,
        streak,
        achievements: unlocked,
        quests_completed,
    })))
}

/// Map listing for the CLI: one line per lesson with its status marker.
pub fn format_course(store: &impl KeyValueStore) -> Result<String, GameError> {
    let mut out = String::from("=== BOUNDARIES COURSE ===\n");
    for (lesson, status) in lesson_statuses(store)? {
        let marker = match status {
            LessonStatus::Completed => "✓",
            LessonStatus::Current => ">",
            LessonStatus::Available => "·",
            LessonStatus::Locked => "✕",
        };
        out.push_str(&format!(
            "{} {}. {} (+{} XP)\n",
            marker, lesson.id, lesson.title, lesson.xp_reward
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::game::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (MemoryStore, ManualClock, StdRng) {
        (
            MemoryStore::new(),
            ManualClock::at(1_714_564_800_000),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn statuses_follow_course_order() {
        let (store, _clock, _rng) = setup();
        let statuses = lesson_statuses(&store).unwrap();
        assert_eq!(statuses[0].1, LessonStatus::Current);
        assert_eq!(statuses[1].1, LessonStatus::Available);
        assert_eq!(statuses[2].1, LessonStatus::Locked);
    }

    #[test]
    fn completing_advances_the_map() {
        let (store, clock, mut rng) = setup();
        let energy_cfg = EnergyConfig::default();
        let progress_cfg = ProgressConfig::default();

        let outcome = complete_lesson(&store, &clock, &mut rng, &energy_cfg, &progress_cfg, "1")
            .unwrap();
        let CompletionOutcome::Completed(summary) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(summary.xp.awarded, 50);
        assert_eq!(summary.coins_awarded, 25);
        assert_eq!(summary.streak, 1);
        // First lesson unlocks the first-step achievement
        assert!(summary.achievements.iter().any(|a| a.id == "first_step"));

        let statuses = lesson_statuses(&store).unwrap();
        assert_eq!(statuses[0].1, LessonStatus::Completed);
        assert_eq!(statuses[1].1, LessonStatus::Current);
    }

    #[test]
    fn repeat_completion_is_flagged() {
        let (store, clock, mut rng) = setup();
        let energy_cfg = EnergyConfig::default();
        let progress_cfg = ProgressConfig::default();
        complete_lesson(&store, &clock, &mut rng, &energy_cfg, &progress_cfg, "1").unwrap();

        let outcome = complete_lesson(&store, &clock, &mut rng, &energy_cfg, &progress_cfg, "1")
            .unwrap();
        assert!(matches!(outcome, CompletionOutcome::AlreadyCompleted));
    }

    #[test]
    fn refuses_without_energy() {
        let (store, clock, mut rng) = setup();
        let energy_cfg = EnergyConfig::default();
        let progress_cfg = ProgressConfig::default();
        energy::consume(&store, &clock, &energy_cfg, 95).unwrap();

        let outcome = complete_lesson(&store, &clock, &mut rng, &energy_cfg, &progress_cfg, "1")
            .unwrap();
        let CompletionOutcome::NotEnoughEnergy { required, available } = outcome else {
            panic!("expected energy refusal");
        };
        assert_eq!(required, 10);
        assert_eq!(available, 5);
        // Nothing was recorded
        assert!(load_completed(&store).unwrap().is_empty());
    }

    #[test]
    fn unknown_lesson_is_an_error() {
        let (store, clock, mut rng) = setup();
        assert!(matches!(
            complete_lesson(
                &store,
                &clock,
                &mut rng,
                &EnergyConfig::default(),
                &ProgressConfig::default(),
                "42"
            ),
            Err(GameError::NotFound(_))
        ));
    }
}
