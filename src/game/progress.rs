//! XP, level, and daily streak bookkeeping.
//!
//! Level is derived from total XP (one level per fixed XP amount) and cached
//! alongside it. The streak counts consecutive calendar days with at least
//! one counted activity; a shop-bought protection charge can bridge one
//! missed day instead of resetting.

use chrono::NaiveDate;
use log::{info, warn};

use crate::game::clock::{today, Clock};
use crate::game::errors::GameError;
use crate::game::store::{
    read_u64, write_int, KeyValueStore, KEY_LAST_ACTIVITY, KEY_LEVEL, KEY_STREAK,
    KEY_STREAK_PROTECTION, KEY_XP, KEY_XP_BOOST,
};

/// Progression tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// XP required per level; level = xp / xp_per_level + 1.
    pub xp_per_level: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { xp_per_level: 500 }
    }
}

/// Outcome of an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    /// XP actually granted (after any boost multiplier).
    pub awarded: u32,
    /// New total XP.
    pub xp: u64,
    /// New level.
    pub level: u32,
    pub leveled_up: bool,
    /// Whether a pending shop boost was applied (and consumed).
    pub boosted: bool,
}

/// Read-only view for the profile screen and CLI status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    /// XP accumulated within the current level.
    pub xp_into_level: u64,
    /// XP still needed for the next level.
    pub xp_to_next: u64,
}

fn level_for(xp: u64, config: &ProgressConfig) -> u32 {
    let per = u64::from(config.xp_per_level.max(1));
    u32::try_from(xp / per).unwrap_or(u32::MAX).saturating_add(1)
}

/// Award XP, applying (and consuming) any pending boost multiplier.
pub fn add_xp(
    store: &impl KeyValueStore,
    config: &ProgressConfig,
    amount: u32,
) -> Result<XpGain, GameError> {
    let boost = read_u64(store, KEY_XP_BOOST, 1)?.max(1);
    let boosted = boost > 1;
    let awarded = u32::try_from(u64::from(amount).saturating_mul(boost)).unwrap_or(u32::MAX);
    if boosted {
        write_int(store, KEY_XP_BOOST, 1u32)?;
    }

    let old_xp = read_u64(store, KEY_XP, 0)?;
    let old_level = level_for(old_xp, config);
    let xp = old_xp.saturating_add(u64::from(awarded));
    let level = level_for(xp, config);
    write_int(store, KEY_XP, xp)?;
    write_int(store, KEY_LEVEL, level)?;

    let leveled_up = level > old_level;
    if leveled_up {
        info!("level up: {} -> {}", old_level, level);
    }
    Ok(XpGain {
        awarded,
        xp,
        level,
        leveled_up,
        boosted,
    })
}

/// Arm the next XP award with a multiplier (shop booster effect).
pub fn set_xp_boost(store: &impl KeyValueStore, multiplier: u32) -> Result<(), GameError> {
    write_int(store, KEY_XP_BOOST, multiplier.max(1))
}

/// Add streak-protection charges (shop shield effect).
pub fn add_streak_protection(store: &impl KeyValueStore, charges: u32) -> Result<u32, GameError> {
    let updated = read_u64(store, KEY_STREAK_PROTECTION, 0)?.saturating_add(u64::from(charges));
    write_int(store, KEY_STREAK_PROTECTION, updated)?;
    Ok(u32::try_from(updated).unwrap_or(u32::MAX))
}

fn last_activity_date(store: &impl KeyValueStore) -> Result<Option<NaiveDate>, GameError> {
    let Some(raw) = store.get(KEY_LAST_ACTIVITY)? else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            warn!("corrupt lastActivity value {raw:?}; treating as unset");
            Ok(None)
        }
    }
}

/// Count today's activity toward the streak. Same-day repeats are no-ops;
/// a consecutive day increments; a gap resets to 1 unless a protection
/// charge is consumed to bridge it. Returns the current streak.
pub fn update_streak(store: &impl KeyValueStore, clock: &impl Clock) -> Result<u32, GameError> {
    let today = today(clock);
    let current = read_u64(store, KEY_STREAK, 0)? as u32;
    let last = last_activity_date(store)?;

    if last == Some(today) {
        return Ok(current.max(1));
    }

    let continued = last.and_then(|d| d.succ_opt()) == Some(today);
    let streak = if continued {
        current.saturating_add(1)
    } else if last.is_some() {
        let charges = read_u64(store, KEY_STREAK_PROTECTION, 0)?;
        if charges > 0 {
            write_int(store, KEY_STREAK_PROTECTION, charges - 1)?;
            info!("streak protected across a missed day ({} charges left)", charges - 1);
            current.saturating_add(1)
        } else {
            info!("streak reset after a missed day (was {current})");
            1
        }
    } else {
        1
    };

    write_int(store, KEY_STREAK, streak)?;
    store.put(KEY_LAST_ACTIVITY, &today.format("%Y-%m-%d").to_string())?;
    Ok(streak)
}

/// Current progression state, read side only.
pub fn snapshot(
    store: &impl KeyValueStore,
    config: &ProgressConfig,
) -> Result<ProgressSnapshot, GameError> {
    let xp = read_u64(store, KEY_XP, 0)?;
    let level = level_for(xp, config);
    let streak = read_u64(store, KEY_STREAK, 0)? as u32;
    let per = u64::from(config.xp_per_level.max(1));
    let xp_into_level = xp % per;
    Ok(ProgressSnapshot {
        xp,
        level,
        streak,
        xp_into_level,
        xp_to_next: per - xp_into_level,
    })
}

/// One-line summary, e.g. `Lv 3 | 450 XP (50 to next) | streak 7`.
pub fn format_progress(snap: &ProgressSnapshot) -> String {
    format!(
        "Lv {} | {} XP ({} to next) | streak {}",
        snap.level, snap.xp, snap.xp_to_next, snap.streak
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::game::store::MemoryStore;

    const DAY_MS: i64 = 86_400_000;
    // 2024-05-01T12:00:00Z
    const BASE_MS: i64 = 1_714_564_800_000;

    #[test]
    fn xp_levels_every_500() {
        let store = MemoryStore::new();
        let config = ProgressConfig::default();
        let gain = add_xp(&store, &config, 450).unwrap();
        assert_eq!(gain.level, 1);
        assert!(!gain.leveled_up);

        let gain = add_xp(&store, &config, 100).unwrap();
        assert_eq!(gain.xp, 550);
        assert_eq!(gain.level, 2);
        assert!(gain.leveled_up);
    }

    #[test]
    fn xp_boost_applies_once() {
        let store = MemoryStore::new();
        let config = ProgressConfig::default();
        set_xp_boost(&store, 2).unwrap();

        let gain = add_xp(&store, &config, 50).unwrap();
        assert_eq!(gain.awarded, 100);
        assert!(gain.boosted);

        let gain = add_xp(&store, &config, 50).unwrap();
        assert_eq!(gain.awarded, 50);
        assert!(!gain.boosted);
    }

    #[test]
    fn streak_counts_consecutive_days_once_each() {
        let store = MemoryStore::new();
        let clock = ManualClock::at(BASE_MS);

        assert_eq!(update_streak(&store, &clock).unwrap(), 1);
        // Second activity the same day does not increment
        assert_eq!(update_streak(&store, &clock).unwrap(), 1);

        clock.advance_ms(DAY_MS);
        assert_eq!(update_streak(&store, &clock).unwrap(), 2);
        clock.advance_ms(DAY_MS);
        assert_eq!(update_streak(&store, &clock).unwrap(), 3);
    }

    #[test]
    fn missed_day_resets_without_protection() {
        let store = MemoryStore::new();
        let clock = ManualClock::at(BASE_MS);
        update_streak(&store, &clock).unwrap();
        clock.advance_ms(DAY_MS);
        update_streak(&store, &clock).unwrap();

        clock.advance_ms(2 * DAY_MS);
        assert_eq!(update_streak(&store, &clock).unwrap(), 1);
    }

    #[test]
    fn protection_charge_bridges_one_gap() {
        let store = MemoryStore::new();
        let clock = ManualClock::at(BASE_MS);
        update_streak(&store, &clock).unwrap();
        clock.advance_ms(DAY_MS);
        update_streak(&store, &clock).unwrap();
        add_streak_protection(&store, 1).unwrap();

        clock.advance_ms(2 * DAY_MS);
        assert_eq!(update_streak(&store, &clock).unwrap(), 3);
        assert_eq!(read_u64(&store, KEY_STREAK_PROTECTION, 0).unwrap(), 0);

        // Next gap has no charge left
        clock.advance_ms(2 * DAY_MS);
        assert_eq!(update_streak(&store, &clock).unwrap(), 1);
    }

    #[test]
    fn snapshot_reports_level_math() {
        let store = MemoryStore::new();
        let config = ProgressConfig::default();
        add_xp(&store, &config, 450).unwrap();
        let snap = snapshot(&store, &config).unwrap();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.xp_into_level, 450);
        assert_eq!(snap.xp_to_next, 50);
        assert_eq!(
            format_progress(&snap),
            "Lv 1 | 450 XP (50 to next) | streak 0"
        );
    }
}
