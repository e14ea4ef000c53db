//! Energy: a bounded resource that regenerates one unit per fixed interval
//! of wall-clock time, capped at a maximum.
//!
//! There is no background process doing the regeneration. Every read lazily
//! "catches up" from the stored value and timestamp, so energy accrues even
//! while the app was closed. The periodic ticker spawned while the UI is
//! mounted calls the exact same recompute, which keeps the while-open and
//! while-closed accounting from ever drifting apart.
//!
//! Correctness hinges on one rule: a recomputed value is always persisted
//! together with its matching timestamp. The timestamp advances by exactly
//! the whole intervals that were credited; the fractional remainder stays
//! banked so sub-interval reads never lose partial progress.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::game::clock::Clock;
use crate::game::errors::GameError;
use crate::game::store::{
    read_i64, read_u64, write_int, KeyValueStore, KEY_ENERGY, KEY_LAST_ENERGY_UPDATE,
};

/// Tuning knobs for the regenerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyConfig {
    /// Upper bound; also the first-load initial value.
    pub max_energy: u32,
    /// Wall-clock time that regenerates one unit.
    pub regen_interval_ms: i64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: 100,
            regen_interval_ms: 60_000,
        }
    }
}

impl EnergyConfig {
    pub fn regen_interval(&self) -> Duration {
        Duration::from_millis(self.regen_interval_ms.max(1) as u64)
    }
}

/// Result of applying elapsed time to a stored energy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenStep {
    /// Clamped value after crediting whole elapsed intervals.
    pub value: u32,
    /// Milliseconds of elapsed time consumed (whole intervals only).
    pub advanced_ms: i64,
}

/// The one place the catch-up arithmetic lives. Both the lazy read path and
/// the passive ticker go through here. Negative elapsed time (clock skew)
/// floors to zero regeneration.
pub fn regen_step(stored: u32, elapsed_ms: i64, config: &EnergyConfig) -> RegenStep {
    let interval = config.regen_interval_ms.max(1);
    let whole = elapsed_ms.max(0) / interval;
    let gain = u32::try_from(whole).unwrap_or(u32::MAX);
    RegenStep {
        value: stored.saturating_add(gain).min(config.max_energy),
        advanced_ms: whole.saturating_mul(interval),
    }
}

/// Stored pair plus a flag for whether any fallback was applied (missing or
/// corrupt record that should be materialized on this read).
fn load_state(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
) -> Result<(u32, i64, bool), GameError> {
    let raw_energy = store.get(KEY_ENERGY)?;
    let raw_ts = store.get(KEY_LAST_ENERGY_UPDATE)?;
    let missing = raw_energy.is_none() || raw_ts.is_none();
    if raw_energy.as_deref().is_some_and(|v| v.trim().parse::<u32>().is_err()) {
        warn!("corrupt stored energy {raw_energy:?}; resetting to max");
    }
    let stored = read_u64(store, KEY_ENERGY, u64::from(config.max_energy))?
        .min(u64::from(config.max_energy)) as u32;
    let ts = read_i64(store, KEY_LAST_ENERGY_UPDATE, clock.now_ms())?;
    Ok((stored, ts, missing))
}

fn persist(store: &impl KeyValueStore, value: u32, ts: i64) -> Result<(), GameError> {
    // Both halves always written together; see module docs.
    write_int(store, KEY_ENERGY, value)?;
    write_int(store, KEY_LAST_ENERGY_UPDATE, ts)
}

/// Current energy after lazy catch-up. Persists the recomputed value and the
/// advanced timestamp whenever whole intervals were consumed; a second call
/// with no elapsed time returns the same value and changes nothing.
pub fn read_current(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
) -> Result<u32, GameError> {
    let now = clock.now_ms();
    let (stored, ts, materialize) = load_state(store, clock, config)?;
    let step = regen_step(stored, now.saturating_sub(ts), config);
    if step.advanced_ms > 0 || materialize {
        persist(store, step.value, ts.saturating_add(step.advanced_ms))?;
        if step.value != stored {
            debug!("energy caught up {} -> {}", stored, step.value);
        }
    }
    Ok(step.value)
}

/// Spend `amount` energy. Catches up first; returns `false` without touching
/// state when the recomputed value does not cover the cost.
pub fn consume(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
    amount: u32,
) -> Result<bool, GameError> {
    let current = read_current(store, clock, config)?;
    if current < amount {
        debug!("energy consume refused: need {amount}, have {current}");
        return Ok(false);
    }
    persist(store, current - amount, clock.now_ms())?;
    info!("energy consumed {} -> {}", current, current - amount);
    Ok(true)
}

/// Add `amount` energy, clamped at the maximum. Always succeeds; returns the
/// new value.
pub fn refill(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
    amount: u32,
) -> Result<u32, GameError> {
    let current = read_current(store, clock, config)?;
    let updated = current.saturating_add(amount).min(config.max_energy);
    persist(store, updated, clock.now_ms())?;
    info!("energy refilled {} -> {}", current, updated);
    Ok(updated)
}

/// Seconds until the next regenerated unit, `None` when already full.
pub fn time_to_next_unit(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
) -> Result<Option<u64>, GameError> {
    let current = read_current(store, clock, config)?;
    if current >= config.max_energy {
        return Ok(None);
    }
    let ts = read_i64(store, KEY_LAST_ENERGY_UPDATE, clock.now_ms())?;
    let interval = config.regen_interval_ms.max(1);
    let into_interval = clock.now_ms().saturating_sub(ts).max(0) % interval;
    let remaining_ms = interval - into_interval;
    Ok(Some(remaining_ms.div_euclid(1000).max(1) as u64))
}

/// HUD line, e.g. `92/100 (+1 in 34s)` or `100/100 (full)`.
pub fn format_energy(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    config: &EnergyConfig,
) -> Result<String, GameError> {
    let current = read_current(store, clock, config)?;
    match time_to_next_unit(store, clock, config)? {
        Some(secs) => Ok(format!("{}/{} (+1 in {}s)", current, config.max_energy, secs)),
        None => Ok(format!("{}/{} (full)", current, config.max_energy)),
    }
}

/// Passive live-display ticker: once per regen interval, run the same
/// catch-up recompute the read path uses. Abort the returned handle on
/// teardown so no writes land after unmount.
pub fn spawn_regen_ticker<S, C>(
    store: Arc<S>,
    clock: Arc<C>,
    config: EnergyConfig,
) -> JoinHandle<()>
where
    S: KeyValueStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.regen_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately; skip it so the loop waits a full
        // interval before the first recompute.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = read_current(store.as_ref(), clock.as_ref(), &config) {
                warn!("energy ticker recompute failed: {err}");
            }
        }
    })
}
