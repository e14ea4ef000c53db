//! Profile persistence: a synchronous string key-value contract with a
//! sled-backed implementation and an in-memory test double.
//!
//! Every durable value in the engine lives under one of the key constants
//! below, encoded as a plain string (integers) or JSON (collections). The
//! trait seam exists so module logic can be tested without touching disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::game::errors::GameError;

/// Coin balance, string-encoded unsigned integer.
pub const KEY_COINS: &str = "userCoins";
/// Gem balance, string-encoded unsigned integer.
pub const KEY_GEMS: &str = "userGems";
/// Current energy, string-encoded integer in `0..=max_energy`.
pub const KEY_ENERGY: &str = "userEnergy";
/// Epoch-millisecond timestamp of the last energy mutation.
pub const KEY_LAST_ENERGY_UPDATE: &str = "lastEnergyUpdate";
/// Accumulated experience points.
pub const KEY_XP: &str = "userXP";
/// Cached level derived from XP.
pub const KEY_LEVEL: &str = "userLevel";
/// Current daily streak length.
pub const KEY_STREAK: &str = "currentStreak";
/// ISO-8601 date of the last streak-counted activity.
pub const KEY_LAST_ACTIVITY: &str = "lastActivity";
/// Pending XP multiplier from the shop booster (1 = inactive).
pub const KEY_XP_BOOST: &str = "activeXPBoost";
/// Remaining streak-protection charges.
pub const KEY_STREAK_PROTECTION: &str = "streakProtection";
/// JSON array of item stacks owned by the user.
pub const KEY_INVENTORY: &str = "userInventory";
/// JSON array of earned achievement ids.
pub const KEY_ACHIEVEMENTS: &str = "userAchievements";
/// JSON array of completed lesson ids.
pub const KEY_COMPLETED_LESSONS: &str = "completedLessons";
/// JSON array of today's quest slots.
pub const KEY_DAILY_QUESTS: &str = "dailyQuests";
/// ISO-8601 date the daily quests were rolled for.
pub const KEY_DAILY_QUESTS_DATE: &str = "dailyQuestsDate";

const TREE_PROFILE: &str = "teenspace_profile";

/// Synchronous string-keyed persistence used by every engine module.
///
/// Implementations must be cheap to call from the UI path; there is exactly
/// one logical writer at a time, so no transactional guarantees are offered.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, GameError>;

    /// Insert or replace the value stored under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), GameError>;
}

/// Sled-backed persistence for the user profile.
pub struct SledStore {
    _db: sled::Db,
    profile: sled::Tree,
    path: PathBuf,
}

impl SledStore {
    /// Open (or create) the profile store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let profile = db.open_tree(TREE_PROFILE)?;
        Ok(Self {
            _db: db,
            profile,
            path: path_ref.to_path_buf(),
        })
    }

    /// Filesystem location backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, GameError> {
        let Some(bytes) = self.profile.get(key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), GameError> {
        self.profile.insert(key.as_bytes(), value.as_bytes())?;
        self.profile.flush()?;
        Ok(())
    }
}

/// In-memory store used as a test double and for ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing the trait. Test convenience.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GameError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| GameError::Internal("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), GameError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| GameError::Internal("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a string-encoded unsigned integer, falling back to `default` when the
/// key is absent or holds a non-numeric value. Corrupt values are logged and
/// treated as missing rather than surfaced as errors.
pub fn read_u64(
    store: &impl KeyValueStore,
    key: &str,
    default: u64,
) -> Result<u64, GameError> {
    match store.get(key)? {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!("corrupt value under {key:?} ({raw:?}); using default {default}");
                Ok(default)
            }
        },
    }
}

/// Signed variant of [`read_u64`], used for epoch-millisecond timestamps.
pub fn read_i64(
    store: &impl KeyValueStore,
    key: &str,
    default: i64,
) -> Result<i64, GameError> {
    match store.get(key)? {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!("corrupt value under {key:?} ({raw:?}); using default {default}");
                Ok(default)
            }
        },
    }
}

/// Persist an integer value as its decimal string form.
pub fn write_int(
    store: &impl KeyValueStore,
    key: &str,
    value: impl std::fmt::Display,
) -> Result<(), GameError> {
    store.put(key, &value.to_string())
}

/// Read a JSON-valued key, falling back to `T::default()` on absence or
/// malformed content (logged, never fatal).
pub fn read_json<T>(store: &impl KeyValueStore, key: &str) -> Result<T, GameError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        None => Ok(T::default()),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!("corrupt JSON under {key:?}: {err}; using default");
                Ok(T::default())
            }
        },
    }
}

/// Persist a JSON-valued key.
pub fn write_json<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), GameError> {
    store.put(key, &serde_json::to_string(value)?)
}
