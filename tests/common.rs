//! Shared fixtures for sled-backed integration tests.

use tempfile::TempDir;
use teenspace::game::SledStore;

/// Fresh sled store in a temp dir. Keep the `TempDir` alive for the test's
/// duration or the database directory disappears underneath sled.
pub fn open_store() -> (TempDir, SledStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SledStore::open(dir.path()).expect("open sled store");
    (dir, store)
}

/// Fixed base instant for manual clocks, a known date (2024-05-01 12:00 UTC).
#[allow(dead_code)]
pub const BASE_MS: i64 = 1_714_564_800_000;

#[allow(dead_code)]
pub const DAY_MS: i64 = 86_400_000;
