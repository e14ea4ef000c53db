//! Wallet operations against sled, plus the string-contract fallback rules
//! for corrupt or missing persisted values.

mod common;

use common::{open_store, BASE_MS};
use teenspace::game::energy::{self, EnergyConfig};
use teenspace::game::store::{KeyValueStore, KEY_COINS, KEY_ENERGY, KEY_INVENTORY};
use teenspace::game::{inventory, ledger, CurrencyKind, ManualClock};

#[test]
fn credit_and_debit_round_trip() {
    let (_dir, store) = open_store();

    assert_eq!(ledger::credit(&store, CurrencyKind::Coins, 120).unwrap(), 120);
    assert_eq!(ledger::credit(&store, CurrencyKind::Gems, 5).unwrap(), 5);

    assert!(ledger::debit(&store, CurrencyKind::Coins, 100).unwrap());
    assert_eq!(ledger::balance(&store, CurrencyKind::Coins).unwrap(), 20);

    // Refused debit leaves the balance untouched
    assert!(!ledger::debit(&store, CurrencyKind::Coins, 21).unwrap());
    assert_eq!(ledger::balance(&store, CurrencyKind::Coins).unwrap(), 20);

    assert_eq!(ledger::format_wallet(&store).unwrap(), "20 coins | 5 gems");
}

#[test]
fn corrupt_currency_reads_as_zero() {
    let (_dir, store) = open_store();
    store.put(KEY_COINS, "not-a-number").unwrap();

    assert_eq!(ledger::balance(&store, CurrencyKind::Coins).unwrap(), 0);
    // The next write repairs the stored value
    assert_eq!(ledger::credit(&store, CurrencyKind::Coins, 40).unwrap(), 40);
    assert_eq!(store.get(KEY_COINS).unwrap().as_deref(), Some("40"));
}

#[test]
fn corrupt_energy_reads_as_full() {
    let (_dir, store) = open_store();
    let clock = ManualClock::at(BASE_MS);
    let config = EnergyConfig::default();
    store.put(KEY_ENERGY, "???").unwrap();

    assert_eq!(energy::read_current(&store, &clock, &config).unwrap(), 100);
}

#[test]
fn corrupt_inventory_reads_as_empty() {
    let (_dir, store) = open_store();
    store.put(KEY_INVENTORY, "{not json").unwrap();

    assert!(inventory::load_inventory(&store).unwrap().is_empty());
    // And stays writable
    inventory::add_item(&store, "hint", 3).unwrap();
    assert_eq!(inventory::item_quantity(&store, "hint").unwrap(), 3);
}
