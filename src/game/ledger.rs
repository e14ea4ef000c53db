//! Currency ledger: two independent non-negative balances (coins and gems)
//! persisted as string-encoded integers. Insufficient funds is a return
//! value, not an error; the caller decides the user-facing messaging.

use log::{debug, info};

use crate::game::errors::GameError;
use crate::game::store::{read_u64, write_int, KeyValueStore, KEY_COINS, KEY_GEMS};

/// The two independent currencies of the reward economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    /// Earned through lessons and quests; spent in the shop.
    Coins,
    /// Premium currency, rare rewards only.
    Gems,
}

impl CurrencyKind {
    /// Persisted key backing this balance.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Coins => KEY_COINS,
            Self::Gems => KEY_GEMS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Coins => "coins",
            Self::Gems => "gems",
        }
    }
}

/// Current balance for `kind`, defaulting to 0 when unset or corrupt.
pub fn balance(store: &impl KeyValueStore, kind: CurrencyKind) -> Result<u64, GameError> {
    read_u64(store, kind.storage_key(), 0)
}

/// Add `amount` to the balance and persist it. No upper bound. Returns the
/// new balance. A zero amount is a plain read.
pub fn credit(
    store: &impl KeyValueStore,
    kind: CurrencyKind,
    amount: u64,
) -> Result<u64, GameError> {
    let current = balance(store, kind)?;
    if amount == 0 {
        return Ok(current);
    }
    let updated = current.saturating_add(amount);
    write_int(store, kind.storage_key(), updated)?;
    debug!("credit {} {} -> {}", amount, kind.label(), updated);
    Ok(updated)
}

/// Subtract `amount` if the balance covers it. Returns `false` and leaves
/// state untouched when funds are insufficient.
pub fn debit(
    store: &impl KeyValueStore,
    kind: CurrencyKind,
    amount: u64,
) -> Result<bool, GameError> {
    let current = balance(store, kind)?;
    if current < amount {
        debug!(
            "debit refused: {} {} requested, {} held",
            amount,
            kind.label(),
            current
        );
        return Ok(false);
    }
    if amount > 0 {
        let updated = current - amount;
        write_int(store, kind.storage_key(), updated)?;
        info!("debit {} {} -> {}", amount, kind.label(), updated);
    }
    Ok(true)
}

/// One-line wallet summary for the HUD / CLI status output.
pub fn format_wallet(store: &impl KeyValueStore) -> Result<String, GameError> {
    let coins = balance(store, CurrencyKind::Coins)?;
    let gems = balance(store, CurrencyKind::Gems)?;
    Ok(format!("{} coins | {} gems", coins, gems))
}
