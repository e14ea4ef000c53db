//! Rewards shop: a static booster catalog and the purchase flow.
//!
//! Purchasing debits the ledger first; only a successful debit applies the
//! item's effect (energy refill, XP boost arm, streak-protection charge, or
//! an inventory add). Insufficient funds leaves every record untouched and
//! is a value, not an error.

use log::info;

use crate::game::clock::Clock;
use crate::game::energy::{self, EnergyConfig};
use crate::game::errors::GameError;
use crate::game::inventory;
use crate::game::ledger::{self, CurrencyKind};
use crate::game::progress;
use crate::game::store::KeyValueStore;

/// What a purchased item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    /// Instantly restore a fixed amount of energy.
    RestoreEnergy { amount: u32 },
    /// Restore energy to the maximum.
    FullEnergy,
    /// Multiply the next XP award.
    XpBoost { multiplier: u32 },
    /// Charges that keep the streak across missed days.
    StreakShield { charges: u32 },
    /// Stockpiled hints for hard questions.
    HintPack { hints: u32 },
}

/// One catalog entry. The catalog is static content, not persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub price: u64,
    pub currency: CurrencyKind,
    pub effect: ItemEffect,
}

/// Inventory item id holding stockpiled hints.
pub const HINT_ITEM_ID: &str = "hint";

const CATALOG: &[ShopItem] = &[
    ShopItem {
        id: "energy_boost",
        name: "Energy Drink",
        description: "Instantly restores 50 energy",
        icon: "⚡",
        price: 100,
        currency: CurrencyKind::Coins,
        effect: ItemEffect::RestoreEnergy { amount: 50 },
    },
    ShopItem {
        id: "xp_booster",
        name: "XP Doubler",
        description: "Doubles the XP for your next lesson",
        icon: "⏰",
        price: 200,
        currency: CurrencyKind::Coins,
        effect: ItemEffect::XpBoost { multiplier: 2 },
    },
    ShopItem {
        id: "streak_shield",
        name: "Streak Shield",
        description: "Your streak survives one missed day",
        icon: "🔥",
        price: 300,
        currency: CurrencyKind::Coins,
        effect: ItemEffect::StreakShield { charges: 1 },
    },
    ShopItem {
        id: "hint_pack",
        name: "Hint Pack",
        description: "3 hints for tough questions",
        icon: "💡",
        price: 150,
        currency: CurrencyKind::Coins,
        effect: ItemEffect::HintPack { hints: 3 },
    },
    ShopItem {
        id: "mega_energy",
        name: "Mega Energy",
        description: "Fully restores your energy",
        icon: "⚡⚡",
        price: 5,
        currency: CurrencyKind::Gems,
        effect: ItemEffect::FullEnergy,
    },
];

/// The full booster catalog, in display order.
pub fn shop_catalog() -> &'static [ShopItem] {
    CATALOG
}

/// Look up a catalog entry by id.
pub fn find_item(item_id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == item_id)
}

/// Result of a purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased {
        item_id: &'static str,
        /// Remaining balance in the item's currency.
        balance_left: u64,
    },
    InsufficientFunds {
        price: u64,
        held: u64,
    },
}

/// Buy one item by id. Unknown ids are an error; everything else is a value.
pub fn purchase(
    store: &impl KeyValueStore,
    clock: &impl Clock,
    energy_config: &EnergyConfig,
    item_id: &str,
) -> Result<PurchaseOutcome, GameError> {
    let item = find_item(item_id)
        .ok_or_else(|| GameError::NotFound(format!("shop item: {item_id}")))?;

    if !ledger::debit(store, item.currency, item.price)? {
        let held = ledger::balance(store, item.currency)?;
        return Ok(PurchaseOutcome::InsufficientFunds {
            price: item.price,
            held,
        });
    }

    match item.effect {
        ItemEffect::RestoreEnergy { amount } => {
            energy::refill(store, clock, energy_config, amount)?;
        }
        ItemEffect::FullEnergy => {
            energy::refill(store, clock, energy_config, energy_config.max_energy)?;
        }
        ItemEffect::XpBoost { multiplier } => {
            progress::set_xp_boost(store, multiplier)?;
        }
        ItemEffect::StreakShield { charges } => {
            progress::add_streak_protection(store, charges)?;
        }
        ItemEffect::HintPack { hints } => {
            inventory::add_item(store, HINT_ITEM_ID, hints)?;
        }
    }

    let balance_left = ledger::balance(store, item.currency)?;
    info!(
        "purchased {} for {} {}",
        item.id,
        item.price,
        item.currency.label()
    );
    Ok(PurchaseOutcome::Purchased {
        item_id: item.id,
        balance_left,
    })
}

/// Multi-line shop listing for the CLI.
pub fn format_shop_listing() -> String {
    let mut out = String::from("=== SHOP ===\n");
    for item in CATALOG {
        out.push_str(&format!(
            "{} {}: {} {} :: {}\n",
            item.icon,
            item.name,
            item.price,
            item.currency.label(),
            item.description
        ));
    }
    out
}

/// Compact inventory listing, resolving item ids to catalog names.
pub fn format_inventory(store: &impl KeyValueStore) -> Result<String, GameError> {
    let stacks = inventory::load_inventory(store)?;
    if stacks.is_empty() {
        return Ok("Inventory is empty.".to_string());
    }
    let mut out = String::from("=== INVENTORY ===\n");
    for stack in stacks {
        let name = match stack.item_id.as_str() {
            HINT_ITEM_ID => "Hint",
            other => find_item(other).map(|i| i.name).unwrap_or(other),
        };
        out.push_str(&format!("{} x{}\n", name, stack.quantity));
    }
    Ok(out)
}
