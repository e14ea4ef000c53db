//! Item stacks owned by the user, persisted as a JSON array under the
//! inventory key. Only stockpileable shop goods (hints) live here; instant
//! boosters apply their effect at purchase time and are never stored.

use serde::{Deserialize, Serialize};

use crate::game::errors::GameError;
use crate::game::store::{read_json, write_json, KeyValueStore, KEY_INVENTORY};

/// One stack of a single item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

/// Load all stacks; absent or corrupt records read as empty.
pub fn load_inventory(store: &impl KeyValueStore) -> Result<Vec<ItemStack>, GameError> {
    read_json(store, KEY_INVENTORY)
}

fn save_inventory(store: &impl KeyValueStore, stacks: &[ItemStack]) -> Result<(), GameError> {
    write_json(store, KEY_INVENTORY, &stacks)
}

/// Add `quantity` of an item, merging into an existing stack. Returns the
/// new stack size.
pub fn add_item(
    store: &impl KeyValueStore,
    item_id: &str,
    quantity: u32,
) -> Result<u32, GameError> {
    let mut stacks = load_inventory(store)?;
    let total = match stacks.iter_mut().find(|s| s.item_id == item_id) {
        Some(stack) => {
            stack.quantity = stack.quantity.saturating_add(quantity);
            stack.quantity
        }
        None => {
            stacks.push(ItemStack {
                item_id: item_id.to_string(),
                quantity,
            });
            quantity
        }
    };
    save_inventory(store, &stacks)?;
    Ok(total)
}

/// Remove `quantity` of an item. Returns `false` and leaves the inventory
/// unchanged when the stack does not cover it; empty stacks are dropped.
pub fn consume_item(
    store: &impl KeyValueStore,
    item_id: &str,
    quantity: u32,
) -> Result<bool, GameError> {
    let mut stacks = load_inventory(store)?;
    let Some(stack) = stacks.iter_mut().find(|s| s.item_id == item_id) else {
        return Ok(false);
    };
    if stack.quantity < quantity {
        return Ok(false);
    }
    stack.quantity -= quantity;
    stacks.retain(|s| s.quantity > 0);
    save_inventory(store, &stacks)?;
    Ok(true)
}

/// Quantity held of a single item (0 when absent).
pub fn item_quantity(store: &impl KeyValueStore, item_id: &str) -> Result<u32, GameError> {
    Ok(load_inventory(store)?
        .iter()
        .find(|s| s.item_id == item_id)
        .map(|s| s.quantity)
        .unwrap_or(0))
}
