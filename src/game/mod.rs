//! Progression and economy engine.
//! Everything here runs against an injected key-value store and clock, so
//! the same code drives the sled-backed profile on disk and the in-memory
//! doubles the tests use. State lives as strings under well-known keys;
//! higher layers only see typed operations.

pub mod achievements;
pub mod catalog;
pub mod chat;
pub mod clock;
pub mod energy;
pub mod errors;
pub mod inventory;
pub mod ledger;
pub mod progress;
pub mod quests;
pub mod shop;
pub mod store;

pub use achievements::{evaluate as evaluate_achievements, format_achievements, Achievement};
pub use catalog::{
    complete_lesson, course_catalog, format_course, lesson_statuses, CompletionOutcome, Lesson,
    LessonStatus, LessonSummary,
};
pub use chat::{
    boundaries_intro_script, run_until_blocked, ChatAction, ChatEvent, ChatMessage, ChatSession,
    ChatStep, Sender,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use energy::{
    format_energy, spawn_regen_ticker, time_to_next_unit, EnergyConfig, RegenStep,
};
pub use errors::GameError;
pub use inventory::{add_item, consume_item, item_quantity, load_inventory, ItemStack};
pub use ledger::{balance, credit, debit, format_wallet, CurrencyKind};
pub use progress::{
    format_progress, snapshot, ProgressConfig, ProgressSnapshot, XpGain,
};
pub use quests::{daily_quests, format_quests, record_event, QuestEvent, QuestSlot};
pub use shop::{
    format_inventory, format_shop_listing, purchase, shop_catalog, PurchaseOutcome, ShopItem,
};
pub use store::{KeyValueStore, MemoryStore, SledStore};
