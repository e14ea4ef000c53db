//! # Teenspace - Gamified Wellness Learning Engine
//!
//! Teenspace is the client-local progression and economy engine behind a
//! gamified wellness course for teens. It keeps a single user profile on
//! disk and exposes typed operations over it: a coin and gem wallet, a
//! lazily regenerating energy pool, XP levels and daily streaks, a lesson
//! map, a shop with consumable items, achievements, daily quests, and a
//! scripted chat companion for conversational lessons.
//!
//! ## Design
//!
//! - **Injected storage**: all game state flows through the [`game::KeyValueStore`]
//!   trait. The binary uses a sled-backed store; tests use an in-memory one.
//! - **Injected time**: anything time-dependent takes a [`game::Clock`], so
//!   regeneration and streak arithmetic are deterministic under test.
//! - **Lazy catch-up**: energy is not ticked into storage. Each read computes
//!   regeneration from the elapsed time since the stored timestamp, so the
//!   state is correct after any offline gap. A background ticker exists only
//!   to refresh displays.
//! - **String contract**: persisted values are strings under well-known keys
//!   ([`game::store`]); corrupt or missing values fall back to safe defaults
//!   instead of failing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teenspace::config::Config;
//! use teenspace::game::{self, SledStore, SystemClock};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = SledStore::open(&config.storage.data_dir)?;
//!     let clock = SystemClock;
//!
//!     let energy = game::energy::read_current(&store, &clock, &config.energy_config())?;
//!     println!("{}", game::format_energy(&store, &clock, &config.energy_config())?);
//!     println!("energy: {energy}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Wallet, energy, progression, lessons, shop, quests, chat
//! - [`config`] - TOML configuration with defaults and validation
//! - [`logutil`] - Log sanitization helpers

pub mod config;
pub mod game;
pub mod logutil;
