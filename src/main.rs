//! Binary entrypoint for the Teenspace CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `status` - print wallet, energy, progression, and achievements
//! - `lesson list` - show the course map with per-lesson status
//! - `lesson play <id>` - run a lesson (lesson 1 plays the chat script)
//! - `shop list` / `shop buy <item>` - browse and purchase shop items
//! - `quests` - show today's daily quests
//! - `grant` - credit coins or gems (development helper)
//!
//! See the library crate docs for module-level details: `teenspace::`.
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use teenspace::config::Config;
use teenspace::game::{
    self, achievements, catalog, chat, energy, ledger, progress, quests, shop, CompletionOutcome,
    CurrencyKind, PurchaseOutcome, SledStore, SystemClock,
};
use teenspace::logutil::chat_preview;

#[derive(Parser)]
#[command(name = "teenspace")]
#[command(about = "Progression and economy engine for a gamified wellness course")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter configuration file
    Init,
    /// Show the current profile: wallet, energy, level, streak
    Status,
    /// Lesson map and playback
    Lesson {
        #[command(subcommand)]
        action: LessonAction,
    },
    /// Shop listing and purchases
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Show today's daily quests
    Quests,
    /// Credit coins or gems to the wallet (development helper)
    Grant {
        /// Coins to add
        #[arg(long, default_value_t = 0)]
        coins: u64,
        /// Gems to add
        #[arg(long, default_value_t = 0)]
        gems: u64,
    },
}

#[derive(Subcommand)]
enum LessonAction {
    /// Show the course map
    List,
    /// Play a lesson by id
    Play {
        /// Lesson id, e.g. 1
        id: String,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Show the shop catalog and current inventory
    List,
    /// Buy an item by id
    Buy {
        /// Item id, e.g. energy_boost
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing configuration at {}", cli.config);
            Config::create_default(&cli.config).await?;
            println!("Configuration file created at {}", cli.config);
        }
        Commands::Status => {
            let config = require_config(config, &cli.config).await?;
            let store = SledStore::open(&config.storage.data_dir)?;
            let clock = SystemClock;
            let energy_cfg = config.energy_config();
            let progress_cfg = config.progress_config();

            println!("=== {} ===", config.app.name.to_uppercase());
            println!("{}", ledger::format_wallet(&store)?);
            println!("{}", energy::format_energy(&store, &clock, &energy_cfg)?);
            let snap = progress::snapshot(&store, &progress_cfg)?;
            println!("{}", progress::format_progress(&snap));
            println!("{}", achievements::format_achievements(&store)?);
        }
        Commands::Lesson { action } => {
            let config = require_config(config, &cli.config).await?;
            let store = Arc::new(SledStore::open(&config.storage.data_dir)?);
            let clock = Arc::new(SystemClock);
            match action {
                LessonAction::List => {
                    print!("{}", catalog::format_course(&*store)?);
                }
                LessonAction::Play { id } => {
                    play_lesson(&config, store, clock, &id).await?;
                }
            }
        }
        Commands::Shop { action } => {
            let config = require_config(config, &cli.config).await?;
            let store = SledStore::open(&config.storage.data_dir)?;
            let clock = SystemClock;
            match action {
                ShopAction::List => {
                    print!("{}", shop::format_shop_listing());
                    print!("{}", shop::format_inventory(&store)?);
                }
                ShopAction::Buy { id } => {
                    match shop::purchase(&store, &clock, &config.energy_config(), &id)? {
                        PurchaseOutcome::Purchased {
                            item_id,
                            balance_left,
                        } => {
                            println!("Purchased {item_id}. Balance left: {balance_left}");
                        }
                        PurchaseOutcome::InsufficientFunds { price, held } => {
                            println!("Not enough funds: costs {price}, you hold {held}");
                        }
                    }
                }
            }
        }
        Commands::Quests => {
            let config = require_config(config, &cli.config).await?;
            let store = SledStore::open(&config.storage.data_dir)?;
            let clock = SystemClock;
            let slots = quests::daily_quests(&store, &clock, &mut rand::thread_rng())?;
            print!("{}", quests::format_quests(&slots));
        }
        Commands::Grant { coins, gems } => {
            let config = require_config(config, &cli.config).await?;
            let store = SledStore::open(&config.storage.data_dir)?;
            if coins > 0 {
                let balance = ledger::credit(&store, CurrencyKind::Coins, coins)?;
                println!("+{coins} coins (now {balance})");
            }
            if gems > 0 {
                let balance = ledger::credit(&store, CurrencyKind::Gems, gems)?;
                println!("+{gems} gems (now {balance})");
            }
        }
    }

    Ok(())
}

async fn require_config(config: Option<Config>, path: &str) -> Result<Config> {
    match config {
        Some(c) => Ok(c),
        None => Config::load(path).await,
    }
}

/// Play one lesson: lesson 1 runs the scripted chat first, then the
/// completion flow spends energy and hands out rewards. A background ticker
/// keeps the stored energy fresh while the chat plays out.
async fn play_lesson(
    config: &Config,
    store: Arc<SledStore>,
    clock: Arc<SystemClock>,
    lesson_id: &str,
) -> Result<()> {
    let energy_cfg = config.energy_config();
    let progress_cfg = config.progress_config();

    let ticker = game::spawn_regen_ticker(Arc::clone(&store), Arc::clone(&clock), energy_cfg);

    if lesson_id == "1" {
        run_chat(&*store, &*clock).await?;
    }

    let outcome = catalog::complete_lesson(
        &*store,
        &*clock,
        &mut rand::thread_rng(),
        &energy_cfg,
        &progress_cfg,
        lesson_id,
    )?;
    ticker.abort();

    match outcome {
        CompletionOutcome::Completed(summary) => {
            println!("Lesson {} complete!", summary.lesson_id);
            println!(
                "+{} XP{} | +{} coins | streak {}",
                summary.xp.awarded,
                if summary.xp.leveled_up {
                    format!(" (level up! now Lv {})", summary.xp.level)
                } else {
                    String::new()
                },
                summary.coins_awarded,
                summary.streak
            );
            for achievement in summary.achievements {
                println!(
                    "Achievement unlocked: {} {}",
                    achievement.icon, achievement.name
                );
            }
            for quest_id in summary.quests_completed {
                println!("Daily quest complete: {quest_id}");
            }
        }
        CompletionOutcome::NotEnoughEnergy {
            required,
            available,
        } => {
            println!("Not enough energy: need {required}, have {available}.");
            if let Some(secs) = energy::time_to_next_unit(&*store, &*clock, &energy_cfg)? {
                println!("Next point in {secs}s.");
            }
        }
        CompletionOutcome::AlreadyCompleted => {
            println!("Lesson {lesson_id} is already completed.");
        }
    }
    Ok(())
}

/// Drive the intro chat script on the terminal. Companion lines land after
/// their typing delays; the user's reply is read from stdin.
async fn run_chat(store: &SledStore, clock: &SystemClock) -> Result<()> {
    let mut session = chat::ChatSession::new(chat::boundaries_intro_script());
    let (tx, mut rx) = mpsc::channel(16);

    loop {
        let (run, _) = tokio::join!(
            chat::run_until_blocked(&mut session, &tx),
            print_until_blocked(&mut rx)
        );
        run?;
        if session.is_finished() {
            break;
        }

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let reply = line.trim();
        debug!("chat reply: {}", chat_preview(reply));
        if let Some(chat::ChatAction::Reveal { text, delay_ms }) = session.submit_reply(reply) {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            println!("💜 {text}");
        }
        quests::record_event(
            store,
            clock,
            &mut rand::thread_rng(),
            quests::QuestEvent::CompanionReply,
        )?;
    }
    Ok(())
}

/// Print incoming companion lines until the session blocks or ends.
async fn print_until_blocked(rx: &mut mpsc::Receiver<chat::ChatEvent>) {
    use std::io::Write;
    while let Some(event) = rx.recv().await {
        match event {
            chat::ChatEvent::Companion(text) => println!("💜 {text}"),
            chat::ChatEvent::AwaitingReply => {
                print!("> ");
                let _ = std::io::stdout().flush();
                break;
            }
            chat::ChatEvent::Finished => break,
        }
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);
    if !atty::is(atty::Stream::Stderr) {
        builder.write_style(env_logger::WriteStyle::Never);
    }
    let _ = builder.try_init();
}
