//! Astro Strike entry point
//!
//! Wires the collaborators together and runs a headless demo session: the
//! loop thread ticks the simulation while the log observer stands in for a
//! sound engine. A real host would supply its own renderer and input
//! plumbing on top of `GameLoop`.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use astro_strike::observer::LogObserver;
use astro_strike::runner::{FixedField, GameLoop, LoopCore};
use astro_strike::scores::{FileScoreStore, MemoryScoreStore, ScoreStore};
use astro_strike::settings::Settings;
use astro_strike::sim::{FieldSize, NullRenderer};

/// Demo session length
const DEMO_SECONDS: u64 = 30;

fn data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

fn main() {
    env_logger::init();

    let settings = Settings::load(&data_dir().join(".astro_strike_settings.json"));
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let store: Box<dyn ScoreStore> = match FileScoreStore::open(data_dir().join(".astro_strike_score.json")) {
        Ok(store) => {
            log::info!("best score so far: {}", store.high_score());
            Box::new(store)
        }
        Err(err) => {
            log::warn!("score store unavailable ({err}); scores will not persist");
            Box::new(MemoryScoreStore::default())
        }
    };

    let core = LoopCore::new(
        seed,
        Box::new(NullRenderer),
        Box::new(LogObserver),
        store,
        Box::new(FixedField(FieldSize::new(1080.0, 1920.0))),
    );

    let game = GameLoop::spawn(core);
    game.start();
    log::info!("demo session running for {DEMO_SECONDS}s (seed {seed})");
    thread::sleep(Duration::from_secs(DEMO_SECONDS));
    game.shutdown();
}
