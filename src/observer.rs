//! Audio/haptics observer contract
//!
//! The simulation reports discrete events (game start, game over, hits,
//! destructions, power-up wins); the host plays sounds or vibrates.
//! Notifications are fire-and-forget and must not block the tick thread.
//! After shutdown the runner drops its observer reference and all further
//! notifications are silently skipped.

use crate::sim::GameEvent;

pub trait GameObserver: Send {
    fn notify(&mut self, event: &GameEvent);
}

/// Observer that ignores everything (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Observer that logs each event; the demo binary's stand-in for a sound
/// engine
#[derive(Debug, Default)]
pub struct LogObserver;

impl GameObserver for LogObserver {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => log::info!("sfx: game start"),
            GameEvent::GameOver { score } => log::info!("sfx: game over (score {score})"),
            GameEvent::Hit { player: true } => log::debug!("sfx+haptic: player hit"),
            GameEvent::Hit { player: false } => log::debug!("sfx: hit"),
            GameEvent::MeteorDestroyed => log::debug!("sfx: meteor explosion"),
            GameEvent::ShipDestroyed => log::debug!("sfx: ship explosion"),
            GameEvent::PowerUpCollected { kind } => log::debug!("sfx: power-up {kind:?}"),
        }
    }
}
