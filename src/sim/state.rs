//! Game state and core simulation types
//!
//! All mutable simulation state lives here: the phase machine, the entity
//! registry, score/time counters, spawn bookkeeping and the seeded RNG.
//! Nothing in this module touches the platform; the runner owns the clock.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Entity, Player, PowerUpKind};
use super::rect::{FieldSize, Rect};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle splash screen, waiting for a start tap
    NotStarted,
    /// Active gameplay
    Playing,
    /// Round ended; re-entrant via the replay control
    GameOver,
}

/// Discrete notifications for the audio/haptics observer.
///
/// Fire-and-forget: the simulation pushes them during a tick, the runner
/// drains and forwards them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    GameOver { score: u32 },
    /// Something living was damaged but survived
    Hit { player: bool },
    MeteorDestroyed,
    ShipDestroyed,
    PowerUpCollected { kind: PowerUpKind },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducible spawn decisions
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    /// Mirror of the persisted best score, for the game-over panel
    pub best_score: u32,
    /// Accumulated play time of the current round (ms)
    pub play_time_ms: u64,
    /// Field dimensions as of the last tick
    pub field: FieldSize,
    /// The player's ship; `None` until the first round begins
    pub player: Option<Player>,
    /// Registry of every non-player entity, in insertion order
    pub entities: Vec<Entity>,

    // Spawn bookkeeping
    pub star_count: usize,
    pub meteor_count: usize,
    pub enemy_count: usize,
    /// One power-up is owed per destroyed enemy ship
    pub pending_power_ups: u32,
    /// Play-time timestamp of the last enemy admission; `None` before the first
    pub last_enemy_spawn_ms: Option<u64>,

    /// Last pointer position of an active drag
    pub(crate) last_touch: Option<Vec2>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, field: FieldSize) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            best_score: 0,
            play_time_ms: 0,
            field,
            player: None,
            entities: Vec::new(),
            star_count: 0,
            meteor_count: 0,
            enemy_count: 0,
            pending_power_ups: 0,
            last_enemy_spawn_ms: None,
            last_touch: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Current level, derived from play time (never stored)
    pub fn level(&self) -> u32 {
        level_for_millis(self.play_time_ms)
    }

    /// Reset counters and non-decorative entities, re-seed the player and
    /// enter `Playing`. Valid from both `NotStarted` and `GameOver`.
    pub fn start_round(&mut self) {
        self.entities.retain(|e| matches!(e, Entity::Star(_)));
        self.player = Some(Player::new(self.field));
        self.score = 0;
        self.play_time_ms = 0;
        self.meteor_count = 0;
        self.enemy_count = 0;
        self.pending_power_ups = 0;
        self.last_enemy_spawn_ms = None;
        self.last_touch = None;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::GameStarted);
        log::info!("round started (seed {})", self.seed);
    }

    /// Append a destruction effect over the victim's last bounds
    pub fn spawn_explosion(&mut self, bounds: Rect) {
        self.entities
            .push(Entity::Explosion(super::entity::Explosion::new(bounds)));
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the events produced by the last tick
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// `level = floor(elapsed / 15 s) + 1`
pub fn level_for_millis(play_time_ms: u64) -> u32 {
    (play_time_ms / (LEVEL_DURATION_SECONDS * 1000)) as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> FieldSize {
        FieldSize::new(1080.0, 1920.0)
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_millis(0), 1);
        assert_eq!(level_for_millis(14_999), 1);
        assert_eq!(level_for_millis(15_000), 2);
        assert_eq!(level_for_millis(29_000), 2);
        assert_eq!(level_for_millis(30_000), 3);
    }

    #[test]
    fn test_start_round_resets_counters_and_player() {
        let mut state = GameState::new(7, field());
        state.score = 500;
        state.play_time_ms = 60_000;
        state.pending_power_ups = 3;
        state.last_enemy_spawn_ms = Some(42_000);
        state
            .entities
            .push(Entity::Star(super::super::entity::Star::new(
                Vec2::new(10.0, 10.0),
                3.0,
                0,
            )));
        state.star_count = 1;
        state
            .entities
            .push(Entity::Laser(super::super::entity::Laser::new(
                Vec2::new(50.0, 50.0),
                false,
            )));

        state.start_round();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.play_time_ms, 0);
        assert_eq!(state.pending_power_ups, 0);
        assert_eq!(state.last_enemy_spawn_ms, None);
        // Stars survive the reset, everything else is cleared
        assert_eq!(state.entities.len(), 1);
        assert!(matches!(state.entities[0], Entity::Star(_)));
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.life, PLAYER_MAX_LIFE);
        assert_eq!(player.tier, 1);
        assert_eq!(state.take_events(), vec![GameEvent::GameStarted]);
    }

    proptest! {
        #[test]
        fn prop_level_monotonic(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_millis(lo) <= level_for_millis(hi));
        }

        #[test]
        fn prop_level_at_least_one(ms in 0u64..u64::MAX / 2) {
            prop_assert!(level_for_millis(ms) >= 1);
        }
    }
}
