//! Astro Strike - a vertical-scrolling arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `runner`: Fixed-cadence game loop thread driving the simulation
//! - `scores`: Best-score persistence
//! - `observer`: Audio/haptics event notifications
//! - `settings`: Persisted runtime preferences

pub mod observer;
pub mod runner;
pub mod scores;
pub mod settings;
pub mod sim;

pub use observer::GameObserver;
pub use scores::{FileScoreStore, MemoryScoreStore, ScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation cadence (50 Hz)
    pub const TICK_MS: u64 = 20;

    /// Player defaults
    pub const PLAYER_MAX_LIFE: i32 = 20;
    /// Shots per second
    pub const PLAYER_RATE_OF_FIRE: u64 = 2;
    pub const PLAYER_WIDTH: f32 = 130.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Distance between the player's initial position and the bottom edge
    pub const PLAYER_INITIAL_BOTTOM: f32 = 220.0;
    /// Highest upgrade tier (affects sprite and fire pattern)
    pub const PLAYER_MAX_TIER: u8 = 3;

    /// Enemy ship defaults
    pub const ENEMY_MAX_LIFE: i32 = 10;
    pub const ENEMY_DAMAGE: i32 = 5;
    pub const ENEMY_POINTS: u32 = 100;
    pub const ENEMY_WIDTH: f32 = 140.0;
    pub const ENEMY_HEIGHT: f32 = 110.0;
    /// Max patrol speed, px per tick
    pub const ENEMY_MAX_SPEED: f32 = 10.0;
    /// Shots per second
    pub const ENEMY_RATE_OF_FIRE: u64 = 1;

    /// Laser defaults
    pub const LASER_DAMAGE: i32 = 1;
    pub const LASER_WIDTH: f32 = 12.0;
    pub const LASER_HEIGHT: f32 = 40.0;
    /// px per tick
    pub const PLAYER_LASER_SPEED: f32 = 30.0;
    pub const ENEMY_LASER_SPEED: f32 = 20.0;

    /// Meteor speed range, px per tick
    pub const METEOR_SPEED_MIN: f32 = 4.0;
    pub const METEOR_SPEED_MAX: f32 = 12.0;
    pub const METEOR_POINTS_MULTIPLIER: u32 = 5;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 60.0;
    /// px per tick
    pub const POWER_UP_SPEED: f32 = 8.0;
    pub const BONUS_POINTS: u32 = 50;
    /// Drop table: a 1-100 roll lands bolt below `DRAW_CHANCE_BOLT`, shield
    /// below `DRAW_CHANCE_BOLT + DRAW_CHANCE_SHIELD`, bonus points otherwise
    pub const DRAW_CHANCE_BOLT: u32 = 20;
    pub const DRAW_CHANCE_SHIELD: u32 = 35;
    /// No tier upgrades before this much play time
    pub const MIN_PLAY_TIME_FOR_BOLT_MS: u64 = 30_000;
    /// Fraction of max life restored by a shield repair
    pub const SHIELD_REPAIR_FRACTION: f32 = 0.2;

    /// Star field defaults
    pub const STAR_SIZE: f32 = 8.0;
    /// px per tick
    pub const STAR_SPEED_MIN: f32 = 2.0;
    pub const STAR_SPEED_MAX: f32 = 6.0;
    /// Star quota per px of field height
    pub const STARS_PER_HEIGHT: f32 = 0.05;

    /// Meteor quota multipliers per px of field width
    pub const METEOR_MIN_PER_WIDTH: f32 = 0.001;
    pub const METEOR_MAX_PER_WIDTH: f32 = 0.004;
    pub const METEOR_DELTA_PER_WIDTH: f32 = 0.001;

    /// Level pacing
    pub const LEVEL_DURATION_SECONDS: u64 = 15;

    /// Enemy admission pacing
    pub const INITIAL_ENEMY_DELAY_MS: u64 = 5_000;
    /// Floor for the level-scaled admission delay
    pub const MIN_ENEMY_DELAY_MS: u64 = 3_000;

    /// Frames in the explosion effect animation
    pub const EXPLODE_MAX_FRAMES: u32 = 39;
}
