//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod draw;
pub mod entity;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use draw::{NullRenderer, RenderCommand, Renderer, SpriteKind, draw, replay_button_rect};
pub use entity::{
    EnemyShip, Entity, Explosion, Laser, Meteor, MeteorKind, Player, PowerUp, PowerUpKind, Star,
};
pub use rect::{FieldSize, Rect};
pub use state::{GameEvent, GamePhase, GameState, level_for_millis};
pub use tick::{PointerEvent, PointerPhase, TickInput, tick};
