//! Simulated entities and their capability data
//!
//! Capabilities (living / damaging / consumable) are modeled as a closed
//! enum with per-variant payloads, so the collision resolver can dispatch
//! with an exhaustive match instead of runtime type tests. The player lives
//! in its own `GameState` slot; everything else goes through the registry.

use glam::Vec2;

use super::rect::{FieldSize, Rect};
use crate::consts::*;

/// Player upgrade kinds dropped by destroyed enemy ships
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Raises the player's tier (sprite + fire pattern)
    Bolt,
    /// Repairs a fraction of the player's shield
    Shield,
    /// Immediate bonus points
    Star,
}

/// Meteor sprite families; the numeric factor feeds life, damage and score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteorKind {
    Brown,
    Grey,
}

impl MeteorKind {
    #[inline]
    pub fn factor(self) -> i32 {
        match self {
            MeteorKind::Brown => 1,
            MeteorKind::Grey => 2,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub life: i32,
    /// Upgrade tier, 1..=PLAYER_MAX_TIER
    pub tier: u8,
    /// Play-time timestamp of the last shot (ms)
    pub last_shot_ms: u64,
}

impl Player {
    /// Spawn at full life, tier 1, centered above the bottom inset
    pub fn new(field: FieldSize) -> Self {
        Self {
            pos: Vec2::new(
                field.width / 2.0 - PLAYER_WIDTH / 2.0,
                field.height - PLAYER_INITIAL_BOTTOM - PLAYER_HEIGHT,
            ),
            life: PLAYER_MAX_LIFE,
            tier: 1,
            last_shot_ms: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Keep the ship on the field; the top quarter is off limits
    pub fn clamp_to(&mut self, field: FieldSize) {
        let min_y = field.height / 4.0;
        let max_y = field.height - PLAYER_HEIGHT;
        let max_x = field.width - PLAYER_WIDTH;
        self.pos.x = self.pos.x.clamp(0.0, max_x.max(0.0));
        self.pos.y = self.pos.y.clamp(min_y, max_y.max(min_y));
    }

    /// Reduce life, clamped at zero
    pub fn apply_damage(&mut self, damage: i32) {
        self.life = (self.life - damage).max(0);
    }

    /// Restore life, clamped at the maximum
    pub fn repair(&mut self, amount: i32) {
        self.life = (self.life + amount).min(PLAYER_MAX_LIFE);
    }

    /// Raise the upgrade tier (saturating)
    pub fn upgrade(&mut self) {
        if self.tier < PLAYER_MAX_TIER {
            self.tier += 1;
        }
    }
}

/// An enemy ship patrolling an assigned horizontal lane
#[derive(Debug, Clone)]
pub struct EnemyShip {
    /// Top-left corner
    pub pos: Vec2,
    pub life: i32,
    /// Lane the ship may not leave while patrolling
    pub lane_min_x: f32,
    pub lane_max_x: f32,
    /// Current horizontal speed; sign is the patrol direction
    pub vel_x: f32,
    /// Play-time timestamp of the last shot (ms)
    pub last_shot_ms: u64,
}

impl EnemyShip {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            life: ENEMY_MAX_LIFE,
            lane_min_x: 0.0,
            lane_max_x: 0.0,
            vel_x: 0.0,
            last_shot_ms: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    #[inline]
    pub fn damage(&self) -> i32 {
        ENEMY_DAMAGE
    }

    /// True once the whole ship is inside the field (may open fire)
    pub fn fully_on_field(&self, field: FieldSize) -> bool {
        field.bounds().contains_rect(&self.bounds())
    }

    /// One tick of patrol motion: approach the lane from the entry point,
    /// then bounce between the lane edges; descend until fully on screen.
    pub fn advance(&mut self, field: FieldSize) {
        let center = self.bounds().center();

        self.vel_x = if center.x < 0.0 {
            ENEMY_MAX_SPEED
        } else if center.x > field.width {
            -ENEMY_MAX_SPEED
        } else if center.x < self.lane_min_x {
            (self.lane_min_x - center.x).min(ENEMY_MAX_SPEED)
        } else if center.x > self.lane_max_x {
            -(center.x - self.lane_max_x).min(ENEMY_MAX_SPEED)
        } else {
            // Patrol speed scales with lane width so narrow lanes stay calm
            let patrol = ((self.lane_max_x - self.lane_min_x) * ENEMY_MAX_SPEED / field.width)
                .clamp(1.0, ENEMY_MAX_SPEED);
            if self.vel_x >= 0.0 && center.x + patrol >= self.lane_max_x {
                -patrol
            } else if self.vel_x < 0.0 && center.x - patrol <= self.lane_min_x {
                patrol
            } else if self.vel_x == 0.0 {
                patrol
            } else {
                self.vel_x.signum() * patrol
            }
        };

        let vel_y = if center.y < ENEMY_HEIGHT {
            ENEMY_MAX_SPEED
        } else {
            0.0
        };

        self.pos += Vec2::new(self.vel_x, vel_y);
    }
}

/// A falling meteor; life, damage and score all derive from size x kind
#[derive(Debug, Clone)]
pub struct Meteor {
    /// Top-left corner
    pub pos: Vec2,
    /// Size class, 1..=4
    pub size: u8,
    pub kind: MeteorKind,
    /// Fall speed, px per tick
    pub speed: f32,
    pub life: i32,
}

impl Meteor {
    pub fn new(pos: Vec2, size: u8, kind: MeteorKind, speed: f32) -> Self {
        Self {
            pos,
            size,
            kind,
            speed,
            life: size as i32 * kind.factor(),
        }
    }

    pub fn width(&self) -> f32 {
        match self.size {
            1 => 40.0,
            2 => 60.0,
            3 => 90.0,
            _ => 140.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        let w = self.width();
        Rect::from_origin(self.pos, w, w)
    }

    #[inline]
    pub fn damage(&self) -> i32 {
        self.size as i32 * self.kind.factor()
    }

    /// Score awarded when the meteor is destroyed (not when it scrolls off)
    #[inline]
    pub fn points(&self) -> u32 {
        self.size as u32 * self.kind.factor() as u32 * METEOR_POINTS_MULTIPLIER
    }

    /// A meteor still above the top edge cannot deal damage yet
    pub fn on_field(&self) -> bool {
        self.pos.y >= 0.0
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// A laser bolt; consumed by its own act of dealing damage
#[derive(Debug, Clone)]
pub struct Laser {
    /// Center point
    pub pos: Vec2,
    /// Enemy-fired bolts travel downward and only target the player
    pub adverse: bool,
    pub consumed: bool,
}

impl Laser {
    pub fn new(pos: Vec2, adverse: bool) -> Self {
        Self {
            pos,
            adverse,
            consumed: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, LASER_WIDTH, LASER_HEIGHT)
    }

    #[inline]
    pub fn damage(&self) -> i32 {
        LASER_DAMAGE
    }

    pub fn advance(&mut self) {
        if self.adverse {
            self.pos.y += ENEMY_LASER_SPEED;
        } else {
            self.pos.y -= PLAYER_LASER_SPEED;
        }
    }
}

/// A falling pickup, consumed on player contact
#[derive(Debug, Clone)]
pub struct PowerUp {
    /// Center point
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub consumed: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            consumed: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, POWER_UP_SIZE, POWER_UP_SIZE)
    }

    /// Collectible once it has entered the field
    pub fn on_field(&self) -> bool {
        self.pos.y >= 0.0
    }

    pub fn advance(&mut self) {
        self.pos.y += POWER_UP_SPEED;
    }
}

/// A decorative background star
#[derive(Debug, Clone)]
pub struct Star {
    /// Top-left corner
    pub pos: Vec2,
    /// Scroll speed, px per tick
    pub speed: f32,
    /// Sprite variant index
    pub variant: u8,
}

impl Star {
    pub fn new(pos: Vec2, speed: f32, variant: u8) -> Self {
        Self {
            pos,
            speed,
            variant,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, STAR_SIZE, STAR_SIZE)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// A transient explosion effect played over a victim's last bounds
#[derive(Debug, Clone)]
pub struct Explosion {
    pub bounds: Rect,
    /// Animation frame, 1..=EXPLODE_MAX_FRAMES
    pub frame: u32,
}

impl Explosion {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, frame: 1 }
    }

    pub fn advance(&mut self) {
        self.frame += 1;
    }

    pub fn finished(&self) -> bool {
        self.frame > EXPLODE_MAX_FRAMES
    }
}

/// Every non-player object tracked by the registry
#[derive(Debug, Clone)]
pub enum Entity {
    EnemyShip(EnemyShip),
    Meteor(Meteor),
    Laser(Laser),
    PowerUp(PowerUp),
    Star(Star),
    Explosion(Explosion),
}

impl Entity {
    pub fn bounds(&self) -> Rect {
        match self {
            Entity::EnemyShip(e) => e.bounds(),
            Entity::Meteor(m) => m.bounds(),
            Entity::Laser(l) => l.bounds(),
            Entity::PowerUp(p) => p.bounds(),
            Entity::Star(s) => s.bounds(),
            Entity::Explosion(x) => x.bounds,
        }
    }

    /// Liveness; dead entities are purged at the top of the next tick
    pub fn is_alive(&self, field: FieldSize) -> bool {
        match self {
            Entity::EnemyShip(e) => e.life > 0,
            Entity::Meteor(m) => m.life > 0 && m.pos.y < field.height,
            Entity::Laser(l) => {
                !l.consumed && l.pos.y >= 0.0 && l.pos.y <= field.height
            }
            Entity::PowerUp(p) => !p.consumed && p.pos.y < field.height,
            Entity::Star(s) => s.pos.y < field.height,
            Entity::Explosion(x) => !x.finished(),
        }
    }

    /// One tick of autonomous motion (PLAYING only; the tick decides which
    /// variants advance in the other states)
    pub fn advance(&mut self, field: FieldSize) {
        match self {
            Entity::EnemyShip(e) => e.advance(field),
            Entity::Meteor(m) => m.advance(),
            Entity::Laser(l) => l.advance(),
            Entity::PowerUp(p) => p.advance(),
            Entity::Star(s) => s.advance(),
            Entity::Explosion(x) => x.advance(),
        }
    }

    /// Terminal score value applied when the entity is purged dead
    pub fn score_value(&self) -> u32 {
        match self {
            Entity::EnemyShip(_) => ENEMY_POINTS,
            Entity::Meteor(m) => m.points(),
            _ => 0,
        }
    }
}
