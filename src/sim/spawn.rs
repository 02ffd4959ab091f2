//! Spawn pacing
//!
//! Quotas and admission decisions are pure functions of elapsed play time,
//! the derived level and the live counts - no wall-clock timers. Quotas are
//! re-evaluated every tick, so a field resize takes effect immediately.

use glam::Vec2;
use rand::Rng;

use super::entity::{EnemyShip, Entity, Meteor, MeteorKind, PowerUp, PowerUpKind, Star};
use super::rect::FieldSize;
use super::state::GameState;
use crate::consts::*;

/// Minimum number of live stars for the current field height
pub fn minimum_stars(field: FieldSize) -> usize {
    (field.height * STARS_PER_HEIGHT) as usize
}

/// Minimum number of live meteors for the current field width and level
pub fn minimum_meteors(field: FieldSize, level: u32) -> usize {
    let base = (field.width * METEOR_MIN_PER_WIDTH) as usize;
    let cap_floor = (field.width * METEOR_MAX_PER_WIDTH) as usize;
    let delta = (field.width * METEOR_DELTA_PER_WIDTH * level as f32) as usize;
    (base + delta).max(cap_floor)
}

/// Hard cap on simultaneously live enemy ships
pub fn max_enemies(field: FieldSize) -> usize {
    ((field.width / ENEMY_WIDTH) as usize).saturating_sub(1)
}

/// Delay before the next enemy admission. The first admission of a round
/// waits a short fixed time; afterwards the delay shrinks with the level,
/// down to a floor.
pub fn enemy_delay_ms(level: u32, any_spawned: bool) -> u64 {
    if !any_spawned {
        INITIAL_ENEMY_DELAY_MS
    } else {
        let secs = LEVEL_DURATION_SECONDS as i64 - (level as i64 - 1) * 2;
        (secs * 1000).max(MIN_ENEMY_DELAY_MS as i64) as u64
    }
}

/// Weighted power-up draw with downgrade rules: a tier upgrade too early or
/// at max tier, and a shield repair at full life, both degrade to bonus
/// points so drops are never wasted.
pub fn draw_power_up(roll: u32, tier: u8, life: i32, play_time_ms: u64) -> PowerUpKind {
    if roll < DRAW_CHANCE_BOLT {
        if play_time_ms >= MIN_PLAY_TIME_FOR_BOLT_MS && tier < PLAYER_MAX_TIER {
            PowerUpKind::Bolt
        } else {
            PowerUpKind::Star
        }
    } else if roll < DRAW_CHANCE_BOLT + DRAW_CHANCE_SHIELD {
        if life < PLAYER_MAX_LIFE {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Star
        }
    } else {
        PowerUpKind::Star
    }
}

/// Top up the star field. The very first fill spreads stars over the whole
/// field; afterwards new stars enter from above the top edge.
pub(crate) fn top_up_stars(state: &mut GameState) {
    let field = state.field;
    let quota = minimum_stars(field);
    let init = state.star_count == 0;
    while state.star_count < quota {
        let y = if init {
            state.rng.random_range(0.0..field.height)
        } else {
            -state.rng.random_range(field.height * 0.05..field.height)
        };
        let x = state.rng.random_range(0.0..(field.width - STAR_SIZE).max(1.0));
        let speed = state.rng.random_range(STAR_SPEED_MIN..STAR_SPEED_MAX);
        let variant = state.rng.random_range(0..3u8);
        state
            .entities
            .push(Entity::Star(Star::new(Vec2::new(x, y), speed, variant)));
        state.star_count += 1;
    }
}

/// Top up meteors; each spawn rolls independent size, kind and speed
pub(crate) fn top_up_meteors(state: &mut GameState) {
    let field = state.field;
    let quota = minimum_meteors(field, state.level());
    while state.meteor_count < quota {
        let y = -state.rng.random_range(field.height * 0.2..field.height);
        let size = state.rng.random_range(1..=4u8);
        let kind = if state.rng.random_range(1..=2) == 1 {
            MeteorKind::Brown
        } else {
            MeteorKind::Grey
        };
        let speed = state.rng.random_range(METEOR_SPEED_MIN..METEOR_SPEED_MAX);
        let meteor = Meteor::new(Vec2::new(0.0, y), size, kind, speed);
        let x = state
            .rng
            .random_range(0.0..(field.width - meteor.width()).max(1.0));
        let meteor = Meteor {
            pos: Vec2::new(x, y),
            ..meteor
        };
        state.entities.push(Entity::Meteor(meteor));
        state.meteor_count += 1;
    }
}

/// Admit a new enemy ship if the cap allows it and the level-scaled delay
/// since the last admission has passed. Entry point is one of three modes:
/// left edge, right edge, or above the top.
pub(crate) fn admit_enemy(state: &mut GameState) {
    let field = state.field;
    if state.enemy_count >= max_enemies(field) {
        return;
    }

    let delay = enemy_delay_ms(state.level(), state.last_enemy_spawn_ms.is_some());
    let reference = state.last_enemy_spawn_ms.unwrap_or(0);
    if state.play_time_ms < reference + delay {
        return;
    }

    let pos = match state.rng.random_range(-1..2) {
        -1 => Vec2::new(
            -field.width * 0.5,
            state.rng.random_range(0.0..field.height * 0.45),
        ),
        1 => Vec2::new(
            field.width * 1.5,
            state.rng.random_range(0.0..field.height * 0.45),
        ),
        _ => Vec2::new(
            state.rng.random_range(0.0..field.width),
            -field.height * 0.5,
        ),
    };

    state.entities.push(Entity::EnemyShip(EnemyShip::new(pos)));
    state.enemy_count += 1;
    state.last_enemy_spawn_ms = Some(state.play_time_ms);
    log::debug!(
        "enemy admitted at level {} ({} live)",
        state.level(),
        state.enemy_count
    );
}

/// Redistribute lane boundaries evenly across the field width among all
/// currently live enemies so their patrols do not overlap
pub(crate) fn assign_lanes(state: &mut GameState) {
    let field = state.field;
    let count = state
        .entities
        .iter()
        .filter(|e| matches!(e, Entity::EnemyShip(_)))
        .count();
    if count == 0 {
        return;
    }

    let lane_width = field.width / count as f32;
    let gap = ENEMY_WIDTH / 2.0;
    let mut min_x = gap;
    let mut max_x = lane_width - gap;
    for entity in &mut state.entities {
        if let Entity::EnemyShip(ship) = entity {
            ship.lane_min_x = min_x;
            ship.lane_max_x = max_x;
            min_x += lane_width;
            max_x += lane_width;
        }
    }
}

/// Spawn the power-ups owed for enemies destroyed since the last flush
pub(crate) fn flush_power_ups(state: &mut GameState) {
    let field = state.field;
    while state.pending_power_ups > 0 {
        state.pending_power_ups -= 1;
        let Some(player) = state.player.as_ref() else {
            continue;
        };
        let (tier, life) = (player.tier, player.life);
        let roll = state.rng.random_range(1..=100u32);
        let kind = draw_power_up(roll, tier, life, state.play_time_ms);
        let half = POWER_UP_SIZE / 2.0;
        let x = state
            .rng
            .random_range(half..(field.width - half).max(half + 1.0));
        let pos = Vec2::new(x, -field.height * 0.2);
        state.entities.push(Entity::PowerUp(PowerUp::new(pos, kind)));
    }
}
