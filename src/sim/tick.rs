//! Fixed timestep simulation tick
//!
//! One call advances the game by one frame. The function is scheduler
//! agnostic: the runner drives it from a dedicated thread at a fixed
//! cadence, tests call it synchronously. Pointer input arrives buffered in
//! `TickInput` and is consumed at the top of the tick, so delivery always
//! happens-before the tick it affects.

use glam::Vec2;

use super::collision;
use super::draw::replay_button_rect;
use super::entity::{Entity, Laser, Player};
use super::rect::FieldSize;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A discrete pointer event with field-relative coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            pos: Vec2::new(x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            pos: Vec2::new(x, y),
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Up,
            pos: Vec2::new(x, y),
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Field dimensions, re-read from the host every tick
    pub field: FieldSize,
    /// Pointer events buffered since the previous tick, in temporal order
    pub pointer: Vec<PointerEvent>,
}

impl TickInput {
    pub fn new(field: FieldSize) -> Self {
        Self {
            field,
            pointer: Vec::new(),
        }
    }
}

/// Advance the game state by one fixed 20 ms step
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.field = input.field;
    route_pointer(state, &input.pointer);
    purge_dead(state);

    match state.phase {
        GamePhase::NotStarted => {
            // Idle splash: keep the star field and a display ship alive
            if state.player.as_ref().is_none_or(|p| !p.is_alive()) {
                state.player = Some(Player::new(state.field));
            }
            spawn::top_up_stars(state);
            advance_decorative(state);
        }

        GamePhase::Playing => {
            spawn::top_up_stars(state);
            spawn::top_up_meteors(state);
            spawn::admit_enemy(state);
            spawn::assign_lanes(state);

            fire_weapons(state);
            advance_all(state);
            if let Some(player) = state.player.as_mut() {
                player.clamp_to(state.field);
            }

            collision::resolve(state);
            spawn::flush_power_ups(state);

            // A missing or destroyed player ends the round; not an error
            if state.player.as_ref().is_none_or(|p| !p.is_alive()) {
                let score = state.score;
                state.phase = GamePhase::GameOver;
                // Projectiles and pickups do not outlive the round
                state
                    .entities
                    .retain(|e| !matches!(e, Entity::Laser(_) | Entity::PowerUp(_)));
                state.push_event(GameEvent::GameOver { score });
                log::info!("game over, score {score}");
            }

            state.play_time_ms += TICK_MS;
        }

        GamePhase::GameOver => {
            advance_effects(state);
        }
    }
}

/// Consume buffered pointer events; routing depends on the current phase
fn route_pointer(state: &mut GameState, events: &[PointerEvent]) {
    for event in events {
        match state.phase {
            GamePhase::NotStarted => {
                if event.phase == PointerPhase::Down {
                    state.start_round();
                }
            }
            GamePhase::Playing => match event.phase {
                PointerPhase::Down => {
                    state.last_touch = Some(event.pos);
                }
                PointerPhase::Move => {
                    let last = state.last_touch.unwrap_or(event.pos);
                    let delta = event.pos - last;
                    if let Some(player) = state.player.as_mut() {
                        player.pos += delta;
                        player.clamp_to(state.field);
                    }
                    state.last_touch = Some(event.pos);
                }
                PointerPhase::Up => {
                    state.last_touch = None;
                }
            },
            GamePhase::GameOver => {
                if event.phase == PointerPhase::Up
                    && replay_button_rect(state.field).contains_point(event.pos)
                {
                    state.start_round();
                }
            }
        }
    }
}

/// Remove dead entities and apply their terminal effects exactly once:
/// score awards, spawn-count decrements, power-up debts.
fn purge_dead(state: &mut GameState) {
    let field = state.field;
    let entities = std::mem::take(&mut state.entities);
    let mut kept = Vec::with_capacity(entities.len());
    for entity in entities {
        if entity.is_alive(field) {
            kept.push(entity);
            continue;
        }
        match &entity {
            Entity::Star(_) => state.star_count = state.star_count.saturating_sub(1),
            Entity::Meteor(m) => {
                state.meteor_count = state.meteor_count.saturating_sub(1);
                // Destroyed meteors score; ones that scroll off do not
                if m.life == 0 {
                    state.score += entity.score_value();
                }
            }
            Entity::EnemyShip(_) => {
                state.enemy_count = state.enemy_count.saturating_sub(1);
                state.score += entity.score_value();
                state.pending_power_ups += 1;
            }
            _ => {}
        }
    }
    state.entities = kept;
}

/// Fire player and enemy guns whose cooldown has elapsed
fn fire_weapons(state: &mut GameState) {
    let field = state.field;
    let now = state.play_time_ms;

    if let Some(player) = state.player.as_mut() {
        let interval = 1000 / PLAYER_RATE_OF_FIRE;
        if player.is_alive() && now.saturating_sub(player.last_shot_ms) >= interval {
            let bounds = player.bounds();
            let center_x = bounds.center().x;
            let spread = bounds.width() * 0.3;
            let y = player.pos.y;
            let mut muzzle_xs: Vec<f32> = Vec::with_capacity(3);
            match player.tier {
                1 => muzzle_xs.push(center_x),
                2 => {
                    muzzle_xs.push(center_x - spread);
                    muzzle_xs.push(center_x + spread);
                }
                _ => {
                    muzzle_xs.push(center_x - spread);
                    muzzle_xs.push(center_x);
                    muzzle_xs.push(center_x + spread);
                }
            }
            player.last_shot_ms = now;
            for x in muzzle_xs {
                state
                    .entities
                    .push(Entity::Laser(Laser::new(Vec2::new(x, y), false)));
            }
        }
    }

    let interval = 1000 / ENEMY_RATE_OF_FIRE;
    let mut muzzles: Vec<Vec2> = Vec::new();
    for entity in &mut state.entities {
        if let Entity::EnemyShip(ship) = entity {
            // Hold fire until the ship has fully entered the field
            if ship.life > 0
                && ship.fully_on_field(field)
                && now.saturating_sub(ship.last_shot_ms) >= interval
            {
                let bounds = ship.bounds();
                muzzles.push(Vec2::new(bounds.center().x, bounds.bottom));
                ship.last_shot_ms = now;
            }
        }
    }
    for pos in muzzles {
        state.entities.push(Entity::Laser(Laser::new(pos, true)));
    }
}

/// Advance every entity (PLAYING)
fn advance_all(state: &mut GameState) {
    let field = state.field;
    for entity in &mut state.entities {
        entity.advance(field);
    }
}

/// Advance stars and effects only (NOT_STARTED)
fn advance_decorative(state: &mut GameState) {
    let field = state.field;
    for entity in &mut state.entities {
        match entity {
            Entity::Star(_) | Entity::Explosion(_) => entity.advance(field),
            _ => {}
        }
    }
}

/// Advance effects only (GAME_OVER freezes the field)
fn advance_effects(state: &mut GameState) {
    let field = state.field;
    for entity in &mut state.entities {
        if matches!(entity, Entity::Explosion(_)) {
            entity.advance(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyShip, Meteor, MeteorKind};
    use crate::sim::spawn::max_enemies;

    fn field() -> FieldSize {
        FieldSize::new(1080.0, 1920.0)
    }

    /// Narrow field: meteor and enemy quotas are both zero, so nothing can
    /// collide and the round runs collision-free
    fn quiet_field() -> FieldSize {
        FieldSize::new(200.0, 1000.0)
    }

    fn run_ticks(state: &mut GameState, input: &TickInput, n: usize) {
        for _ in 0..n {
            tick(state, input);
        }
    }

    #[test]
    fn test_idle_tick_keeps_splash_population() {
        let mut state = GameState::new(1, field());
        tick(&mut state, &TickInput::new(field()));
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.player.is_some());
        assert!(state.star_count > 0);
        // Nothing hostile spawns while idle
        assert!(state.entities.iter().all(|e| matches!(e, Entity::Star(_))));
    }

    #[test]
    fn test_start_tap_enters_playing_at_full_life() {
        let mut state = GameState::new(1, field());
        let mut input = TickInput::new(field());
        input.pointer.push(PointerEvent::down(500.0, 900.0));
        tick(&mut state, &input);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.life, PLAYER_MAX_LIFE);
        assert_eq!(player.tier, 1);
    }

    #[test]
    fn test_level_advances_after_fifteen_seconds() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);
        assert_eq!(state.level(), 1);

        let input = TickInput::new(quiet_field());
        // 15 000 ms of ticks, collision free
        run_ticks(&mut state, &input, 15_000 / TICK_MS as usize);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level(), 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_player_death_transitions_to_game_over() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);
        state.take_events();

        // Synthetic damage
        state.player.as_mut().unwrap().life = 0;
        tick(&mut state, &TickInput::new(quiet_field()));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_missing_player_is_game_over_not_an_error() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        state.player = None;
        tick(&mut state, &TickInput::new(quiet_field()));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_replay_tap_restarts_round() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);
        state.score = 123;
        state.player.as_mut().unwrap().life = 0;
        tick(&mut state, &TickInput::new(quiet_field()));
        assert_eq!(state.phase, GamePhase::GameOver);

        let replay = replay_button_rect(quiet_field()).center();
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::up(replay.x, replay.y));
        tick(&mut state, &input);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.as_ref().unwrap().life, PLAYER_MAX_LIFE);
    }

    #[test]
    fn test_tap_outside_replay_control_is_ignored() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);
        state.player.as_mut().unwrap().life = 0;
        tick(&mut state, &TickInput::new(quiet_field()));

        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::up(1.0, 1.0));
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_drag_moves_player_within_clamps() {
        let mut state = GameState::new(1, field());
        let mut input = TickInput::new(field());
        input.pointer.push(PointerEvent::down(500.0, 900.0));
        tick(&mut state, &input);
        let start = state.player.as_ref().unwrap().pos;

        let mut input = TickInput::new(field());
        input.pointer.push(PointerEvent::down(500.0, 900.0));
        input.pointer.push(PointerEvent::moved(450.0, 880.0));
        tick(&mut state, &input);
        let moved = state.player.as_ref().unwrap().pos;
        assert_eq!(moved.x, start.x - 50.0);
        assert_eq!(moved.y, start.y - 20.0);

        // Dragging far upward stops at the top-quarter inset
        let mut input = TickInput::new(field());
        input.pointer.push(PointerEvent::down(450.0, 880.0));
        input.pointer.push(PointerEvent::moved(450.0, -5000.0));
        tick(&mut state, &input);
        assert_eq!(state.player.as_ref().unwrap().pos.y, field().height / 4.0);
    }

    #[test]
    fn test_purge_awards_scripted_destruction_sequence() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        // Scripted kill list: three meteors and two enemy ships
        let meteors = [(1u8, MeteorKind::Brown), (3, MeteorKind::Grey), (4, MeteorKind::Brown)];
        let mut expected = 0u32;
        for (size, kind) in meteors {
            let mut m = Meteor::new(Vec2::new(10.0, 10.0), size, kind, 5.0);
            expected += m.points();
            m.life = 0;
            state.entities.push(Entity::Meteor(m));
            state.meteor_count += 1;
        }
        for _ in 0..2 {
            let mut ship = EnemyShip::new(Vec2::new(10.0, 10.0));
            ship.life = 0;
            state.entities.push(Entity::EnemyShip(ship));
            state.enemy_count += 1;
            expected += ENEMY_POINTS;
        }

        tick(&mut state, &TickInput::new(quiet_field()));
        assert_eq!(state.score, expected);
        // One power-up owed per destroyed enemy; the quiet field already
        // flushed them into the registry
        assert_eq!(
            state
                .entities
                .iter()
                .filter(|e| matches!(e, Entity::PowerUp(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_meteor_scrolling_off_scores_nothing() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        let mut m = Meteor::new(Vec2::new(10.0, 0.0), 4, MeteorKind::Grey, 5.0);
        m.pos.y = quiet_field().height + 10.0;
        state.entities.push(Entity::Meteor(m));
        state.meteor_count += 1;

        tick(&mut state, &TickInput::new(quiet_field()));
        assert_eq!(state.score, 0);
        assert_eq!(state.meteor_count, 0);
    }

    #[test]
    fn test_enemy_cap_is_never_exceeded() {
        let test_field = FieldSize::new(500.0, 1000.0);
        let cap = max_enemies(test_field);
        assert!(cap >= 1);

        let mut state = GameState::new(42, test_field);
        let mut input = TickInput::new(test_field);
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        let input = TickInput::new(test_field);
        for _ in 0..10_000 {
            if state.phase != GamePhase::Playing {
                break;
            }
            tick(&mut state, &input);
            let live = state
                .entities
                .iter()
                .filter(|e| matches!(e, Entity::EnemyShip(_)))
                .count();
            assert!(live <= cap, "live enemies {live} exceeded cap {cap}");
        }
    }

    #[test]
    fn test_player_fires_on_cooldown() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        let input = TickInput::new(quiet_field());
        // Two seconds of play: 2 shots/s, single bolt at tier 1
        run_ticks(&mut state, &input, 2_000 / TICK_MS as usize);
        let fired: Vec<&Entity> = state
            .entities
            .iter()
            .filter(|e| matches!(e, Entity::Laser(_)))
            .collect();
        // Bolts leave the field in under a second, so only the recent
        // volleys are still live; at least one must be
        assert!(!fired.is_empty());
        assert!(fired.iter().all(|e| match e {
            Entity::Laser(l) => !l.adverse,
            _ => false,
        }));
    }

    #[test]
    fn test_game_over_freezes_the_field() {
        let mut state = GameState::new(1, quiet_field());
        let mut input = TickInput::new(quiet_field());
        input.pointer.push(PointerEvent::down(100.0, 800.0));
        tick(&mut state, &input);

        let mut m = Meteor::new(Vec2::new(10.0, 100.0), 2, MeteorKind::Brown, 5.0);
        m.pos.y = 100.0;
        state.entities.push(Entity::Meteor(m));
        state.meteor_count += 1;

        state.player.as_mut().unwrap().life = 0;
        tick(&mut state, &TickInput::new(quiet_field()));
        assert_eq!(state.phase, GamePhase::GameOver);

        let y_before: Vec<f32> = state
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Meteor(m) => Some(m.pos.y),
                _ => None,
            })
            .collect();
        tick(&mut state, &TickInput::new(quiet_field()));
        let y_after: Vec<f32> = state
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Meteor(m) => Some(m.pos.y),
                _ => None,
            })
            .collect();
        assert_eq!(y_before, y_after);
    }

    #[test]
    fn test_field_resize_recomputes_quotas_immediately() {
        let tall = FieldSize::new(1080.0, 1920.0);
        let short = FieldSize::new(1080.0, 400.0);
        let mut state = GameState::new(1, tall);
        tick(&mut state, &TickInput::new(tall));
        let full_quota = state.star_count;
        assert_eq!(full_quota, crate::sim::spawn::minimum_stars(tall));

        // Shrinking the field purges off-screen stars down toward the new,
        // smaller quota; no new ones are spawned above it
        tick(&mut state, &TickInput::new(short));
        assert!(state.star_count <= full_quota);
        tick(&mut state, &TickInput::new(short));
        assert!(state.star_count >= crate::sim::spawn::minimum_stars(short));
    }
}
