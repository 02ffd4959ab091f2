//! Collision and damage resolution
//!
//! Runs once per tick during play. Interaction groups, in order:
//! player vs meteors, player vs enemy lasers, player vs enemy ships,
//! enemy ships vs player lasers, meteors vs any laser. Only this module
//! mutates `life` and `consumed` flags; positions are never touched.
//!
//! A consumable damaging entity (laser, power-up) is marked consumed by its
//! first successful pairing and deals no further damage this tick. A
//! non-consumable damaging entity that is itself living (ship or meteor
//! ramming the player) is destroyed by the contact: its life is zeroed and a
//! destruction effect is spawned in its place.

use super::entity::{Entity, Player, PowerUpKind};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Resolve every interaction group for this tick
pub(crate) fn resolve(state: &mut GameState) {
    // The player slot is taken for the duration so the registry can be
    // borrowed independently; a missing player means nothing to resolve
    // against except lasers and meteors.
    let player = state.player.take();

    if let Some(mut player) = player {
        if player.is_alive() {
            player_vs_meteors(state, &mut player);
        }
        if player.is_alive() {
            player_vs_enemy_lasers(state, &mut player);
        }
        if player.is_alive() {
            player_vs_enemy_ships(state, &mut player);
        }
        state.player = Some(player);
    }

    enemy_ships_vs_player_lasers(state);
    meteors_vs_lasers(state);

    if let Some(mut player) = state.player.take() {
        if player.is_alive() {
            consume_power_ups(state, &mut player);
        }
        state.player = Some(player);
    }
}

/// Apply damage to the player and emit the matching feedback event
fn apply_player_damage(state: &mut GameState, player: &mut Player, damage: i32) {
    player.apply_damage(damage);
    if player.life == 0 {
        state.spawn_explosion(player.bounds());
        state.push_event(GameEvent::ShipDestroyed);
    } else {
        state.push_event(GameEvent::Hit { player: true });
    }
}

/// Meteors ram the player: mutual destruction for the meteor
fn player_vs_meteors(state: &mut GameState, player: &mut Player) {
    let player_bounds = player.bounds();
    for i in 0..state.entities.len() {
        let mut contact = None;
        if let Entity::Meteor(m) = &mut state.entities[i] {
            if m.life > 0 && m.on_field() && m.bounds().overlaps(&player_bounds) {
                m.life = 0;
                contact = Some((m.damage(), m.bounds()));
            }
        }
        let Some((damage, bounds)) = contact else {
            continue;
        };
        state.spawn_explosion(bounds);
        state.push_event(GameEvent::MeteorDestroyed);
        apply_player_damage(state, player, damage);
        if !player.is_alive() {
            return;
        }
    }
}

/// Enemy fire against the player
fn player_vs_enemy_lasers(state: &mut GameState, player: &mut Player) {
    let player_bounds = player.bounds();
    for i in 0..state.entities.len() {
        let mut damage = None;
        if let Entity::Laser(l) = &mut state.entities[i] {
            if l.adverse
                && !l.consumed
                && player_bounds.top >= 0.0
                && l.bounds().overlaps(&player_bounds)
            {
                l.consumed = true;
                damage = Some(l.damage());
            }
        }
        let Some(damage) = damage else {
            continue;
        };
        apply_player_damage(state, player, damage);
        if !player.is_alive() {
            return;
        }
    }
}

/// Ship-to-ship contact: the enemy is destroyed, the player takes its damage
fn player_vs_enemy_ships(state: &mut GameState, player: &mut Player) {
    let player_bounds = player.bounds();
    for i in 0..state.entities.len() {
        let mut contact = None;
        if let Entity::EnemyShip(e) = &mut state.entities[i] {
            if e.life > 0 && e.bounds().overlaps(&player_bounds) {
                e.life = 0;
                contact = Some((e.damage(), e.bounds()));
            }
        }
        let Some((damage, bounds)) = contact else {
            continue;
        };
        state.spawn_explosion(bounds);
        state.push_event(GameEvent::ShipDestroyed);
        apply_player_damage(state, player, damage);
        if !player.is_alive() {
            return;
        }
    }
}

/// Player fire against enemy ships
fn enemy_ships_vs_player_lasers(state: &mut GameState) {
    let len = state.entities.len();
    for living in 0..len {
        let ship_bounds = match &state.entities[living] {
            Entity::EnemyShip(e) if e.life > 0 => e.bounds(),
            _ => continue,
        };
        if ship_bounds.top < 0.0 {
            continue;
        }

        for damaging in 0..len {
            let mut damage = None;
            if let Entity::Laser(l) = &mut state.entities[damaging] {
                if !l.adverse && !l.consumed && l.bounds().overlaps(&ship_bounds) {
                    l.consumed = true;
                    damage = Some(l.damage());
                }
            }
            let Some(damage) = damage else {
                continue;
            };

            let mut destroyed = false;
            if let Entity::EnemyShip(e) = &mut state.entities[living] {
                e.life = (e.life - damage).max(0);
                destroyed = e.life == 0;
            }
            if destroyed {
                state.spawn_explosion(ship_bounds);
                state.push_event(GameEvent::ShipDestroyed);
                break;
            }
            state.push_event(GameEvent::Hit { player: false });
        }
    }
}

/// Both sides' fire chips away at meteors
fn meteors_vs_lasers(state: &mut GameState) {
    let len = state.entities.len();
    for living in 0..len {
        let meteor_bounds = match &state.entities[living] {
            Entity::Meteor(m) if m.life > 0 => m.bounds(),
            _ => continue,
        };
        if meteor_bounds.top < 0.0 {
            continue;
        }

        for damaging in 0..len {
            let mut damage = None;
            if let Entity::Laser(l) = &mut state.entities[damaging] {
                if !l.consumed && l.bounds().overlaps(&meteor_bounds) {
                    l.consumed = true;
                    damage = Some(l.damage());
                }
            }
            let Some(damage) = damage else {
                continue;
            };

            let mut destroyed = false;
            if let Entity::Meteor(m) = &mut state.entities[living] {
                m.life = (m.life - damage).max(0);
                destroyed = m.life == 0;
            }
            if destroyed {
                state.spawn_explosion(meteor_bounds);
                state.push_event(GameEvent::MeteorDestroyed);
                break;
            }
            state.push_event(GameEvent::Hit { player: false });
        }
    }
}

/// Player contact consumes power-ups and applies their payload
fn consume_power_ups(state: &mut GameState, player: &mut Player) {
    let player_bounds = player.bounds();
    for i in 0..state.entities.len() {
        let kind = match &mut state.entities[i] {
            Entity::PowerUp(p)
                if !p.consumed && p.on_field() && p.bounds().overlaps(&player_bounds) =>
            {
                p.consumed = true;
                p.kind
            }
            _ => continue,
        };
        match kind {
            PowerUpKind::Bolt => player.upgrade(),
            PowerUpKind::Shield => {
                player.repair((PLAYER_MAX_LIFE as f32 * SHIELD_REPAIR_FRACTION) as i32)
            }
            PowerUpKind::Star => state.score += BONUS_POINTS,
        }
        state.push_event(GameEvent::PowerUpCollected { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyShip, Laser, Meteor, MeteorKind, PowerUp};
    use crate::sim::rect::FieldSize;
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(1, FieldSize::new(1080.0, 1920.0));
        state.start_round();
        state.take_events();
        state
    }

    fn player_pos(state: &GameState) -> Vec2 {
        state.player.as_ref().unwrap().pos
    }

    #[test]
    fn test_meteor_ramming_is_mutual_destruction() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        state.entities.push(Entity::Meteor(Meteor::new(
            pos,
            2,
            MeteorKind::Grey,
            5.0,
        )));

        resolve(&mut state);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.life, PLAYER_MAX_LIFE - 4);
        match &state.entities[0] {
            Entity::Meteor(m) => assert_eq!(m.life, 0),
            other => panic!("unexpected entity: {other:?}"),
        }
        // A destruction effect was spawned for the meteor
        assert!(
            state
                .entities
                .iter()
                .any(|e| matches!(e, Entity::Explosion(_)))
        );
        let events = state.take_events();
        assert!(events.contains(&GameEvent::MeteorDestroyed));
        assert!(events.contains(&GameEvent::Hit { player: true }));
    }

    #[test]
    fn test_player_life_clamped_at_zero() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        state.player.as_mut().unwrap().life = 3;
        state.entities.push(Entity::Meteor(Meteor::new(
            pos,
            4,
            MeteorKind::Grey,
            5.0,
        )));

        resolve(&mut state);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.life, 0);
        assert!(state.take_events().contains(&GameEvent::ShipDestroyed));
    }

    #[test]
    fn test_consumed_laser_hits_only_the_first_target() {
        let mut state = playing_state();
        // Two meteors stacked on the same spot, one laser overlapping both
        let spot = Vec2::new(500.0, 500.0);
        state.entities.push(Entity::Meteor(Meteor::new(
            spot,
            2,
            MeteorKind::Brown,
            5.0,
        )));
        state.entities.push(Entity::Meteor(Meteor::new(
            spot,
            2,
            MeteorKind::Brown,
            5.0,
        )));
        state
            .entities
            .push(Entity::Laser(Laser::new(Vec2::new(520.0, 520.0), false)));

        resolve(&mut state);

        let lives: Vec<i32> = state
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Meteor(m) => Some(m.life),
                _ => None,
            })
            .collect();
        // Only the first meteor in registry order was damaged
        assert_eq!(lives, vec![1, 2]);
        assert!(state.entities.iter().any(|e| match e {
            Entity::Laser(l) => l.consumed,
            _ => false,
        }));
    }

    #[test]
    fn test_enemy_laser_damages_player_once() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        state
            .entities
            .push(Entity::Laser(Laser::new(pos + Vec2::new(10.0, 10.0), true)));

        resolve(&mut state);
        assert_eq!(
            state.player.as_ref().unwrap().life,
            PLAYER_MAX_LIFE - LASER_DAMAGE
        );

        // Already consumed: resolving again deals no further damage
        resolve(&mut state);
        assert_eq!(
            state.player.as_ref().unwrap().life,
            PLAYER_MAX_LIFE - LASER_DAMAGE
        );
    }

    #[test]
    fn test_player_laser_chips_enemy_ship() {
        let mut state = playing_state();
        let mut ship = EnemyShip::new(Vec2::new(400.0, 300.0));
        ship.lane_min_x = 0.0;
        ship.lane_max_x = 1080.0;
        state.entities.push(Entity::EnemyShip(ship));
        state
            .entities
            .push(Entity::Laser(Laser::new(Vec2::new(420.0, 320.0), false)));

        resolve(&mut state);

        match &state.entities[0] {
            Entity::EnemyShip(e) => assert_eq!(e.life, ENEMY_MAX_LIFE - LASER_DAMAGE),
            other => panic!("unexpected entity: {other:?}"),
        }
        assert!(
            state
                .take_events()
                .contains(&GameEvent::Hit { player: false })
        );
    }

    #[test]
    fn test_ship_contact_destroys_enemy_and_damages_player() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        state.entities.push(Entity::EnemyShip(EnemyShip::new(pos)));

        resolve(&mut state);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.life, PLAYER_MAX_LIFE - ENEMY_DAMAGE);
        match &state.entities[0] {
            Entity::EnemyShip(e) => assert_eq!(e.life, 0),
            other => panic!("unexpected entity: {other:?}"),
        }
        assert!(state.take_events().contains(&GameEvent::ShipDestroyed));
    }

    #[test]
    fn test_offscreen_meteor_cannot_hit() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        let mut meteor = Meteor::new(pos, 2, MeteorKind::Grey, 5.0);
        meteor.pos.y = -10.0;
        state.entities.push(Entity::Meteor(meteor));

        resolve(&mut state);
        assert_eq!(state.player.as_ref().unwrap().life, PLAYER_MAX_LIFE);
    }

    #[test]
    fn test_power_up_payloads() {
        let mut state = playing_state();
        let pos = player_pos(&state);
        state.player.as_mut().unwrap().life = 10;
        state.entities.push(Entity::PowerUp(PowerUp::new(
            pos + Vec2::new(10.0, 10.0),
            PowerUpKind::Bolt,
        )));
        state.entities.push(Entity::PowerUp(PowerUp::new(
            pos + Vec2::new(20.0, 20.0),
            PowerUpKind::Shield,
        )));
        state.entities.push(Entity::PowerUp(PowerUp::new(
            pos + Vec2::new(30.0, 30.0),
            PowerUpKind::Star,
        )));

        resolve(&mut state);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.tier, 2);
        assert_eq!(
            player.life,
            10 + (PLAYER_MAX_LIFE as f32 * SHIELD_REPAIR_FRACTION) as i32
        );
        assert_eq!(state.score, BONUS_POINTS);
        assert!(state.entities.iter().all(|e| match e {
            Entity::PowerUp(p) => p.consumed,
            _ => true,
        }));
        assert_eq!(
            state
                .take_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PowerUpCollected { .. }))
                .count(),
            3
        );
    }
}
