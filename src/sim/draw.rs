//! Render command projection
//!
//! The simulation never draws pixels. Each frame it projects its state into
//! a flat list of `RenderCommand`s - a variant tag plus bounds - and the
//! renderer collaborator owns everything about pixel content. Commands are
//! emitted back-to-front: background, stars, field entities, player,
//! effects, HUD.

use super::entity::{Entity, MeteorKind, PowerUpKind};
use super::rect::{FieldSize, Rect};
use super::state::{GamePhase, GameState};

/// What to draw; pixel content is the renderer's concern
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Background,
    Star { variant: u8 },
    Meteor { kind: MeteorKind, size: u8 },
    EnemyShip,
    Player { tier: u8 },
    Laser { adverse: bool },
    PowerUp { kind: PowerUpKind },
    Explosion { frame: u32 },
    ScoreIndicator { value: u32 },
    LevelIndicator { value: u32 },
    LifeBar { life: i32, max: i32 },
    Splash,
    GameOverPanel { score: u32, best: u32 },
    ReplayButton,
}

/// One draw request: a variant tag and where to put it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    pub sprite: SpriteKind,
    pub bounds: Rect,
}

/// Renderer collaborator contract
pub trait Renderer {
    fn render(&mut self, commands: &[RenderCommand]);
}

/// Renderer that discards everything (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _commands: &[RenderCommand]) {}
}

/// The replay control's hit box on the game-over panel
pub fn replay_button_rect(field: FieldSize) -> Rect {
    let width = field.width * 0.4;
    let height = 100.0;
    Rect::from_center(
        glam::Vec2::new(field.width / 2.0, field.height * 0.62),
        width,
        height,
    )
}

/// Project the current state into an ordered list of draw requests
pub fn draw(state: &GameState) -> Vec<RenderCommand> {
    let field = state.field;
    let mut out = vec![RenderCommand {
        sprite: SpriteKind::Background,
        bounds: field.bounds(),
    }];

    // Star field sits behind everything else
    for entity in &state.entities {
        if let Entity::Star(star) = entity {
            out.push(RenderCommand {
                sprite: SpriteKind::Star {
                    variant: star.variant,
                },
                bounds: star.bounds(),
            });
        }
    }

    for entity in &state.entities {
        let command = match entity {
            Entity::Star(_) | Entity::Explosion(_) => continue,
            Entity::Meteor(m) => RenderCommand {
                sprite: SpriteKind::Meteor {
                    kind: m.kind,
                    size: m.size,
                },
                bounds: m.bounds(),
            },
            Entity::PowerUp(p) => RenderCommand {
                sprite: SpriteKind::PowerUp { kind: p.kind },
                bounds: p.bounds(),
            },
            Entity::Laser(l) => RenderCommand {
                sprite: SpriteKind::Laser { adverse: l.adverse },
                bounds: l.bounds(),
            },
            Entity::EnemyShip(e) => RenderCommand {
                sprite: SpriteKind::EnemyShip,
                bounds: e.bounds(),
            },
        };
        out.push(command);
    }

    if let Some(player) = state.player.as_ref() {
        if player.is_alive() {
            out.push(RenderCommand {
                sprite: SpriteKind::Player { tier: player.tier },
                bounds: player.bounds(),
            });
        }
    }

    // Effects play over the field
    for entity in &state.entities {
        if let Entity::Explosion(x) = entity {
            out.push(RenderCommand {
                sprite: SpriteKind::Explosion { frame: x.frame },
                bounds: x.bounds,
            });
        }
    }

    match state.phase {
        GamePhase::NotStarted => {
            out.push(RenderCommand {
                sprite: SpriteKind::Splash,
                bounds: Rect::from_center(
                    glam::Vec2::new(field.width / 2.0, field.height / 2.0),
                    field.width * 0.8,
                    field.height * 0.3,
                ),
            });
        }
        GamePhase::Playing | GamePhase::GameOver => {
            push_hud(state, &mut out);
            if state.phase == GamePhase::GameOver {
                out.push(RenderCommand {
                    sprite: SpriteKind::GameOverPanel {
                        score: state.score,
                        best: state.best_score,
                    },
                    bounds: Rect::from_center(
                        glam::Vec2::new(field.width / 2.0, field.height / 2.0),
                        field.width * 0.7,
                        field.height * 0.4,
                    ),
                });
                out.push(RenderCommand {
                    sprite: SpriteKind::ReplayButton,
                    bounds: replay_button_rect(field),
                });
            }
        }
    }

    out
}

/// Score and level top-left, life bar top-right; pure mirrors of the state
fn push_hud(state: &GameState, out: &mut Vec<RenderCommand>) {
    let field = state.field;
    out.push(RenderCommand {
        sprite: SpriteKind::ScoreIndicator { value: state.score },
        bounds: Rect::new(24.0, 24.0, 384.0, 72.0),
    });
    out.push(RenderCommand {
        sprite: SpriteKind::LevelIndicator {
            value: state.level(),
        },
        bounds: Rect::new(24.0, 84.0, 384.0, 132.0),
    });
    let life = state.player.as_ref().map_or(0, |p| p.life);
    out.push(RenderCommand {
        sprite: SpriteKind::LifeBar {
            life,
            max: crate::consts::PLAYER_MAX_LIFE,
        },
        bounds: Rect::new(field.width - 344.0, 24.0, field.width - 24.0, 72.0),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;

    fn field() -> FieldSize {
        FieldSize::new(1080.0, 1920.0)
    }

    #[test]
    fn test_idle_frame_shows_splash_no_hud() {
        let state = GameState::new(1, field());
        let commands = draw(&state);
        assert!(matches!(commands[0].sprite, SpriteKind::Background));
        assert!(
            commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::Splash))
        );
        assert!(
            !commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::ScoreIndicator { .. }))
        );
    }

    #[test]
    fn test_playing_frame_mirrors_score_level_life() {
        let mut state = GameState::new(1, field());
        state.start_round();
        state.score = 321;
        state.play_time_ms = 16_000;
        state.player.as_mut().unwrap().life = 7;

        let commands = draw(&state);
        assert!(commands.iter().any(|c| matches!(
            c.sprite,
            SpriteKind::ScoreIndicator { value: 321 }
        )));
        assert!(
            commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::LevelIndicator { value: 2 }))
        );
        assert!(commands.iter().any(|c| matches!(
            c.sprite,
            SpriteKind::LifeBar { life: 7, max } if max == crate::consts::PLAYER_MAX_LIFE
        )));
        assert!(
            commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::Player { tier: 1 }))
        );
    }

    #[test]
    fn test_game_over_frame_shows_panel_and_replay() {
        let mut state = GameState::new(1, field());
        state.start_round();
        state.score = 50;
        state.best_score = 900;
        state.phase = GamePhase::GameOver;

        let commands = draw(&state);
        assert!(commands.iter().any(|c| matches!(
            c.sprite,
            SpriteKind::GameOverPanel {
                score: 50,
                best: 900
            }
        )));
        assert!(
            commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::ReplayButton))
        );
    }

    #[test]
    fn test_replay_button_inside_field() {
        let rect = replay_button_rect(field());
        assert!(field().bounds().contains_rect(&rect));
    }

    #[test]
    fn test_dead_player_is_not_drawn() {
        let mut state = GameState::new(1, field());
        state.start_round();
        state.player.as_mut().unwrap().life = 0;
        let commands = draw(&state);
        assert!(
            !commands
                .iter()
                .any(|c| matches!(c.sprite, SpriteKind::Player { .. }))
        );
    }
}
