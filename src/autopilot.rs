//! Demo controller
//!
//! Plays the game by looking at the nearest hazard ahead of the runner and
//! issuing the same commands a player would. It reads state only; it never
//! moves entities or touches the random source.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::engine::Engine;
use crate::sim::{Command, EntityKind, EntityRole, GamePhase, GameState, PlayerState, RandomSource};

/// How a hazard is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Maneuver {
    Jump,
    Slide,
}

fn maneuver_for(kind: EntityKind) -> Option<Maneuver> {
    match kind {
        EntityKind::LowObstacle | EntityKind::PitObstacle | EntityKind::DoubleSpike => {
            Some(Maneuver::Jump)
        }
        // The barrier cannot be jumped; crouching gives the widest gap under it
        EntityKind::OverheadObstacle | EntityKind::OscillatingBarrier => Some(Maneuver::Slide),
        EntityKind::Coin | EntityKind::AmbientParticle => None,
    }
}

/// Look-ahead tuning, in seconds of scroll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Autopilot {
    /// Jump when the hazard's center is this far away
    pub jump_lead_secs: f32,
    /// Crouch when the hazard's leading edge is this far from the runner's front
    pub slide_lead_secs: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            // Apex lines up with the hazard's center
            jump_lead_secs: -JUMP_VELOCITY / GRAVITY,
            slide_lead_secs: 0.1,
        }
    }
}

impl Autopilot {
    /// Commands for the next step
    pub fn decide(&self, state: &GameState) -> Vec<Command> {
        let mut commands = Vec::new();
        if state.phase != GamePhase::Running {
            return commands;
        }

        let player = &state.player;
        let body = player.aabb();
        let speed = state.scroll_speed().max(1.0);

        let hazard = state
            .entities
            .with_role(EntityRole::Obstacle)
            .filter(|e| e.aabb().max.x > body.min.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

        let Some(hazard) = hazard else {
            if player.state == PlayerState::Sliding {
                commands.push(Command::SlideEnd);
            }
            return commands;
        };

        match maneuver_for(hazard.kind) {
            Some(Maneuver::Jump) => {
                let to_center = hazard.pos.x - player.pos.x;
                if to_center <= speed * self.jump_lead_secs {
                    if player.state == PlayerState::Sliding {
                        commands.push(Command::SlideEnd);
                    }
                    if player.state != PlayerState::Airborne {
                        commands.push(Command::Jump);
                    }
                } else if player.state == PlayerState::Sliding {
                    commands.push(Command::SlideEnd);
                }
            }
            Some(Maneuver::Slide) => {
                let gap = hazard.aabb().min.x - body.max.x;
                if gap <= speed * self.slide_lead_secs {
                    if player.state == PlayerState::Grounded {
                        commands.push(Command::SlideStart);
                    }
                } else if player.state == PlayerState::Sliding {
                    commands.push(Command::SlideEnd);
                }
            }
            None => {}
        }
        commands
    }

    /// Queue this step's commands on `engine`; returns how many were sent
    pub fn drive<R: RandomSource>(&self, engine: &mut Engine<R>) -> usize {
        let commands = self.decide(engine.state());
        for &command in &commands {
            engine.send(command);
        }
        commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RunConfig;
    use crate::sim::{ScriptedRandom, TickInput, tick};
    use glam::Vec2;

    fn running_state() -> GameState {
        let mut state = GameState::new(&RunConfig::default(), 1);
        state.phase = GamePhase::Running;
        state
    }

    fn place(state: &mut GameState, kind: EntityKind, x: f32) {
        let y = state.viewport.floor_y() - kind.rest_height();
        state
            .entities
            .spawn(kind, Vec2::new(x, y), Vec2::ZERO, kind.spawn_motion(y));
    }

    /// Play `ticks` steps under the autopilot
    fn autoplay(state: &mut GameState, ticks: usize) {
        let pilot = Autopilot::default();
        let mut rng = ScriptedRandom::default();
        for _ in 0..ticks {
            let input = TickInput::from(pilot.decide(state));
            tick(state, &input, 16.0, &mut rng);
        }
    }

    #[test]
    fn test_idle_when_nothing_ahead() {
        let state = running_state();
        assert!(Autopilot::default().decide(&state).is_empty());
    }

    #[test]
    fn test_not_running_sends_nothing() {
        let mut state = GameState::new(&RunConfig::default(), 1);
        place(&mut state, EntityKind::LowObstacle, PLAYER_X + 50.0);
        assert!(Autopilot::default().decide(&state).is_empty());
    }

    #[test]
    fn test_waits_then_jumps_spike() {
        let pilot = Autopilot::default();
        let mut state = running_state();
        place(&mut state, EntityKind::LowObstacle, PLAYER_X + 400.0);
        assert!(pilot.decide(&state).is_empty());

        let mut state = running_state();
        place(&mut state, EntityKind::LowObstacle, PLAYER_X + 140.0);
        assert_eq!(pilot.decide(&state), vec![Command::Jump]);
    }

    #[test]
    fn test_slides_under_overhang() {
        let pilot = Autopilot::default();
        let mut state = running_state();
        place(&mut state, EntityKind::OverheadObstacle, PLAYER_X + 100.0);
        assert_eq!(pilot.decide(&state), vec![Command::SlideStart]);

        let mut state = running_state();
        place(&mut state, EntityKind::OscillatingBarrier, PLAYER_X + 40.0);
        assert_eq!(pilot.decide(&state), vec![Command::SlideStart]);
    }

    #[test]
    fn test_stands_up_before_jumping() {
        let pilot = Autopilot::default();
        let mut state = running_state();
        state.player.start_slide(0.0);
        place(&mut state, EntityKind::PitObstacle, PLAYER_X + 120.0);
        assert_eq!(pilot.decide(&state), vec![Command::SlideEnd, Command::Jump]);
    }

    #[test]
    fn test_releases_slide_when_clear() {
        let mut state = running_state();
        state.player.start_slide(0.0);
        assert_eq!(
            Autopilot::default().decide(&state),
            vec![Command::SlideEnd]
        );
    }

    #[test]
    fn test_ignores_coins_and_passed_hazards() {
        let mut state = running_state();
        place(&mut state, EntityKind::Coin, PLAYER_X + 30.0);
        place(&mut state, EntityKind::LowObstacle, PLAYER_X - 60.0);
        assert!(Autopilot::default().decide(&state).is_empty());
    }

    #[test]
    fn test_clears_each_static_hazard() {
        for kind in [
            EntityKind::LowObstacle,
            EntityKind::OverheadObstacle,
            EntityKind::PitObstacle,
            EntityKind::DoubleSpike,
        ] {
            let mut state = running_state();
            place(&mut state, kind, 700.0);
            autoplay(&mut state, 150);
            assert!(!state.is_game_over(), "autopilot hit {kind:?}");
            assert_eq!(state.distance(), 150);
        }
    }
}
