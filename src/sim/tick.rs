//! Per-tick simulation pipeline
//!
//! Order within a tick:
//! 1. queued commands
//! 2. clock, slide expiry
//! 3. per physics sub-step: player, entities at the current speed, contacts
//! 4. spawning (new entities do not move until the next tick)
//! 5. coin pickups, only if no obstacle was hit this tick
//! 6. distance / level / difficulty
//! 7. culling

use serde::{Deserialize, Serialize};

use super::collision::{self, CollisionOutcome};
use super::entity::EntityKind;
use super::player::{Player, PlayerState};
use super::rng::RandomSource;
use super::spawner::SpawnContext;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Jump,
    SlideStart,
    SlideEnd,
}

/// Commands for a single tick, applied in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl From<Vec<Command>> for TickInput {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

/// Apply one command; disallowed commands are ignored
fn apply_command(player: &mut Player, command: Command, now_ms: f64) -> bool {
    match command {
        Command::Jump => player.jump(),
        Command::SlideStart => player.start_slide(now_ms),
        Command::SlideEnd => player.end_slide(),
    }
}

/// Advance the run by one logical tick
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f64, rng: &mut impl RandomSource) {
    if state.phase != GamePhase::Running {
        return;
    }

    let issued_at = state.clock.now_ms();
    for &command in &input.commands {
        apply_command(&mut state.player, command, issued_at);
    }

    let frame = state.clock.advance(delta_ms);
    let now_ms = state.clock.now_ms();
    if state.player.expire_slide(now_ms) {
        log::debug!("Slide released by timeout at {now_ms:.0}ms");
    }

    // Player and world share each sub-step so fast hazards cannot skip past the player
    state.entities.set_scroll_speed(state.progression.scroll_speed);
    let h = frame.substep_secs();
    let mut touched = Vec::new();
    for _ in 0..frame.substeps {
        state.player.integrate_substep(h);
        state.entities.advance_substep(h);
        if check_contacts(state, &mut touched) {
            return;
        }
    }

    let ctx = SpawnContext {
        now_ms,
        tick: state.clock.ticks(),
        level: state.progression.level,
        difficulty_multiplier: state.progression.difficulty_multiplier,
        coin_multiplier: state.progression.coin_cadence_multiplier(),
        scroll_speed: state.progression.scroll_speed,
        viewport: state.viewport,
        player_pos: state.player.pos,
        player_on_ground: state.player.state != PlayerState::Airborne,
    };
    state.spawner.update(&ctx, &mut state.entities, rng);
    if check_contacts(state, &mut touched) {
        return;
    }

    // Pickups only count once the whole tick is known to be survivable
    touched.sort_unstable();
    for id in touched {
        if state.entities.remove(id).is_some() {
            state.score += 1;
            state
                .events
                .push(GameEvent::CoinCollected { score: state.score });
        }
    }

    if let Some(change) = state.progression.advance(state.clock.ticks()) {
        log::info!("Level {} -> {}: {}", change.from, change.to, change.message);
        state.events.push(GameEvent::LevelChanged(change));
    }

    state.entities.cull();
}

/// Collide the player with the pool at its current positions.
/// Coins touched are remembered in `touched`; returns true if the run ended.
fn check_contacts(state: &mut GameState, touched: &mut Vec<u32>) -> bool {
    match collision::resolve(&state.player, &state.entities) {
        CollisionOutcome::Fatal { kind, .. } => {
            end_run(state, kind);
            state.entities.cull();
            true
        }
        CollisionOutcome::Collected(ids) => {
            for id in ids {
                if !touched.contains(&id) {
                    touched.push(id);
                }
            }
            false
        }
        CollisionOutcome::Clear => false,
    }
}

/// Freeze the run after a fatal collision
fn end_run(state: &mut GameState, hit: EntityKind) {
    state.phase = GamePhase::GameOver;
    state.player.freeze();
    log::info!(
        "Game over: hit {:?} with {} coins at {}m",
        hit,
        state.score,
        state.display_distance()
    );
    state.events.push(GameEvent::GameOver {
        final_score: state.score,
        distance: state.distance(),
        tick: state.clock.ticks(),
        hit,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::RunConfig;
    use crate::sim::entity::{EntityRole, Motion};
    use crate::sim::rng::{RngState, ScriptedRandom};
    use glam::Vec2;

    const DT: f64 = 16.0;

    fn running_state() -> GameState {
        let mut state = GameState::new(&RunConfig::default(), 1);
        state.phase = GamePhase::Running;
        state
    }

    fn run(state: &mut GameState, rng: &mut impl RandomSource, ticks: usize) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input, DT, rng);
        }
    }

    fn floor_y(state: &GameState) -> f32 {
        state.viewport.floor_y()
    }

    #[test]
    fn test_ready_state_does_not_tick() {
        let mut state = GameState::new(&RunConfig::default(), 1);
        let mut rng = ScriptedRandom::default();
        tick(&mut state, &TickInput::default(), DT, &mut rng);
        assert_eq!(state.clock.ticks(), 0);
        assert_eq!(state.distance(), 0);
    }

    #[test]
    fn test_distance_counts_ticks() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        run(&mut state, &mut rng, 5);
        assert_eq!(state.distance(), 5);
        assert_eq!(state.clock.ticks(), 5);
    }

    #[test]
    fn test_jump_command_applies_next_tick() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        tick(&mut state, &TickInput::from(vec![Command::Jump]), DT, &mut rng);
        assert_eq!(state.player_state(), PlayerState::Airborne);
        assert!(state.player.pos.y < state.player.ground_y());
    }

    #[test]
    fn test_slide_press_and_release_same_tick() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        let input: TickInput = vec![Command::SlideStart, Command::SlideEnd].into();
        tick(&mut state, &input, DT, &mut rng);
        assert_eq!(state.player_state(), PlayerState::Grounded);
        assert_eq!(state.player.slide_deadline_ms, None);
    }

    #[test]
    fn test_slide_timeout_scenario() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        tick(&mut state, &TickInput::from(vec![Command::SlideStart]), DT, &mut rng);
        assert_eq!(state.player_state(), PlayerState::Sliding);

        let mut released_at = None;
        let empty = TickInput::default();
        while state.clock.now_ms() < 700.0 {
            tick(&mut state, &empty, DT, &mut rng);
            if released_at.is_none() && state.player_state() == PlayerState::Grounded {
                released_at = Some(state.clock.now_ms());
            }
        }
        // Slide started at t=0
        let released_at = released_at.unwrap();
        assert!((600.0..600.0 + DT).contains(&released_at), "released at {released_at}");
        assert_eq!(state.player.aabb().height(), PLAYER_HEIGHT);
    }

    #[test]
    fn test_new_entities_do_not_move_on_spawn_tick() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::new([0, 1700]);
        let empty = TickInput::default();
        let spawn_x = state.viewport.width + EntityKind::LowObstacle.lead_in();

        let mut first_seen = None;
        for _ in 0..120 {
            tick(&mut state, &empty, DT, &mut rng);
            if let Some(obstacle) = state.entities.with_role(EntityRole::Obstacle).next() {
                first_seen = Some((obstacle.id, obstacle.pos.x));
                break;
            }
        }
        let (id, x) = first_seen.expect("obstacle due after the initial delay");
        assert_eq!(x, spawn_x);

        tick(&mut state, &empty, DT, &mut rng);
        assert!(state.entities.get(id).unwrap().pos.x < spawn_x);
    }

    #[test]
    fn test_fast_spike_cannot_skip_the_player() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        state.progression = crate::sim::progression::Progression::at_distance(7000);
        let floor = floor_y(&state);
        // Clear of the player now, well past it after a 100ms tick at 840 u/s
        state.entities.spawn(
            EntityKind::LowObstacle,
            Vec2::new(PLAYER_X + 29.0, floor - EntityKind::LowObstacle.rest_height()),
            Vec2::ZERO,
            Motion::Linear,
        );
        tick(&mut state, &TickInput::default(), 100.0, &mut rng);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_fatal_later_in_tick_voids_earlier_pickup() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        state.progression = crate::sim::progression::Progression::at_distance(7000);
        let floor = floor_y(&state);
        let y = state.player.pos.y;
        // Coin is touched on the first sub-step, the spike near the end
        state.entities.spawn(
            EntityKind::Coin,
            Vec2::new(PLAYER_X + 35.0, y),
            Vec2::ZERO,
            Motion::Linear,
        );
        state.entities.spawn(
            EntityKind::LowObstacle,
            Vec2::new(PLAYER_X + 100.0, floor - EntityKind::LowObstacle.rest_height()),
            Vec2::ZERO,
            Motion::Linear,
        );
        tick(&mut state, &TickInput::default(), 100.0, &mut rng);
        assert!(state.is_game_over());
        assert_eq!(state.score, 0);
        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::GameOver { final_score: 0, .. }));
    }

    #[test]
    fn test_coin_pickup_scores_once() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        let y = state.player.pos.y;
        // Directly ahead, arrives next tick
        let id = state.entities.spawn(
            EntityKind::Coin,
            Vec2::new(PLAYER_X + 20.0, y),
            Vec2::new(-BASE_SCROLL_SPEED, 0.0),
            Motion::Linear,
        );
        run(&mut state, &mut rng, 1);
        assert_eq!(state.score, 1);
        assert!(state.entities.get(id).is_none());
        assert_eq!(state.take_events(), vec![GameEvent::CoinCollected { score: 1 }]);

        run(&mut state, &mut rng, 3);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_obstacle_and_coin_same_tick() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        let floor = floor_y(&state);
        state.entities.spawn(
            EntityKind::Coin,
            Vec2::new(PLAYER_X, floor - 30.0),
            Vec2::ZERO,
            Motion::Linear,
        );
        state.entities.spawn(
            EntityKind::LowObstacle,
            Vec2::new(PLAYER_X + 10.0, floor - EntityKind::LowObstacle.rest_height()),
            Vec2::ZERO,
            Motion::Linear,
        );
        let score_before = state.score;
        run(&mut state, &mut rng, 1);

        assert!(state.is_game_over());
        assert_eq!(state.score, score_before);
        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            GameEvent::GameOver { final_score: 0, hit: EntityKind::LowObstacle, .. }
        ));
    }

    #[test]
    fn test_game_over_freezes_everything() {
        let mut state = running_state();
        let mut rng = RngState::new(9).to_rng();
        let floor = floor_y(&state);
        state.entities.spawn(
            EntityKind::PitObstacle,
            Vec2::new(PLAYER_X, floor - EntityKind::PitObstacle.rest_height()),
            Vec2::ZERO,
            Motion::Linear,
        );
        run(&mut state, &mut rng, 1);
        assert!(state.is_game_over());
        state.take_events();

        let ticks = state.clock.ticks();
        let entities = state.entities.len();
        let input: TickInput = vec![Command::Jump, Command::SlideStart].into();
        for _ in 0..200 {
            tick(&mut state, &input, DT, &mut rng);
        }
        assert_eq!(state.clock.ticks(), ticks);
        assert_eq!(state.entities.len(), entities);
        assert_eq!(state.player_state(), PlayerState::Grounded);
        assert!(state.take_events().is_empty(), "game over fires once");
    }

    #[test]
    fn test_level_up_event() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        state.progression = crate::sim::progression::Progression::at_distance(499);
        run(&mut state, &mut rng, 1);
        let events = state.take_events();
        let change = events
            .iter()
            .find_map(|e| match e {
                GameEvent::LevelChanged(c) => Some(c.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!((change.from, change.to), (1, 2));
        assert_eq!(change.tick, 1);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_offscreen_entities_culled_same_tick() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        let floor = floor_y(&state);
        state.entities.spawn(
            EntityKind::LowObstacle,
            Vec2::new(OBSTACLE_CULL_X + 1.0, floor - 32.0),
            Vec2::ZERO,
            Motion::Linear,
        );
        run(&mut state, &mut rng, 1);
        assert_eq!(state.entities.count_role(EntityRole::Obstacle), 0);
        assert_eq!(state.entities.stale_count(), 0);
    }

    #[test]
    fn test_speed_tracks_difficulty() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::default();
        state.progression = crate::sim::progression::Progression::at_distance(6999);
        let floor = floor_y(&state);
        let id = state.entities.spawn(
            EntityKind::Coin,
            Vec2::new(900.0, floor - 150.0),
            Vec2::new(-BASE_SCROLL_SPEED, 0.0),
            Motion::Linear,
        );
        run(&mut state, &mut rng, 1);
        // Velocity refreshed to the previous tick's speed (1 + 699/700)
        let coin = state.entities.get(id).unwrap();
        assert!(coin.vel.x < -BASE_SCROLL_SPEED * 1.9);
        assert!((state.difficulty_multiplier() - 2.0).abs() < 1e-6);
        assert!((state.scroll_speed() - 840.0).abs() < 1e-3);
    }
}
