//! Frame driver: one [`tick`] per simulation step, then a cast and a
//! projection for whatever draws the frame.

use crate::collision::CollisionResolver;
use crate::error::{CastError, MapError};
use crate::map::{GridMap, Level};
use crate::player::PlayerState;
use crate::projector::{Column, ColumnProjector};
use crate::ray::{DdaRaycaster, RayHit};
use crate::settings::Settings;
use glam::Vec2;

/// What the player asked for during one tick.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Input {
    /// grid units along the heading
    pub forward: f32,
    /// grid units to the right of the heading
    pub strafe: f32,
    /// radians, positive turns clockwise on screen
    pub turn: f32,
}

impl Input {
    /// Scale control axes by the configured speeds. Forward and strafe
    /// together never move faster than `move_speed`.
    pub fn from_axes(forward: f32, strafe: f32, turn: f32, settings: &Settings) -> Self {
        let walk = Vec2::new(forward, strafe).clamp_length_max(1.) * settings.move_speed;
        Self {
            forward: walk.x,
            strafe: walk.y,
            turn: turn.clamp(-1., 1.) * settings.turn_speed,
        }
    }

    /// add horizontal mouse motion, in pixels
    pub fn look(mut self, dx: i32, settings: &Settings) -> Self {
        self.turn += dx as f32 * settings.mouse_sensitivity;
        self
    }
}

/// Advance the player by one tick: turn first, then move along the new
/// heading.
pub fn tick(grid: &GridMap, settings: &Settings, state: PlayerState, input: Input) -> PlayerState {
    let resolver = CollisionResolver::new(grid).with_epsilon(settings.epsilon);
    let mut next = state;
    next.rotate(input.turn);
    next.walk(&resolver, input.strafe, input.forward);
    next
}

/// Owns everything one view needs across frames.
pub struct Engine {
    level: Level,
    settings: Settings,
    projector: ColumnProjector,
    player: PlayerState,
    hits: Vec<RayHit>,
}

impl Engine {
    pub fn new(level: Level, settings: Settings) -> Result<Self, MapError> {
        let player = PlayerState::new(level.spawn, level.heading, settings.hitbox_size);
        if CollisionResolver::new(&level.grid).overlaps_solid(player.pos, player.hitbox) {
            log::warn!(
                "spawn at {} overlaps a wall with a {} hitbox",
                player.pos,
                player.hitbox
            );
        }
        if !level.grid.is_open_at(player.pos) {
            return Err(MapError::BadSpawn(player.pos));
        }

        log::info!(
            "engine ready: {}x{} grid, {} rays over {:.1} degrees",
            level.grid.width(),
            level.grid.height(),
            settings.ray_count,
            settings.fov.to_degrees()
        );

        Ok(Self {
            projector: level.shading.unwrap_or(settings.shading),
            hits: Vec::with_capacity(settings.ray_count),
            level,
            settings,
            player,
        })
    }

    pub fn grid(&self) -> &GridMap {
        &self.level.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// hits from the last [`cast`](Self::cast)
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    pub fn step(&mut self, input: Input) {
        self.player = tick(&self.level.grid, &self.settings, self.player, input);
    }

    /// Recast the view from the current player state into the reused buffer.
    pub fn cast(&mut self) -> Result<&[RayHit], CastError> {
        DdaRaycaster::new(&self.level.grid).cast_into(
            &mut self.hits,
            self.player.pos,
            self.player.heading,
            self.settings.fov,
            self.settings.ray_count,
        )?;
        log::trace!("cast {} rays from {}", self.hits.len(), self.player.pos);

        Ok(&self.hits)
    }

    /// wall slices for the last cast, left to right
    pub fn columns(&self, screen_height: f32) -> impl Iterator<Item = Column> + '_ {
        self.hits
            .iter()
            .map(move |hit| self.projector.project(hit, screen_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

    #[test]
    fn axes_are_scaled_and_clamped() {
        let settings = Settings::default();
        let input = Input::from_axes(3., 0., 0.5, &settings);
        assert_eq!(input.forward, settings.move_speed);
        assert_eq!(input.strafe, 0.);
        assert_eq!(input.turn, settings.turn_speed * 0.5);

        let input = Input::from_axes(1., -3., -2., &settings);
        let walk = Vec2::new(input.forward, input.strafe);
        assert!((walk.length() - settings.move_speed).abs() < 1e-6);
        assert!(input.strafe < 0. && input.forward > 0.);
        assert_eq!(input.turn, -settings.turn_speed);

        let input = Input::default().look(10, &settings);
        assert!((input.turn - 5f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn tick_turns_before_moving() {
        let grid = GridMap::sample();
        let state = PlayerState::new(Vec2::new(2.5, 2.5), 0., 1.);
        let input = Input {
            forward: 0.5,
            strafe: 0.,
            turn: std::f32::consts::FRAC_PI_2,
        };
        let next = tick(&grid, &Settings::default(), state, input);
        assert!(next.pos.distance(Vec2::new(2.5, 3.0)) < 1e-4);
        assert_eq!(state.pos, Vec2::new(2.5, 2.5));
    }

    #[test]
    fn diagonal_input_is_no_faster_than_straight() {
        let settings = Settings {
            move_speed: 0.95,
            hitbox_size: 0.2,
            ..Settings::default()
        };
        settings.validate().unwrap();

        let input = Input::from_axes(1., 1., 0., &settings);
        assert!((input.forward - 0.95 * FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((input.strafe - 0.95 * FRAC_1_SQRT_2).abs() < 1e-6);

        // at 45 degrees forward + strafe is straight down into row 5
        let grid = GridMap::sample();
        let state = PlayerState::new(Vec2::new(4.5, 4.85), FRAC_PI_4, 0.2);
        let next = tick(&grid, &settings, state, input);
        assert!(next.pos.distance(Vec2::new(4.5, 4.89)) < 1e-4, "{}", next.pos);
        assert!(!CollisionResolver::new(&grid).overlaps_solid(next.pos, 0.2));
    }

    #[test]
    fn engine_reuses_its_hit_buffer() {
        let mut engine = Engine::new(Level::sample(), Settings::default()).unwrap();
        assert!(engine.hits().is_empty());

        let first = engine.cast().unwrap().as_ptr();
        engine.step(Input::from_axes(1., 0., 1., engine.settings()));
        let second = engine.cast().unwrap().as_ptr();
        assert_eq!(first, second);
        assert_eq!(engine.hits().len(), 200);
        assert_eq!(engine.columns(600.).count(), 200);
    }

    #[test]
    fn level_shading_wins_over_settings() {
        let mut level = Level::sample();
        level.shading = Some(ColumnProjector {
            falloff: 0.,
            floor: 10,
            side_darken: 0,
        });
        let mut engine = Engine::new(level, Settings::default()).unwrap();
        engine.cast().unwrap();
        assert!(engine.columns(600.).all(|column| column.shade == 255));
    }

    #[test]
    fn spawn_in_a_wall_is_rejected() {
        let mut level = Level::sample();
        level.spawn = Vec2::new(0.5, 0.5);
        assert!(matches!(
            Engine::new(level, Settings::default()),
            Err(MapError::BadSpawn(_))
        ));
    }
}
