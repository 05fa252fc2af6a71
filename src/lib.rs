//! Grid raycasting: a first-person column view of a 2D occupancy grid, and a
//! player that slides along its walls.
//!
//! Per frame a driver feeds [`Input`] to [`tick`] (or [`Engine::step`]),
//! casts one ray per screen column with [`DdaRaycaster`] and turns each hit
//! into a [`Column`] with [`ColumnProjector`]. Drawing is left to the caller.
//!
//! Angles are radians everywhere; x grows to the right and y grows down, so a
//! positive turn is clockwise on screen.

pub mod collision;
pub mod error;
pub mod map;
pub mod player;
pub mod projector;
pub mod ray;
pub mod settings;
pub mod sim;

pub use collision::{CollisionResolver, Hitbox};
pub use error::{CastError, MapError, SettingsError};
pub use map::{GridMap, Level};
pub use player::PlayerState;
pub use projector::{Column, ColumnProjector};
pub use ray::{DdaRaycaster, RayHit, Side};
pub use settings::Settings;
pub use sim::{tick, Engine, Input};
