//! Tunables, with environment overrides.

use crate::collision::DEFAULT_EPSILON;
use crate::error::SettingsError;
use crate::projector::ColumnProjector;
use std::env;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Settings {
    /// field of view, radians
    pub fov: f32,
    /// rays per frame, one per screen column
    pub ray_count: usize,
    pub screen_width: u32,
    pub screen_height: u32,
    /// grid units per tick at full input
    pub move_speed: f32,
    /// radians per tick at full input
    pub turn_speed: f32,
    /// radians per pixel of horizontal mouse motion
    pub mouse_sensitivity: f32,
    pub hitbox_size: f32,
    pub epsilon: f32,
    pub shading: ColumnProjector,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fov: 60f32.to_radians(),
            ray_count: 200,
            screen_width: 800,
            screen_height: 600,
            move_speed: 0.05,
            turn_speed: 2f32.to_radians(),
            mouse_sensitivity: 0.5f32.to_radians(),
            hitbox_size: 1.,
            epsilon: DEFAULT_EPSILON,
            shading: ColumnProjector::default(),
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, SettingsError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| SettingsError::Unparsable { var, value })
        })
        .transpose()
}

impl Settings {
    /// Defaults overridden by `GRIDCAST_*` environment variables. Angles are
    /// given in degrees.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut this = Self::default();

        if let Some(fov) = parse::<f32>(&lookup, "GRIDCAST_FOV")? {
            this.fov = fov.to_radians();
        }
        if let Some(turn) = parse::<f32>(&lookup, "GRIDCAST_TURN")? {
            this.turn_speed = turn.to_radians();
        }
        if let Some(rays) = parse(&lookup, "GRIDCAST_RAYS")? {
            this.ray_count = rays;
        }
        if let Some(speed) = parse(&lookup, "GRIDCAST_SPEED")? {
            this.move_speed = speed;
        }
        if let Some(hitbox) = parse(&lookup, "GRIDCAST_HITBOX")? {
            this.hitbox_size = hitbox;
        }
        if let Some(width) = parse(&lookup, "GRIDCAST_WIDTH")? {
            this.screen_width = width;
        }
        if let Some(height) = parse(&lookup, "GRIDCAST_HEIGHT")? {
            this.screen_height = height;
        }

        this.validate()?;
        log::debug!("settings: {this:?}");
        Ok(this)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let check = |ok: bool, var, reason| {
            if ok {
                Ok(())
            } else {
                Err(SettingsError::OutOfRange { var, reason })
            }
        };

        check(self.ray_count > 0, "GRIDCAST_RAYS", "must be at least 1")?;
        check(
            self.fov > 0. && self.fov < 180f32.to_radians(),
            "GRIDCAST_FOV",
            "must be between 0 and 180 degrees",
        )?;
        check(
            self.hitbox_size > 0. && self.hitbox_size <= 1.,
            "GRIDCAST_HITBOX",
            "must be in (0, 1]",
        )?;
        check(
            (0. ..1.).contains(&self.move_speed),
            "GRIDCAST_SPEED",
            "must be in [0, 1) cells per tick",
        )?;
        check(
            self.screen_width > 0 && self.screen_height > 0,
            "GRIDCAST_WIDTH",
            "screen must not be empty",
        )
    }
}
