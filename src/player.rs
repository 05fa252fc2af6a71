use crate::collision::CollisionResolver;
use glam::Vec2;
use std::f32::consts::TAU;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PlayerState {
    pub pos: Vec2,
    /// radians, kept in [0, 2pi)
    pub heading: f32,
    /// edge length of the square hitbox centred on `pos`
    pub hitbox: f32,
}

impl PlayerState {
    pub fn new(pos: Vec2, heading: f32, hitbox: f32) -> Self {
        Self {
            pos,
            heading: wrap_heading(heading),
            hitbox,
        }
    }

    /// unit vector the player is facing
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// world space move for `forward` along the heading and `strafe` to the
    /// right of it
    pub fn displacement(&self, strafe: f32, forward: f32) -> Vec2 {
        let facing = self.facing();
        facing * forward + facing.perp() * strafe
    }

    pub fn walk(&mut self, resolver: &CollisionResolver, strafe: f32, forward: f32) {
        let step = self.displacement(strafe, forward);
        if step != Vec2::ZERO {
            self.pos = resolver.resolve(self.pos, self.hitbox, step);
        }
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = wrap_heading(self.heading + delta);
    }
}

// rem_euclid of a tiny negative angle rounds up to TAU itself
fn wrap_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}
