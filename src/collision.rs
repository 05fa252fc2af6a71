//! Axis-separated sliding collision against the grid.
//!
//! A move is applied one axis at a time, x first. After each axis the hitbox
//! is tested against the solid cells around it and pushed back out of any it
//! overlaps, which leaves the other axis free: walking diagonally into a wall
//! slides along it.
//!
//! Only the 3x3 block of cells around the hitbox centre is examined, so the
//! result is only sound while each axis moves less than one cell per call and
//! the hitbox is at most one cell wide. Faster movers tunnel.

use crate::map::GridMap;
use glam::{IVec2, Vec2};

/// gap left between a hitbox and the wall it was pushed out of
pub const DEFAULT_EPSILON: f32 = 0.01;

const NEIGHBOR_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(0, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Axis aligned square around a position.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// strict overlap, touching edges do not count
    pub fn overlaps_cell(&self, cell: IVec2) -> bool {
        let lo = cell.as_vec2();
        let hi = lo + Vec2::ONE;
        self.min.x < hi.x && self.max.x > lo.x && self.min.y < hi.y && self.max.y > lo.y
    }
}

pub struct CollisionResolver<'a> {
    grid: &'a GridMap,
    epsilon: f32,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(grid: &'a GridMap) -> Self {
        Self {
            grid,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn grid(&self) -> &'a GridMap {
        self.grid
    }

    /// solid cells (including those past the edge of the grid) among the
    /// nine around `position`
    pub fn tiles_around(&self, position: Vec2) -> impl Iterator<Item = IVec2> + 'a {
        let grid = self.grid;
        let center = GridMap::cell_of(position);
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |offset| center.saturating_add(offset))
            .filter(move |cell| grid.is_solid(cell.x, cell.y))
    }

    pub fn overlaps_solid(&self, position: Vec2, hitbox_size: f32) -> bool {
        let hitbox = Hitbox::centered(position, hitbox_size);
        self.tiles_around(position)
            .any(|cell| hitbox.overlaps_cell(cell))
    }

    /// Move a hitbox of edge `hitbox_size` centred on `position` by
    /// `displacement`, stopping `epsilon` short of any wall in the way.
    pub fn resolve(&self, position: Vec2, hitbox_size: f32, displacement: Vec2) -> Vec2 {
        if displacement.abs().max_element() >= 1. || hitbox_size > 1. {
            log::warn!(
                "move of {displacement} with hitbox {hitbox_size} is too large for neighbour collision"
            );
        }

        let mut pos = position;
        self.resolve_axis(&mut pos, 0, displacement.x, hitbox_size);
        self.resolve_axis(&mut pos, 1, displacement.y, hitbox_size);
        pos
    }

    fn resolve_axis(&self, pos: &mut Vec2, axis: usize, amount: f32, hitbox_size: f32) {
        pos[axis] += amount;
        if amount == 0. {
            return;
        }

        let half = hitbox_size / 2.;
        let hitbox = Hitbox::centered(*pos, hitbox_size);
        for cell in self.tiles_around(*pos) {
            if !hitbox.overlaps_cell(cell) {
                continue;
            }

            let near = cell[axis] as f32;
            if amount > 0. {
                pos[axis] = pos[axis].min(near - half - self.epsilon);
            } else {
                pos[axis] = pos[axis].max(near + 1. + half + self.epsilon);
            }
        }
    }
}
