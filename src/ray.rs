use crate::error::CastError;
use crate::map::GridMap;
use glam::{IVec2, Vec2};

/// Which axis the last DDA step advanced along.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Side {
    /// crossed a vertical grid line (an east/west facing wall)
    X = 0,
    /// crossed a horizontal grid line (a north/south facing wall)
    Y = 1,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayHit {
    /// where the ray stopped, in grid coordinates
    pub point: Vec2,
    /// absolute angle of this ray, radians
    pub angle: f32,
    /// distance along the ray, infinite for a miss
    pub distance: f32,
    /// distance to the view plane (fisheye corrected), infinite for a miss
    pub corrected: f32,
    pub side: Side,
    /// the solid cell that stopped the ray, `None` if it left the grid
    pub cell: Option<IVec2>,
}

impl RayHit {
    pub fn is_miss(&self) -> bool {
        self.cell.is_none()
    }
}

/// Digital differential analysis over a [`GridMap`]: a ray is stepped from one
/// grid line crossing to the next until it enters a solid cell or leaves the
/// grid.
pub struct DdaRaycaster<'a> {
    grid: &'a GridMap,
}

// reciprocal of a direction component, infinite when the ray never crosses
// lines on that axis
fn delta_dist(component: f32) -> f32 {
    if component == 0. {
        f32::INFINITY
    } else {
        (1. / component).abs()
    }
}

// distance along the ray to the first grid line on one axis
fn first_crossing(frac: f32, component: f32, delta: f32) -> f32 {
    if delta.is_infinite() {
        f32::INFINITY
    } else if component < 0. {
        frac * delta
    } else {
        (1. - frac) * delta
    }
}

impl<'a> DdaRaycaster<'a> {
    pub fn new(grid: &'a GridMap) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &'a GridMap {
        self.grid
    }

    /// Cast `ray_count` rays spread evenly over `fov` around `heading`.
    ///
    /// Ray `i` belongs to screen column `i`, ray 0 sits on the left edge of the
    /// view.
    pub fn cast(
        &self,
        origin: Vec2,
        heading: f32,
        fov: f32,
        ray_count: usize,
    ) -> Result<Vec<RayHit>, CastError> {
        let mut hits = Vec::with_capacity(ray_count);
        self.cast_into(&mut hits, origin, heading, fov, ray_count)?;
        Ok(hits)
    }

    /// Like [`cast`](Self::cast), refilling `hits` in place.
    pub fn cast_into(
        &self,
        hits: &mut Vec<RayHit>,
        origin: Vec2,
        heading: f32,
        fov: f32,
        ray_count: usize,
    ) -> Result<(), CastError> {
        self.check_origin(origin)?;

        hits.clear();
        hits.extend((0..ray_count).map(|i| {
            let angle = heading - fov / 2. + fov * i as f32 / ray_count as f32;
            self.cast_ray(origin, angle, heading)
        }));

        Ok(())
    }

    pub fn check_origin(&self, origin: Vec2) -> Result<(), CastError> {
        if !self.grid.contains(origin) {
            return Err(CastError::OutsideGrid(origin));
        }
        let cell = GridMap::cell_of(origin);
        if self.grid.is_solid(cell.x, cell.y) {
            return Err(CastError::InsideWall(origin));
        }

        Ok(())
    }

    /// Cast one ray at an absolute `angle`. `heading` is the view direction
    /// used for the fisheye correction.
    ///
    /// An origin outside the grid is a miss at the origin. Other checks are
    /// left to [`check_origin`](Self::check_origin).
    pub fn cast_ray(&self, origin: Vec2, angle: f32, heading: f32) -> RayHit {
        if !self.grid.contains(origin) {
            return RayHit {
                point: origin,
                angle,
                distance: f32::INFINITY,
                corrected: f32::INFINITY,
                side: Side::X,
                cell: None,
            };
        }

        let dir = Vec2::from_angle(angle);
        let mut map = GridMap::cell_of(origin);
        let frac = origin - map.as_vec2();

        let delta = Vec2::new(delta_dist(dir.x), delta_dist(dir.y));
        let step = IVec2::new(
            if dir.x < 0. { -1 } else { 1 },
            if dir.y < 0. { -1 } else { 1 },
        );
        let mut side_dist = Vec2::new(
            first_crossing(frac.x, dir.x, delta.x),
            first_crossing(frac.y, dir.y, delta.y),
        );

        // every step moves one cell closer to the edge, so this always ends
        let mut side;
        let hit = loop {
            if side_dist.x < side_dist.y {
                side_dist.x += delta.x;
                map.x += step.x;
                side = Side::X;
            } else {
                side_dist.y += delta.y;
                map.y += step.y;
                side = Side::Y;
            }

            if !self.grid.in_bounds(map.x, map.y) {
                break false;
            }
            if self.grid.is_solid(map.x, map.y) {
                break true;
            }
        };

        let raw = match side {
            Side::X => (map.x as f32 - origin.x + (1 - step.x) as f32 / 2.) / dir.x,
            Side::Y => (map.y as f32 - origin.y + (1 - step.y) as f32 / 2.) / dir.y,
        };
        let point = origin + dir * raw;

        if hit {
            RayHit {
                point,
                angle,
                distance: raw,
                corrected: raw * (angle - heading).cos(),
                side,
                cell: Some(map),
            }
        } else {
            RayHit {
                point,
                angle,
                distance: f32::INFINITY,
                corrected: f32::INFINITY,
                side,
                cell: None,
            }
        }
    }
}
