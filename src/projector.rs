use crate::ray::{RayHit, Side};

/// One vertical wall slice, in screen pixels from the top.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Column {
    pub start: f32,
    pub end: f32,
    /// grey level, 0 (black) to 255 (white)
    pub shade: u8,
    pub side: Side,
}

impl Column {
    pub fn height(&self) -> f32 {
        self.end - self.start
    }

    /// nothing to draw (the ray left the grid)
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Turns ray hits into wall slices: height falls off with the inverse of the
/// corrected distance, brightness falls off linearly.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ColumnProjector {
    /// brightness lost per grid unit of distance
    pub falloff: f32,
    /// darkest shade distance alone can produce
    pub floor: u8,
    /// subtracted from walls hit while stepping along y
    pub side_darken: u8,
}

impl Default for ColumnProjector {
    fn default() -> Self {
        Self {
            falloff: 15.,
            floor: 50,
            side_darken: 50,
        }
    }
}

impl ColumnProjector {
    pub fn project(&self, hit: &RayHit, screen_height: f32) -> Column {
        let dist = hit.corrected;
        let wall_height = if dist > 0. {
            screen_height / dist
        } else {
            screen_height
        };

        let mid = screen_height / 2.;
        let shade = (255. - dist * self.falloff).clamp(self.floor as f32, 255.) as u8;

        Column {
            start: mid - wall_height / 2.,
            end: mid + wall_height / 2.,
            shade: match hit.side {
                Side::X => shade,
                Side::Y => shade.saturating_sub(self.side_darken),
            },
            side: hit.side,
        }
    }
}
