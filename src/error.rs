//! Error types for map construction, ray casting and settings.

use glam::Vec2;
use thiserror::Error;

/// A map that cannot become a [`GridMap`](crate::map::GridMap) or
/// [`Level`](crate::map::Level).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{width}x{height} map needs {expected} cells, got {found}")]
    CellCount {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid tile {tile:?} at column {col}, row {row}")]
    InvalidTile { tile: char, col: usize, row: usize },

    #[error("unrecognized directive: {0}")]
    UnknownDirective(String),

    #[error("incorrectly formatted meta: {0}")]
    BadMeta(String),

    #[error("map has more than one spawn tile")]
    MultipleSpawns,

    #[error("no spawn in map")]
    NoSpawn,

    #[error("spawn at ({}, {}) is outside the grid or inside a wall", .0.x, .0.y)]
    BadSpawn(Vec2),
}

/// The ray origin cannot be cast from.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CastError {
    #[error("ray origin ({}, {}) is outside the grid", .0.x, .0.y)]
    OutsideGrid(Vec2),

    #[error("ray origin ({}, {}) is inside a solid cell", .0.x, .0.y)]
    InsideWall(Vec2),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("invalid value for {var}: {value:?}")]
    Unparsable { var: &'static str, value: String },

    #[error("{var} out of range: {reason}")]
    OutOfRange {
        var: &'static str,
        reason: &'static str,
    },
}
