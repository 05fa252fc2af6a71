//! Occupancy grid and the text level format.
//!
//! A level file is a sequence of sections, each introduced by a directive
//! line. `!!!!META` holds comma separated `key=value` directives, `!!!!MAIN`
//! holds the grid itself, one row per line:
//!
//! ```text
//! !!!!META
//! spawn,heading=0
//! shade,falloff=15,floor=50,side=50
//!
//! !!!!MAIN
//! 11111111
//! 1*100001
//! 11111111
//! ```

use crate::error::MapError;
use crate::projector::ColumnProjector;
use anyhow::Context;
use glam::{IVec2, Vec2};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::iter::Peekable;
use std::path::Path;

const SAMPLE: [[u8; 8]; 8] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable row-major occupancy grid with its origin at the top left.
///
/// Anything outside the grid counts as solid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl GridMap {
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != width * height {
            return Err(MapError::CellCount {
                width,
                height,
                expected: width * height,
                found: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// build a grid from rows of 0/1 (any nonzero byte is solid)
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.len() != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
            cells.extend(line.iter().map(|&cell| cell != 0));
        }

        Self::new(width, rows.len(), cells)
    }

    /// the built-in 8x8 map
    pub fn sample() -> Self {
        Self {
            width: SAMPLE[0].len(),
            height: SAMPLE.len(),
            cells: SAMPLE.iter().flatten().map(|&cell| cell != 0).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        if !self.in_bounds(col, row) {
            return true;
        }
        self.cells[row as usize * self.width + col as usize]
    }

    /// integer cell containing a fractional point
    pub fn cell_of(point: Vec2) -> IVec2 {
        point.floor().as_ivec2()
    }

    /// whether a fractional point lies inside the grid rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.
            && point.y >= 0.
            && point.x < self.width as f32
            && point.y < self.height as f32
    }

    /// whether a point is inside the grid and in an open cell
    pub fn is_open_at(&self, point: Vec2) -> bool {
        let cell = Self::cell_of(point);
        self.contains(point) && !self.is_solid(cell.x, cell.y)
    }

    pub fn solid_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(|(idx, _)| IVec2::new((idx % self.width) as i32, (idx / self.width) as i32))
    }
}

/// A grid together with where the player starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub grid: GridMap,
    pub spawn: Vec2,
    /// radians
    pub heading: f32,
    /// per-level shading, if the map overrides it
    pub shading: Option<ColumnProjector>,
}

#[derive(Default)]
struct Meta {
    spawn: Option<Vec2>,
    spawn_x: Option<f32>,
    spawn_y: Option<f32>,
    heading_deg: f32,
    shading: Option<ColumnProjector>,
}

impl Level {
    /// the sample grid, spawning at (2.5, 2.5) facing +x
    pub fn sample() -> Self {
        Self {
            grid: GridMap::sample(),
            spawn: Vec2::new(2.5, 2.5),
            heading: 0.,
            shading: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("loading map at {}", path.display());
        let file = read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let level = Self::parse(&file).with_context(|| format!("parsing {}", path.display()))?;
        log::info!(
            "loaded {}x{} map, spawn at {}",
            level.grid.width(),
            level.grid.height(),
            level.spawn
        );

        Ok(level)
    }

    pub fn parse(src: &str) -> Result<Self, MapError> {
        let mut lines = src.lines().peekable();
        let mut meta = Meta::default();
        let mut grid = None;

        while let Some(line) = lines.next() {
            match line.trim_end() {
                "" => {}
                "!!!!META" => parse_meta(&mut lines, &mut meta)?,
                "!!!!MAIN" => grid = Some(parse_main(&mut lines, &mut meta)?),
                other => return Err(MapError::UnknownDirective(other.into())),
            }
        }

        let grid = grid.ok_or(MapError::Empty)?;
        let spawn = match (meta.spawn_x, meta.spawn_y, meta.spawn) {
            (Some(x), Some(y), _) => Vec2::new(x, y),
            (x, y, Some(tile)) => Vec2::new(x.unwrap_or(tile.x), y.unwrap_or(tile.y)),
            _ => return Err(MapError::NoSpawn),
        };
        if !grid.is_open_at(spawn) {
            return Err(MapError::BadSpawn(spawn));
        }

        Ok(Self {
            grid,
            spawn,
            heading: meta.heading_deg.to_radians(),
            shading: meta.shading,
        })
    }
}

fn parse_meta<'lines>(
    lines: &mut Peekable<impl Iterator<Item = &'lines str>>,
    meta: &mut Meta,
) -> Result<(), MapError> {
    while let Some(line) = lines.next_if(|line| !line.starts_with("!!!!")) {
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let mut chunks = line.split(',');
        let directive = chunks.next().unwrap_or_default();
        let params = chunks
            .map(|param| {
                param
                    .split_once('=')
                    .map(|(key, value)| (key.trim(), value.trim()))
            })
            .collect::<Option<HashMap<_, _>>>()
            .ok_or_else(|| MapError::BadMeta(line.into()))?;
        let number = |key: &str| {
            params
                .get(key)
                .map(|value| value.parse::<f32>())
                .transpose()
                .map_err(|_| MapError::BadMeta(line.into()))
        };

        match directive {
            "spawn" => {
                meta.spawn_x = number("x")?;
                meta.spawn_y = number("y")?;
                meta.heading_deg = number("heading")?.unwrap_or(0.);
            }
            "shade" => {
                let defaults = ColumnProjector::default();
                let byte = |key: &str, default: u8| -> Result<u8, MapError> {
                    match number(key)? {
                        Some(value) if (0. ..=255.).contains(&value) => Ok(value as u8),
                        Some(_) => Err(MapError::BadMeta(line.into())),
                        None => Ok(default),
                    }
                };
                meta.shading = Some(ColumnProjector {
                    falloff: number("falloff")?.unwrap_or(defaults.falloff),
                    floor: byte("floor", defaults.floor)?,
                    side_darken: byte("side", defaults.side_darken)?,
                });
            }
            other => return Err(MapError::UnknownDirective(other.into())),
        }
    }

    Ok(())
}

fn parse_main<'lines>(
    lines: &mut Peekable<impl Iterator<Item = &'lines str>>,
    meta: &mut Meta,
) -> Result<GridMap, MapError> {
    let mut width = None;
    let mut height = 0;
    let mut cells = vec![];

    while let Some(line) = lines.next_if(|line| !line.starts_with("!!!!")) {
        if line.is_empty() {
            break;
        }

        let row = height;
        let mut found = 0;
        for (col, tile) in line.chars().enumerate() {
            cells.push(match tile {
                '1' | '#' => true,
                '0' | '.' | ' ' => false,
                '*' => {
                    if meta.spawn.is_some() {
                        return Err(MapError::MultipleSpawns);
                    }
                    meta.spawn = Some(Vec2::new(col as f32 + 0.5, row as f32 + 0.5));
                    false
                }
                other => return Err(MapError::InvalidTile { tile: other, col, row }),
            });
            found += 1;
        }

        let expected = *width.get_or_insert(found);
        if found != expected {
            return Err(MapError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        height += 1;
    }

    GridMap::new(width.unwrap_or(0), height, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FILE: &str = "\
!!!!META
spawn,heading=90

!!!!MAIN
11111111
10100001
10*00101
10000101
10000001
10001111
11000001
11111111
";

    #[test]
    fn sample_matches_source_rows() {
        let grid = GridMap::sample();
        assert_eq!((grid.width(), grid.height()), (8, 8));
        assert!(grid.is_solid(5, 2));
        assert!(grid.is_solid(2, 1));
        assert!(!grid.is_solid(2, 2));
        assert!(!grid.is_solid(6, 6));
        assert_eq!(grid.solid_cells().count(), 35);
    }

    #[test]
    fn out_of_range_is_solid() {
        let grid = GridMap::from_rows(&[[0u8, 0], [0, 0]]).unwrap();
        assert!(!grid.is_solid(0, 0));
        assert!(grid.is_solid(-1, 0));
        assert!(grid.is_solid(0, 2));
        assert!(grid.is_solid(2, 1));
        assert!(!grid.in_bounds(2, 1));
        assert!(grid.in_bounds(1, 1));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 1, 1], vec![1, 0], vec![1, 1, 1]];
        assert_eq!(
            GridMap::from_rows(&rows),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn empty_grids_are_rejected() {
        let none: [[u8; 0]; 0] = [];
        assert_eq!(GridMap::from_rows(&none), Err(MapError::Empty));
        assert_eq!(GridMap::from_rows(&[[0u8; 0]]), Err(MapError::Empty));
        assert!(matches!(
            GridMap::new(2, 2, vec![false; 3]),
            Err(MapError::CellCount { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn parses_level_file() {
        let level = Level::parse(SAMPLE_FILE).unwrap();
        assert_eq!(level.grid, GridMap::sample());
        assert_eq!(level.spawn, Vec2::new(2.5, 2.5));
        assert!((level.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(level.shading, None);
    }

    #[test]
    fn explicit_spawn_and_shading() {
        let level = Level::parse(
            "!!!!META\nspawn,x=1.25,y=1.75\nshade,falloff=20,side=30\n!!!!MAIN\n111\n1.1\n111\n",
        )
        .unwrap();
        assert_eq!(level.spawn, Vec2::new(1.25, 1.75));
        let shading = level.shading.unwrap();
        assert_eq!(shading.falloff, 20.);
        assert_eq!(shading.floor, ColumnProjector::default().floor);
        assert_eq!(shading.side_darken, 30);
    }

    #[test]
    fn level_errors() {
        assert_eq!(
            Level::parse("!!!!MAIN\n111\n1*1\n11\n"),
            Err(MapError::RaggedRow {
                row: 2,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Level::parse("!!!!MAIN\n111\n1x1\n111\n"),
            Err(MapError::InvalidTile {
                tile: 'x',
                col: 1,
                row: 1
            })
        );
        assert_eq!(Level::parse("!!!!MAIN\n111\n101\n111\n"), Err(MapError::NoSpawn));
        assert_eq!(
            Level::parse("!!!!MAIN\n1111\n1**1\n1111\n"),
            Err(MapError::MultipleSpawns)
        );
        assert_eq!(
            Level::parse("!!!!META\nspawn,x=0.5,y=0.5\n!!!!MAIN\n111\n101\n111\n"),
            Err(MapError::BadSpawn(Vec2::new(0.5, 0.5)))
        );
        assert!(matches!(
            Level::parse("!!!!META\nspawn,x=abc\n"),
            Err(MapError::BadMeta(_))
        ));
        assert!(matches!(
            Level::parse("!!!!META\nfog,dof=4\n"),
            Err(MapError::UnknownDirective(_))
        ));
        assert!(matches!(
            Level::parse("hello\n"),
            Err(MapError::UnknownDirective(_))
        ));
    }
}
