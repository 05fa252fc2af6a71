mod common;

use common::{rng, walled_room};
use glam::{IVec2, Vec2};
use gridcast::{ColumnProjector, DdaRaycaster, GridMap, Level, Side};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

#[test]
fn sample_map_center_ray() {
    let level = Level::sample();
    let hits = DdaRaycaster::new(&level.grid)
        .cast(Vec2::new(2.5, 2.5), 0., 60f32.to_radians(), 200)
        .unwrap();

    assert_eq!(hits.len(), 200);
    let center = hits[100];
    assert_eq!(center.side, Side::X);
    assert_eq!(center.cell, Some(IVec2::new(5, 2)));
    assert!((center.distance - 2.5).abs() < 1e-4);
    assert!((center.corrected - 2.5).abs() < 1e-4);
}

#[test]
fn cast_returns_every_column_in_order() {
    let grid = GridMap::sample();
    let caster = DdaRaycaster::new(&grid);
    let mut rng = rng(1);

    for _ in 0..200 {
        let origin = Vec2::new(rng.gen_range(0.0..8.0), rng.gen_range(0.0..8.0));
        if !grid.is_open_at(origin) {
            continue;
        }
        let heading = rng.gen_range(-TAU..TAU);
        let fov = rng.gen_range(0.1..3.0);
        let count = rng.gen_range(1..400);

        let hits = caster.cast(origin, heading, fov, count).unwrap();
        assert_eq!(hits.len(), count);
        assert!((hits[0].angle - (heading - fov / 2.)).abs() < 1e-5);
        assert!(hits.windows(2).all(|pair| pair[0].angle < pair[1].angle));
        // a walled map never lets a ray escape
        assert!(hits.iter().all(|hit| !hit.is_miss()));
    }
}

#[test]
fn distances_match_the_border_analytically() {
    let grid = walled_room(12, 9);
    let caster = DdaRaycaster::new(&grid);
    let mut rng = rng(2);

    for _ in 0..2000 {
        let origin = Vec2::new(rng.gen_range(1.0..11.0), rng.gen_range(1.0..8.0));
        let angle = rng.gen_range(0.0..TAU);
        let dir = Vec2::from_angle(angle);

        let along = |p: f32, d: f32, lo: f32, hi: f32| {
            if d > 0. {
                (hi - p) / d
            } else if d < 0. {
                (lo - p) / d
            } else {
                f32::INFINITY
            }
        };
        let expected = along(origin.x, dir.x, 1., 11.).min(along(origin.y, dir.y, 1., 8.));

        let hit = caster.cast_ray(origin, angle, angle);
        assert!(
            (hit.distance - expected).abs() < 1e-3 * expected.max(1.),
            "origin {origin} angle {angle}: dda {} analytic {expected}",
            hit.distance
        );
        assert!((hit.corrected - hit.distance).abs() < 1e-3 * expected.max(1.));
    }
}

#[test]
fn corrected_distance_removes_fisheye() {
    // facing straight at the flat east wall, whose face is at x = 19
    let grid = walled_room(20, 11);
    let origin = Vec2::new(3.5, 5.5);
    let hits = DdaRaycaster::new(&grid)
        .cast(origin, 0., 60f32.to_radians(), 200)
        .unwrap();

    for i in 60..=100 {
        let (left, right) = (hits[i], hits[200 - i]);
        assert_eq!(left.cell.map(|cell| cell.x), Some(19));
        assert_eq!(right.cell.map(|cell| cell.x), Some(19));
        assert!((left.corrected - right.corrected).abs() < 1e-3);
        assert!((left.corrected - 15.5).abs() < 1e-3);
    }

    // raw distance grows towards the edges of the view
    assert!(hits[60].distance > hits[100].distance + 0.3);
    assert!((hits[60].distance - hits[60].corrected).abs() > 0.3);
}

#[test]
fn just_outside_a_wall() {
    let grid = GridMap::sample();
    let caster = DdaRaycaster::new(&grid);

    for (origin, angle, side) in [
        (Vec2::new(4.99, 2.5), 0., Side::X),
        (Vec2::new(6.01, 2.5), PI, Side::X),
        (Vec2::new(4.5, 4.99), FRAC_PI_2, Side::Y),
        (Vec2::new(2.5, 2.01), -FRAC_PI_2, Side::Y),
    ] {
        let hit = caster.cast_ray(origin, angle, angle);
        assert!(
            (hit.distance - 0.01).abs() < 1e-4,
            "from {origin}: {}",
            hit.distance
        );
        assert_eq!(hit.side, side);
    }
}

#[test]
fn open_edges_are_misses_and_draw_nothing() {
    let grid = GridMap::from_rows(&[[0u8; 6]; 6]).unwrap();
    let hits = DdaRaycaster::new(&grid)
        .cast(Vec2::new(3., 3.), 1., 60f32.to_radians(), 32)
        .unwrap();
    let projector = ColumnProjector::default();

    assert_eq!(hits.len(), 32);
    for hit in &hits {
        assert!(hit.is_miss());
        assert!(grid.contains(hit.point - Vec2::from_angle(hit.angle) * 1e-3));
        assert!(projector.project(hit, 600.).is_empty());
    }
}
