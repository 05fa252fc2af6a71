use gridcast::GridMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `width` x `height` grid, empty inside a one cell solid border
#[allow(dead_code)]
pub fn walled_room(width: usize, height: usize) -> GridMap {
    let rows = (0..height)
        .map(|row| {
            (0..width)
                .map(|col| u8::from(row == 0 || col == 0 || row == height - 1 || col == width - 1))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    GridMap::from_rows(&rows).unwrap()
}
