//! Biome seed selection and region growing
//!
//! Biome regions are grown over the mainland from a handful of seed cells.
//! Seeds are picked by farthest-point sampling so regions start well spread
//! out; growth is a multi-source FIFO flood fill where each step may defer
//! with a per-label hold probability, which makes some regions expand slower
//! than others and keeps the boundaries irregular.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Hold probability applied to labels beyond the configured table.
/// The original generator throttled its first region at 0.75 and let every
/// other region run at this rate.
pub const DEFAULT_HOLD: f64 = 0.25;

/// Biome stage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeParams {
    /// Number of biome seeds to select beyond the spawn
    pub seed_count: usize,
    /// Per-label growth hold probability; label `L` reads entry `L - 1`,
    /// labels past the end fall back to [`DEFAULT_HOLD`]. Must be < 1.
    pub hold_probabilities: Vec<f64>,
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            seed_count: 4,
            hold_probabilities: vec![0.75, 0.25, 0.25, 0.25, 0.25],
        }
    }
}

#[derive(Debug)]
pub enum BiomeError {
    /// A seed coordinate does not lie on the mainland.
    SeedOffMainland { row: usize, col: usize, label: u8 },
    /// More seeds were requested than there are free mainland cells.
    MainlandTooSmall { available: usize, requested: usize },
}

impl std::fmt::Display for BiomeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiomeError::SeedOffMainland { row, col, label } => write!(
                f,
                "biome seed {} at ({}, {}) is not on the mainland",
                label, row, col
            ),
            BiomeError::MainlandTooSmall { available, requested } => write!(
                f,
                "requested {} biome seeds but only {} free mainland cells exist",
                requested, available
            ),
        }
    }
}

impl std::error::Error for BiomeError {}

/// Farthest-point sampling over the mainland.
///
/// Starting from `origin`, repeatedly picks the mainland cell maximizing its
/// minimum Euclidean distance to everything selected so far. Ties break by
/// first occurrence in row-major order, so the result is deterministic for a
/// fixed mask. The origin itself is not part of the output.
///
/// Greedy and approximate; cost is O(count * |mainland| * |selected|), which
/// makes this the most expensive stage on large maps.
pub fn select_seeds(
    mainland: &Grid<bool>,
    origin: (usize, usize),
    count: usize,
) -> Result<Vec<(usize, usize)>, BiomeError> {
    let cells: Vec<(usize, usize)> = mainland
        .iter()
        .filter(|(_, _, &on)| on)
        .map(|(row, col, _)| (row, col))
        .collect();

    let free = cells.iter().filter(|&&c| c != origin).count();
    if count > free {
        return Err(BiomeError::MainlandTooSmall { available: free, requested: count });
    }

    let mut selected = vec![origin];
    for _ in 0..count {
        let mut best: Option<(usize, usize)> = None;
        let mut best_dist = f64::NEG_INFINITY;
        for &cell in &cells {
            if selected.contains(&cell) {
                continue;
            }
            let dist = selected
                .iter()
                .map(|&s| euclidean(cell, s))
                .fold(f64::INFINITY, f64::min);
            if dist > best_dist {
                best_dist = dist;
                best = Some(cell);
            }
        }
        // `count <= free` guarantees a candidate remains.
        if let Some(cell) = best {
            selected.push(cell);
        }
    }

    Ok(selected.split_off(1))
}

fn euclidean(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dc = a.1 as f64 - b.1 as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Grow labeled regions outward from `seeds` over the mainland.
///
/// A FIFO queue is seeded with every `(cell, label)` entry; popped entries
/// defer with the label's hold probability (re-enqueued unexpanded) or claim
/// their unassigned orthogonal mainland neighbors. Mainland pockets
/// unreachable from every seed keep label 0, which is expected rather than an
/// error. Seed order matters: under equal hold rates the earlier seed wins
/// contested cells, and reproducibility relies on a fixed order plus a fixed
/// RNG seed.
pub fn grow_regions(
    rng: &mut ChaCha8Rng,
    mainland: &Grid<bool>,
    seeds: &[((usize, usize), u8)],
    params: &BiomeParams,
) -> Result<Grid<u8>, BiomeError> {
    let mut biomes = Grid::new_with(mainland.height, mainland.width, 0u8);
    let mut queue: VecDeque<((usize, usize), u8)> = VecDeque::new();

    for &((row, col), label) in seeds {
        debug_assert!(label > 0, "label 0 is reserved for unassigned cells");
        if !*mainland.get(row, col) {
            return Err(BiomeError::SeedOffMainland { row, col, label });
        }
        biomes.set(row, col, label);
        queue.push_back(((row, col), label));
    }

    while let Some(((row, col), label)) = queue.pop_front() {
        let hold = params
            .hold_probabilities
            .get(label as usize - 1)
            .copied()
            .unwrap_or(DEFAULT_HOLD);
        if rng.gen::<f64>() < hold {
            queue.push_back(((row, col), label));
            continue;
        }

        for (nr, nc) in mainland.neighbors(row, col) {
            if *mainland.get(nr, nc) && *biomes.get(nr, nc) == 0 {
                biomes.set(nr, nc, label);
                queue.push_back(((nr, nc), label));
            }
        }
    }

    Ok(biomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn all_land(height: usize, width: usize) -> Grid<bool> {
        Grid::new_with(height, width, true)
    }

    #[test]
    fn test_select_zero_seeds() {
        let seeds = select_seeds(&all_land(4, 4), (0, 0), 0).unwrap();
        assert!(seeds.is_empty());
    }

    #[test]
    fn test_select_one_seed_is_farthest_cell() {
        let seeds = select_seeds(&all_land(3, 3), (0, 0), 1).unwrap();
        assert_eq!(seeds, vec![(2, 2)]);
    }

    #[test]
    fn test_ties_break_row_major() {
        // (0, 0) and (0, 2) are both distance 1 from the origin; the
        // row-major scan must keep the first.
        let seeds = select_seeds(&all_land(1, 3), (0, 1), 1).unwrap();
        assert_eq!(seeds, vec![(0, 0)]);
    }

    #[test]
    fn test_no_duplicates_and_origin_excluded() {
        let origin = (1, 1);
        let seeds = select_seeds(&all_land(4, 4), origin, 5).unwrap();
        assert_eq!(seeds.len(), 5);
        for (i, &a) in seeds.iter().enumerate() {
            assert_ne!(a, origin);
            for &b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_too_many_seeds_rejected() {
        match select_seeds(&all_land(1, 2), (0, 0), 2) {
            Err(BiomeError::MainlandTooSmall { available, requested }) => {
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected MainlandTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_single_seed_claims_whole_mainland() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = BiomeParams { seed_count: 1, hold_probabilities: vec![0.25] };
        let biomes = grow_regions(&mut rng, &all_land(10, 10), &[((0, 0), 1)], &params).unwrap();
        assert!(biomes.iter().all(|(_, _, &label)| label == 1));
    }

    #[test]
    fn test_off_mainland_cells_stay_unassigned() {
        // Water column at col 2; seed only on the left half.
        let mut mainland = all_land(5, 5);
        for row in 0..5 {
            mainland.set(row, 2, false);
            mainland.set(row, 3, false);
            mainland.set(row, 4, false);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let params = BiomeParams::default();
        let biomes = grow_regions(&mut rng, &mainland, &[((2, 0), 1)], &params).unwrap();

        for (row, col, &label) in biomes.iter() {
            if *mainland.get(row, col) {
                assert_eq!(label, 1, "mainland cell ({}, {}) unassigned", row, col);
            } else {
                assert_eq!(label, 0, "non-mainland cell ({}, {}) labeled", row, col);
            }
        }
    }

    #[test]
    fn test_disconnected_pocket_keeps_label_zero() {
        // Two mainland blobs split by a gap; only the left one is seeded.
        let mut mainland = Grid::new_with(3, 5, false);
        for row in 0..3 {
            mainland.set(row, 0, true);
            mainland.set(row, 1, true);
            mainland.set(row, 3, true);
            mainland.set(row, 4, true);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let params = BiomeParams::default();
        let biomes = grow_regions(&mut rng, &mainland, &[((0, 0), 1)], &params).unwrap();

        assert!(biomes.iter().filter(|(_, col, _)| *col < 2).all(|(_, _, &l)| l == 1));
        assert!(biomes.iter().filter(|(_, col, _)| *col >= 3).all(|(_, _, &l)| l == 0));
    }

    #[test]
    fn test_seed_off_mainland_is_an_error() {
        let mut mainland = Grid::new_with(3, 3, false);
        mainland.set(0, 0, true);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = BiomeParams::default();
        match grow_regions(&mut rng, &mainland, &[((1, 1), 2)], &params) {
            Err(BiomeError::SeedOffMainland { row, col, label }) => {
                assert_eq!((row, col, label), (1, 1, 2));
            }
            other => panic!("expected SeedOffMainland, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_growth_is_reproducible() {
        let mainland = all_land(12, 12);
        let seeds = [((2, 2), 1u8), ((9, 9), 2u8), ((2, 9), 3u8)];
        let params = BiomeParams::default();

        let mut rng1 = ChaCha8Rng::seed_from_u64(77);
        let mut rng2 = ChaCha8Rng::seed_from_u64(77);
        let a = grow_regions(&mut rng1, &mainland, &seeds, &params).unwrap();
        let b = grow_regions(&mut rng2, &mainland, &seeds, &params).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
