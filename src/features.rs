//! Point-of-interest placement
//!
//! Stamps markers onto an already-generated terrain grid: boss spawns at the
//! selected biome seed coordinates, and trees scattered over plain land with
//! a minimum spacing.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::terrain::TerrainClass;

/// Tree scattering configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureParams {
    /// Number of trees to attempt to place
    pub tree_count: usize,
    /// Minimum Chebyshev distance between any two trees
    pub tree_spacing: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            tree_count: 64,
            tree_spacing: 3,
        }
    }
}

/// Stamp `BossSpawn` on each coordinate. Used with the biome seed cells.
pub fn mark_boss_spawns(terrain: &mut Grid<TerrainClass>, coords: &[(usize, usize)]) {
    for &(row, col) in coords {
        terrain.set(row, col, TerrainClass::BossSpawn);
    }
}

/// Scatter up to `tree_count` trees on plain land cells, keeping every pair
/// at least `tree_spacing` apart (Chebyshev). Rejection sampling with an
/// attempt cap of ten times the requested count; on crowded maps fewer trees
/// than requested may be placed.
pub fn place_trees(
    rng: &mut ChaCha8Rng,
    terrain: &mut Grid<TerrainClass>,
    params: &FeatureParams,
) -> Vec<(usize, usize)> {
    let mut trees: Vec<(usize, usize)> = Vec::with_capacity(params.tree_count);
    let max_attempts = params.tree_count * 10;
    let mut attempts = 0;

    while trees.len() < params.tree_count && attempts < max_attempts {
        attempts += 1;
        let row = rng.gen_range(0..terrain.height);
        let col = rng.gen_range(0..terrain.width);

        // Only plain land; never overwrite water or existing markers.
        let class = *terrain.get(row, col);
        if class != TerrainClass::Sand && class != TerrainClass::Grass {
            continue;
        }
        let too_close = trees.iter().any(|&(tr, tc)| {
            tr.abs_diff(row) < params.tree_spacing && tc.abs_diff(col) < params.tree_spacing
        });
        if too_close {
            continue;
        }

        terrain.set(row, col, TerrainClass::Tree);
        trees.push((row, col));
    }

    debug!("placed {} of {} trees in {} attempts", trees.len(), params.tree_count, attempts);
    trees
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_trees_only_on_plain_land() {
        let mut terrain = Grid::new_with(20, 20, TerrainClass::Grass);
        for col in 0..20 {
            terrain.set(0, col, TerrainClass::Water);
        }
        terrain.set(10, 10, TerrainClass::Spawn);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let params = FeatureParams { tree_count: 12, tree_spacing: 2 };
        let trees = place_trees(&mut rng, &mut terrain, &params);

        assert!(!trees.is_empty());
        for &(row, col) in &trees {
            assert_ne!(row, 0);
            assert_ne!((row, col), (10, 10));
            assert_eq!(*terrain.get(row, col), TerrainClass::Tree);
        }
        assert_eq!(*terrain.get(10, 10), TerrainClass::Spawn);
    }

    #[test]
    fn test_tree_spacing_respected() {
        let mut terrain = Grid::new_with(30, 30, TerrainClass::Grass);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let params = FeatureParams { tree_count: 20, tree_spacing: 4 };
        let trees = place_trees(&mut rng, &mut terrain, &params);

        for (i, &(ar, ac)) in trees.iter().enumerate() {
            for &(br, bc) in &trees[i + 1..] {
                let close = ar.abs_diff(br) < 4 && ac.abs_diff(bc) < 4;
                assert!(!close, "trees at ({ar}, {ac}) and ({br}, {bc}) too close");
            }
        }
    }

    #[test]
    fn test_all_water_places_nothing() {
        let mut terrain = Grid::new_with(8, 8, TerrainClass::Water);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let trees = place_trees(&mut rng, &mut terrain, &FeatureParams::default());
        assert!(trees.is_empty());
        assert!(terrain.iter().all(|(_, _, &c)| c == TerrainClass::Water));
    }

    #[test]
    fn test_mark_boss_spawns() {
        let mut terrain = Grid::new_with(5, 5, TerrainClass::Grass);
        mark_boss_spawns(&mut terrain, &[(1, 1), (3, 4)]);
        assert_eq!(*terrain.get(1, 1), TerrainClass::BossSpawn);
        assert_eq!(*terrain.get(3, 4), TerrainClass::BossSpawn);
        assert_eq!(*terrain.get(0, 0), TerrainClass::Grass);
    }
}
