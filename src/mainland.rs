//! Mainland detection
//!
//! Breadth-first flood fill from the spawn cell over orthogonally-connected
//! land, producing the reachability mask that the biome stages operate on.
//! Islands cut off from the spawn by water never become mainland.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::terrain::TerrainClass;

/// Flood-fill the landmass reachable from `spawn` through non-water cells.
/// Deterministic, O(width * height).
pub fn find_mainland(terrain: &Grid<TerrainClass>, spawn: (usize, usize)) -> Grid<bool> {
    let mut mainland = Grid::new_with(terrain.height, terrain.width, false);
    mainland.set(spawn.0, spawn.1, true);

    let mut queue = VecDeque::new();
    queue.push_back(spawn);

    while let Some((row, col)) = queue.pop_front() {
        for (nr, nc) in terrain.neighbors(row, col) {
            if !*mainland.get(nr, nc) && terrain.get(nr, nc).is_land() {
                mainland.set(nr, nc, true);
                queue.push_back((nr, nc));
            }
        }
    }

    mainland
}
