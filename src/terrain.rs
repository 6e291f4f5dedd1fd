//! Terrain classification and spawn placement
//!
//! Turns a falloff-weighted noise field into discrete terrain classes, then
//! rejection-samples whole terrains until one supports a valid spawn: the
//! centroid of the landmass must carry a fully-landlocked square of side
//! `2 * spawn_radius + 1`.

use log::{debug, warn};
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::noise_map::{self, NoiseParams};

/// Discrete terrain classes. The ordinals are the on-disk byte values of the
/// binary map dump and must not be reordered. `Spawn` is stamped by the spawn
/// search; `BossSpawn` and `Tree` are point-of-interest markers stamped after
/// generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum TerrainClass {
    #[default]
    Water = 0,
    Sand = 1,
    Grass = 2,
    Spawn = 3,
    BossSpawn = 4,
    Tree = 5,
}

impl TerrainClass {
    /// Everything except open water counts as land.
    pub fn is_land(self) -> bool {
        self != TerrainClass::Water
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Map a classifier bin index to its terrain class. Classification only
    /// ever produces the three base classes; markers are stamped later.
    fn from_bin(bin: usize) -> Self {
        match bin {
            0 => TerrainClass::Water,
            1 => TerrainClass::Sand,
            _ => TerrainClass::Grass,
        }
    }
}

/// Threshold a continuous field into terrain classes using ascending bins.
///
/// A cell with value `v` takes the index of the half-open interval
/// `[bins[k], bins[k+1])` containing it; boundary values join the upper bin.
/// Values below `bins[0]` classify as `Water`, values at or above the last
/// threshold take the last class.
pub fn classify(field: &Grid<f64>, bins: &[f64]) -> Grid<TerrainClass> {
    let last_class = bins.len() - 2;
    let mut terrain = Grid::new_with(field.height, field.width, TerrainClass::Water);
    for (row, col, &value) in field.iter() {
        let mut k = 0;
        for (i, &threshold) in bins.iter().enumerate() {
            if value >= threshold {
                k = i;
            } else {
                break;
            }
        }
        terrain.set(row, col, TerrainClass::from_bin(k.min(last_class)));
    }
    terrain
}

/// The spawn search gave up.
#[derive(Debug)]
pub enum SpawnError {
    /// No terrain candidate produced a valid spawn within the attempt cap.
    SearchExhausted { attempts: u32 },
}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::SearchExhausted { attempts } => write!(
                f,
                "unable to place a valid spawn after {} attempts; \
                 consider increasing the land ratio or decreasing spawn_radius",
                attempts
            ),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Generate terrain candidates until one yields a valid spawn point.
///
/// Each attempt multiplies a fresh noise field by the radial falloff mask and
/// classifies it. The attempt is accepted when the landmass centroid carries a
/// square of side `2 * spawn_radius + 1` that lies fully in bounds and is all
/// land, and the land fraction reaches `min_land`. The accepted centroid cell
/// is stamped `Spawn`.
#[allow(clippy::too_many_arguments)]
pub fn find_spawn(
    rng: &mut ChaCha8Rng,
    height: usize,
    width: usize,
    params: &NoiseParams,
    bins: &[f64],
    spawn_radius: usize,
    min_land: f64,
    max_attempts: u32,
) -> Result<(Grid<TerrainClass>, (usize, usize)), SpawnError> {
    let falloff = noise_map::falloff_map(height, width);

    for attempt in 1..=max_attempts {
        let mut field = noise_map::generate(rng, height, width, params);
        for (row, col, cell) in field.iter_mut() {
            *cell *= *falloff.get(row, col);
        }
        let mut terrain = classify(&field, bins);

        let land: Vec<(usize, usize)> = terrain
            .iter()
            .filter(|(_, _, class)| class.is_land())
            .map(|(row, col, _)| (row, col))
            .collect();

        if land.is_empty() {
            warn!("spawn attempt {}: no land cells, retrying", attempt);
            continue;
        }
        let land_fraction = land.len() as f64 / (height * width) as f64;
        if land_fraction < min_land {
            warn!(
                "spawn attempt {}: land fraction {:.3} below minimum {:.3}, retrying",
                attempt, land_fraction, min_land
            );
            continue;
        }

        let centroid = land_centroid(&land);
        if spawn_square_is_land(&terrain, centroid, spawn_radius) {
            debug!(
                "spawn accepted at {:?} on attempt {} ({:.1}% land)",
                centroid,
                attempt,
                land_fraction * 100.0
            );
            terrain.set(centroid.0, centroid.1, TerrainClass::Spawn);
            return Ok((terrain, centroid));
        }
        warn!("spawn attempt {}: invalid spawn square at {:?}, retrying", attempt, centroid);
    }

    Err(SpawnError::SearchExhausted { attempts: max_attempts })
}

/// Mean land coordinate, rounded to the nearest cell.
fn land_centroid(land: &[(usize, usize)]) -> (usize, usize) {
    let n = land.len() as f64;
    let sum_row: f64 = land.iter().map(|&(row, _)| row as f64).sum();
    let sum_col: f64 = land.iter().map(|&(_, col)| col as f64).sum();
    ((sum_row / n).round() as usize, (sum_col / n).round() as usize)
}

/// True when the `(2r+1)`-square around `center` lies fully in bounds and
/// consists entirely of land.
fn spawn_square_is_land(terrain: &Grid<TerrainClass>, center: (usize, usize), radius: usize) -> bool {
    let (row, col) = center;
    if row < radius || col < radius {
        return false;
    }
    if row + radius >= terrain.height || col + radius >= terrain.width {
        return false;
    }
    for r in row - radius..=row + radius {
        for c in col - radius..=col + radius {
            if !terrain.get(r, c).is_land() {
                return false;
            }
        }
    }
    true
}

/// Wrap the terrain in a ring of water `padding` cells wide. The caller is
/// responsible for shifting any coordinates by the same amount.
pub fn pad_water(terrain: &Grid<TerrainClass>, padding: usize) -> Grid<TerrainClass> {
    if padding == 0 {
        return terrain.clone();
    }
    let mut padded = Grid::new_with(
        terrain.height + 2 * padding,
        terrain.width + 2 * padding,
        TerrainClass::Water,
    );
    for (row, col, &class) in terrain.iter() {
        padded.set(row + padding, col + padding, class);
    }
    padded
}
