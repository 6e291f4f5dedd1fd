//! World data container and generation pipeline
//!
//! Bundles the full configuration surface, validates it up front, and runs
//! the stages in order: spawn search, water padding, mainland detection,
//! biome seed selection, region growing, tree scattering, and the auxiliary
//! climate fields. Every stage consumes its own `ChaCha8Rng` derived from the
//! master seed, so a run is a pure function of `(config, seed)`.

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biomes::{self, BiomeError, BiomeParams};
use crate::features::{self, FeatureParams};
use crate::grid::Grid;
use crate::mainland;
use crate::noise_map::{self, NoiseParams};
use crate::seeds::WorldSeeds;
use crate::terrain::{self, SpawnError, TerrainClass};

/// Full generation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells (before water padding)
    pub width: usize,
    /// Grid height in cells (before water padding)
    pub height: usize,
    /// Half-side of the all-land square required around the spawn
    pub spawn_radius: usize,
    /// Width of the water ring wrapped around the accepted terrain
    pub water_padding: usize,
    /// Minimum land fraction for a terrain candidate to be considered
    pub min_land: f64,
    /// Spawn search attempt cap; exhaustion is a terminal error
    pub max_spawn_attempts: u32,
    /// Ascending classification thresholds, starting at 0 and ending at 1
    pub bins: Vec<f64>,
    /// Terrain field noise parameters
    pub terrain_noise: NoiseParams,
    /// Temperature field noise parameters
    pub temperature_noise: NoiseParams,
    /// Humidity field noise parameters
    pub humidity_noise: NoiseParams,
    /// Weirdness field noise parameters
    pub weirdness_noise: NoiseParams,
    /// Biome seed count and per-label growth hold probabilities
    pub biomes: BiomeParams,
    /// Tree scattering parameters
    pub features: FeatureParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            spawn_radius: 5,
            water_padding: 1,
            min_land: 0.45,
            max_spawn_attempts: 100,
            bins: vec![0.0, 0.33, 0.4, 1.0],
            terrain_noise: NoiseParams::default(),
            temperature_noise: NoiseParams { scale: 400.0, octaves: 5, ..NoiseParams::default() },
            humidity_noise: NoiseParams { scale: 350.0, octaves: 5, ..NoiseParams::default() },
            weirdness_noise: NoiseParams { scale: 250.0, octaves: 6, ..NoiseParams::default() },
            biomes: BiomeParams::default(),
            features: FeatureParams::default(),
        }
    }
}

impl WorldConfig {
    /// Reject invalid parameters before any generation work starts.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenError::invalid("width and height must be positive"));
        }
        if 2 * self.spawn_radius + 1 > self.width.min(self.height) {
            return Err(GenError::invalid("spawn square does not fit in the grid"));
        }
        if !(0.0..=1.0).contains(&self.min_land) {
            return Err(GenError::invalid("min_land must lie in 0..=1"));
        }
        if self.max_spawn_attempts == 0 {
            return Err(GenError::invalid("max_spawn_attempts must be positive"));
        }

        if self.bins.len() < 2 || self.bins.len() > 4 {
            return Err(GenError::invalid("bins must hold 2 to 4 ascending thresholds"));
        }
        if !self.bins.windows(2).all(|w| w[0] < w[1]) {
            return Err(GenError::invalid("bins must be strictly ascending"));
        }
        if self.bins[0] != 0.0 || *self.bins.last().unwrap_or(&0.0) != 1.0 {
            return Err(GenError::invalid("bins must start at 0 and end at 1"));
        }

        for (name, params) in [
            ("terrain_noise", &self.terrain_noise),
            ("temperature_noise", &self.temperature_noise),
            ("humidity_noise", &self.humidity_noise),
            ("weirdness_noise", &self.weirdness_noise),
        ] {
            if params.scale <= 0.0 {
                return Err(GenError::invalid(format!("{name}: scale must be positive")));
            }
            if params.octaves == 0 {
                return Err(GenError::invalid(format!("{name}: octaves must be positive")));
            }
        }

        if self.biomes.seed_count == 0 || self.biomes.seed_count > (u8::MAX as usize) - 1 {
            return Err(GenError::invalid("biome seed_count must lie in 1..=254"));
        }
        if self.biomes.hold_probabilities.iter().any(|&p| !(0.0..1.0).contains(&p)) {
            return Err(GenError::invalid("hold probabilities must lie in 0..1 (exclusive of 1)"));
        }

        Ok(())
    }
}

/// Terminal generation errors.
#[derive(Debug)]
pub enum GenError {
    /// Configuration rejected before generation
    InvalidConfig(String),
    /// Spawn search exhausted its attempt cap
    Spawn(SpawnError),
    /// Biome seeding or growth failed
    Biome(BiomeError),
}

impl GenError {
    fn invalid(msg: impl Into<String>) -> Self {
        GenError::InvalidConfig(msg.into())
    }
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            GenError::Spawn(err) => write!(f, "{}", err),
            GenError::Biome(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::InvalidConfig(_) => None,
            GenError::Spawn(err) => Some(err),
            GenError::Biome(err) => Some(err),
        }
    }
}

impl From<SpawnError> for GenError {
    fn from(err: SpawnError) -> Self {
        GenError::Spawn(err)
    }
}

impl From<BiomeError> for GenError {
    fn from(err: BiomeError) -> Self {
        GenError::Biome(err)
    }
}

/// All generated world data bundled together.
///
/// Every grid shares the padded dimensions `height x width`; coordinates are
/// `(row, col)` into those grids.
pub struct WorldData {
    /// Seeds used for generation (allows recreation)
    pub seeds: WorldSeeds,
    /// Padded grid height
    pub height: usize,
    /// Padded grid width
    pub width: usize,
    /// Terrain classes, spawn/boss/tree markers included
    pub terrain: Grid<TerrainClass>,
    /// Spawn coordinate (already shifted by the water padding)
    pub spawn: (usize, usize),
    /// Cells orthogonally reachable from spawn through land
    pub mainland: Grid<bool>,
    /// Selected biome seed coordinates (also the boss spawn cells)
    pub biome_seeds: Vec<(usize, usize)>,
    /// Biome labels; 0 = unassigned, 1 = the spawn region
    pub biomes: Grid<u8>,
    /// Temperature field, -1..1
    pub temperature: Grid<f64>,
    /// Humidity field, -1..1
    pub humidity: Grid<f64>,
    /// Weirdness field, -1..1
    pub weirdness: Grid<f64>,
    /// Placed tree coordinates
    pub trees: Vec<(usize, usize)>,
}

/// Run the full generation pipeline. Pure function of `(config, seed)`: the
/// same inputs reproduce byte-identical grids.
pub fn generate_world(config: &WorldConfig, seed: u64) -> Result<WorldData, GenError> {
    config.validate()?;
    let seeds = WorldSeeds::from_master(seed);
    info!("generating {}x{} world, {}", config.width, config.height, seeds);

    // Spawn search over fresh terrain candidates
    let mut terrain_rng = ChaCha8Rng::seed_from_u64(seeds.terrain);
    let (terrain, spawn) = terrain::find_spawn(
        &mut terrain_rng,
        config.height,
        config.width,
        &config.terrain_noise,
        &config.bins,
        config.spawn_radius,
        config.min_land,
        config.max_spawn_attempts,
    )?;

    // Water padding; all later stages run at the padded dimensions
    let mut terrain = terrain::pad_water(&terrain, config.water_padding);
    let spawn = (spawn.0 + config.water_padding, spawn.1 + config.water_padding);
    let (height, width) = (terrain.height, terrain.width);

    info!("spawn placed at {:?}", spawn);

    // Mainland reachability from spawn
    let mainland = mainland::find_mainland(&terrain, spawn);

    // Biome seeds, doubling as boss spawn markers
    let biome_seeds = biomes::select_seeds(&mainland, spawn, config.biomes.seed_count)?;
    features::mark_boss_spawns(&mut terrain, &biome_seeds);

    // Region growth: spawn region is label 1, the selected seeds follow
    let mut grow_seeds: Vec<((usize, usize), u8)> = vec![(spawn, 1)];
    grow_seeds.extend(
        biome_seeds
            .iter()
            .enumerate()
            .map(|(i, &coord)| (coord, (i + 2) as u8)),
    );
    let mut biome_rng = ChaCha8Rng::seed_from_u64(seeds.biomes);
    let biome_grid = biomes::grow_regions(&mut biome_rng, &mainland, &grow_seeds, &config.biomes)?;

    // Tree scatter
    let mut feature_rng = ChaCha8Rng::seed_from_u64(seeds.features);
    let trees = features::place_trees(&mut feature_rng, &mut terrain, &config.features);

    // Auxiliary climate fields for the external biome-rule classifier
    let mut temperature_rng = ChaCha8Rng::seed_from_u64(seeds.temperature);
    let temperature = noise_map::generate_signed(&mut temperature_rng, height, width, &config.temperature_noise);
    let mut humidity_rng = ChaCha8Rng::seed_from_u64(seeds.humidity);
    let humidity = noise_map::generate_signed(&mut humidity_rng, height, width, &config.humidity_noise);
    let mut weirdness_rng = ChaCha8Rng::seed_from_u64(seeds.weirdness);
    let weirdness = noise_map::generate_signed(&mut weirdness_rng, height, width, &config.weirdness_noise);

    info!(
        "world complete: {} biome seeds, {} trees, {} mainland cells",
        biome_seeds.len(),
        trees.len(),
        mainland.iter().filter(|(_, _, &m)| m).count()
    );

    Ok(WorldData {
        seeds,
        height,
        width,
        terrain,
        spawn,
        mainland,
        biome_seeds,
        biomes: biome_grid,
        temperature,
        humidity,
        weirdness,
        trees,
    })
}
