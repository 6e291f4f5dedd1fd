//! Seed management for map generation
//!
//! Each generation stage gets its own seed derived from a master seed, so the
//! whole pipeline is reproducible from a single number while stages stay
//! statistically independent.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all generation stages.
#[derive(Clone, Debug)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Terrain noise offsets consumed by the spawn search loop
    pub terrain: u64,
    /// Temperature field offsets
    pub temperature: u64,
    /// Humidity field offsets
    pub humidity: u64,
    /// Weirdness field offsets
    pub weirdness: u64,
    /// Biome region growth (per-step hold draws)
    pub biomes: u64,
    /// Tree scattering
    pub features: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            terrain: derive_seed(master, "terrain"),
            temperature: derive_seed(master, "temperature"),
            humidity: derive_seed(master, "humidity"),
            weirdness: derive_seed(master, "weirdness"),
            biomes: derive_seed(master, "biomes"),
            features: derive_seed(master, "features"),
        }
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive a sub-seed from a master seed and a stage name.
/// Uses hashing to ensure different stages get different but deterministic seeds.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, terrain: {}, temperature: {}, humidity: {}, \
             weirdness: {}, biomes: {}, features: {} }}",
            self.master,
            self.terrain,
            self.temperature,
            self.humidity,
            self.weirdness,
            self.biomes,
            self.features,
        )
    }
}
