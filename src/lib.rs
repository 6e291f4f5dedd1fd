//! Procedural island map generator
//!
//! Generates a self-contained 2D game island from a single master seed:
//! fractal noise shaped by a radial falloff, classified into terrain bands,
//! a spawn point at the landmass centroid, biome regions grown from
//! farthest-point seeds, boss spawn markers, and a tree scatter. The whole
//! pipeline is deterministic for a fixed `(config, seed)` pair.
//!
//! Entry point is [`world::generate_world`]; the stage functions are public
//! for callers that want to run or tweak individual steps.

pub mod biomes;
pub mod export;
pub mod features;
pub mod grid;
pub mod mainland;
pub mod noise_map;
pub mod seeds;
pub mod terrain;
pub mod world;
