//! Coherent-noise field synthesis
//!
//! Multi-octave Perlin fields sampled centered on the grid, plus the radial
//! falloff mask that biases land toward the map center. Every call draws a
//! fresh pair of sampling offsets from the threaded RNG, so repeated calls
//! with the same parameters yield different but statistically similar fields.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Offsets are drawn uniformly from this range, wide enough that consecutive
/// fields never overlap in noise space.
const OFFSET_RANGE: f64 = 100_000.0;

/// Parameters for one noise field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Spatial scale (higher = larger features)
    pub scale: f64,
    /// Number of summed noise layers
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 50.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Generate a noise field rescaled to 0..1. Used for terrain.
pub fn generate(rng: &mut ChaCha8Rng, height: usize, width: usize, params: &NoiseParams) -> Grid<f64> {
    let mut field = sample_field(rng, height, width, params);
    normalize_unit(&mut field);
    field
}

/// Generate a noise field rescaled to -1..1. Used for the auxiliary
/// temperature/humidity/weirdness fields.
pub fn generate_signed(
    rng: &mut ChaCha8Rng,
    height: usize,
    width: usize,
    params: &NoiseParams,
) -> Grid<f64> {
    let mut field = sample_field(rng, height, width, params);
    normalize_signed(&mut field);
    field
}

/// Raw fBm samples, centered on the grid and shifted by random offsets.
fn sample_field(rng: &mut ChaCha8Rng, height: usize, width: usize, params: &NoiseParams) -> Grid<f64> {
    let perlin = Perlin::new(rng.gen());
    let offset_x = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE);
    let offset_y = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE);

    let center_row = (height / 2) as f64;
    let center_col = (width / 2) as f64;

    let mut field = Grid::new_with(height, width, 0.0f64);
    for (row, col, cell) in field.iter_mut() {
        let x = (row as f64 - center_row) / params.scale + offset_x;
        let y = (col as f64 - center_col) / params.scale + offset_y;
        *cell = fbm(&perlin, x, y, params.octaves, params.persistence, params.lacunarity);
    }
    field
}

/// Fractional Brownian Motion - multi-octave noise
fn fbm(
    noise: &Perlin,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

/// Radial falloff mask: 1 at the grid center, 0 at the corners.
/// Pure function of the dimensions.
pub fn falloff_map(height: usize, width: usize) -> Grid<f64> {
    let center_row = (height / 2) as f64;
    let center_col = (width / 2) as f64;
    let max_dist = (center_row * center_row + center_col * center_col).sqrt();

    let mut falloff = Grid::new_with(height, width, 0.0f64);
    for (row, col, cell) in falloff.iter_mut() {
        let dr = row as f64 - center_row;
        let dc = col as f64 - center_col;
        let dist = (dr * dr + dc * dc).sqrt() / max_dist;
        *cell = (1.0 - dist * dist).max(0.0);
    }
    falloff
}

/// Rescale so the minimum maps to 0 and the maximum to 1.
/// A zero-variance field becomes constant 0 instead of dividing by zero.
fn normalize_unit(field: &mut Grid<f64>) {
    let (min_val, max_val) = min_max(field);
    let range = max_val - min_val;
    if range < f64::EPSILON {
        for (_, _, cell) in field.iter_mut() {
            *cell = 0.0;
        }
        return;
    }
    for (_, _, cell) in field.iter_mut() {
        *cell = (*cell - min_val) / range;
    }
}

/// Rescale to -1..1, with the same zero-variance guard as `normalize_unit`.
fn normalize_signed(field: &mut Grid<f64>) {
    normalize_unit(field);
    for (_, _, cell) in field.iter_mut() {
        *cell = 2.0 * *cell - 1.0;
    }
}

fn min_max(field: &Grid<f64>) -> (f64, f64) {
    let mut min_val = f64::MAX;
    let mut max_val = f64::MIN;
    for (_, _, &val) in field.iter() {
        if val < min_val {
            min_val = val;
        }
        if val > max_val {
            max_val = val;
        }
    }
    (min_val, max_val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    #[test]
    fn test_generate_stays_in_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let field = generate(&mut rng, 32, 48, &NoiseParams::default());
        for (_, _, &v) in field.iter() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_generate_signed_stays_in_signed_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let field = generate_signed(&mut rng, 32, 48, &NoiseParams::default());
        for (_, _, &v) in field.iter() {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_same_rng_seed_reproduces_field() {
        let params = NoiseParams::default();
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);
        let a = generate(&mut rng1, 16, 16, &params);
        let b = generate(&mut rng2, 16, 16, &params);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_consecutive_calls_differ() {
        let params = NoiseParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let a = generate(&mut rng, 16, 16, &params);
        let b = generate(&mut rng, 16, 16, &params);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_degenerate_field_normalizes_to_zero() {
        let mut field = Grid::new_with(4, 4, 3.25f64);
        normalize_unit(&mut field);
        for (_, _, &v) in field.iter() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_falloff_peaks_at_center_and_dies_at_corners() {
        let falloff = falloff_map(21, 21);
        assert_relative_eq!(*falloff.get(10, 10), 1.0);
        assert_relative_eq!(*falloff.get(0, 0), 0.0);
        for (_, _, &v) in falloff.iter() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_falloff_is_deterministic() {
        assert_eq!(falloff_map(10, 14).as_slice(), falloff_map(10, 14).as_slice());
    }
}
