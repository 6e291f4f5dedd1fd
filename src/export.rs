//! Binary map export
//!
//! Grids dump as headerless row-major byte arrays, the format the game client
//! reads directly. Dimensions travel out of band.

use std::path::Path;

use crate::grid::Grid;
use crate::terrain::TerrainClass;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "map export failed: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Flatten a terrain grid to its ordinal bytes in row-major order.
pub fn terrain_bytes(terrain: &Grid<TerrainClass>) -> Vec<u8> {
    terrain.as_slice().iter().map(|class| class.ordinal()).collect()
}

/// Write the terrain grid as a raw byte dump.
pub fn write_terrain(terrain: &Grid<TerrainClass>, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, terrain_bytes(terrain))?;
    Ok(())
}

/// Write a biome label grid as a raw byte dump.
pub fn write_biomes(biomes: &Grid<u8>, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, biomes.as_slice())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_bytes_row_major() {
        let mut terrain = Grid::new_with(2, 3, TerrainClass::Water);
        terrain.set(0, 1, TerrainClass::Sand);
        terrain.set(0, 2, TerrainClass::Grass);
        terrain.set(1, 0, TerrainClass::Spawn);
        assert_eq!(terrain_bytes(&terrain), vec![0, 1, 2, 3, 0, 0]);
    }

    #[test]
    fn test_write_round_trip() {
        let mut terrain = Grid::new_with(3, 3, TerrainClass::Grass);
        terrain.set(2, 2, TerrainClass::Tree);

        let dir = std::env::temp_dir().join("island_generator_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("map.bin");
        write_terrain(&terrain, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes, terrain_bytes(&terrain));
        assert_eq!(bytes[8], 5);

        std::fs::remove_file(&path).ok();
    }
}
