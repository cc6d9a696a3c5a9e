use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use fastrand::Rng;
use image::RgbaImage;
use thiserror::Error;

use crate::config::PuzzleConfig;
use crate::slicer::{self, SlicerError, TILE_PREFIX};

#[derive(Error, Debug)]
pub enum TileSetError {
    #[error(transparent)]
    Slice(#[from] SlicerError),

    #[error("could not read tiles from {}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("could not decode tile {}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("expected {expected} tiles but found {found}")]
    CountMismatch { expected: usize, found: usize },
}

/// Number `n` of a tile file named `image_<n>.<ext>`.
pub fn tile_number(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(TILE_PREFIX)?
        .parse()
        .ok()
}

/// Tile files in `dir`, ordered by tile number.
pub fn load_tile_paths(dir: &Path) -> Result<Vec<PathBuf>, TileSetError> {
    let io_error = |source| TileSetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut tiles = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if let Some(number) = tile_number(&path) {
            tiles.push((number, path));
        }
    }
    tiles.sort_by_key(|(number, _)| *number);
    Ok(tiles.into_iter().map(|(_, path)| path).collect())
}

pub fn load_tile_bitmaps(dir: &Path) -> Result<Vec<RgbaImage>, TileSetError> {
    load_tile_paths(dir)?
        .into_iter()
        .map(|path| match image::open(&path) {
            Ok(image) => Ok(image.to_rgba8()),
            Err(source) => Err(TileSetError::Decode { path, source }),
        })
        .collect()
}

/// Loads the tiles in `dir`, failing unless there are exactly `expected` of them.
pub fn load_tile_set(dir: &Path, expected: usize) -> Result<Vec<RgbaImage>, TileSetError> {
    let bitmaps = load_tile_bitmaps(dir)?;
    if bitmaps.len() != expected {
        return Err(TileSetError::CountMismatch {
            expected,
            found: bitmaps.len(),
        });
    }
    Ok(bitmaps)
}

/// Slices a fresh random source image and loads the resulting tiles.
pub fn prepare_tiles(config: &PuzzleConfig, rng: &mut Rng) -> Result<Vec<RgbaImage>, TileSetError> {
    let written = slicer::process(&config.source_dir, &config.output_dir, config.grid_size, rng)?;
    let bitmaps = load_tile_set(&config.output_dir, config.expected_tile_count())?;
    debug!("Loaded {} of {written} sliced tiles", bitmaps.len());
    Ok(bitmaps)
}

pub fn bitmap_to_image(bitmap: RgbaImage) -> Image {
    let size = Extent3d {
        width: bitmap.width(),
        height: bitmap.height(),
        depth_or_array_layers: 1,
    };
    Image::new(
        size,
        TextureDimension::D2,
        bitmap.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}
