use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::log::{debug, info};
use fastrand::Rng;
use image::GenericImageView;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// File name prefix of every sliced tile, followed by its 1-based number.
pub const TILE_PREFIX: &str = "image_";
pub const TILE_EXTENSION: &str = "png";

/// Image formats accepted as puzzle sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceFormat {
    Png,
    Jpg,
    Jpeg,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

fn supported_formats() -> String {
    SourceFormat::iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum SlicerError {
    #[error("no source images ({}) found in {}", supported_formats(), .dir.display())]
    NoSourceImages { dir: PathBuf },

    #[error("filesystem error at {}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("could not decode {}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("could not write tile {}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("a {width}x{height} image cannot be split into a {grid_size}x{grid_size} grid")]
    ImageTooSmall {
        width: u32,
        height: u32,
        grid_size: u32,
    },
}

impl SlicerError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn tile_file_name(number: usize) -> String {
    format!("{TILE_PREFIX}{number}.{TILE_EXTENSION}")
}

/// Picks a random source image and writes its `grid_size`² tiles to `output_dir`.
///
/// The output directory is wiped first, so on failure it is left empty.
/// Returns the number of tiles written.
pub fn process(
    source_dir: &Path,
    output_dir: &Path,
    grid_size: u32,
    rng: &mut Rng,
) -> Result<usize, SlicerError> {
    clear_output_directory(output_dir)?;

    let candidates = list_source_images(source_dir)?;
    let Some(source) = rng.choice(&candidates) else {
        return Err(SlicerError::NoSourceImages {
            dir: source_dir.to_path_buf(),
        });
    };

    let count = slice_image(source, output_dir, grid_size)?;
    info!(
        "Image {} split into {count} pieces in {}",
        source.display(),
        output_dir.display()
    );
    Ok(count)
}

pub fn clear_output_directory(output_dir: &Path) -> Result<(), SlicerError> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(SlicerError::io(output_dir)(err)),
    }
    fs::create_dir_all(output_dir).map_err(SlicerError::io(output_dir))
}

/// Source images in `source_dir`, sorted so a seeded generator picks reproducibly.
pub fn list_source_images(source_dir: &Path) -> Result<Vec<PathBuf>, SlicerError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(SlicerError::io(source_dir))? {
        let path = entry.map_err(SlicerError::io(source_dir))?.path();
        if path.is_file() && SourceFormat::from_path(&path).is_some() {
            images.push(path);
        }
    }
    images.sort();
    debug!(
        "Found {} source images in {}",
        images.len(),
        source_dir.display()
    );
    Ok(images)
}

/// Crops `source` into a row-major grid of equal cells numbered from 1.
///
/// Remainder pixels that don't fill a whole cell on the right and bottom edges are dropped.
pub fn slice_image(source: &Path, output_dir: &Path, grid_size: u32) -> Result<usize, SlicerError> {
    let image = image::open(source).map_err(|source_err| SlicerError::Decode {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let (width, height) = image.dimensions();
    let piece_width = width.checked_div(grid_size).unwrap_or(0);
    let piece_height = height.checked_div(grid_size).unwrap_or(0);
    if piece_width == 0 || piece_height == 0 {
        return Err(SlicerError::ImageTooSmall {
            width,
            height,
            grid_size,
        });
    }

    let mut count = 0;
    for row in 0..grid_size {
        for col in 0..grid_size {
            let piece = image.crop_imm(
                col * piece_width,
                row * piece_height,
                piece_width,
                piece_height,
            );
            count += 1;
            let path = output_dir.join(tile_file_name(count));
            piece
                .save(&path)
                .map_err(|source| SlicerError::Encode { path, source })?;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::test_support::{scratch_dir, write_gradient};

    #[test]
    fn source_format_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_path(Path::new("cat.PNG")),
            Some(SourceFormat::Png),
            "upper case extension"
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("dog.jpeg")),
            Some(SourceFormat::Jpeg),
            "jpeg extension"
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("notes.txt")),
            None,
            "text files are not sources"
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("README")),
            None,
            "no extension"
        );
    }

    #[test]
    fn slices_into_numbered_row_major_tiles() {
        let dir = scratch_dir("slicer-row-major");
        let source_dir = dir.join("source");
        let output_dir = dir.join("output");
        fs::create_dir_all(&source_dir).expect("create source dir");
        write_gradient(&source_dir.join("picture.png"), 100, 70);

        let count = process(&source_dir, &output_dir, 3, &mut Rng::with_seed(1))
            .expect("slicing should succeed");
        assert_eq!(count, 9, "3x3 grid");

        for number in 1..=9 {
            let tile = image::open(output_dir.join(tile_file_name(number)))
                .expect("tile should be readable")
                .to_rgba8();
            assert_eq!(tile.dimensions(), (33, 23), "tile {number} size");

            let index = (number - 1) as u32;
            let (col, row) = (index % 3, index / 3);
            assert_eq!(
                tile.get_pixel(0, 0),
                &Rgba([(col * 33) as u8, (row * 23) as u8, 0, 255]),
                "tile {number} should start at column {col}, row {row}"
            );
        }
        let written = fs::read_dir(&output_dir).expect("read output").count();
        assert_eq!(written, 9, "only tiles are written");
    }

    #[test]
    fn output_directory_is_cleared_first() {
        let dir = scratch_dir("slicer-clear");
        let source_dir = dir.join("source");
        let output_dir = dir.join("output");
        fs::create_dir_all(&source_dir).expect("create source dir");
        fs::create_dir_all(&output_dir).expect("create output dir");
        fs::write(output_dir.join("image_42.png"), b"stale").expect("write stale tile");
        write_gradient(&source_dir.join("picture.jpg"), 30, 30);

        process(&source_dir, &output_dir, 2, &mut Rng::with_seed(2)).expect("slicing");

        assert!(
            !output_dir.join("image_42.png").exists(),
            "stale tiles should be removed"
        );
        assert!(output_dir.join("image_4.png").exists(), "new tiles written");
    }

    #[test]
    fn empty_source_directory_is_reported() {
        let dir = scratch_dir("slicer-empty");
        let source_dir = dir.join("source");
        let output_dir = dir.join("output");
        fs::create_dir_all(&source_dir).expect("create source dir");
        fs::write(source_dir.join("notes.txt"), b"not an image").expect("write notes");

        let result = process(&source_dir, &output_dir, 3, &mut Rng::with_seed(3));
        assert!(
            matches!(result, Err(SlicerError::NoSourceImages { .. })),
            "expected NoSourceImages, got {result:?}"
        );
        assert!(output_dir.is_dir(), "output directory is still recreated");
    }

    #[test]
    fn missing_source_directory_is_an_io_error() {
        let dir = scratch_dir("slicer-missing");
        let result = process(
            &dir.join("nowhere"),
            &dir.join("output"),
            3,
            &mut Rng::with_seed(4),
        );
        assert!(
            matches!(result, Err(SlicerError::Io { .. })),
            "expected Io, got {result:?}"
        );
    }

    #[test]
    fn image_smaller_than_grid_is_rejected() {
        let dir = scratch_dir("slicer-small");
        fs::create_dir_all(&dir).expect("create dir");
        let source = dir.join("tiny.png");
        write_gradient(&source, 2, 5);

        let result = slice_image(&source, &dir, 3);
        assert!(
            matches!(
                result,
                Err(SlicerError::ImageTooSmall {
                    width: 2,
                    height: 5,
                    grid_size: 3
                })
            ),
            "expected ImageTooSmall, got {result:?}"
        );
    }

    #[test]
    fn no_source_images_message_lists_formats() {
        let err = SlicerError::NoSourceImages {
            dir: PathBuf::from("source_images"),
        };
        assert_eq!(
            err.to_string(),
            "no source images (png, jpg, jpeg) found in source_images",
            "error message"
        );
    }
}
