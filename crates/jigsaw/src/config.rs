use std::path::PathBuf;

use bevy::prelude::*;
use fastrand::Rng;
use thiserror::Error;

pub const GRID_SIZE: u32 = 3;
pub const CANVAS_WIDTH: i32 = 1000;
pub const CANVAS_HEIGHT: i32 = 800;
/// Margin reserved around the assembled picture, split evenly between both sides.
pub const PUZZLE_OFFSET: i32 = 100;
pub const SNAP_THRESHOLD: i32 = 40;
pub const SOURCE_DIR: &str = "source_images";
pub const OUTPUT_DIR: &str = "images";

pub const RESTART_BUTTON_SIZE: IVec2 = IVec2::new(200, 50);
/// Distance from the bottom edge of the canvas to the top of the restart button.
pub const RESTART_BUTTON_BOTTOM: i32 = 70;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    InvalidGridSize,

    #[error("offset {offset} does not fit a {width}x{height} canvas")]
    InvalidOffset { offset: i32, width: i32, height: i32 },

    #[error("a {grid_size}x{grid_size} grid leaves no room for pieces on a {width}x{height} canvas")]
    PieceTooSmall {
        grid_size: u32,
        width: i32,
        height: i32,
    },

    #[error("snap threshold must be positive, got {0}")]
    InvalidSnapThreshold(i32),
}

/// Static settings, fixed when the process starts.
#[derive(Resource, Debug, Clone)]
pub struct PuzzleConfig {
    /// Tiles per row and per column
    pub grid_size: u32,
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub background_color: Color,
    pub puzzle_offset: i32,
    /// Max per-axis distance, in pixels, at which a released tile snaps home
    pub snap_threshold: i32,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            background_color: Color::srgb_u8(50, 50, 50),
            puzzle_offset: PUZZLE_OFFSET,
            snap_threshold: SNAP_THRESHOLD,
            source_dir: PathBuf::from(SOURCE_DIR),
            output_dir: PathBuf::from(OUTPUT_DIR),
        }
    }
}

impl PuzzleConfig {
    /// Validates the settings and derives the board geometry from them.
    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::InvalidGridSize);
        }
        if self.puzzle_offset < 0
            || self.puzzle_offset >= self.canvas_width
            || self.puzzle_offset >= self.canvas_height
        {
            return Err(ConfigError::InvalidOffset {
                offset: self.puzzle_offset,
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.snap_threshold <= 0 {
            return Err(ConfigError::InvalidSnapThreshold(self.snap_threshold));
        }

        let grid = i32::try_from(self.grid_size).unwrap_or(i32::MAX);
        let piece = IVec2::new(
            (self.canvas_width - self.puzzle_offset) / grid,
            (self.canvas_height - self.puzzle_offset) / grid,
        );
        if piece.x == 0 || piece.y == 0 {
            return Err(ConfigError::PieceTooSmall {
                grid_size: self.grid_size,
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        Ok(BoardLayout {
            grid_size: self.grid_size,
            canvas: IVec2::new(self.canvas_width, self.canvas_height),
            offset: self.puzzle_offset,
            piece,
        })
    }

    pub const fn expected_tile_count(&self) -> usize {
        (self.grid_size as usize).pow(2)
    }

    /// Restart button rectangle in canvas space, centered horizontally near the bottom.
    pub fn restart_button(&self) -> IRect {
        let min = IVec2::new(
            self.canvas_width / 2 - RESTART_BUTTON_SIZE.x / 2,
            self.canvas_height - RESTART_BUTTON_BOTTOM,
        );
        IRect::from_corners(min, min + RESTART_BUTTON_SIZE)
    }
}

/// Board geometry shared by every tile of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub grid_size: u32,
    pub canvas: IVec2,
    pub offset: i32,
    /// Displayed size of every tile
    pub piece: IVec2,
}

impl BoardLayout {
    pub const fn tile_count(&self) -> usize {
        (self.grid_size as usize).pow(2)
    }

    /// Top-left corner a tile occupies when the picture is assembled.
    pub fn correct_position(&self, index: usize) -> IVec2 {
        let grid = self.grid_size as usize;
        let col = (index % grid) as i32;
        let row = (index / grid) as i32;
        IVec2::new(col, row) * self.piece + IVec2::splat(self.offset / 2)
    }

    /// Uniformly random top-left corner that keeps the whole tile on the canvas.
    pub fn random_position(&self, rng: &mut Rng) -> IVec2 {
        let max = self.canvas - self.piece;
        IVec2::new(rng.i32(0..=max.x), rng.i32(0..=max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_layout() -> BoardLayout {
        PuzzleConfig::default()
            .layout()
            .expect("default config should be valid")
    }

    #[test]
    fn default_layout_splits_the_inner_area() {
        let layout = default_layout();
        assert_eq!(layout.piece, IVec2::new(300, 233), "piece size");
        assert_eq!(layout.tile_count(), 9, "tile count");
    }

    #[test]
    fn correct_position_follows_grid_index() {
        let layout = default_layout();
        assert_eq!(layout.correct_position(0), IVec2::new(50, 50), "first tile");
        assert_eq!(layout.correct_position(4), IVec2::new(350, 283), "center tile");
        assert_eq!(layout.correct_position(8), IVec2::new(650, 516), "last tile");
    }

    #[test]
    fn random_positions_stay_on_canvas() {
        let layout = default_layout();
        let mut rng = Rng::with_seed(42);
        for _ in 0..1000 {
            let pos = layout.random_position(&mut rng);
            assert!(
                pos.cmpge(IVec2::ZERO).all() && pos.cmple(layout.canvas - layout.piece).all(),
                "{pos} is off the canvas"
            );
        }
    }

    #[test]
    fn zero_grid_is_rejected() {
        let config = PuzzleConfig {
            grid_size: 0,
            ..default()
        };
        assert_eq!(config.layout(), Err(ConfigError::InvalidGridSize), "grid 0");
    }

    #[test]
    fn oversized_offset_is_rejected() {
        let config = PuzzleConfig {
            puzzle_offset: 800,
            ..default()
        };
        assert!(
            matches!(config.layout(), Err(ConfigError::InvalidOffset { .. })),
            "offset as tall as the canvas should be rejected"
        );
    }

    #[test]
    fn grid_finer_than_pixels_is_rejected() {
        let config = PuzzleConfig {
            grid_size: 2000,
            ..default()
        };
        assert!(
            matches!(config.layout(), Err(ConfigError::PieceTooSmall { .. })),
            "sub-pixel pieces should be rejected"
        );
    }

    #[test]
    fn non_positive_snap_threshold_is_rejected() {
        let config = PuzzleConfig {
            snap_threshold: 0,
            ..default()
        };
        assert_eq!(
            config.layout(),
            Err(ConfigError::InvalidSnapThreshold(0)),
            "zero threshold"
        );
    }

    #[test]
    fn restart_button_sits_bottom_center() {
        let button = PuzzleConfig::default().restart_button();
        assert_eq!(button.min, IVec2::new(400, 730), "button corner");
        assert_eq!(button.max, IVec2::new(600, 780), "button far corner");
        assert!(button.contains(IVec2::new(600, 780)), "edges are inclusive");
        assert!(!button.contains(IVec2::new(500, 781)), "below the button");
    }
}
