use bevy::prelude::*;
use jigsaw_helpers::AppSettings;
use thiserror::Error;

mod config;
mod input;
mod restart;
mod scene;
mod session;
mod slicer;
mod tiles;

pub use config::{BoardLayout, ConfigError, PuzzleConfig};
pub use restart::{RestartRequested, restart_session};
pub use session::{DragState, PuzzleSession, Release, Tile};
pub use slicer::{SlicerError, SourceFormat};
pub use tiles::{TileSetError, prepare_tiles};

use input::InputPlugin;
use restart::RestartPlugin;
use scene::{PendingTiles, ScenePlugin};

const WINDOW_TITLE: &str = "Drag and Drop Puzzle";

/// Random generator shared by shuffling and source picking.
#[derive(Resource)]
pub struct PuzzleRng(pub fastrand::Rng);

/// Input mutates the session, restarts replace it, rendering reads it.
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
enum PuzzleSet {
    Input,
    Restart,
    Render,
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("could not prepare the first puzzle")]
    Tiles(#[from] TileSetError),
}

/// Slices the first puzzle and runs the game until the window closes.
///
/// Fails before any window opens when the configuration is invalid or no
/// usable tile set can be produced.
pub fn run(config: PuzzleConfig) -> Result<AppExit, StartupError> {
    let layout = config.layout()?;

    // Built before slicing so the slicer's log output goes through Bevy's logger.
    let mut app = jigsaw_helpers::get_default_app(&AppSettings {
        title: WINDOW_TITLE,
        width: config.canvas_width as f32,
        height: config.canvas_height as f32,
        clear_color: config.background_color,
    });

    let mut rng = fastrand::Rng::new();
    let bitmaps = tiles::prepare_tiles(&config, &mut rng)?;

    app.configure_sets(
        Update,
        (PuzzleSet::Input, PuzzleSet::Restart, PuzzleSet::Render).chain(),
    )
    .insert_resource(PuzzleSession::new(layout, config.snap_threshold))
    .insert_resource(PuzzleRng(rng))
    .insert_resource(PendingTiles(bitmaps))
    .insert_resource(config)
    .add_plugins((ScenePlugin, InputPlugin, RestartPlugin));

    Ok(app.run())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};

    use image::{Rgb, RgbImage};

    /// Fresh, empty directory unique to this test process and `label`.
    pub fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jigsaw-{label}-{}", std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).expect("clear scratch dir");
        }
        dir
    }

    /// Writes an RGB image whose pixel at (x, y) is `(x, y, 0)`, wrapping at 256.
    pub fn write_gradient(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
            .save(path)
            .expect("write test image");
    }
}
