use bevy::prelude::*;
use fastrand::Rng;
use image::RgbaImage;
use jigsaw_helpers::canvas::Canvas;
use jigsaw_helpers::restart::{CleanupMarker, despawn_marked_entities};

use crate::config::PuzzleConfig;
use crate::scene::{StatusMessage, spawn_tile_sprites};
use crate::session::PuzzleSession;
use crate::tiles::{self, TileSetError, bitmap_to_image};
use crate::{PuzzleRng, PuzzleSet};

/// Sent by the restart button or the `R` key.
#[derive(Event)]
pub struct RestartRequested;

pub struct RestartPlugin;

impl Plugin for RestartPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RestartRequested>()
            .add_systems(Update, handle_restart.in_set(PuzzleSet::Restart));
    }
}

/// Slices a new source image and starts over with its tiles.
///
/// `load` turns each decoded tile into the image handle the session keeps.
/// On failure the session is left exactly as it was.
pub fn restart_session(
    session: &mut PuzzleSession,
    config: &PuzzleConfig,
    rng: &mut Rng,
    load: impl FnMut(RgbaImage) -> Handle<Image>,
) -> Result<(), TileSetError> {
    let bitmaps = tiles::prepare_tiles(config, rng)?;
    session.initialize(bitmaps.into_iter().map(load).collect(), rng);
    Ok(())
}

fn handle_restart(
    mut commands: Commands,
    mut requests: EventReader<RestartRequested>,
    mut session: ResMut<PuzzleSession>,
    mut rng: ResMut<PuzzleRng>,
    mut images: ResMut<Assets<Image>>,
    mut status: EventWriter<StatusMessage>,
    config: Res<PuzzleConfig>,
    canvas: Res<Canvas>,
    round_entities: Query<Entity, With<CleanupMarker>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let result = restart_session(&mut session, &config, &mut rng.0, |bitmap| {
        images.add(bitmap_to_image(bitmap))
    });
    match result {
        Ok(()) => {
            despawn_marked_entities(&mut commands, &round_entities);
            spawn_tile_sprites(&mut commands, &session, &canvas);
            info!("Puzzle restarted with {} tiles", session.tiles().len());
        }
        Err(err) => {
            error!("Restart failed, keeping the current puzzle: {err}");
            status.send(StatusMessage(format!("Restart failed: {err}")));
        }
    }
}
