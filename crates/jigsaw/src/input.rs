use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use jigsaw_helpers::input::{
    just_pressed_screen_position, pointer_just_released, pointer_screen_position,
};

use crate::PuzzleSet;
use crate::config::PuzzleConfig;
use crate::restart::RestartRequested;
use crate::session::PuzzleSession;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_pointer, handle_restart_key).in_set(PuzzleSet::Input),
        );
    }
}

fn to_canvas(position: Vec2) -> IVec2 {
    position.floor().as_ivec2()
}

// Press, move and release are applied in that order so a quick click within a
// single frame still picks up and drops the tile.
fn handle_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    config: Res<PuzzleConfig>,
    mut session: ResMut<PuzzleSession>,
    mut restart: EventWriter<RestartRequested>,
) {
    if let Some(position) = just_pressed_screen_position(&buttons, &touches, &windows) {
        let point = to_canvas(position);
        if config.restart_button().contains(point) {
            restart.send(RestartRequested);
        } else if let Some(index) = session.pick_up(point) {
            debug!("Picked up tile {index} at {point}");
        }
    }

    if session.is_dragging() {
        if let Some(position) = pointer_screen_position(&touches, &windows) {
            session.drag(to_canvas(position));
        }
    }

    if session.is_dragging() && pointer_just_released(&buttons, &touches) {
        if let Some(release) = session.release() {
            debug!(
                "Released tile {} (snapped: {})",
                release.index, release.snapped
            );
            if session.is_won() {
                info!("Puzzle solved");
            }
        }
    }
}

fn handle_restart_key(keys: Res<ButtonInput<KeyCode>>, mut restart: EventWriter<RestartRequested>) {
    if keys.just_pressed(KeyCode::KeyR) {
        restart.send(RestartRequested);
    }
}
