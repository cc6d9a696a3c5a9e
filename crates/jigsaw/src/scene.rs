use core::time::Duration;

use bevy::prelude::*;
use image::RgbaImage;
use jigsaw_helpers::canvas::Canvas;
use jigsaw_helpers::restart::CleanupMarker;

use crate::config::PuzzleConfig;
use crate::session::PuzzleSession;
use crate::tiles::bitmap_to_image;
use crate::{PuzzleRng, PuzzleSet};

/// Depth step between consecutive tiles in paint order.
const TILE_Z_STEP: f32 = 0.01;
const BANNER_Z: f32 = 50.0;
const BUTTON_Z: f32 = 60.0;
const STATUS_Z: f32 = 70.0;

const BANNER_SIZE: Vec2 = Vec2::new(480.0, 120.0);
const BANNER_TEXT: &str = "YOU WON!";
const RESTART_TEXT: &str = "Restart";
const RESTART_COLOR: Color = Color::srgb(200.0 / 255.0, 0.0, 0.0);
const STATUS_COLOR: Color = Color::srgb(1.0, 0.6, 0.6);
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Sprite of the tile with the given grid index.
#[derive(Component)]
pub struct TileSprite {
    index: usize,
}

#[derive(Component)]
struct VictoryBanner;

#[derive(Component)]
struct StatusTimer(Timer);

/// Short-lived line of text shown at the top of the canvas.
#[derive(Event)]
pub struct StatusMessage(pub String);

/// Tile bitmaps decoded before the window opened, consumed by the first frame.
#[derive(Resource)]
pub struct PendingTiles(pub Vec<RgbaImage>);

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StatusMessage>()
            .add_systems(
                Startup,
                (setup_camera, setup_restart_button, setup_victory_banner, start_puzzle),
            )
            .add_systems(
                Update,
                (
                    sync_tile_sprites,
                    update_victory_banner,
                    show_status_message,
                    expire_status_messages,
                )
                    .in_set(PuzzleSet::Render),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn setup_restart_button(mut commands: Commands, config: Res<PuzzleConfig>, canvas: Res<Canvas>) {
    let rect = config.restart_button();
    let size = rect.size().as_vec2();
    commands
        .spawn((
            Sprite::from_color(RESTART_COLOR, size),
            canvas.rect_transform(rect.min.as_vec2(), size, BUTTON_Z),
        ))
        .with_child((
            Text2d::new(RESTART_TEXT),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));
}

fn setup_victory_banner(mut commands: Commands, canvas: Res<Canvas>) {
    commands
        .spawn((
            Sprite::from_color(Color::BLACK, BANNER_SIZE),
            canvas.centered_transform(BANNER_SIZE, BANNER_Z),
            Visibility::Hidden,
            VictoryBanner,
        ))
        .with_child((
            Text2d::new(BANNER_TEXT),
            TextFont {
                font_size: 72.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));
}

fn start_puzzle(
    mut commands: Commands,
    mut pending: ResMut<PendingTiles>,
    mut images: ResMut<Assets<Image>>,
    mut session: ResMut<PuzzleSession>,
    mut rng: ResMut<PuzzleRng>,
    canvas: Res<Canvas>,
) {
    let handles = core::mem::take(&mut pending.0)
        .into_iter()
        .map(|bitmap| images.add(bitmap_to_image(bitmap)))
        .collect();
    commands.remove_resource::<PendingTiles>();

    session.initialize(handles, &mut rng.0);
    spawn_tile_sprites(&mut commands, &session, &canvas);
    info!("Puzzle started with {} tiles", session.tiles().len());
}

/// Spawns one sprite per session tile, placed and stacked like the session.
pub fn spawn_tile_sprites(commands: &mut Commands, session: &PuzzleSession, canvas: &Canvas) {
    let piece = session.layout().piece.as_vec2();
    for (order, tile) in session.tiles().iter().enumerate() {
        commands.spawn((
            Sprite {
                image: tile.image.clone(),
                custom_size: Some(piece),
                ..default()
            },
            canvas.rect_transform(tile.current.as_vec2(), piece, order as f32 * TILE_Z_STEP),
            TileSprite { index: tile.index },
            CleanupMarker,
        ));
    }
}

fn sync_tile_sprites(
    session: Res<PuzzleSession>,
    canvas: Res<Canvas>,
    mut sprites: Query<(&TileSprite, &mut Transform)>,
) {
    if !session.is_changed() {
        return;
    }

    let piece = session.layout().piece.as_vec2();
    let mut placements = vec![None; session.tiles().len()];
    for (order, tile) in session.tiles().iter().enumerate() {
        if let Some(slot) = placements.get_mut(tile.index) {
            *slot = Some((order, tile.current));
        }
    }

    for (sprite, mut transform) in &mut sprites {
        let Some(Some((order, current))) = placements.get(sprite.index).copied() else {
            continue;
        };
        *transform = canvas.rect_transform(current.as_vec2(), piece, order as f32 * TILE_Z_STEP);
    }
}

fn update_victory_banner(
    session: Res<PuzzleSession>,
    mut banner: Query<&mut Visibility, With<VictoryBanner>>,
) {
    if !session.is_changed() {
        return;
    }
    for mut visibility in &mut banner {
        *visibility = if session.is_won() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

fn show_status_message(
    mut commands: Commands,
    mut events: EventReader<StatusMessage>,
    shown: Query<Entity, With<StatusTimer>>,
    canvas: Res<Canvas>,
) {
    let Some(StatusMessage(message)) = events.read().last() else {
        return;
    };
    for entity in &shown {
        commands.entity(entity).despawn_recursive();
    }
    commands.spawn((
        Text2d::new(message.clone()),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(STATUS_COLOR),
        Transform::from_xyz(0.0, canvas.size().y / 2.0 - 30.0, STATUS_Z),
        StatusTimer(Timer::new(STATUS_DURATION, TimerMode::Once)),
    ));
}

fn expire_status_messages(
    mut commands: Commands,
    mut query: Query<(Entity, &mut StatusTimer)>,
    time: Res<Time>,
) {
    for (entity, mut status) in &mut query {
        status.0.tick(time.delta());
        if status.0.finished() {
            commands.entity(entity).despawn();
        }
    }
}
