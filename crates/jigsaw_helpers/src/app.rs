use bevy::prelude::*;
use bevy::window::{PresentMode, WindowMode, WindowResolution};
use bevy_framepace::{FramepacePlugin, FramepaceSettings, Limiter};

use crate::canvas::Canvas;

/// Frames per second the event loop is paced at.
pub const FRAME_RATE: f64 = 60.0;

pub struct AppSettings<'a> {
    pub title: &'a str,
    pub width: f32,
    pub height: f32,
    pub clear_color: Color,
}

// Creates a Bevy app with a fixed-size window whose logical pixels map 1:1 to the canvas.
// Every puzzle goes through this so the window, pacing and canvas stay consistent.
pub fn get_default_app(settings: &AppSettings<'_>) -> App {
    let mut app = App::new();

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: settings.title.to_string(),
            present_mode: PresentMode::Fifo,
            resolution: WindowResolution::new(settings.width, settings.height),
            resizable: false,
            mode: WindowMode::Windowed,
            ..default()
        }),
        ..default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin));

    // Keeps the loop at a steady tick instead of spinning as fast as the GPU allows.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(FramepacePlugin);
    app.insert_resource(FramepaceSettings {
        limiter: Limiter::from_framerate(FRAME_RATE),
    });

    app.insert_resource(ClearColor(settings.clear_color));
    app.insert_resource(Canvas::new(settings.width, settings.height));

    app
}
