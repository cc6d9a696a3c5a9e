use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Pointer position in canvas space when the left button or a touch just went down.
pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// Current pointer position in canvas space: the first active touch, otherwise the cursor.
pub fn pointer_screen_position(
    touch_input: &Res<Touches>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<Vec2> {
    if let Some(touch) = touch_input.iter().next() {
        return Some(touch.position());
    }
    windows.get_single().ok()?.cursor_position()
}

// Releases don't need a position, and the cursor may already have left the window.
pub fn pointer_just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_released(MouseButton::Left) || touch_input.any_just_released()
}
