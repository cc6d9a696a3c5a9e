//! Canvas space is what the player sees: origin at the window's top-left corner,
//! y growing downward, one unit per logical pixel. The default `Camera2d` puts the
//! world origin at the window center with y growing upward, so everything drawn
//! from canvas coordinates goes through [`Canvas`].

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    size: Vec2,
}

impl Canvas {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// World-space center of the canvas rectangle with top-left corner `top_left`.
    pub fn rect_center(&self, top_left: Vec2, size: Vec2) -> Vec2 {
        Vec2::new(
            top_left.x + (size.x - self.size.x) / 2.0,
            (self.size.y - size.y) / 2.0 - top_left.y,
        )
    }

    pub fn rect_transform(&self, top_left: Vec2, size: Vec2, z: f32) -> Transform {
        Transform::from_translation(self.rect_center(top_left, size).extend(z))
    }

    /// Transform that centers an element of `size` on the canvas.
    pub fn centered_transform(&self, size: Vec2, z: f32) -> Transform {
        self.rect_transform((self.size - size) / 2.0, size, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_rect_maps_to_upper_left_quadrant() {
        let canvas = Canvas::new(1000.0, 800.0);
        let center = canvas.rect_center(Vec2::ZERO, Vec2::new(300.0, 200.0));
        assert_eq!(center, Vec2::new(-350.0, 300.0), "unexpected center {center}");
    }

    #[test]
    fn full_canvas_rect_is_centered_on_origin() {
        let canvas = Canvas::new(1000.0, 800.0);
        let center = canvas.rect_center(Vec2::ZERO, canvas.size());
        assert_eq!(center, Vec2::ZERO, "full canvas should sit on the origin");
    }

    #[test]
    fn centered_transform_keeps_depth() {
        let canvas = Canvas::new(640.0, 480.0);
        let transform = canvas.centered_transform(Vec2::new(100.0, 40.0), 7.0);
        assert_eq!(
            transform.translation,
            Vec3::new(0.0, 0.0, 7.0),
            "centered element should sit on the origin at its own depth"
        );
    }
}
