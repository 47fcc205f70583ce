use serde::{Deserialize, Serialize};

use crate::app::{Camera2D, DrawSpace, Vec2};

/// Size of the internal framebuffer in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// World pixels map 1:1 onto framebuffer pixels, offset by the camera.
pub fn world_to_screen(world: Vec2, camera: &Camera2D) -> (i32, i32) {
    let x = world.x - camera.position.x;
    let y = world.y - camera.position.y;
    (x.round() as i32, y.round() as i32)
}

pub fn screen_to_world(screen: Vec2, camera: &Camera2D) -> Vec2 {
    Vec2 {
        x: screen.x + camera.position.x,
        y: screen.y + camera.position.y,
    }
}

pub(crate) fn to_screen(position: Vec2, space: DrawSpace, camera: &Camera2D) -> (i32, i32) {
    match space {
        DrawSpace::World => world_to_screen(position, camera),
        DrawSpace::Screen => (position.x.round() as i32, position.y.round() as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_top_left_without_camera_offset() {
        let camera = Camera2D::default();
        assert_eq!(world_to_screen(Vec2::ZERO, &camera), (0, 0));
    }

    #[test]
    fn camera_offset_shifts_screen_position() {
        let camera = Camera2D {
            position: Vec2::new(100.0, 40.0),
        };
        assert_eq!(world_to_screen(Vec2::new(120.4, 30.0), &camera), (20, -10));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let camera = Camera2D {
            position: Vec2::new(64.0, 32.0),
        };
        let world = screen_to_world(Vec2::new(10.0, 20.0), &camera);
        assert_eq!(world, Vec2::new(74.0, 52.0));
        assert_eq!(world_to_screen(world, &camera), (10, 20));
    }

    #[test]
    fn screen_space_ignores_camera() {
        let camera = Camera2D {
            position: Vec2::new(500.0, 500.0),
        };
        assert_eq!(
            to_screen(Vec2::new(3.0, 4.0), DrawSpace::Screen, &camera),
            (3, 4)
        );
    }
}
