use super::{Camera2D, Vec2};

const DEFAULT_CLEAR_COLOR: [u8; 4] = [18, 20, 28, 255];

/// World coordinates go through the camera; screen coordinates are raw
/// internal-resolution pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSpace {
    World,
    Screen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Sprite stretched over `size` with its top-left at `position`. A missing
    /// image draws as a placeholder block of the same size.
    Sprite {
        key: String,
        position: Vec2,
        size: Vec2,
        flip_x: bool,
        flash: bool,
        space: DrawSpace,
    },
    Rect {
        position: Vec2,
        size: Vec2,
        color: [u8; 4],
        filled: bool,
        space: DrawSpace,
    },
    Text {
        text: String,
        position: Vec2,
        color: [u8; 4],
        scale: u32,
        space: DrawSpace,
    },
}

/// Ordered commands for one frame. Later commands paint over earlier ones.
#[derive(Debug, Clone)]
pub struct DrawList {
    clear_color: [u8; 4],
    camera: Camera2D,
    commands: Vec<DrawCommand>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            camera: Camera2D::default(),
            commands: Vec::new(),
        }
    }
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops last frame's commands but keeps the allocation.
    pub fn reset(&mut self) {
        self.clear_color = DEFAULT_CLEAR_COLOR;
        self.camera = Camera2D::default();
        self.commands.clear();
    }

    pub fn set_clear_color(&mut self, color: [u8; 4]) {
        self.clear_color = color;
    }

    pub fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    pub fn sprite(
        &mut self,
        key: impl Into<String>,
        position: Vec2,
        size: Vec2,
        flip_x: bool,
        flash: bool,
    ) {
        self.commands.push(DrawCommand::Sprite {
            key: key.into(),
            position,
            size,
            flip_x,
            flash,
            space: DrawSpace::World,
        });
    }

    pub fn rect(&mut self, position: Vec2, size: Vec2, color: [u8; 4], space: DrawSpace) {
        self.commands.push(DrawCommand::Rect {
            position,
            size,
            color,
            filled: true,
            space,
        });
    }

    pub fn outline(&mut self, position: Vec2, size: Vec2, color: [u8; 4], space: DrawSpace) {
        self.commands.push(DrawCommand::Rect {
            position,
            size,
            color,
            filled: false,
            space,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, color: [u8; 4], scale: u32) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            color,
            scale: scale.max(1),
            space: DrawSpace::Screen,
        });
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear_color(&self) -> [u8; 4] {
        self.clear_color
    }

    pub fn camera(&self) -> Camera2D {
        self.camera
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
