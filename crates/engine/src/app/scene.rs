use serde::{Deserialize, Serialize};

use super::input::{ActionStates, InputAction};
use super::{DrawList, Viewport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Top-left corner of the visible region in world pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

impl Camera2D {
    /// Centres the view on `target`, then clamps so the view never shows
    /// anything outside `0..world_size`. A world smaller than the view is
    /// pinned to the top-left.
    pub fn follow(&mut self, target: Vec2, viewport: Viewport, world_size: Vec2) {
        let view_w = viewport.width as f32;
        let view_h = viewport.height as f32;
        let max_x = (world_size.x - view_w).max(0.0);
        let max_y = (world_size.y - view_h).max(0.0);
        self.position = Vec2 {
            x: (target.x - view_w * 0.5).clamp(0.0, max_x),
            y: (target.y - view_h * 0.5).clamp(0.0, max_y),
        };
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    right_mouse_down: bool,
    right_click_pressed: bool,
    viewport: Viewport,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        right_mouse_down: bool,
        right_click_pressed: bool,
        viewport: Viewport,
    ) -> Self {
        Self {
            actions,
            cursor_position_px,
            right_mouse_down,
            right_click_pressed,
            viewport,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// True only on the first tick after the action went down.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_right_mouse_down(mut self, right_mouse_down: bool) -> Self {
        self.right_click_pressed = right_mouse_down && !self.right_mouse_down;
        self.right_mouse_down = right_mouse_down;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Cursor in internal-resolution pixels, `None` while outside the window.
    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn right_mouse_down(&self) -> bool {
        self.right_mouse_down
    }

    pub fn right_click_pressed(&self) -> bool {
        self.right_click_pressed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self, draw_list: &mut DrawList);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    /// Extra lines for the F3 overlay.
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
}
