use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::tools::{draw_overlay, draw_pause_banner, OverlayData};
use crate::app::{DrawCommand, DrawList, Vec2};
use crate::assets::{load_sprite, LoadedImage};

use super::raster::{draw_sprite_scaled, fill_rect, outline_rect, PixelRect};
use super::text::draw_text;
use super::transform::to_screen;
use super::Viewport;

/// Fill colour for sprites whose image is missing or unreadable.
pub const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 50, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    sprites: SpriteCache,
}

impl Renderer {
    /// The framebuffer stays at `viewport` size; the surface follows the
    /// window and scales the framebuffer onto it.
    pub fn new(window: Arc<Window>, viewport: Viewport, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), viewport, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport,
            sprites: SpriteCache::new(asset_root),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), self.viewport, width, height)?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        viewport: Viewport,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(viewport.width.max(1), viewport.height.max(1), surface)
    }

    /// Maps a physical window position to framebuffer pixels, clamping
    /// positions in the letterbox onto the nearest edge.
    pub fn window_to_framebuffer(&self, x: f32, y: f32) -> Vec2 {
        let (px, py) = match self.pixels.window_pos_to_pixel((x, y)) {
            Ok((px, py)) => (px as f32, py as f32),
            Err((px, py)) => (px as f32, py as f32),
        };
        Vec2 { x: px, y: py }
    }

    pub(crate) fn render(
        &mut self,
        draw_list: &DrawList,
        overlay_data: Option<&OverlayData>,
        paused: bool,
    ) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let frame = self.pixels.frame_mut();
        rasterize(frame, self.viewport, draw_list, &mut self.sprites);
        if paused {
            draw_pause_banner(frame, width, height);
        }
        if let Some(data) = overlay_data {
            draw_overlay(frame, width, height, data);
        }
        self.pixels.render()
    }
}

/// Lazily loaded sprite images keyed by sprite key. Failed loads are cached
/// as `None` so a missing file is only looked up and reported once.
pub(crate) struct SpriteCache {
    asset_root: PathBuf,
    sprites: HashMap<String, Option<LoadedImage>>,
    warned_missing_sprite_keys: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            sprites: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        }
    }

    pub(crate) fn get(&mut self, key: &str) -> Option<&LoadedImage> {
        if !self.sprites.contains_key(key) {
            let sprite = match load_sprite(&self.asset_root, key) {
                Ok(sprite) => Some(sprite),
                Err(error) => {
                    self.warn_sprite_load_once(key, &error.to_string());
                    None
                }
            };
            self.sprites.insert(key.to_string(), sprite);
        }
        self.sprites.get(key).and_then(Option::as_ref)
    }

    fn warn_sprite_load_once(&mut self, key: &str, reason: &str) {
        if !self.warned_missing_sprite_keys.insert(key.to_string()) {
            return;
        }
        warn!(
            sprite_key = key,
            asset_root = %self.asset_root.display(),
            reason,
            "renderer_sprite_load_failed_using_placeholder"
        );
    }
}

pub(crate) fn rasterize(
    frame: &mut [u8],
    viewport: Viewport,
    draw_list: &DrawList,
    sprites: &mut SpriteCache,
) {
    let Viewport { width, height } = viewport;
    let clear_color = draw_list.clear_color();
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&clear_color);
    }
    let camera = draw_list.camera();

    for command in draw_list.commands() {
        match command {
            DrawCommand::Sprite {
                key,
                position,
                size,
                flip_x,
                flash,
                space,
            } => {
                let dst = pixel_rect(to_screen(*position, *space, &camera), *size);
                match sprites.get(key) {
                    Some(sprite) => {
                        draw_sprite_scaled(frame, width, height, dst, sprite, *flip_x, *flash)
                    }
                    None => fill_rect(frame, width, height, dst, PLACEHOLDER_COLOR),
                }
            }
            DrawCommand::Rect {
                position,
                size,
                color,
                filled,
                space,
            } => {
                let dst = pixel_rect(to_screen(*position, *space, &camera), *size);
                if *filled {
                    fill_rect(frame, width, height, dst, *color);
                } else {
                    outline_rect(frame, width, height, dst, *color);
                }
            }
            DrawCommand::Text {
                text,
                position,
                color,
                scale,
                space,
            } => {
                let (x, y) = to_screen(*position, *space, &camera);
                let scale = (*scale).min(i32::MAX as u32) as i32;
                draw_text(frame, width, height, x, y, text, *color, scale);
            }
        }
    }
}

fn pixel_rect((left, top): (i32, i32), size: Vec2) -> PixelRect {
    PixelRect {
        left,
        top,
        width: size.x.round() as i32,
        height: size.y.round() as i32,
    }
}
