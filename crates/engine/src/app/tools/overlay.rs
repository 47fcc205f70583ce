use crate::app::rendering::raster::{fill_rect, outline_rect, PixelRect};
use crate::app::rendering::text::{draw_text, line_height_px, text_width_px};
use crate::app::LoopMetricsSnapshot;

const TEXT_SCALE: i32 = 2;
const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const PAUSE_TEXT_SCALE: i32 = 6;
const PAUSE_SHADE_COLOR: [u8; 4] = [0, 0, 0, 120];
const PAUSE_TEXT: &str = "PAUSED";
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
    pub paused: bool,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_px = lines
        .iter()
        .map(|line| text_width_px(line, TEXT_SCALE))
        .max()
        .unwrap_or(0);
    let panel = PixelRect {
        left: OVERLAY_PADDING - OVERLAY_PANEL_INSET_X,
        top: OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y,
        width: longest_line_px + OVERLAY_PANEL_INSET_X * 2,
        height: lines.len() as i32 * line_height_px(TEXT_SCALE) + OVERLAY_PANEL_INSET_Y * 2,
    };
    fill_rect(frame, width, height, panel, OVERLAY_PANEL_BG_COLOR);
    outline_rect(frame, width, height, panel, OVERLAY_PANEL_BORDER_COLOR);

    let mut y = OVERLAY_PADDING;
    for line in &lines {
        let color = overlay_line_color(line);
        draw_text(
            frame,
            width,
            height,
            OVERLAY_PADDING,
            y,
            line,
            color,
            TEXT_SCALE,
        );
        y += line_height_px(TEXT_SCALE);
    }
}

/// Dims the whole frame and centres a pause caption over it.
pub(crate) fn draw_pause_banner(frame: &mut [u8], width: u32, height: u32) {
    let screen = PixelRect {
        left: 0,
        top: 0,
        width: width as i32,
        height: height as i32,
    };
    fill_rect(frame, width, height, screen, PAUSE_SHADE_COLOR);
    let text_width = text_width_px(PAUSE_TEXT, PAUSE_TEXT_SCALE);
    let x = (width as i32 - text_width) / 2;
    let y = (height as i32 - line_height_px(PAUSE_TEXT_SCALE)) / 2;
    draw_text(
        frame,
        width,
        height,
        x,
        y,
        PAUSE_TEXT,
        OVERLAY_TEXT_PRIMARY_COLOR,
        PAUSE_TEXT_SCALE,
    );
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!("TPS: {:.1}", data.metrics.tps),
        format!(
            "Frame: {:.2} ms (max {:.1})",
            data.metrics.frame_time_ms, data.metrics.worst_frame_time_ms
        ),
    ];
    if data.metrics.dropped_backlog_ms > 0.0 {
        lines.push(format!("Dropped: {:.0} ms", data.metrics.dropped_backlog_ms));
    }
    if data.paused {
        lines.push("Sim: paused".to_string());
    }
    if !data.scene_lines.is_empty() {
        lines.push(String::new());
        lines.push(SCENE_SECTION_LABEL.to_string());
        lines.extend(data.scene_lines.iter().cloned());
    }
    lines
}

fn overlay_line_color(line: &str) -> [u8; 4] {
    if line == PERF_SECTION_LABEL || line == SCENE_SECTION_LABEL {
        OVERLAY_TEXT_PRIMARY_COLOR
    } else {
        OVERLAY_TEXT_DIM_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    };
    if slow_frame_delay_ms > 0 {
        format!("FPS: {current_fps:.1} (cap {cap_text}, slow {slow_frame_delay_ms} ms)")
    } else {
        format!("FPS: {current_fps:.1} (cap {cap_text})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot {
                fps: 59.94,
                tps: 60.0,
                frame_time_ms: 16.7,
                worst_frame_time_ms: 21.0,
                dropped_backlog_ms: 0.0,
            },
            render_fps_cap: None,
            slow_frame_delay_ms: 0,
            paused: false,
            scene_lines: Vec::new(),
        }
    }

    #[test]
    fn fps_line_formats_cap_and_slow_delay() {
        assert_eq!(format_fps_line(59.94, None, 0), "FPS: 59.9 (cap off)");
        assert_eq!(
            format_fps_line(30.0, Some(60), 12),
            "FPS: 30.0 (cap 60, slow 12 ms)"
        );
    }

    #[test]
    fn scene_section_only_present_with_scene_lines() {
        let lines = build_overlay_lines(&data());
        assert!(!lines.iter().any(|line| line == SCENE_SECTION_LABEL));

        let mut with_scene = data();
        with_scene.scene_lines = vec!["pos: 10,20".to_string()];
        let lines = build_overlay_lines(&with_scene);
        assert_eq!(lines[lines.len() - 2], SCENE_SECTION_LABEL);
        assert_eq!(lines[lines.len() - 1], "pos: 10,20");
    }

    #[test]
    fn dropped_backlog_and_pause_get_their_own_lines() {
        let mut busy = data();
        busy.metrics.dropped_backlog_ms = 120.0;
        busy.paused = true;
        let lines = build_overlay_lines(&busy);
        assert!(lines.contains(&"Dropped: 120 ms".to_string()));
        assert!(lines.contains(&"Sim: paused".to_string()));
    }

    #[test]
    fn draw_overlay_writes_backing_plate_pixels() {
        let (width, height) = (200u32, 200u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        draw_overlay(&mut frame, width, height, &data());

        let panel_left = (OVERLAY_PADDING - OVERLAY_PANEL_INSET_X) as u32;
        let panel_top = (OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y) as u32;
        let offset = ((panel_top + 1) * width + panel_left + 1) as usize * 4;
        assert_eq!(frame[offset + 3], 255);
        assert!(frame[offset] > 0);
    }

    #[test]
    fn tiny_viewports_never_panic() {
        for (width, height) in [(0u32, 0u32), (1, 1), (3, 2)] {
            let mut frame = vec![0u8; (width * height * 4) as usize];
            draw_overlay(&mut frame, width, height, &data());
            draw_pause_banner(&mut frame, width, height);
        }
    }
}
