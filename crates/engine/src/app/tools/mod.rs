mod overlay;

pub(crate) use overlay::{draw_overlay, draw_pause_banner, OverlayData};
