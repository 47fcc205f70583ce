use engine::{DrawList, DrawSpace, Vec2, Viewport};

use crate::sim::{Outcome, World};

const MARGIN: f32 = 8.0;
const BAR_WIDTH: f32 = 160.0;
const BAR_HEIGHT: f32 = 8.0;
const ROW_STEP: f32 = 14.0;
const LABEL_WIDTH: f32 = 28.0;
const GLYPH_ADVANCE: f32 = 4.0;

const TEXT_COLOR: [u8; 4] = [235, 235, 240, 255];
const DIM_TEXT_COLOR: [u8; 4] = [150, 150, 160, 255];
const BAR_BACK_COLOR: [u8; 4] = [40, 40, 48, 220];
const BAR_FRAME_COLOR: [u8; 4] = [200, 200, 210, 255];
const HP_COLOR: [u8; 4] = [220, 60, 70, 255];
const EXP_COLOR: [u8; 4] = [90, 170, 250, 255];
const BOSS_HP_COLOR: [u8; 4] = [240, 150, 40, 255];
const BANNER_BACK_COLOR: [u8; 4] = [0, 0, 0, 170];
const VICTORY_COLOR: [u8; 4] = [250, 220, 90, 255];
const DEFEAT_COLOR: [u8; 4] = [240, 80, 80, 255];

pub(super) fn draw_hud(draw_list: &mut DrawList, world: &World, viewport: Viewport) {
    let player = world.player();
    let mut y = MARGIN;

    labelled_bar(draw_list, "HP", Vec2::new(MARGIN, y), fraction(player.hp, player.max_hp), HP_COLOR);
    y += ROW_STEP;
    labelled_bar(
        draw_list,
        "EXP",
        Vec2::new(MARGIN, y),
        fraction(player.exp, player.exp_needed),
        EXP_COLOR,
    );
    y += ROW_STEP;
    draw_list.text(
        format!("LV {}  SCORE {}", player.level, player.score),
        Vec2::new(MARGIN, y),
        TEXT_COLOR,
        1,
    );
    y += ROW_STEP;
    let (dash_text, dash_color) = dash_status(player.dash_cooldown);
    draw_list.text(dash_text, Vec2::new(MARGIN, y), dash_color, 1);

    let boss = world.boss();
    if !boss.is_dead {
        let left = viewport.width as f32 - MARGIN - LABEL_WIDTH - BAR_WIDTH;
        labelled_bar(
            draw_list,
            "BOSS",
            Vec2::new(left, MARGIN),
            fraction(boss.hp, boss.max_hp),
            BOSS_HP_COLOR,
        );
    }

    if let Some(outcome) = world.outcome() {
        draw_outcome_banner(draw_list, outcome, viewport);
    }
}

fn dash_status(cooldown_ticks: u32) -> (String, [u8; 4]) {
    if cooldown_ticks == 0 {
        ("DASH READY".to_string(), TEXT_COLOR)
    } else {
        (format!("DASH {cooldown_ticks}"), DIM_TEXT_COLOR)
    }
}

fn labelled_bar(draw_list: &mut DrawList, label: &str, position: Vec2, filled: f32, color: [u8; 4]) {
    draw_list.text(label, Vec2::new(position.x, position.y + 1.0), TEXT_COLOR, 1);
    let bar_position = Vec2::new(position.x + LABEL_WIDTH, position.y);
    draw_list.rect(bar_position, Vec2::new(BAR_WIDTH, BAR_HEIGHT), BAR_BACK_COLOR, DrawSpace::Screen);
    let fill_width = (BAR_WIDTH * filled).round();
    if fill_width > 0.0 {
        draw_list.rect(bar_position, Vec2::new(fill_width, BAR_HEIGHT), color, DrawSpace::Screen);
    }
    draw_list.outline(bar_position, Vec2::new(BAR_WIDTH, BAR_HEIGHT), BAR_FRAME_COLOR, DrawSpace::Screen);
}

fn draw_outcome_banner(draw_list: &mut DrawList, outcome: Outcome, viewport: Viewport) {
    let (title, color) = match outcome {
        Outcome::Victory => ("VICTORY", VICTORY_COLOR),
        Outcome::Defeat => ("DEFEATED", DEFEAT_COLOR),
    };
    let hint = "PRESS R TO RESTART";
    let title_scale = 4;
    let hint_scale = 2;
    let center_x = viewport.width as f32 * 0.5;
    let center_y = viewport.height as f32 * 0.5;

    draw_list.rect(
        Vec2::new(0.0, center_y - 40.0),
        Vec2::new(viewport.width as f32, 80.0),
        BANNER_BACK_COLOR,
        DrawSpace::Screen,
    );
    draw_list.text(
        title,
        Vec2::new(center_x - text_width(title, title_scale) * 0.5, center_y - 28.0),
        color,
        title_scale,
    );
    draw_list.text(
        hint,
        Vec2::new(center_x - text_width(hint, hint_scale) * 0.5, center_y + 8.0),
        TEXT_COLOR,
        hint_scale,
    );
}

fn text_width(text: &str, scale: u32) -> f32 {
    text.chars().count() as f32 * GLYPH_ADVANCE * scale as f32
}

fn fraction(current: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (current as f32 / max as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use engine::DrawCommand;

    use super::*;
    use crate::sim::{Level, MaskLibrary, Tuning};

    const VIEW: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    fn world() -> World {
        let rows = ["P......B", "########"];
        World::new(Tuning::default(), Level::from_rows(&rows, 32.0), MaskLibrary::new())
    }

    fn texts(draw_list: &DrawList) -> Vec<String> {
        draw_list
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn filled_widths(draw_list: &DrawList, color: [u8; 4]) -> Vec<f32> {
        draw_list
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect {
                    size,
                    color: c,
                    filled: true,
                    ..
                } if *c == color => Some(size.x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fresh_world_shows_full_bars_and_ready_dash() {
        let mut draw_list = DrawList::new();
        draw_hud(&mut draw_list, &world(), VIEW);

        let texts = texts(&draw_list);
        assert!(texts.contains(&"LV 1  SCORE 0".to_string()));
        assert!(texts.contains(&"DASH READY".to_string()));
        assert!(texts.contains(&"BOSS".to_string()));
        assert_eq!(filled_widths(&draw_list, HP_COLOR), vec![BAR_WIDTH]);
        assert_eq!(filled_widths(&draw_list, BOSS_HP_COLOR), vec![BAR_WIDTH]);
        assert!(filled_widths(&draw_list, EXP_COLOR).is_empty());
    }

    #[test]
    fn dash_cooldown_is_shown_in_ticks() {
        assert_eq!(dash_status(23).0, "DASH 23");
        assert_eq!(dash_status(0).0, "DASH READY");
    }

    #[test]
    fn fraction_handles_zero_and_overflow() {
        assert_eq!(fraction(5, 0), 0.0);
        assert_eq!(fraction(10, 20), 0.5);
        assert_eq!(fraction(30, 20), 1.0);
    }

    #[test]
    fn outcome_banner_includes_restart_hint() {
        let mut draw_list = DrawList::new();
        draw_outcome_banner(&mut draw_list, Outcome::Defeat, VIEW);
        let texts = texts(&draw_list);
        assert_eq!(texts, vec!["DEFEATED".to_string(), "PRESS R TO RESTART".to_string()]);
    }
}
