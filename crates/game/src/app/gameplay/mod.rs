mod hud;

use engine::{
    screen_to_world, Camera2D, DrawList, DrawSpace, InputAction, InputSnapshot, Scene,
    SceneCommand, Vec2, Viewport,
};
use tracing::{debug, info};

use crate::sim::{Outcome, Pose, Rect, SimEvent, TickInput, World};

const CLEAR_COLOR: [u8; 4] = [22, 24, 34, 255];
const SOLID_TILE_COLOR: [u8; 4] = [70, 78, 96, 255];
const SOLID_TILE_EDGE_COLOR: [u8; 4] = [96, 106, 128, 255];
const BOOSTED_TILE_COLOR: [u8; 4] = [60, 200, 140, 90];

/// Drives one boss encounter: turns engine input into simulation input, steps
/// the world and turns its poses back into draw commands.
pub(crate) struct GameplayScene {
    world: World,
    camera: Camera2D,
    viewport: Viewport,
}

impl GameplayScene {
    pub(crate) fn new(world: World, viewport: Viewport) -> Self {
        let mut scene = Self {
            world,
            camera: Camera2D::default(),
            viewport,
        };
        scene.follow_player();
        scene
    }

    fn tick_input(&self, input: &InputSnapshot) -> TickInput {
        let ranged = input.right_mouse_down();
        let aim = if ranged {
            input
                .cursor_position_px()
                .map(|cursor| screen_to_world(cursor, &self.camera))
        } else {
            None
        };
        TickInput {
            left: input.is_down(InputAction::MoveLeft),
            right: input.is_down(InputAction::MoveRight),
            up: input.is_down(InputAction::MoveUp),
            down: input.is_down(InputAction::MoveDown),
            jump: input.is_down(InputAction::Jump),
            dash: input.is_down(InputAction::Dash),
            melee: input.is_down(InputAction::Melee),
            ranged,
            aim,
        }
    }

    fn follow_player(&mut self) {
        let target = self.world.player().body.hitbox.center();
        let bounds = self.world.level().tiles.bounds();
        self.camera.follow(
            target,
            self.viewport,
            Vec2::new(bounds.right(), bounds.bottom()),
        );
    }

    fn view_rect(&self) -> Rect {
        Rect::new(
            self.camera.position.x,
            self.camera.position.y,
            self.viewport.width as f32,
            self.viewport.height as f32,
        )
    }

    fn draw_tiles(&self, draw_list: &mut DrawList) {
        let view = self.view_rect();
        let tiles = &self.world.level().tiles;
        for tile in tiles.solids().iter().filter(|tile| tile.overlaps(&view)) {
            let position = Vec2::new(tile.x, tile.y);
            let size = Vec2::new(tile.width, tile.height);
            draw_list.rect(position, size, SOLID_TILE_COLOR, DrawSpace::World);
            draw_list.outline(position, size, SOLID_TILE_EDGE_COLOR, DrawSpace::World);
        }
        for region in tiles
            .boosted_regions()
            .iter()
            .filter(|region| region.overlaps(&view))
        {
            draw_list.rect(
                Vec2::new(region.x, region.y),
                Vec2::new(region.width, region.height),
                BOOSTED_TILE_COLOR,
                DrawSpace::World,
            );
        }
    }
}

fn draw_pose(draw_list: &mut DrawList, pose: Option<Pose>) {
    let Some(pose) = pose.filter(|pose| pose.visible) else {
        return;
    };
    let rect = pose.sprite_rect;
    draw_list.sprite(
        pose.sprite_key(),
        Vec2::new(rect.x, rect.y),
        Vec2::new(rect.width, rect.height),
        pose.facing.flips_sprite(),
        pose.flash,
    );
}

fn log_event(event: &SimEvent, tick: u64) {
    match event {
        SimEvent::LevelUp { level } => info!(tick, level, "player_level_up"),
        SimEvent::PhaseChanged { phase } => debug!(tick, phase = ?phase, "boss_phase_changed"),
        other => debug!(tick, event = ?other, "sim_event"),
    }
}

impl Scene for GameplayScene {
    fn load(&mut self) {
        self.follow_player();
        let bounds = self.world.level().tiles.bounds();
        info!(
            level_width = bounds.width,
            level_height = bounds.height,
            solid_tiles = self.world.level().tiles.solids().len(),
            "arena_loaded"
        );
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.viewport = input.viewport();
        if self.world.outcome().is_some() {
            if input.was_pressed(InputAction::Restart) {
                self.world.restart();
                self.follow_player();
            }
            return SceneCommand::None;
        }

        let tick_input = self.tick_input(input);
        let tick = self.world.tick_count() + 1;
        for event in self.world.tick(&tick_input) {
            log_event(event, tick);
        }
        self.follow_player();
        SceneCommand::None
    }

    fn render(&self, draw_list: &mut DrawList) {
        draw_list.set_clear_color(CLEAR_COLOR);
        draw_list.set_camera(self.camera);
        self.draw_tiles(draw_list);

        let poses = self.world.poses();
        draw_pose(draw_list, poses.boss);
        draw_pose(draw_list, poses.player);
        draw_pose(draw_list, poses.attack);

        hud::draw_hud(draw_list, &self.world, self.viewport);
    }

    fn unload(&mut self) {
        info!(
            ticks = self.world.tick_count(),
            score = self.world.player().score,
            "arena_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        self.world.outcome().map(|outcome| match outcome {
            Outcome::Victory => "Floioide - Victory".to_string(),
            Outcome::Defeat => "Floioide - Defeated".to_string(),
        })
    }

    fn debug_lines(&self) -> Vec<String> {
        let player = self.world.player();
        let boss = self.world.boss();
        let hitbox = player.body.hitbox;
        let cell = self.world.level().tiles.cell_size();
        vec![
            format!("pos: {:.1}, {:.1}", hitbox.x, hitbox.y),
            format!(
                "tile: {}, {}",
                (hitbox.center().x / cell).floor() as i32,
                (hitbox.bottom() / cell).floor() as i32
            ),
            format!(
                "on_ground: {} on_wall: {}",
                player.body.on_ground, player.body.on_wall
            ),
            format!("state: {:?} attacking: {}", player.state(), player.is_attacking()),
            format!("dash cd: {}", player.dash_cooldown),
            format!("boss: {:?} hp {}/{}", boss.phase, boss.hp, boss.max_hp),
            format!("tick: {}", self.world.tick_count()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use engine::DrawCommand;

    use super::*;
    use crate::app::arena::build_arena;
    use crate::sim::{Level, MaskLibrary, Tuning};

    const VIEW: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    /// Player spawns inside the boss, so contact lands on the first tick.
    const TOUCHING: [&str; 10] = [
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        ".......PB...........",
        "####################",
    ];

    fn arena_scene() -> GameplayScene {
        let tuning = Tuning::default();
        let level = build_arena(tuning.physics.tile_size);
        GameplayScene::new(World::new(tuning, level, MaskLibrary::new()), VIEW)
    }

    fn touching_scene() -> GameplayScene {
        let mut tuning = Tuning::default();
        tuning.player.max_hp = 1;
        let level = Level::from_rows(&TOUCHING, 32.0);
        GameplayScene::new(World::new(tuning, level, MaskLibrary::new()), VIEW)
    }

    fn idle_input() -> InputSnapshot {
        InputSnapshot::empty().with_viewport(VIEW)
    }

    #[test]
    fn held_actions_map_to_tick_input() {
        let scene = arena_scene();
        let input = idle_input()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::Jump, true)
            .with_action_down(InputAction::Melee, true);

        let tick_input = scene.tick_input(&input);

        assert!(tick_input.left && tick_input.jump && tick_input.melee);
        assert!(!tick_input.right && !tick_input.dash && !tick_input.ranged);
        assert_eq!(tick_input.aim, None);
    }

    #[test]
    fn right_mouse_aims_at_cursor_in_world_space() {
        let mut scene = arena_scene();
        scene.camera.position = Vec2::new(100.0, 50.0);
        let cursor = Some(Vec2::new(10.0, 20.0));

        let aiming = idle_input()
            .with_cursor_position_px(cursor)
            .with_right_mouse_down(true);
        let tick_input = scene.tick_input(&aiming);
        assert!(tick_input.ranged);
        assert_eq!(tick_input.aim, Some(Vec2::new(110.0, 70.0)));

        let hovering = idle_input().with_cursor_position_px(cursor);
        let tick_input = scene.tick_input(&hovering);
        assert!(!tick_input.ranged);
        assert_eq!(tick_input.aim, None);
    }

    #[test]
    fn camera_stays_inside_arena() {
        let mut scene = arena_scene();
        scene.update(1.0 / 60.0, &idle_input());
        // The spawn sits in the bottom-left corner of a 1536x640 arena.
        assert_eq!(scene.camera.position, Vec2::new(0.0, 40.0));
    }

    #[test]
    fn restart_is_ignored_while_fighting() {
        let mut scene = arena_scene();
        let restart = idle_input().with_action_down(InputAction::Restart, true);
        scene.update(1.0 / 60.0, &restart);
        scene.update(1.0 / 60.0, &restart);
        assert_eq!(scene.world.tick_count(), 2);
    }

    #[test]
    fn restart_after_defeat_resets_the_world() {
        let mut scene = touching_scene();
        scene.update(1.0 / 60.0, &idle_input());
        assert_eq!(scene.world.outcome(), Some(Outcome::Defeat));
        assert!(scene.debug_title().is_some());

        scene.update(1.0 / 60.0, &idle_input());
        assert_eq!(scene.world.outcome(), Some(Outcome::Defeat));

        let restart = idle_input().with_action_down(InputAction::Restart, true);
        scene.update(1.0 / 60.0, &restart);
        assert_eq!(scene.world.outcome(), None);
        assert_eq!(scene.world.tick_count(), 0);
        assert_eq!(scene.world.player().hp, 1);
    }

    #[test]
    fn render_draws_tiles_actors_and_hud() {
        let scene = arena_scene();
        let mut draw_list = DrawList::new();
        scene.render(&mut draw_list);

        let sprite_keys: Vec<&str> = draw_list
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sprite { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sprite_keys.len(), 2);
        assert!(sprite_keys[0].starts_with("boss/"));
        assert!(sprite_keys[1].starts_with("player/"));
        assert!(draw_list.commands().iter().any(|command| matches!(
            command,
            DrawCommand::Rect {
                color: SOLID_TILE_COLOR,
                space: DrawSpace::World,
                ..
            }
        )));
        assert!(draw_list
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Text { .. })));
        assert_eq!(draw_list.clear_color(), CLEAR_COLOR);
    }

    #[test]
    fn debug_lines_report_contact_flags() {
        let scene = arena_scene();
        let lines = scene.debug_lines();
        assert!(lines.iter().any(|line| line.starts_with("on_ground:")));
        assert!(lines.iter().any(|line| line.starts_with("dash cd:")));
        assert!(lines.iter().any(|line| line.starts_with("boss:")));
    }
}
