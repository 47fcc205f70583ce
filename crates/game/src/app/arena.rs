use crate::sim::Level;

/// The boss arena. A short pillar splits the floor: clear it from the
/// boosted pad or by climbing.
const ARENA_ROWS: [&str; 20] = [
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#.####.........................................#",
    "#..............................................#",
    "#..............................................#",
    "#.......#####..................................#",
    "#..............................................#",
    "#..............................................#",
    "#...............######.........................#",
    "#..............................................#",
    "#...#####......................................#",
    "#.............^................................#",
    "#.............#................................#",
    "#.............#................................#",
    "#.............#................................#",
    "#..P......^^^.#.......................B........#",
    "################################################",
    "################################################",
];

pub(crate) fn build_arena(tile_size: f32) -> Level {
    Level::from_rows(&ARENA_ROWS, tile_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Rect, Tuning};

    #[test]
    fn rows_share_one_width() {
        let width = ARENA_ROWS[0].len();
        assert!(ARENA_ROWS.iter().all(|row| row.len() == width));
    }

    #[test]
    fn arena_has_bounds_spawns_and_boost_pads() {
        let level = build_arena(32.0);
        let bounds = level.tiles.bounds();
        assert_eq!((bounds.width, bounds.height), (48.0 * 32.0, 20.0 * 32.0));
        assert_eq!(level.player_spawn.x, 3.0 * 32.0);
        assert_eq!(level.boss_spawn.x, 38.0 * 32.0);
        assert_eq!(level.tiles.boosted_regions().len(), 4);
    }

    #[test]
    fn default_actors_fit_at_their_spawns() {
        let tuning = Tuning::default();
        let level = build_arena(tuning.physics.tile_size);
        for (spawn, width, height) in [
            (
                level.player_spawn,
                tuning.player.hitbox_width,
                tuning.player.hitbox_height,
            ),
            (
                level.boss_spawn,
                tuning.boss.hitbox_width,
                tuning.boss.hitbox_height,
            ),
        ] {
            let size = tuning.physics.tile_size;
            let cell_bottom = spawn.y + size;
            let hitbox = Rect::new(
                spawn.x + size * 0.5 - width * 0.5,
                cell_bottom - height,
                width,
                height,
            );
            assert!(!level.tiles.any_overlapping(&hitbox), "{hitbox:?}");
        }
    }
}
