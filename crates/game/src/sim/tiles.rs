use std::collections::HashMap;

use engine::Vec2;

use super::geometry::Rect;

/// One solid (or tagged) cell of level geometry. Never mutated after load.
pub type TileRect = Rect;

const SOLID_GLYPH: char = '#';
const BOOSTED_JUMP_GLYPH: char = '^';
const PLAYER_SPAWN_GLYPH: char = 'P';
const BOSS_SPAWN_GLYPH: char = 'B';

/// Static lookup of solid rectangles plus the non-solid regions tagged for the
/// boosted jump. Built once at level load and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct TileCollisionIndex {
    cell_size: f32,
    solids: Vec<TileRect>,
    boosted: Vec<TileRect>,
    solid_cells: HashMap<(i32, i32), Vec<usize>>,
    bounds: Rect,
}

impl TileCollisionIndex {
    /// `cell_size` is the bucket size of the lookup grid; tiles may span
    /// several buckets. `bounds` is the playable level rectangle.
    pub fn new(cell_size: f32, bounds: Rect, solids: Vec<TileRect>, boosted: Vec<TileRect>) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            32.0
        };
        let mut solid_cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (index, tile) in solids.iter().enumerate() {
            for cell in cells_covering(tile, cell_size) {
                solid_cells.entry(cell).or_default().push(index);
            }
        }
        Self {
            cell_size,
            solids,
            boosted,
            solid_cells,
            bounds,
        }
    }

    /// Every solid tile that strictly overlaps `rect`, in load order.
    pub fn rects_overlapping(&self, rect: &Rect) -> Vec<TileRect> {
        let mut indices: Vec<usize> = cells_covering(rect, self.cell_size)
            .filter_map(|cell| self.solid_cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|index| self.solids[index])
            .filter(|tile| tile.overlaps(rect))
            .collect()
    }

    pub fn any_overlapping(&self, rect: &Rect) -> bool {
        cells_covering(rect, self.cell_size)
            .filter_map(|cell| self.solid_cells.get(&cell))
            .flatten()
            .any(|index| self.solids[*index].overlaps(rect))
    }

    pub fn boosted_overlapping(&self, rect: &Rect) -> bool {
        self.boosted.iter().any(|region| region.overlaps(rect))
    }

    pub fn solids(&self) -> &[TileRect] {
        &self.solids
    }

    pub fn boosted_regions(&self) -> &[TileRect] {
        &self.boosted
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

fn cells_covering(rect: &Rect, cell_size: f32) -> impl Iterator<Item = (i32, i32)> {
    let min_x = (rect.left() / cell_size).floor() as i32;
    let max_x = (rect.right() / cell_size).ceil() as i32 - 1;
    let min_y = (rect.top() / cell_size).floor() as i32;
    let max_y = (rect.bottom() / cell_size).ceil() as i32 - 1;
    (min_y..=max_y.max(min_y)).flat_map(move |cy| (min_x..=max_x.max(min_x)).map(move |cx| (cx, cy)))
}

/// Level geometry plus the spawn points found in the layout.
#[derive(Debug, Clone)]
pub struct Level {
    pub tiles: TileCollisionIndex,
    pub player_spawn: Vec2,
    pub boss_spawn: Vec2,
}

impl Level {
    /// Builds a level from text rows: `#` solid, `^` boosted-jump region,
    /// `P` player spawn and `B` boss spawn (top-left of their cell). Any other
    /// character is empty space. Missing spawns fall back to the top-left
    /// cell for the player and the top-right cell for the boss.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Self {
        let tile_size = if tile_size.is_finite() && tile_size > 0.0 {
            tile_size
        } else {
            32.0
        };
        let mut solids = Vec::new();
        let mut boosted = Vec::new();
        let mut player_spawn = None;
        let mut boss_spawn = None;
        let mut columns = 0usize;

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            columns = columns.max(row.chars().count());
            for (column_index, glyph) in row.chars().enumerate() {
                let cell = Rect::new(
                    column_index as f32 * tile_size,
                    row_index as f32 * tile_size,
                    tile_size,
                    tile_size,
                );
                match glyph {
                    SOLID_GLYPH => solids.push(cell),
                    BOOSTED_JUMP_GLYPH => boosted.push(cell),
                    PLAYER_SPAWN_GLYPH => player_spawn = Some(Vec2 { x: cell.x, y: cell.y }),
                    BOSS_SPAWN_GLYPH => boss_spawn = Some(Vec2 { x: cell.x, y: cell.y }),
                    _ => {}
                }
            }
        }

        let bounds = Rect::new(
            0.0,
            0.0,
            columns as f32 * tile_size,
            rows.len() as f32 * tile_size,
        );
        let fallback_boss = Vec2 {
            x: (bounds.width - tile_size).max(0.0),
            y: 0.0,
        };
        Self {
            tiles: TileCollisionIndex::new(tile_size, bounds, solids, boosted),
            player_spawn: player_spawn.unwrap_or_default(),
            boss_spawn: boss_spawn.unwrap_or(fallback_boss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_glyphs_become_tiles_and_spawns() {
        let level = Level::from_rows(&["P..B", "..^.", "####"], 32.0);

        assert_eq!(level.tiles.solids().len(), 4);
        assert_eq!(level.tiles.boosted_regions().len(), 1);
        assert_eq!(level.player_spawn, Vec2 { x: 0.0, y: 0.0 });
        assert_eq!(level.boss_spawn, Vec2 { x: 96.0, y: 0.0 });
        assert_eq!(level.tiles.bounds(), Rect::new(0.0, 0.0, 128.0, 96.0));
    }

    #[test]
    fn overlap_query_returns_only_touching_solids() {
        let level = Level::from_rows(&["....", "#..#", "####"], 32.0);
        let probe = Rect::new(20.0, 40.0, 20.0, 20.0);

        let hits = level.tiles.rects_overlapping(&probe);
        assert_eq!(hits, vec![Rect::new(0.0, 32.0, 32.0, 32.0)]);
        assert!(level.tiles.any_overlapping(&probe));
    }

    #[test]
    fn empty_result_is_valid() {
        let level = Level::from_rows(&["....", "####"], 32.0);
        let probe = Rect::new(10.0, 0.0, 20.0, 31.0);

        assert!(level.tiles.rects_overlapping(&probe).is_empty());
        assert!(!level.tiles.any_overlapping(&probe));
    }

    #[test]
    fn query_spanning_cells_does_not_duplicate_wide_tiles() {
        let wide = Rect::new(0.0, 64.0, 128.0, 32.0);
        let index = TileCollisionIndex::new(
            32.0,
            Rect::new(0.0, 0.0, 128.0, 96.0),
            vec![wide],
            Vec::new(),
        );
        let probe = Rect::new(10.0, 60.0, 90.0, 10.0);

        assert_eq!(index.rects_overlapping(&probe), vec![wide]);
    }

    #[test]
    fn boosted_regions_are_not_solid() {
        let level = Level::from_rows(&["^^", "##"], 32.0);
        let probe = Rect::new(4.0, 4.0, 10.0, 10.0);

        assert!(level.tiles.boosted_overlapping(&probe));
        assert!(!level.tiles.any_overlapping(&probe));
    }

    #[test]
    fn missing_spawns_fall_back_to_corners() {
        let level = Level::from_rows(&["....", "####"], 16.0);

        assert_eq!(level.player_spawn, Vec2 { x: 0.0, y: 0.0 });
        assert_eq!(level.boss_spawn, Vec2 { x: 48.0, y: 0.0 });
    }
}
