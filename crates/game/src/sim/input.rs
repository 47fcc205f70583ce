use engine::Vec2;

/// Held state of every gameplay control for one tick, plus the aim point in
/// world coordinates. Edges are derived by the controllers from the previous
/// tick's held state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub dash: bool,
    pub melee: bool,
    pub ranged: bool,
    pub aim: Option<Vec2>,
}

impl TickInput {
    /// -1, 0 or 1. Opposite directions cancel out.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// -1 for up, 1 for down (y grows downward).
    pub fn vertical(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Rising edges of the edge-triggered controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct InputEdges {
    pub jump: bool,
    pub melee: bool,
    pub ranged: bool,
}

impl InputEdges {
    pub fn between(previous: &TickInput, current: &TickInput) -> Self {
        Self {
            jump: current.jump && !previous.jump,
            melee: current.melee && !previous.melee,
            ranged: current.ranged && !previous.ranged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions_cancel() {
        let input = TickInput {
            left: true,
            right: true,
            ..TickInput::default()
        };
        assert_eq!(input.horizontal(), 0.0);
        assert_eq!(
            TickInput {
                up: true,
                ..TickInput::default()
            }
            .vertical(),
            -1.0
        );
    }

    #[test]
    fn edges_fire_only_on_press() {
        let idle = TickInput::default();
        let held = TickInput {
            jump: true,
            melee: true,
            ..TickInput::default()
        };

        let pressed = InputEdges::between(&idle, &held);
        assert!(pressed.jump && pressed.melee && !pressed.ranged);
        assert_eq!(InputEdges::between(&held, &held), InputEdges::default());
    }
}
