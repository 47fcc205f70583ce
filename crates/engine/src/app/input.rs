#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    Dash,
    Melee,
    Restart,
}

const ACTION_COUNT: usize = 8;

/// Held state per action plus a press edge that survives until the next tick
/// snapshot consumes it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::MoveUp => 2,
            InputAction::MoveDown => 3,
            InputAction::Jump => 4,
            InputAction::Dash => 5,
            InputAction::Melee => 6,
            InputAction::Restart => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_set_only_on_transition() {
        let mut states = ActionStates::default();
        states.set(InputAction::Jump, true);
        assert!(states.was_pressed(InputAction::Jump));

        states.clear_pressed();
        states.set(InputAction::Jump, true);
        assert!(states.is_down(InputAction::Jump));
        assert!(!states.was_pressed(InputAction::Jump));
    }

    #[test]
    fn release_keeps_pending_edge_until_cleared() {
        let mut states = ActionStates::default();
        states.set(InputAction::Restart, true);
        states.set(InputAction::Restart, false);

        assert!(!states.is_down(InputAction::Restart));
        assert!(states.was_pressed(InputAction::Restart));
    }
}
