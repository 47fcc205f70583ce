use super::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn from_sign(value: f32) -> Option<Self> {
        if value < 0.0 {
            Some(Self::Left)
        } else if value > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// Sprites are authored facing right.
    pub fn flips_sprite(self) -> bool {
        self == Self::Left
    }
}

/// Logical animation an entity is in. The renderer turns a key plus frame
/// index into a sprite key such as `player/run/02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerClimb,
    PlayerDash,
    BossAttack,
    BossIdle,
    MeleeSlash,
    RangedPlant,
}

impl AnimationKey {
    pub const ALL: [AnimationKey; 9] = [
        Self::PlayerIdle,
        Self::PlayerRun,
        Self::PlayerJump,
        Self::PlayerClimb,
        Self::PlayerDash,
        Self::BossAttack,
        Self::BossIdle,
        Self::MeleeSlash,
        Self::RangedPlant,
    ];

    pub fn sprite_dir(self) -> &'static str {
        match self {
            Self::PlayerIdle => "player/idle",
            Self::PlayerRun => "player/run",
            Self::PlayerJump => "player/jump",
            Self::PlayerClimb => "player/climb",
            Self::PlayerDash => "player/dash",
            Self::BossAttack => "boss/attack",
            Self::BossIdle => "boss/idle",
            Self::MeleeSlash => "attack/melee",
            Self::RangedPlant => "attack/ranged",
        }
    }

    /// Number of distinct images on disk. Logical frame indices wrap onto
    /// these, so the boss idle cycle can be longer than its two images.
    pub fn sprite_frames(self) -> u32 {
        match self {
            Self::PlayerIdle => 4,
            Self::PlayerRun => 8,
            Self::PlayerJump => 1,
            Self::PlayerClimb => 4,
            Self::PlayerDash => 1,
            Self::BossAttack => 33,
            Self::BossIdle => 2,
            Self::MeleeSlash => 6,
            Self::RangedPlant => 16,
        }
    }

    pub fn sprite_key(self, frame: u32) -> String {
        let image = frame % self.sprite_frames();
        format!("{}/{image:02}", self.sprite_dir())
    }

    /// Every sprite key this animation can produce, for preloading.
    pub fn sprite_keys(self) -> impl Iterator<Item = String> {
        (0..self.sprite_frames()).map(move |frame| self.sprite_key(frame))
    }
}

/// Loops a keyed animation at a fixed tick rate, restarting when the key
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    key: AnimationKey,
    frame: u32,
    timer: u32,
}

impl AnimationClock {
    pub fn new(key: AnimationKey) -> Self {
        Self {
            key,
            frame: 0,
            timer: 0,
        }
    }

    pub fn advance(&mut self, key: AnimationKey, ticks_per_frame: u32) {
        if key != self.key {
            *self = Self::new(key);
            return;
        }
        self.timer += 1;
        if self.timer >= ticks_per_frame.max(1) {
            self.timer = 0;
            self.frame = (self.frame + 1) % key.sprite_frames();
        }
    }

    pub fn key(&self) -> AnimationKey {
        self.key
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }
}

/// Everything the renderer needs to draw one entity this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub animation: AnimationKey,
    pub frame: u32,
    pub sprite_rect: Rect,
    pub facing: Facing,
    pub visible: bool,
    pub flash: bool,
}

impl Pose {
    pub fn sprite_key(&self) -> String {
        self.animation.sprite_key(self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_keys_wrap_onto_available_images() {
        assert_eq!(AnimationKey::PlayerRun.sprite_key(2), "player/run/02");
        assert_eq!(AnimationKey::BossAttack.sprite_key(17), "boss/attack/17");
        assert_eq!(AnimationKey::BossIdle.sprite_key(7), "boss/idle/01");
        assert_eq!(AnimationKey::RangedPlant.sprite_keys().count(), 16);
    }

    #[test]
    fn clock_restarts_on_key_change() {
        let mut clock = AnimationClock::new(AnimationKey::PlayerRun);
        for _ in 0..10 {
            clock.advance(AnimationKey::PlayerRun, 5);
        }
        assert_eq!(clock.frame(), 2);

        clock.advance(AnimationKey::PlayerJump, 5);
        assert_eq!(clock.key(), AnimationKey::PlayerJump);
        assert_eq!(clock.frame(), 0);
    }

    #[test]
    fn facing_keeps_last_direction_on_zero() {
        assert_eq!(Facing::from_sign(-3.0), Some(Facing::Left));
        assert_eq!(Facing::from_sign(0.0), None);
        assert!(Facing::Left.flips_sprite());
    }
}
