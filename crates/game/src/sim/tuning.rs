use serde::{Deserialize, Serialize};

use super::combat::HitPrecision;

pub const MIN_SPEED_MULTIPLIER: f32 = 0.5;
pub const MAX_SPEED_MULTIPLIER: f32 = 3.0;

/// Every gameplay constant in one immutable value, handed to the world at
/// construction. Loaded from the `tuning` section of the game config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub boss: BossTuning,
    pub combat: CombatTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsTuning {
    pub tile_size: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub wall_probe_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            gravity: 0.8,
            max_fall_speed: 20.0,
            wall_probe_margin: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    pub max_hp: u32,
    pub move_speed: f32,
    pub speed_multiplier: f32,
    pub small_jump_impulse: f32,
    pub big_jump_impulse: f32,
    pub jump_lockout_ticks: u32,
    pub allow_double_jump: bool,
    pub climb_speed: f32,
    pub dash_speed: f32,
    pub dash_duration_ticks: u32,
    pub dash_cooldown_ticks: u32,
    pub invulnerability_ticks: u32,
    pub knockback_decay: f32,
    pub exp_per_hit: u32,
    pub exp_per_kill: u32,
    pub exp_needed: u32,
    pub exp_growth: f32,
    pub ticks_per_anim_frame: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            sprite_width: 64.0,
            sprite_height: 80.0,
            hitbox_width: 38.0,
            hitbox_height: 72.0,
            max_hp: 20,
            move_speed: 5.0,
            speed_multiplier: 1.0,
            small_jump_impulse: -12.0,
            big_jump_impulse: -15.0,
            jump_lockout_ticks: 15,
            allow_double_jump: false,
            climb_speed: 4.0,
            dash_speed: 22.0,
            dash_duration_ticks: 12,
            dash_cooldown_ticks: 50,
            invulnerability_ticks: 60,
            knockback_decay: 0.8,
            exp_per_hit: 2,
            exp_per_kill: 50,
            exp_needed: 100,
            exp_growth: 1.2,
            ticks_per_anim_frame: 5,
        }
    }
}

/// How the boss moves sideways, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BossMovement {
    #[default]
    Static,
    /// Walks toward the player when further than `max` and away when closer
    /// than `min`, measured between hitbox centres on the x axis.
    KeepDistance { min: f32, max: f32, speed: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BossTuning {
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    pub max_hp: u32,
    pub attack_frames: u32,
    pub idle_frames: u32,
    pub attack_cadence: u32,
    pub idle_cadence: u32,
    pub hit_flash_ticks: u32,
    pub hit_invulnerability_ticks: u32,
    pub contact_damage: u32,
    pub contact_knockback: f32,
    pub contact_precision: HitPrecision,
    pub movement: BossMovement,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            sprite_width: 192.0,
            sprite_height: 192.0,
            hitbox_width: 192.0,
            hitbox_height: 192.0,
            max_hp: 50,
            attack_frames: 33,
            idle_frames: 20,
            attack_cadence: 15,
            idle_cadence: 45,
            hit_flash_ticks: 5,
            hit_invulnerability_ticks: 60,
            contact_damage: 2,
            contact_knockback: 15.0,
            contact_precision: HitPrecision::PixelMask,
            movement: BossMovement::Static,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatTuning {
    pub melee_width: f32,
    pub melee_height: f32,
    pub melee_ticks: u32,
    pub melee_damage: u32,
    pub melee_precision: HitPrecision,
    pub ranged_width: f32,
    pub ranged_height: f32,
    pub ranged_speed: f32,
    pub ranged_max_ticks: u32,
    pub ranged_max_travel: f32,
    pub ranged_damage: u32,
    pub ranged_precision: HitPrecision,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_width: 80.0,
            melee_height: 80.0,
            melee_ticks: 12,
            melee_damage: 1,
            melee_precision: HitPrecision::PixelMask,
            ranged_width: 80.0,
            ranged_height: 80.0,
            ranged_speed: 160.0 / 60.0,
            ranged_max_ticks: 60,
            ranged_max_travel: 160.0,
            ranged_damage: 1,
            ranged_precision: HitPrecision::Rect,
        }
    }
}

impl Tuning {
    /// Clamps values that would break the simulation instead of rejecting
    /// the config. Returns the adjusted copy.
    pub fn sanitized(mut self) -> Self {
        let physics = &mut self.physics;
        if !(physics.tile_size.is_finite() && physics.tile_size > 0.0) {
            physics.tile_size = PhysicsTuning::default().tile_size;
        }
        // A fall faster than one tile per tick could skip a floor.
        physics.max_fall_speed = physics
            .max_fall_speed
            .clamp(0.0, (physics.tile_size - 1.0).max(0.0));
        physics.wall_probe_margin = physics.wall_probe_margin.max(0.0);

        let player = &mut self.player;
        player.speed_multiplier = player
            .speed_multiplier
            .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
        player.max_hp = player.max_hp.max(1);
        player.knockback_decay = player.knockback_decay.clamp(0.0, 0.99);
        player.exp_needed = player.exp_needed.max(1);
        player.exp_growth = player.exp_growth.max(1.0);
        player.ticks_per_anim_frame = player.ticks_per_anim_frame.max(1);

        let boss = &mut self.boss;
        boss.max_hp = boss.max_hp.max(1);
        boss.attack_frames = boss.attack_frames.max(1);
        boss.idle_frames = boss.idle_frames.max(1);
        boss.attack_cadence = boss.attack_cadence.max(1);
        boss.idle_cadence = boss.idle_cadence.max(1);
        if let BossMovement::KeepDistance { min, max, speed } = boss.movement {
            let min = min.max(0.0);
            boss.movement = BossMovement::KeepDistance {
                min,
                max: max.max(min),
                speed: speed.abs(),
            };
        }

        self.combat.melee_ticks = self.combat.melee_ticks.max(1);
        self.combat.ranged_max_ticks = self.combat.ranged_max_ticks.max(1);
        self
    }
}
