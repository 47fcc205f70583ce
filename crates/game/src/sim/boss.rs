use tracing::{debug, info};

use super::actor::{Actor, TickContext};
use super::animation::{AnimationKey, Facing, Pose};
use super::body::KinematicBody;
use super::combat::DamageOutcome;
use super::events::SimEvent;
use super::geometry::Rect;
use super::tuning::{BossMovement, BossTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPhase {
    Attacking,
    Idle,
}

impl BossPhase {
    fn flipped(self) -> Self {
        match self {
            Self::Attacking => Self::Idle,
            Self::Idle => Self::Attacking,
        }
    }

    pub fn animation(self) -> AnimationKey {
        match self {
            Self::Attacking => AnimationKey::BossAttack,
            Self::Idle => AnimationKey::BossIdle,
        }
    }
}

/// Two-phase boss. The frame sequence of the current phase plays at the
/// phase's cadence and a completed cycle hands over to the other phase.
#[derive(Debug, Clone)]
pub struct BossController {
    pub body: KinematicBody,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
    pub frame_index: u32,
    pub phase_timer: u32,
    pub anim_timer: u32,
    pub is_dead: bool,
    pub hit_flash: u32,
    pub hit_invulnerability: u32,
    pub facing: Facing,
    sprite_width: f32,
    sprite_height: f32,
}

impl BossController {
    pub fn new(hitbox: Rect, tuning: &BossTuning) -> Self {
        Self {
            body: KinematicBody::new(hitbox),
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            phase: BossPhase::Attacking,
            frame_index: 0,
            phase_timer: 0,
            anim_timer: 0,
            is_dead: false,
            hit_flash: 0,
            hit_invulnerability: 0,
            facing: Facing::Left,
            sprite_width: tuning.sprite_width,
            sprite_height: tuning.sprite_height,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Damage is dropped while dead or inside the post-hit window. Reaching
    /// zero hp kills the boss for good.
    pub fn take_damage(&mut self, amount: u32, tuning: &BossTuning) -> DamageOutcome {
        if self.is_dead || self.hit_invulnerability > 0 {
            return DamageOutcome::Ignored;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.hit_flash = tuning.hit_flash_ticks;
        self.hit_invulnerability = tuning.hit_invulnerability_ticks;
        if self.hp == 0 {
            self.is_dead = true;
            info!(phase = ?self.phase, frame = self.frame_index, "boss_defeated");
            DamageOutcome::Killed
        } else {
            debug!(hp = self.hp, "boss_hit");
            DamageOutcome::Hit
        }
    }

    pub fn sprite_rect(&self) -> Rect {
        let mut rect = Rect::new(0.0, 0.0, self.sprite_width, self.sprite_height);
        rect.set_bottom(self.body.hitbox.bottom());
        rect.x = self.body.hitbox.center().x - rect.width * 0.5;
        rect
    }

    fn cadence(&self, tuning: &BossTuning) -> u32 {
        match self.phase {
            BossPhase::Attacking => tuning.attack_cadence,
            BossPhase::Idle => tuning.idle_cadence,
        }
    }

    fn frame_count(&self, tuning: &BossTuning) -> u32 {
        match self.phase {
            BossPhase::Attacking => tuning.attack_frames,
            BossPhase::Idle => tuning.idle_frames,
        }
    }

    fn advance_animation(&mut self, tuning: &BossTuning, events: &mut Vec<SimEvent>) {
        self.phase_timer += 1;
        self.anim_timer += 1;
        if self.anim_timer < self.cadence(tuning).max(1) {
            return;
        }
        self.anim_timer = 0;
        self.frame_index += 1;
        if self.frame_index >= self.frame_count(tuning).max(1) {
            self.frame_index = 0;
            self.phase = self.phase.flipped();
            self.phase_timer = 0;
            debug!(phase = ?self.phase, "boss_phase_changed");
            events.push(SimEvent::PhaseChanged { phase: self.phase });
        }
    }

    fn steer(&mut self, ctx: &TickContext<'_>) {
        let physics = &ctx.tuning.physics;
        let dx = ctx.opponent.center().x - self.body.hitbox.center().x;
        if let Some(facing) = Facing::from_sign(dx) {
            self.facing = facing;
        }
        self.body.apply_gravity(physics.gravity, physics.max_fall_speed);

        match ctx.tuning.boss.movement {
            BossMovement::Static => {
                self.body.vx = 0.0;
                self.body.step_vertical(ctx.tiles);
            }
            BossMovement::KeepDistance { min, max, speed } => {
                let distance = dx.abs();
                let toward = dx.signum();
                self.body.vx = if distance > max {
                    toward * speed
                } else if distance < min {
                    -toward * speed
                } else {
                    0.0
                };
                self.body
                    .step_axis_separated(ctx.tiles, physics.wall_probe_margin);
            }
        }
    }
}

impl Actor for BossController {
    fn advance(&mut self, ctx: &TickContext<'_>, events: &mut Vec<SimEvent>) {
        if self.is_dead {
            return;
        }
        self.hit_invulnerability = self.hit_invulnerability.saturating_sub(1);
        self.hit_flash = self.hit_flash.saturating_sub(1);
        self.advance_animation(&ctx.tuning.boss, events);
        self.steer(ctx);
    }

    fn hurtbox(&self) -> Rect {
        self.body.hitbox
    }

    fn pose(&self) -> Option<Pose> {
        if self.is_dead {
            return None;
        }
        Some(Pose {
            animation: self.phase.animation(),
            frame: self.frame_index,
            sprite_rect: self.sprite_rect(),
            facing: self.facing,
            visible: true,
            flash: self.hit_flash > 0,
        })
    }
}
