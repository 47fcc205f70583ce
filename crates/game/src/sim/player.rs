use std::f32::consts::PI;

use engine::Vec2;
use tracing::debug;

use super::actor::{Actor, TickContext};
use super::animation::{AnimationClock, AnimationKey, Facing, Pose};
use super::body::KinematicBody;
use super::combat::{AttackHitbox, AttackKind, DamageOutcome};
use super::events::SimEvent;
use super::geometry::Rect;
use super::input::{InputEdges, TickInput};
use super::tiles::TileCollisionIndex;
use super::tuning::{CombatTuning, PlayerTuning};

const KNOCKBACK_REST: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Grounded,
    Airborne,
    WallClimbing,
    Dashing,
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    pub body: KinematicBody,
    pub hp: u32,
    pub max_hp: u32,
    pub facing: Facing,
    pub invulnerability: u32,
    pub dash_remaining: u32,
    pub dash_cooldown: u32,
    pub jump_lockout: u32,
    /// Ticks after a climb-jump during which the wall cannot be grabbed again.
    pub wall_regrab_lockout: u32,
    pub is_dashing: bool,
    pub is_climbing: bool,
    pub attack: Option<AttackHitbox>,
    pub air_jump_available: bool,
    pub knockback_vx: f32,
    pub exp: u32,
    pub exp_needed: u32,
    pub level: u32,
    pub score: u32,
    state: MovementState,
    anim: AnimationClock,
    previous_input: TickInput,
    sprite_size: Vec2,
}

impl PlayerController {
    pub fn new(hitbox: Rect, tuning: &PlayerTuning) -> Self {
        Self {
            body: KinematicBody::new(hitbox),
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            facing: Facing::Right,
            invulnerability: 0,
            dash_remaining: 0,
            dash_cooldown: 0,
            jump_lockout: 0,
            wall_regrab_lockout: 0,
            is_dashing: false,
            is_climbing: false,
            attack: None,
            air_jump_available: true,
            knockback_vx: 0.0,
            exp: 0,
            exp_needed: tuning.exp_needed,
            level: 1,
            score: 0,
            state: MovementState::Airborne,
            anim: AnimationClock::new(AnimationKey::PlayerIdle),
            previous_input: TickInput::default(),
            sprite_size: Vec2 {
                x: tuning.sprite_width,
                y: tuning.sprite_height,
            },
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn sprite_rect(&self) -> Rect {
        let mut rect = Rect::new(0.0, 0.0, self.sprite_size.x, self.sprite_size.y);
        rect.set_bottom(self.body.hitbox.bottom());
        rect.x = self.body.hitbox.center().x - rect.width * 0.5;
        rect
    }

    /// Applies a hit unless the player is still invulnerable from the last
    /// one. `knockback_vx` replaces any knockback already in progress.
    pub fn take_hit(&mut self, damage: u32, knockback_vx: f32, tuning: &PlayerTuning) -> DamageOutcome {
        if self.hp == 0 || self.invulnerability > 0 {
            return DamageOutcome::Ignored;
        }
        self.hp = self.hp.saturating_sub(damage);
        self.invulnerability = tuning.invulnerability_ticks;
        self.knockback_vx = knockback_vx;
        if self.hp == 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hit
        }
    }

    /// Adds experience, levelling up as many times as it covers. Each level
    /// restores full health.
    pub fn grant_exp(&mut self, amount: u32, tuning: &PlayerTuning, events: &mut Vec<SimEvent>) {
        self.exp = self.exp.saturating_add(amount);
        while self.exp >= self.exp_needed {
            self.exp -= self.exp_needed;
            self.level += 1;
            self.exp_needed = ((self.exp_needed as f32) * tuning.exp_growth).round().max(1.0) as u32;
            self.hp = self.max_hp;
            debug!(level = self.level, exp_needed = self.exp_needed, "player_level_up");
            events.push(SimEvent::LevelUp { level: self.level });
        }
    }

    /// Removes a projectile that connected. Melee swings stay out for their
    /// full duration.
    pub fn attack_landed(&mut self) {
        if matches!(self.attack, Some(AttackHitbox { kind: AttackKind::Ranged, .. })) {
            self.attack = None;
        }
    }

    pub fn attack_pose(&self, combat: &CombatTuning) -> Option<Pose> {
        let attack = self.attack.as_ref()?;
        let (animation, lifetime) = match attack.kind {
            AttackKind::Melee => (AnimationKey::MeleeSlash, combat.melee_ticks),
            AttackKind::Ranged => (AnimationKey::RangedPlant, combat.ranged_max_ticks),
        };
        let frames = animation.sprite_frames();
        let frame = (attack.elapsed_ticks * frames / lifetime.max(1)).min(frames - 1);
        Some(Pose {
            animation,
            frame,
            sprite_rect: attack.rect,
            facing: attack.facing(),
            visible: true,
            flash: false,
        })
    }

    fn tick_timers(&mut self) {
        self.invulnerability = self.invulnerability.saturating_sub(1);
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);
        self.jump_lockout = self.jump_lockout.saturating_sub(1);
        self.wall_regrab_lockout = self.wall_regrab_lockout.saturating_sub(1);
    }

    fn update_attack(&mut self, ctx: &TickContext<'_>, edges: InputEdges, events: &mut Vec<SimEvent>) {
        let combat = &ctx.tuning.combat;
        if let Some(attack) = self.attack.as_mut() {
            attack.elapsed_ticks += 1;
            let expired = match attack.kind {
                AttackKind::Melee => attack.elapsed_ticks >= combat.melee_ticks,
                AttackKind::Ranged => {
                    attack.rect = attack.rect.translated(attack.velocity.x, attack.velocity.y);
                    attack.travelled += combat.ranged_speed.abs();
                    attack.elapsed_ticks >= combat.ranged_max_ticks
                        || attack.travelled >= combat.ranged_max_travel
                }
            };
            if expired {
                self.attack = None;
            }
        }
        if self.attack.is_some() {
            return;
        }

        let attack = if edges.melee {
            Some(self.start_melee(combat))
        } else if edges.ranged {
            Some(self.start_ranged(combat, ctx.input.aim))
        } else {
            None
        };
        if let Some(attack) = attack {
            debug!(kind = ?attack.kind, "player_attack_started");
            events.push(SimEvent::AttackStarted { kind: attack.kind });
            self.attack = Some(attack);
        }
    }

    fn start_melee(&self, combat: &CombatTuning) -> AttackHitbox {
        let rect = melee_rect(&self.body.hitbox, self.facing, combat);
        AttackHitbox {
            kind: AttackKind::Melee,
            rect,
            velocity: Vec2::default(),
            direction_angle: facing_angle(self.facing),
            travelled: 0.0,
            elapsed_ticks: 0,
            precision: combat.melee_precision,
            damage: combat.melee_damage,
        }
    }

    fn start_ranged(&self, combat: &CombatTuning, aim: Option<Vec2>) -> AttackHitbox {
        let origin = self.body.hitbox.center();
        let direction_angle = aim
            .map(|target| Vec2 {
                x: target.x - origin.x,
                y: target.y - origin.y,
            })
            .filter(|delta| delta.x.hypot(delta.y) > f32::EPSILON)
            .map(|delta| delta.y.atan2(delta.x))
            .unwrap_or_else(|| facing_angle(self.facing));
        let speed = combat.ranged_speed.abs();
        AttackHitbox {
            kind: AttackKind::Ranged,
            rect: Rect::from_center(origin, combat.ranged_width, combat.ranged_height),
            velocity: Vec2 {
                x: direction_angle.cos() * speed,
                y: direction_angle.sin() * speed,
            },
            direction_angle,
            travelled: 0.0,
            elapsed_ticks: 0,
            precision: combat.ranged_precision,
            damage: combat.ranged_damage,
        }
    }

    fn start_dash(&mut self, tuning: &PlayerTuning, events: &mut Vec<SimEvent>) {
        self.is_dashing = true;
        self.is_climbing = false;
        self.dash_remaining = tuning.dash_duration_ticks.max(1);
        self.dash_cooldown = tuning.dash_cooldown_ticks;
        debug!(facing = ?self.facing, "player_dash_started");
        events.push(SimEvent::DashStarted);
    }

    fn steer(&mut self, ctx: &TickContext<'_>, edges: InputEdges, events: &mut Vec<SimEvent>) {
        let tuning = &ctx.tuning.player;
        let physics = &ctx.tuning.physics;
        let axis = ctx.input.horizontal();
        if let Some(facing) = Facing::from_sign(axis) {
            self.facing = facing;
        }
        self.body.vx = axis * tuning.move_speed * tuning.speed_multiplier;
        if self.body.on_ground {
            self.air_jump_available = true;
        }

        if self.is_climbing {
            if edges.jump {
                self.is_climbing = false;
                self.body.vy = tuning.small_jump_impulse;
                self.jump_lockout = tuning.jump_lockout_ticks;
                self.wall_regrab_lockout = tuning.jump_lockout_ticks;
                events.push(SimEvent::ClimbJumped);
            } else {
                self.body.vy = ctx.input.vertical() * tuning.climb_speed;
            }
            return;
        }

        self.body.apply_gravity(physics.gravity, physics.max_fall_speed);
        if ctx.input.jump && self.body.on_ground && self.jump_lockout == 0 {
            let boosted = standing_on_boost(&self.body.hitbox, ctx.tiles);
            self.body.vy = if boosted {
                tuning.big_jump_impulse
            } else {
                tuning.small_jump_impulse
            };
            self.body.on_ground = false;
            self.jump_lockout = tuning.jump_lockout_ticks;
            events.push(SimEvent::Jumped { boosted });
        } else if tuning.allow_double_jump
            && edges.jump
            && !self.body.on_ground
            && self.air_jump_available
        {
            self.body.vy = tuning.small_jump_impulse;
            self.air_jump_available = false;
            events.push(SimEvent::AirJumped);
        }
    }

    fn apply_knockback(&mut self, decay: f32) {
        if self.knockback_vx == 0.0 {
            return;
        }
        self.body.vx += self.knockback_vx;
        self.knockback_vx *= decay;
        if self.knockback_vx.abs() < KNOCKBACK_REST {
            self.knockback_vx = 0.0;
        }
    }

    fn derive_state(&mut self) {
        if self.is_dashing && self.dash_remaining == 0 {
            self.is_dashing = false;
        }
        if !self.is_dashing {
            let can_grab = self.body.on_wall && !self.body.on_ground;
            if !can_grab {
                self.is_climbing = false;
            } else if self.wall_regrab_lockout == 0 {
                self.is_climbing = true;
            }
        }

        let next = if self.is_dashing {
            MovementState::Dashing
        } else if self.is_climbing {
            MovementState::WallClimbing
        } else if self.body.on_ground {
            MovementState::Grounded
        } else {
            MovementState::Airborne
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "player_state_changed");
            self.state = next;
        }
    }

    fn animation_key(&self) -> AnimationKey {
        match self.state {
            MovementState::Dashing => AnimationKey::PlayerDash,
            MovementState::WallClimbing => AnimationKey::PlayerClimb,
            MovementState::Airborne => AnimationKey::PlayerJump,
            MovementState::Grounded if self.body.vx != 0.0 => AnimationKey::PlayerRun,
            MovementState::Grounded => AnimationKey::PlayerIdle,
        }
    }

    fn reanchor_melee(&mut self, combat: &CombatTuning) {
        if let Some(attack) = self.attack.as_mut() {
            if attack.kind == AttackKind::Melee {
                attack.rect = melee_rect(&self.body.hitbox, attack.facing(), combat);
            }
        }
    }
}

impl Actor for PlayerController {
    fn advance(&mut self, ctx: &TickContext<'_>, events: &mut Vec<SimEvent>) {
        if !self.is_alive() {
            return;
        }
        let tuning = &ctx.tuning.player;
        let edges = InputEdges::between(&self.previous_input, ctx.input);
        self.previous_input = *ctx.input;

        self.tick_timers();
        self.update_attack(ctx, edges, events);

        if ctx.input.dash && self.dash_cooldown == 0 && !self.is_dashing {
            self.start_dash(tuning, events);
        }
        if self.is_dashing {
            self.body.vx = self.facing.sign() * tuning.dash_speed;
            self.body.vy = 0.0;
            self.dash_remaining = self.dash_remaining.saturating_sub(1);
        } else {
            self.steer(ctx, edges, events);
            self.apply_knockback(tuning.knockback_decay);
        }

        self.body
            .step_axis_separated(ctx.tiles, ctx.tuning.physics.wall_probe_margin);
        self.reanchor_melee(&ctx.tuning.combat);
        self.derive_state();
        self.anim
            .advance(self.animation_key(), tuning.ticks_per_anim_frame);
    }

    fn hurtbox(&self) -> Rect {
        self.body.hitbox
    }

    fn pose(&self) -> Option<Pose> {
        Some(Pose {
            animation: self.anim.key(),
            frame: self.anim.frame(),
            sprite_rect: self.sprite_rect(),
            facing: self.facing,
            visible: self.invulnerability == 0 || self.invulnerability % 10 < 5,
            flash: false,
        })
    }
}

fn facing_angle(facing: Facing) -> f32 {
    match facing {
        Facing::Left => PI,
        Facing::Right => 0.0,
    }
}

/// Attack box whose near edge touches the middle of the hitbox's facing side.
fn melee_rect(hitbox: &Rect, facing: Facing, combat: &CombatTuning) -> Rect {
    let mut rect = Rect::new(0.0, 0.0, combat.melee_width, combat.melee_height);
    rect.set_center(hitbox.center());
    match facing {
        Facing::Right => rect.set_left(hitbox.right()),
        Facing::Left => rect.set_right(hitbox.left()),
    }
    rect
}

/// Boosted-jump regions count when they overlap the hitbox or the pixel row
/// directly under the feet.
fn standing_on_boost(hitbox: &Rect, tiles: &TileCollisionIndex) -> bool {
    let feet = Rect::new(hitbox.x, hitbox.y, hitbox.width, hitbox.height + 1.0);
    tiles.boosted_overlapping(&feet)
}
