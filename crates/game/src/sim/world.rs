use tracing::info;

use super::actor::{pose_shape, standing_on, Actor, TickContext};
use super::animation::Pose;
use super::boss::BossController;
use super::combat::{test_hit, DamageOutcome, MaskLibrary};
use super::events::{Outcome, SimEvent};
use super::geometry::Rect;
use super::input::TickInput;
use super::player::PlayerController;
use super::tiles::Level;
use super::tuning::Tuning;

/// Renderable state of every entity after the latest tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoses {
    pub player: Option<Pose>,
    pub boss: Option<Pose>,
    pub attack: Option<Pose>,
}

/// One boss encounter: the level, both actors and the per-tick ordering
/// between them.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    level: Level,
    masks: MaskLibrary,
    player: PlayerController,
    boss: BossController,
    events: Vec<SimEvent>,
    outcome: Option<Outcome>,
    tick_count: u64,
}

impl World {
    pub fn new(tuning: Tuning, level: Level, masks: MaskLibrary) -> Self {
        let tuning = tuning.sanitized();
        let (player, boss) = spawn_actors(&tuning, &level);
        Self {
            tuning,
            level,
            masks,
            player,
            boss,
            events: Vec::new(),
            outcome: None,
            tick_count: 0,
        }
    }

    /// Puts both actors back on their spawn cells and clears the outcome.
    pub fn restart(&mut self) {
        let (player, boss) = spawn_actors(&self.tuning, &self.level);
        self.player = player;
        self.boss = boss;
        self.events.clear();
        self.outcome = None;
        self.tick_count = 0;
        info!("world_restarted");
    }

    /// Advances one fixed step: player (and its attack against the boss),
    /// then boss (and its contact against the player), then the outcome
    /// check. Does nothing once the encounter is decided.
    pub fn tick(&mut self, input: &TickInput) -> &[SimEvent] {
        self.events.clear();
        if self.outcome.is_some() {
            return &self.events;
        }
        self.tick_count += 1;

        let ctx = TickContext {
            tiles: &self.level.tiles,
            tuning: &self.tuning,
            input,
            opponent: self.boss.hurtbox(),
        };
        self.player.advance(&ctx, &mut self.events);
        self.resolve_player_attack();

        let ctx = TickContext {
            tiles: &self.level.tiles,
            tuning: &self.tuning,
            input,
            opponent: self.player.hurtbox(),
        };
        self.boss.advance(&ctx, &mut self.events);
        self.resolve_boss_contact();

        self.decide_outcome();
        &self.events
    }

    fn resolve_player_attack(&mut self) {
        let Some(attack) = self.player.attack else {
            return;
        };
        let Some(attack_pose) = self.player.attack_pose(&self.tuning.combat) else {
            return;
        };
        let Some(defender) = self.boss.hit_shape(&self.masks) else {
            return;
        };
        let attacker = pose_shape(&attack_pose, attack.rect, &self.masks);
        if !test_hit(attack.precision, &attacker, &defender) {
            return;
        }

        let player_tuning = &self.tuning.player;
        match self.boss.take_damage(attack.damage, &self.tuning.boss) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hit => {
                self.player.attack_landed();
                self.events.push(SimEvent::BossHit { hp: self.boss.hp });
                self.player
                    .grant_exp(player_tuning.exp_per_hit, player_tuning, &mut self.events);
            }
            DamageOutcome::Killed => {
                self.player.attack_landed();
                self.player.score += 1;
                self.events.push(SimEvent::BossDefeated);
                self.player.grant_exp(
                    player_tuning.exp_per_hit + player_tuning.exp_per_kill,
                    player_tuning,
                    &mut self.events,
                );
            }
        }
    }

    fn resolve_boss_contact(&mut self) {
        if !self.boss.is_alive() || !self.player.is_alive() || self.player.invulnerability > 0 {
            return;
        }
        let Some(boss_shape) = self.boss.hit_shape(&self.masks) else {
            return;
        };
        let Some(player_shape) = self.player.hit_shape(&self.masks) else {
            return;
        };
        if !test_hit(self.tuning.boss.contact_precision, &boss_shape, &player_shape) {
            return;
        }

        let away = if self.player.hurtbox().center().x < self.boss.hurtbox().center().x {
            -1.0
        } else {
            1.0
        };
        let knockback = away * self.tuning.boss.contact_knockback;
        match self
            .player
            .take_hit(self.tuning.boss.contact_damage, knockback, &self.tuning.player)
        {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hit => self.events.push(SimEvent::PlayerHit { hp: self.player.hp }),
            DamageOutcome::Killed => {
                self.events.push(SimEvent::PlayerHit { hp: 0 });
                self.events.push(SimEvent::PlayerDefeated);
                info!(tick = self.tick_count, level = self.player.level, "player_defeated");
            }
        }
    }

    fn decide_outcome(&mut self) {
        let outcome = if self.boss.is_dead {
            Outcome::Victory
        } else if !self.player.is_alive() {
            Outcome::Defeat
        } else {
            return;
        };
        info!(
            outcome = ?outcome,
            tick = self.tick_count,
            score = self.player.score,
            "encounter_decided"
        );
        self.outcome = Some(outcome);
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn boss(&self) -> &BossController {
        &self.boss
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn poses(&self) -> WorldPoses {
        WorldPoses {
            player: self.player.pose(),
            boss: self.boss.pose(),
            attack: self.player.attack_pose(&self.tuning.combat),
        }
    }
}

fn spawn_actors(tuning: &Tuning, level: &Level) -> (PlayerController, BossController) {
    let size = level.tiles.cell_size();
    let player_cell = Rect::new(level.player_spawn.x, level.player_spawn.y, size, size);
    let boss_cell = Rect::new(level.boss_spawn.x, level.boss_spawn.y, size, size);
    let player = PlayerController::new(
        standing_on(
            player_cell,
            tuning.player.hitbox_width,
            tuning.player.hitbox_height,
        ),
        &tuning.player,
    );
    let boss = BossController::new(
        standing_on(boss_cell, tuning.boss.hitbox_width, tuning.boss.hitbox_height),
        &tuning.boss,
    );
    (player, boss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::AnimationKey;
    use crate::sim::combat::{AttackKind, PixelMask};

    /// Player three tiles left of the boss; neither touches the other.
    const APART: [&str; 10] = [
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "....................",
        "...P....B...........",
        "####################",
    ];

    /// Player spawns inside the boss silhouette.
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

    fn world(rows: &[&str], tuning: Tuning) -> World {
        World::new(tuning, Level::from_rows(rows, 32.0), MaskLibrary::new())
    }

    fn melee() -> TickInput {
        TickInput {
            melee: true,
            ..TickInput::default()
        }
    }

    #[test]
    fn melee_on_last_hp_kills_boss_within_the_tick() {
        let mut world = world(&APART, Tuning::default());
        world.boss.hp = 1;

        let events = world.tick(&melee()).to_vec();

        assert_eq!(world.boss().hp, 0);
        assert!(world.boss().is_dead);
        assert_eq!(world.outcome(), Some(Outcome::Victory));
        assert_eq!(
            events,
            vec![
                SimEvent::AttackStarted {
                    kind: AttackKind::Melee
                },
                SimEvent::BossDefeated,
            ]
        );
        assert_eq!(world.player().score, 1);
        assert_eq!(world.player().exp, 52);
        assert!(world.poses().boss.is_none());
    }

    #[test]
    fn melee_hit_grants_exp_and_reports_hp() {
        let mut world = world(&APART, Tuning::default());

        let events = world.tick(&melee()).to_vec();

        assert!(events.contains(&SimEvent::BossHit { hp: 49 }));
        assert_eq!(world.player().exp, 2);
        assert_eq!(world.outcome(), None);
    }

    #[test]
    fn contact_damage_respects_player_invulnerability() {
        let mut tuning = Tuning::default();
        tuning.boss.contact_knockback = 0.0;
        let mut world = world(&TOUCHING, tuning);

        let events = world.tick(&TickInput::default()).to_vec();
        assert_eq!(events, vec![SimEvent::PlayerHit { hp: 18 }]);
        assert_eq!(world.player().invulnerability, 60);

        for _ in 0..59 {
            world.tick(&TickInput::default());
            assert_eq!(world.player().hp, 18);
        }
        world.tick(&TickInput::default());
        assert_eq!(world.player().hp, 16);
    }

    #[test]
    fn contact_knocks_player_away_from_boss() {
        let mut world = world(&TOUCHING, Tuning::default());
        let start = world.player().body.hitbox.x;

        world.tick(&TickInput::default());
        world.tick(&TickInput::default());

        assert!(world.player().body.hitbox.x < start);
    }

    #[test]
    fn transparent_boss_mask_blocks_contact() {
        let mut masks = MaskLibrary::new();
        for key in AnimationKey::BossAttack.sprite_keys() {
            masks.insert(key, PixelMask::from_alpha(4, 4, &[0; 16], 0).expect("mask"));
        }
        let mut world = World::new(Tuning::default(), Level::from_rows(&TOUCHING, 32.0), masks);

        let events = world.tick(&TickInput::default()).to_vec();

        assert!(events.is_empty());
        assert_eq!(world.player().hp, 20);
    }

    #[test]
    fn decided_world_stops_advancing() {
        let mut world = world(&TOUCHING, Tuning::default());
        world.player.hp = 2;

        let events = world.tick(&TickInput::default()).to_vec();
        assert_eq!(
            events,
            vec![SimEvent::PlayerHit { hp: 0 }, SimEvent::PlayerDefeated]
        );
        assert_eq!(world.outcome(), Some(Outcome::Defeat));

        let boss_frame_timer = world.boss().anim_timer;
        for _ in 0..10 {
            assert!(world.tick(&TickInput::default()).is_empty());
        }
        assert_eq!(world.tick_count(), 1);
        assert_eq!(world.boss().anim_timer, boss_frame_timer);
    }

    #[test]
    fn restart_respawns_both_actors() {
        let mut world = world(&APART, Tuning::default());
        let spawn = world.player().body.hitbox;
        world.boss.hp = 1;
        world.tick(&melee());
        assert_eq!(world.outcome(), Some(Outcome::Victory));

        world.restart();

        assert_eq!(world.outcome(), None);
        assert_eq!(world.boss().hp, 50);
        assert!(!world.boss().is_dead);
        assert_eq!(world.player().body.hitbox, spawn);
        assert_eq!(world.tick_count(), 0);
    }
}
