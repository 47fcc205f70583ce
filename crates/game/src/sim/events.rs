use super::boss::BossPhase;
use super::combat::AttackKind;

/// Things that happened during one tick, in the order they happened. Cleared
/// at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Jumped { boosted: bool },
    AirJumped,
    ClimbJumped,
    DashStarted,
    AttackStarted { kind: AttackKind },
    BossHit { hp: u32 },
    BossDefeated,
    PlayerHit { hp: u32 },
    PlayerDefeated,
    LevelUp { level: u32 },
    PhaseChanged { phase: BossPhase },
}

/// How the encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}
