//! Outcomes reported by collision resolution and managers.
//!
//! Managers never touch session state; they hand back a list of these and
//! the orchestrator folds them in order.

use crate::entities::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    ScoreGained(u32),
    /// Coins credited; a coin burst is shown at `at`.
    CoinsGained { amount: u32, at: Vec2 },
    /// One life, capped at the configured maximum.
    LifeGranted,
    DamageIncreased(u32),
    /// Percentage points added to the crit chance.
    CritChanceIncreased(f32),
    EffectSpawned(EffectSpawn),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EffectSpawn {
    CriticalHit { at: Vec2 },
    Explosion { at: Vec2, size: f32 },
    FloatingText { at: Vec2, text: String },
}
