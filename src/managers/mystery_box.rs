//! Mystery boxes: randomized spawn window, lifespan countdown, and the
//! weighted power-up roll when a bullet opens one.

use rand::Rng;

use super::random_coord;
use crate::collision::bullet_hits_box;
use crate::config::{MysteryBoxConfig, PowerUpEntry};
use crate::entities::{Bullet, MysteryBox, PowerUpKind, Vec2};
use crate::events::{EffectSpawn, Outcome};
use crate::timer::SpawnTimer;
use crate::weighted::WeightedTable;

#[derive(Clone, Debug)]
pub struct MysteryBoxManager {
    boxes: Vec<MysteryBox>,
    timer: SpawnTimer,
    powerups: Option<WeightedTable<PowerUpEntry>>,
}

impl MysteryBoxManager {
    pub fn new(config: &MysteryBoxConfig) -> Self {
        let powerups = WeightedTable::new(config.powerups.iter().map(|p| (p.weight, p.clone())));
        Self {
            boxes: Vec::new(),
            timer: SpawnTimer::idle(),
            powerups,
        }
    }

    pub fn boxes(&self) -> &[MysteryBox] {
        &self.boxes
    }

    pub fn boxes_mut(&mut self) -> &mut Vec<MysteryBox> {
        &mut self.boxes
    }

    pub fn next_spawn_at(&self) -> Option<f64> {
        self.timer.due_at()
    }

    /// Arm the timer with a fresh delay drawn from the spawn window.
    pub fn schedule_spawn(&mut self, now_ms: f64, config: &MysteryBoxConfig, rng: &mut impl Rng) {
        let (min, max) = (config.min_spawn_interval_ms, config.max_spawn_interval_ms);
        let delay = if max > min { rng.gen_range(min..=max) } else { min };
        self.timer.arm(now_ms, delay);
        tracing::debug!(delay_ms = delay, "mystery box scheduled");
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        dt_ms: f64,
        frame_scale: f32,
        viewport: Vec2,
        config: &MysteryBoxConfig,
        rng: &mut impl Rng,
    ) {
        if let Some(due) = self.timer.fire(now_ms) {
            self.spawn(viewport, config, rng);
            self.schedule_spawn(due, config, rng);
        }

        for mystery_box in &mut self.boxes {
            mystery_box.update(dt_ms, frame_scale, config.rotation_speed);
        }
        self.boxes.retain(|mystery_box| !mystery_box.is_dead());
    }

    /// Place a box somewhere fully inside the viewport.
    pub fn spawn(&mut self, viewport: Vec2, config: &MysteryBoxConfig, rng: &mut impl Rng) {
        let pos = Vec2::new(
            random_coord(rng, viewport.x, config.size),
            random_coord(rng, viewport.y, config.size),
        );
        tracing::debug!(x = pos.x, y = pos.y, "mystery box spawned");
        self.boxes.push(MysteryBox::new(pos, config.size, config.lifespan_ms));
    }

    /// Test the given bullets against live boxes. A bullet that opens a box
    /// is removed from `bullets`; each box opens at most once. The rewards
    /// come back as outcomes for the caller to apply.
    pub fn check_collisions(
        &mut self,
        bullets: &mut Vec<Bullet>,
        config: &MysteryBoxConfig,
        rng: &mut impl Rng,
    ) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        if self.boxes.is_empty() {
            return outcomes;
        }

        let boxes = &mut self.boxes;
        let powerups = &self.powerups;
        bullets.retain(|bullet| {
            let hit = boxes
                .iter_mut()
                .find(|b| !b.is_dead() && bullet_hits_box(bullet, b));
            match hit {
                Some(mystery_box) => {
                    mystery_box.collected = true;
                    open_box(mystery_box, powerups.as_ref(), config, &mut *rng, &mut outcomes);
                    false
                }
                None => true,
            }
        });

        self.boxes.retain(|mystery_box| !mystery_box.is_dead());
        outcomes
    }

    pub fn reset(&mut self) {
        self.boxes.clear();
        self.timer.cancel();
    }
}

fn open_box(
    mystery_box: &MysteryBox,
    powerups: Option<&WeightedTable<PowerUpEntry>>,
    config: &MysteryBoxConfig,
    rng: &mut impl Rng,
    outcomes: &mut Vec<Outcome>,
) {
    let at = mystery_box.pos;

    if config.points > 0 {
        outcomes.push(Outcome::ScoreGained(config.points));
    }
    if config.coins > 0 {
        outcomes.push(Outcome::CoinsGained {
            amount: config.coins,
            at,
        });
    }

    let Some(entry) = powerups.map(|table| table.sample(rng)) else {
        return;
    };
    tracing::info!(powerup = ?entry.kind, "mystery box opened");

    match entry.kind {
        PowerUpKind::Damage => {
            outcomes.push(Outcome::DamageIncreased((entry.value.round() as u32).max(1)));
        }
        PowerUpKind::Coins10 | PowerUpKind::Coins20 | PowerUpKind::Coins30 => {
            outcomes.push(Outcome::CoinsGained {
                amount: entry.value.max(0.0).round() as u32,
                at,
            });
        }
        PowerUpKind::Heart => outcomes.push(Outcome::LifeGranted),
        PowerUpKind::Crit => outcomes.push(Outcome::CritChanceIncreased(entry.value)),
    }

    outcomes.push(Outcome::EffectSpawned(EffectSpawn::Explosion {
        at,
        size: mystery_box.size * config.explosion_size_multiplier,
    }));
    outcomes.push(Outcome::EffectSpawned(EffectSpawn::FloatingText {
        at,
        text: entry.text.clone(),
    }));
}
