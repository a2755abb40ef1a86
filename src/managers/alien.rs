//! Alien waves: interval spawning along the top edge, straight-line descent
//! toward the viewport center, and culling of dead or departed aliens.

use rand::Rng;

use super::random_coord;
use crate::config::EnemyConfig;
use crate::entities::{Alien, AlienKind, Vec2};
use crate::timer::SpawnTimer;
use crate::weighted::WeightedTable;

#[derive(Clone, Debug)]
pub struct AlienManager {
    aliens: Vec<Alien>,
    timer: SpawnTimer,
    variants: WeightedTable<AlienKind>,
}

impl AlienManager {
    pub fn new(config: &EnemyConfig) -> Self {
        let variants = WeightedTable::new([
            (config.large.weight, AlienKind::Large),
            (config.small.weight, AlienKind::Small),
        ])
        .unwrap_or_else(|| WeightedTable::single(AlienKind::Small));
        Self {
            aliens: Vec::new(),
            timer: SpawnTimer::idle(),
            variants,
        }
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn aliens_mut(&mut self) -> &mut Vec<Alien> {
        &mut self.aliens
    }

    pub fn is_spawning(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn start_spawner(&mut self, now_ms: f64, config: &EnemyConfig) {
        self.timer.arm(now_ms, config.spawn_interval_ms);
    }

    /// Spawn if due, move every alien, then drop dead and off-screen ones.
    pub fn update(
        &mut self,
        now_ms: f64,
        frame_scale: f32,
        viewport: Vec2,
        config: &EnemyConfig,
        rng: &mut impl Rng,
    ) {
        if let Some(due) = self.timer.fire(now_ms) {
            self.spawn(viewport, config, rng);
            self.timer.arm(due, config.spawn_interval_ms);
        }

        for alien in &mut self.aliens {
            alien.update(frame_scale);
        }
        self.aliens
            .retain(|alien| !alien.is_dead() && !alien.is_off_screen(viewport));
    }

    /// Add one alien of a weighted-random variant just above the top edge,
    /// heading for the viewport center.
    pub fn spawn(&mut self, viewport: Vec2, config: &EnemyConfig, rng: &mut impl Rng) {
        let kind = *self.variants.sample(rng);
        let variant = config.variant(kind);

        let pos = Vec2::new(
            random_coord(rng, viewport.x, variant.size / 2.0),
            -variant.size / 2.0,
        );
        let target = Vec2::new(viewport.x / 2.0, viewport.y / 2.0);
        let vel = (target - pos).normalized() * variant.speed;

        tracing::debug!(?kind, x = pos.x, "alien spawned");
        self.aliens.push(Alien {
            kind,
            pos,
            vel,
            size: variant.size,
            health: variant.health,
            points: variant.points,
            coins: variant.coins,
        });
    }

    pub fn reset(&mut self) {
        self.aliens.clear();
        self.timer.cancel();
    }
}
