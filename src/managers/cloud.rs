//! Decorative background clouds drifting down the screen.

use rand::Rng;

use super::random_coord;
use crate::config::BackgroundConfig;
use crate::entities::{Cloud, Vec2};
use crate::timer::SpawnTimer;

#[derive(Clone, Debug, Default)]
pub struct CloudManager {
    clouds: Vec<Cloud>,
    timer: SpawnTimer,
}

impl CloudManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Seed the sky for a new session: the first cloud lands somewhere on
    /// screen, the rest are stacked above it at the minimum spacing.
    pub fn setup_initial_clouds(
        &mut self,
        viewport: Vec2,
        config: &BackgroundConfig,
        rng: &mut impl Rng,
    ) {
        if config.variant_count() == 0 || config.initial_clouds == 0 {
            return;
        }
        let first_y = random_coord(rng, viewport.y, 0.0);
        for i in 0..config.initial_clouds {
            let mut cloud = Self::make_cloud(viewport, config, rng);
            cloud.pos.y = first_y - i as f32 * config.min_cloud_distance;
            self.clouds.push(cloud);
        }
    }

    pub fn start_spawner(&mut self, now_ms: f64, config: &BackgroundConfig) {
        self.timer.arm(now_ms, config.cloud_spawn_interval_ms);
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        frame_scale: f32,
        viewport: Vec2,
        config: &BackgroundConfig,
        rng: &mut impl Rng,
    ) {
        if let Some(due) = self.timer.fire(now_ms) {
            self.try_spawn(viewport, config, rng);
            self.timer.arm(due, config.cloud_spawn_interval_ms);
        }

        for cloud in &mut self.clouds {
            cloud.update(frame_scale);
        }
        self.clouds.retain(|cloud| !cloud.is_off_screen(viewport));
    }

    /// Spawn above the top edge unless the most recent cloud is still
    /// closer than the minimum spacing. Returns whether a cloud was added.
    pub fn try_spawn(
        &mut self,
        viewport: Vec2,
        config: &BackgroundConfig,
        rng: &mut impl Rng,
    ) -> bool {
        if config.variant_count() == 0 {
            return false;
        }
        let candidate = Self::make_cloud(viewport, config, rng);
        if let Some(last) = self.clouds.last() {
            if last.pos.distance(candidate.pos) < config.min_cloud_distance {
                tracing::trace!("cloud spawn skipped, too close to the previous one");
                return false;
            }
        }
        self.clouds.push(candidate);
        true
    }

    fn make_cloud(viewport: Vec2, config: &BackgroundConfig, rng: &mut impl Rng) -> Cloud {
        let variant = rng.gen_range(0..config.variant_count());
        let size = config.cloud_sizes[variant];
        Cloud {
            pos: Vec2::new(random_coord(rng, viewport.x, 0.0), -size / 2.0),
            variant,
            size,
            speed: config.cloud_speeds[variant],
        }
    }

    pub fn reset(&mut self) {
        self.clouds.clear();
        self.timer.cancel();
    }
}
