//! Player controller: aiming, fire-rate gating, invincibility and stat growth.

use rand::Rng;

use crate::config::PlayerConfig;
use crate::entities::{Bullet, Vec2};

/// `Idle` until the intro finishes; only an armed player aims and shoots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmState {
    Idle,
    Armed,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    /// Facing angle in radians, 0 = pointing right.
    pub rotation: f32,
    pub size: f32,
    pub damage: u32,
    /// Percent, 0..=100 is meaningful; higher values always crit.
    pub crit_chance: f32,
    pub state: ArmState,
    pub last_shot_at_ms: f64,
    pub invincible: bool,
    pub invincible_elapsed_ms: f64,
}

impl Player {
    /// A fresh player at `pos`. The fire cooldown starts running at `now_ms`.
    pub fn new(pos: Vec2, config: &PlayerConfig, now_ms: f64) -> Self {
        Self {
            pos,
            rotation: 0.0,
            size: config.size,
            damage: config.projectile_damage,
            crit_chance: 0.0,
            state: ArmState::Idle,
            last_shot_at_ms: now_ms,
            invincible: false,
            invincible_elapsed_ms: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn arm(&mut self) {
        self.state = ArmState::Armed;
    }

    pub fn is_armed(&self) -> bool {
        self.state == ArmState::Armed
    }

    /// Keep the ship at the viewport center.
    pub fn recenter(&mut self, viewport: Vec2) {
        self.pos = Vec2::new(viewport.x / 2.0, viewport.y / 2.0);
    }

    /// Point straight at `pointer`, no smoothing.
    pub fn aim_at(&mut self, pointer: Vec2) {
        let delta = pointer - self.pos;
        self.rotation = delta.y.atan2(delta.x);
    }

    /// Per-tick update: aim (armed only) and run down invincibility.
    pub fn update(&mut self, pointer: Vec2, dt_ms: f64, config: &PlayerConfig) {
        if self.is_armed() {
            self.aim_at(pointer);
        }

        if self.invincible {
            self.invincible_elapsed_ms += dt_ms;
            if self.invincible_elapsed_ms >= config.invincibility_ms {
                self.invincible = false;
                self.invincible_elapsed_ms = 0.0;
                tracing::debug!("player invincibility ended");
            }
        }
    }

    pub fn can_fire(&self, now_ms: f64, config: &PlayerConfig) -> bool {
        self.is_armed() && now_ms - self.last_shot_at_ms >= config.fire_rate_ms
    }

    /// The single firing path. Returns the new bullet if the cooldown allows
    /// a shot; each shot rolls its own critical flag.
    pub fn try_fire(
        &mut self,
        now_ms: f64,
        config: &PlayerConfig,
        rng: &mut impl Rng,
    ) -> Option<Bullet> {
        if !self.can_fire(now_ms, config) {
            return None;
        }
        self.last_shot_at_ms = now_ms;

        let crit_probability = (f64::from(self.crit_chance) / 100.0).clamp(0.0, 1.0);
        let is_critical = rng.gen_bool(crit_probability);

        Some(Bullet {
            pos: self.pos,
            vel: Vec2::from_angle(self.rotation) * config.projectile_speed,
            size: config.projectile_size,
            damage: self.damage,
            is_critical,
        })
    }

    /// Register an enemy contact. Returns false while invincible, in which
    /// case nothing changes.
    pub fn take_hit(&mut self) -> bool {
        if self.invincible {
            return false;
        }
        self.invincible = true;
        self.invincible_elapsed_ms = 0.0;
        true
    }

    /// Draw alpha: dimmed on alternating flash intervals while invincible.
    pub fn flash_alpha(&self, config: &PlayerConfig) -> f32 {
        if !self.invincible || config.flash_interval_ms <= 0.0 {
            return 1.0;
        }
        let phase = (self.invincible_elapsed_ms / config.flash_interval_ms).floor() as u64;
        if phase % 2 == 0 {
            0.5
        } else {
            1.0
        }
    }

    pub fn increase_damage(&mut self, amount: u32) {
        self.damage = self.damage.saturating_add(amount);
        tracing::info!(damage = self.damage, "player damage increased");
    }

    pub fn increase_crit_chance(&mut self, percent: f32) {
        self.crit_chance += percent;
        tracing::info!(crit_chance = self.crit_chance, "player crit chance increased");
    }
}
