//! Game entity types and their per-entity behaviour.
//!
//! Every destructible entity exposes `is_dead`; whoever owns the collection
//! prunes it on the same tick the predicate turns true.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A point or vector in viewport pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// True when `pos` lies more than `margin` pixels outside a `viewport`-sized
/// rectangle anchored at the origin.
pub fn outside_viewport(pos: Vec2, viewport: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.x > viewport.x + margin || pos.y < -margin || pos.y > viewport.y + margin
}

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlienKind {
    Large,
    Small,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Damage,
    Coins10,
    Coins20,
    Coins30,
    Heart,
    Crit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Session state ─────────────────────────────────────────────────────────────

/// Score, coins and lives for the current session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
}

impl SessionState {
    pub fn new(starting_lives: u32) -> Self {
        Self {
            score: 0,
            coins: 0,
            lives: starting_lives,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    /// Pixels per reference frame.
    pub vel: Vec2,
    /// Diameter in pixels.
    pub size: f32,
    /// Fixed when fired; later power-ups do not change it.
    pub damage: u32,
    pub is_critical: bool,
}

impl Bullet {
    pub fn update(&mut self, frame_scale: f32) {
        self.pos += self.vel * frame_scale;
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_off_screen(&self, viewport: Vec2) -> bool {
        outside_viewport(self.pos, viewport, self.size * 2.0)
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub kind: AlienKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: i32,
    pub points: u32,
    pub coins: u32,
}

impl Alien {
    pub fn update(&mut self, frame_scale: f32) {
        self.pos += self.vel * frame_scale;
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Apply one bullet. Critical bullets always finish the alien off.
    pub fn take_hit(&mut self, bullet: &Bullet) {
        if bullet.is_critical {
            self.health = 0;
        } else {
            self.health -= bullet.damage as i32;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_off_screen(&self, viewport: Vec2) -> bool {
        outside_viewport(self.pos, viewport, self.size)
    }
}

// ── Mystery boxes ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MysteryBox {
    pub pos: Vec2,
    pub size: f32,
    pub remaining_ms: f64,
    pub age_ms: f64,
    /// Radians; spins while the box is alive.
    pub rotation: f32,
    pub collected: bool,
}

impl MysteryBox {
    pub fn new(pos: Vec2, size: f32, lifespan_ms: f64) -> Self {
        Self {
            pos,
            size,
            remaining_ms: lifespan_ms,
            age_ms: 0.0,
            rotation: 0.0,
            collected: false,
        }
    }

    pub fn update(&mut self, dt_ms: f64, frame_scale: f32, rotation_speed: f32) {
        self.remaining_ms -= dt_ms;
        self.age_ms += dt_ms;
        self.rotation += rotation_speed * frame_scale;
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Size multiplier oscillating around 1.0.
    pub fn pulse(&self, pulse_speed: f64) -> f32 {
        1.0 + 0.1 * (self.age_ms * pulse_speed).sin() as f32
    }

    /// Opaque until the last `fade_window_ms`, then linear fade to zero.
    pub fn alpha(&self, fade_window_ms: f64) -> f32 {
        if fade_window_ms <= 0.0 || self.remaining_ms >= fade_window_ms {
            1.0
        } else {
            (self.remaining_ms / fade_window_ms).clamp(0.0, 1.0) as f32
        }
    }

    pub fn is_dead(&self) -> bool {
        self.collected || self.remaining_ms <= 0.0
    }
}

// ── Clouds ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Cloud {
    pub pos: Vec2,
    /// Index into the configured cloud sizes, speeds and images.
    pub variant: usize,
    pub size: f32,
    pub speed: f32,
}

impl Cloud {
    /// Clouds drift straight down.
    pub fn update(&mut self, frame_scale: f32) {
        self.pos.y += self.speed * frame_scale;
    }

    /// Only the bottom edge culls; clouds are spawned above the top edge.
    pub fn is_off_screen(&self, viewport: Vec2) -> bool {
        self.pos.y - self.size / 2.0 > viewport.y
    }
}

// ── Transient effects ─────────────────────────────────────────────────────────

/// A coin sprite that floats upward and fades out.
#[derive(Clone, Debug)]
pub struct CoinEffect {
    pub pos: Vec2,
    pub rise_speed: f32,
    pub elapsed_ms: f64,
    pub lifetime_ms: f64,
}

impl CoinEffect {
    pub fn new(pos: Vec2, rise_speed: f32, lifetime_ms: f64) -> Self {
        Self {
            pos,
            rise_speed,
            elapsed_ms: 0.0,
            lifetime_ms,
        }
    }

    pub fn update(&mut self, dt_ms: f64, frame_scale: f32) {
        self.pos.y -= self.rise_speed * frame_scale;
        self.elapsed_ms += dt_ms;
    }

    pub fn alpha(&self) -> f32 {
        fade_out(self.elapsed_ms, self.lifetime_ms)
    }

    pub fn is_dead(&self) -> bool {
        self.elapsed_ms >= self.lifetime_ms
    }
}

/// "CRIT!" text that grows while fading.
#[derive(Clone, Debug)]
pub struct CriticalHitEffect {
    pub pos: Vec2,
    pub scale: f32,
    pub elapsed_ms: f64,
    pub lifetime_ms: f64,
}

impl CriticalHitEffect {
    pub fn new(pos: Vec2, lifetime_ms: f64) -> Self {
        Self {
            pos,
            scale: 1.0,
            elapsed_ms: 0.0,
            lifetime_ms,
        }
    }

    pub fn update(&mut self, dt_ms: f64, frame_scale: f32, scale_growth: f32) {
        self.elapsed_ms += dt_ms;
        self.scale += scale_growth * frame_scale;
    }

    pub fn alpha(&self) -> f32 {
        fade_out(self.elapsed_ms, self.lifetime_ms)
    }

    pub fn is_dead(&self) -> bool {
        self.elapsed_ms >= self.lifetime_ms
    }
}

/// Burst left behind by a collected mystery box.
#[derive(Clone, Debug)]
pub struct ExplosionEffect {
    pub pos: Vec2,
    pub size: f32,
    pub elapsed_ms: f64,
    pub lifetime_ms: f64,
}

impl ExplosionEffect {
    pub fn new(pos: Vec2, size: f32, lifetime_ms: f64) -> Self {
        Self {
            pos,
            size,
            elapsed_ms: 0.0,
            lifetime_ms,
        }
    }

    pub fn update(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    pub fn alpha(&self) -> f32 {
        fade_out(self.elapsed_ms, self.lifetime_ms)
    }

    pub fn is_dead(&self) -> bool {
        self.elapsed_ms >= self.lifetime_ms
    }
}

/// Power-up label rising from a collected box.
#[derive(Clone, Debug)]
pub struct TextEffect {
    pub pos: Vec2,
    pub text: String,
    pub rise_speed: f32,
    pub elapsed_ms: f64,
    pub lifetime_ms: f64,
}

impl TextEffect {
    pub fn new(pos: Vec2, text: String, rise_speed: f32, lifetime_ms: f64) -> Self {
        Self {
            pos,
            text,
            rise_speed,
            elapsed_ms: 0.0,
            lifetime_ms,
        }
    }

    pub fn update(&mut self, dt_ms: f64, frame_scale: f32) {
        self.pos.y -= self.rise_speed * frame_scale;
        self.elapsed_ms += dt_ms;
    }

    pub fn alpha(&self) -> f32 {
        fade_out(self.elapsed_ms, self.lifetime_ms)
    }

    pub fn is_dead(&self) -> bool {
        self.elapsed_ms >= self.lifetime_ms
    }
}

fn fade_out(elapsed_ms: f64, lifetime_ms: f64) -> f32 {
    if lifetime_ms <= 0.0 {
        return 0.0;
    }
    (1.0 - elapsed_ms / lifetime_ms).clamp(0.0, 1.0) as f32
}
