//! Static game configuration.
//!
//! `GameConfig::default()` is the built-in constant table. A TOML file can
//! override any subset of it at startup; after that the table is read-only
//! and owned by the `Game`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{AlienKind, PowerUpKind};
use crate::error::{GameError, Result};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub frame: FrameConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub background: BackgroundConfig,
    pub mystery_box: MysteryBoxConfig,
    pub effects: EffectsConfig,
    pub display: DisplayConfig,
}

// ── Frame timing ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Duration that motion constants are expressed against.
    /// A speed of 1.0 means one pixel per `reference_ms` of game time.
    pub reference_ms: f64,
    /// Wall-clock frame pacing used by the terminal driver.
    pub target_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            reference_ms: 16.0,
            target_ms: 33,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: f32,
    pub fire_rate_ms: f64,
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub projectile_damage: u32,
    pub starting_lives: u32,
    pub max_lives: u32,
    pub invincibility_ms: f64,
    pub flash_interval_ms: f64,
    pub image: String,
    pub projectile_image: String,
    pub crit_projectile_image: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            fire_rate_ms: 300.0,
            projectile_speed: 10.0,
            projectile_size: 10.0,
            projectile_damage: 1,
            starting_lives: 3,
            max_lives: 6,
            invincibility_ms: 2000.0,
            flash_interval_ms: 100.0,
            image: "player.txt".into(),
            projectile_image: "player_projectile.txt".into(),
            crit_projectile_image: "crit_projectile.txt".into(),
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Per-variant alien constants. Fields left out of a TOML table fall back to
/// the SMALL variant's values, so override `[enemy.large]` in full.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AlienVariantConfig {
    pub size: f32,
    pub speed: f32,
    pub points: u32,
    pub coins: u32,
    pub health: i32,
    /// Relative spawn weight against the other variant.
    pub weight: u32,
    pub image: String,
}

impl Default for AlienVariantConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            speed: 1.0,
            points: 10,
            coins: 1,
            health: 2,
            weight: 60,
            image: "alien_small.txt".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub spawn_interval_ms: f64,
    pub large: AlienVariantConfig,
    pub small: AlienVariantConfig,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1000.0,
            large: AlienVariantConfig {
                size: 70.0,
                speed: 0.8,
                points: 15,
                coins: 2,
                health: 4,
                weight: 40,
                image: "alien_big.txt".into(),
            },
            small: AlienVariantConfig::default(),
        }
    }
}

impl EnemyConfig {
    pub fn variant(&self, kind: AlienKind) -> &AlienVariantConfig {
        match kind {
            AlienKind::Large => &self.large,
            AlienKind::Small => &self.small,
        }
    }
}

// ── Background clouds ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub cloud_images: Vec<String>,
    pub cloud_sizes: Vec<f32>,
    pub cloud_speeds: Vec<f32>,
    pub cloud_spawn_interval_ms: f64,
    pub min_cloud_distance: f32,
    pub initial_clouds: usize,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            cloud_images: vec![
                "bg_cloud_1.txt".into(),
                "bg_cloud_2.txt".into(),
                "bg_cloud_3.txt".into(),
            ],
            cloud_sizes: vec![500.0, 450.0, 400.0],
            cloud_speeds: vec![1.0, 0.7, 0.5],
            cloud_spawn_interval_ms: 10_000.0,
            min_cloud_distance: 1000.0,
            initial_clouds: 2,
        }
    }
}

impl BackgroundConfig {
    /// Number of usable cloud variants (sizes and speeds both defined).
    pub fn variant_count(&self) -> usize {
        self.cloud_sizes.len().min(self.cloud_speeds.len())
    }
}

// ── Mystery boxes ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerUpEntry {
    pub kind: PowerUpKind,
    pub text: String,
    pub weight: u32,
    /// Coins granted, crit percent added or damage added, depending on kind.
    #[serde(default)]
    pub value: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MysteryBoxConfig {
    pub min_spawn_interval_ms: f64,
    pub max_spawn_interval_ms: f64,
    pub size: f32,
    pub points: u32,
    pub coins: u32,
    pub rotation_speed: f32,
    pub pulse_speed: f64,
    pub lifespan_ms: f64,
    pub fade_window_ms: f64,
    pub explosion_size_multiplier: f32,
    pub explosion_lifespan_ms: f64,
    pub text_lifespan_ms: f64,
    pub text_speed: f32,
    pub image: String,
    pub explosion_image: String,
    pub powerups: Vec<PowerUpEntry>,
}

impl Default for MysteryBoxConfig {
    fn default() -> Self {
        let entry = |kind, text: &str, weight, value| PowerUpEntry {
            kind,
            text: text.into(),
            weight,
            value,
        };
        Self {
            min_spawn_interval_ms: 25_000.0,
            max_spawn_interval_ms: 35_000.0,
            size: 40.0,
            points: 0,
            coins: 5,
            rotation_speed: 0.01,
            pulse_speed: 0.005,
            lifespan_ms: 5000.0,
            fade_window_ms: 1000.0,
            explosion_size_multiplier: 1.2,
            explosion_lifespan_ms: 800.0,
            text_lifespan_ms: 1500.0,
            text_speed: 0.4,
            image: "mystery_box.txt".into(),
            explosion_image: "enemy_defeated.txt".into(),
            powerups: vec![
                entry(PowerUpKind::Damage, "DAMAGE +1", 5, 1.0),
                entry(PowerUpKind::Coins10, "COINS +10", 20, 10.0),
                entry(PowerUpKind::Coins20, "COINS +20", 15, 20.0),
                entry(PowerUpKind::Coins30, "COINS +30", 10, 30.0),
                entry(PowerUpKind::Heart, "HEART +1", 35, 0.0),
                entry(PowerUpKind::Crit, "CRIT +1", 5, 2.5),
            ],
        }
    }
}

// ── Transient effects ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub coin_lifetime_ms: f64,
    pub coin_rise_speed: f32,
    pub coin_scatter: f32,
    pub max_coin_sprites: u32,
    pub crit_lifetime_ms: f64,
    pub crit_scale_growth: f32,
    pub coin_image: String,
    pub heart_image: String,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            coin_lifetime_ms: 1000.0,
            coin_rise_speed: 2.0,
            coin_scatter: 30.0,
            max_coin_sprites: 10,
            crit_lifetime_ms: 500.0,
            crit_scale_growth: 0.1,
            coin_image: "coin.txt".into(),
            heart_image: "heart.txt".into(),
        }
    }
}

// ── Terminal mapping ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Simulated pixels covered by one terminal column.
    pub cell_width_px: f32,
    /// Simulated pixels covered by one terminal row.
    pub cell_height_px: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }
}

// ── Loading & validation ──────────────────────────────────────────────────────

/// Read a TOML file layered over the built-in defaults.
pub fn load(path: &Path) -> Result<GameConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = toml::from_str(&content).map_err(|source| GameError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    tracing::info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.frame.reference_ms <= 0.0 {
            return invalid("frame.reference_ms must be positive".into());
        }
        if self.player.starting_lives == 0 {
            return invalid("player.starting_lives must be at least 1".into());
        }
        if self.player.starting_lives > self.player.max_lives {
            return invalid(format!(
                "player.starting_lives ({}) exceeds player.max_lives ({})",
                self.player.starting_lives, self.player.max_lives
            ));
        }
        if self.player.projectile_damage == 0 {
            return invalid("player.projectile_damage must be at least 1".into());
        }
        if self.enemy.large.weight == 0 && self.enemy.small.weight == 0 {
            return invalid("enemy variant weights must not all be zero".into());
        }
        if self.mystery_box.min_spawn_interval_ms > self.mystery_box.max_spawn_interval_ms {
            return invalid(format!(
                "mystery_box spawn window is inverted ({} > {})",
                self.mystery_box.min_spawn_interval_ms, self.mystery_box.max_spawn_interval_ms
            ));
        }
        if self.mystery_box.powerups.iter().all(|p| p.weight == 0) {
            return invalid("mystery_box.powerups needs at least one positive weight".into());
        }
        if self.background.variant_count() == 0 {
            return invalid("background needs at least one cloud size and speed".into());
        }
        if self.display.cell_width_px <= 0.0 || self.display.cell_height_px <= 0.0 {
            return invalid("display cell dimensions must be positive".into());
        }
        Ok(())
    }
}
