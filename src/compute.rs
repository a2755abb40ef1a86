//! The game orchestrator.
//!
//! `Game` owns every entity collection, the three managers, the session
//! state and the HUD collaborator. `tick` runs one fixed sequence per frame:
//! player → auto-fire → managers → bullets and effects → collisions →
//! outcome folding. All randomness comes through the injected RNG so a
//! seeded RNG replays a session exactly.

use rand::Rng;

use crate::collision::{bullet_hits_enemy, player_hits_enemy};
use crate::config::GameConfig;
use crate::entities::{
    Bullet, CoinEffect, CriticalHitEffect, ExplosionEffect, GameStatus, SessionState, TextEffect,
    Vec2,
};
use crate::error::{GameError, Result};
use crate::events::{EffectSpawn, Outcome};
use crate::hud::Hud;
use crate::managers::{AlienManager, CloudManager, MysteryBoxManager};
use crate::player::Player;

pub struct Game<H: Hud> {
    config: GameConfig,
    viewport: Vec2,
    pointer: Vec2,
    /// Session time; restarts at zero on reset.
    clock_ms: f64,
    started: bool,
    status: GameStatus,
    hud: H,

    pub session: SessionState,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub coin_effects: Vec<CoinEffect>,
    pub crit_effects: Vec<CriticalHitEffect>,
    pub explosions: Vec<ExplosionEffect>,
    pub texts: Vec<TextEffect>,
    pub aliens: AlienManager,
    pub boxes: MysteryBoxManager,
    pub clouds: CloudManager,
}

// ── Construction & session lifecycle ─────────────────────────────────────────

impl<H: Hud> Game<H> {
    /// Build a session on a `viewport`-sized surface. Fails when the
    /// configuration is inconsistent or the surface has no area.
    pub fn new(config: GameConfig, viewport: Vec2, hud: H, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;
        check_surface(viewport)?;

        let center = Vec2::new(viewport.x / 2.0, viewport.y / 2.0);
        let mut game = Self {
            viewport,
            pointer: center,
            clock_ms: 0.0,
            started: false,
            status: GameStatus::Playing,
            hud,
            session: SessionState::new(config.player.starting_lives),
            player: Player::new(center, &config.player, 0.0),
            bullets: Vec::new(),
            coin_effects: Vec::new(),
            crit_effects: Vec::new(),
            explosions: Vec::new(),
            texts: Vec::new(),
            aliens: AlienManager::new(&config.enemy),
            boxes: MysteryBoxManager::new(&config.mystery_box),
            clouds: CloudManager::new(),
            config,
        };
        game.begin_session(rng);
        Ok(game)
    }

    /// The "game started" signal from the intro sequence. Arms the player
    /// and starts alien spawning; later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.player.arm();
        self.aliens.start_spawner(self.clock_ms, &self.config.enemy);
        tracing::info!("game started");
    }

    /// Start over: fresh stats, empty collections, re-armed timers. The
    /// surface size, pointer and start signal carry over.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.begin_session(rng);
        tracing::info!("session reset");
    }

    fn begin_session(&mut self, rng: &mut impl Rng) {
        self.clock_ms = 0.0;
        self.status = GameStatus::Playing;
        self.session = SessionState::new(self.config.player.starting_lives);

        let center = Vec2::new(self.viewport.x / 2.0, self.viewport.y / 2.0);
        self.player = Player::new(center, &self.config.player, self.clock_ms);
        if self.started {
            self.player.arm();
        }

        self.bullets.clear();
        self.coin_effects.clear();
        self.crit_effects.clear();
        self.explosions.clear();
        self.texts.clear();

        // Cancel every pending spawn before arming new ones.
        self.aliens.reset();
        self.boxes.reset();
        self.clouds.reset();

        self.clouds.setup_initial_clouds(self.viewport, &self.config.background, rng);
        self.clouds.start_spawner(self.clock_ms, &self.config.background);
        self.boxes.schedule_spawn(self.clock_ms, &self.config.mystery_box, rng);
        if self.started {
            self.aliens.start_spawner(self.clock_ms, &self.config.enemy);
        }

        self.hud.update_score(self.session.score);
        self.hud.update_coins(self.session.coins);
        self.hud.update_crit_chance(self.player.crit_chance);
        self.hud.update_lives(self.session.lives);
        self.hud.hide_game_over();
    }
}

fn check_surface(viewport: Vec2) -> Result<()> {
    if viewport.x > 0.0 && viewport.y > 0.0 {
        Ok(())
    } else {
        Err(GameError::SurfaceUnavailable {
            width: viewport.x,
            height: viewport.y,
        })
    }
}

// ── Input & accessors ────────────────────────────────────────────────────────

impl<H: Hud> Game<H> {
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Follow a surface resize. A degenerate size is ignored.
    pub fn resize(&mut self, viewport: Vec2) {
        if check_surface(viewport).is_err() {
            tracing::warn!(width = viewport.x, height = viewport.y, "ignoring empty resize");
            return;
        }
        self.viewport = viewport;
        self.player.recenter(viewport);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

impl<H: Hud> Game<H> {
    /// Advance the simulation by `dt_ms`. Does nothing once the game is over;
    /// the caller keeps rendering the frozen state.
    pub fn tick(&mut self, dt_ms: f64, rng: &mut impl Rng) {
        if self.is_game_over() {
            return;
        }
        let dt_ms = dt_ms.max(0.0);
        self.clock_ms += dt_ms;
        let frame_scale = (dt_ms / self.config.frame.reference_ms) as f32;

        // 1. Player
        self.player.recenter(self.viewport);
        self.player.update(self.pointer, dt_ms, &self.config.player);

        // 2. Auto-fire
        self.try_player_shoot(rng);

        // 3. Managers
        self.aliens.update(
            self.clock_ms,
            frame_scale,
            self.viewport,
            &self.config.enemy,
            rng,
        );
        self.boxes.update(
            self.clock_ms,
            dt_ms,
            frame_scale,
            self.viewport,
            &self.config.mystery_box,
            rng,
        );
        self.clouds.update(
            self.clock_ms,
            frame_scale,
            self.viewport,
            &self.config.background,
            rng,
        );

        // 4. Bullets & transient effects
        self.update_bullets(frame_scale);
        self.update_effects(dt_ms, frame_scale);

        // 5. Collisions, then fold their outcomes into the session
        let outcomes = self.check_bullet_collisions(rng);
        self.apply_outcomes(outcomes, rng);
        self.check_player_collisions();
    }

    fn try_player_shoot(&mut self, rng: &mut impl Rng) {
        if let Some(bullet) = self.player.try_fire(self.clock_ms, &self.config.player, rng) {
            self.bullets.push(bullet);
        }
    }

    fn update_bullets(&mut self, frame_scale: f32) {
        let viewport = self.viewport;
        for bullet in &mut self.bullets {
            bullet.update(frame_scale);
        }
        self.bullets.retain(|bullet| !bullet.is_off_screen(viewport));
    }

    fn update_effects(&mut self, dt_ms: f64, frame_scale: f32) {
        let growth = self.config.effects.crit_scale_growth;

        for effect in &mut self.coin_effects {
            effect.update(dt_ms, frame_scale);
        }
        self.coin_effects.retain(|e| !e.is_dead());

        for effect in &mut self.crit_effects {
            effect.update(dt_ms, frame_scale, growth);
        }
        self.crit_effects.retain(|e| !e.is_dead());

        for effect in &mut self.explosions {
            effect.update(dt_ms);
        }
        self.explosions.retain(|e| !e.is_dead());

        for effect in &mut self.texts {
            effect.update(dt_ms, frame_scale);
        }
        self.texts.retain(|e| !e.is_dead());
    }

    /// Resolve every bullet at most once: aliens first, in manager order,
    /// then whatever bullets are left go to the mystery boxes.
    fn check_bullet_collisions(&mut self, rng: &mut impl Rng) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        let aliens = self.aliens.aliens_mut();

        self.bullets.retain(|bullet| {
            let Some(idx) = aliens
                .iter()
                .position(|alien| bullet_hits_enemy(bullet, alien))
            else {
                return true;
            };

            let alien = &mut aliens[idx];
            alien.take_hit(bullet);
            if bullet.is_critical {
                outcomes.push(Outcome::EffectSpawned(EffectSpawn::CriticalHit { at: alien.pos }));
            }
            if alien.is_dead() {
                tracing::debug!(kind = ?alien.kind, points = alien.points, "alien destroyed");
                outcomes.push(Outcome::ScoreGained(alien.points));
                if alien.coins > 0 {
                    outcomes.push(Outcome::CoinsGained {
                        amount: alien.coins,
                        at: alien.pos,
                    });
                }
                aliens.remove(idx);
            }
            false
        });

        outcomes.extend(
            self.boxes.check_collisions(&mut self.bullets, &self.config.mystery_box, rng),
        );
        outcomes
    }

    fn apply_outcomes(&mut self, outcomes: Vec<Outcome>, rng: &mut impl Rng) {
        let mut score_changed = false;
        let mut coins_changed = false;
        let mut lives_changed = false;
        let mut crit_changed = false;

        for outcome in outcomes {
            match outcome {
                Outcome::ScoreGained(points) => {
                    self.session.score += points;
                    score_changed = true;
                }
                Outcome::CoinsGained { amount, at } => {
                    self.session.coins += amount;
                    self.spawn_coin_effects(at, amount, rng);
                    coins_changed = true;
                }
                Outcome::LifeGranted => {
                    let max = self.config.player.max_lives;
                    if self.session.lives < max {
                        self.session.lives = (self.session.lives + 1).min(max);
                        lives_changed = true;
                    }
                }
                Outcome::DamageIncreased(amount) => self.player.increase_damage(amount),
                Outcome::CritChanceIncreased(percent) => {
                    self.player.increase_crit_chance(percent);
                    crit_changed = true;
                }
                Outcome::EffectSpawned(effect) => self.spawn_effect(effect),
            }
        }

        if score_changed {
            self.hud.update_score(self.session.score);
        }
        if coins_changed {
            self.hud.update_coins(self.session.coins);
        }
        if lives_changed {
            self.hud.update_lives(self.session.lives);
        }
        if crit_changed {
            self.hud.update_crit_chance(self.player.crit_chance);
        }
    }

    fn spawn_coin_effects(&mut self, at: Vec2, amount: u32, rng: &mut impl Rng) {
        let fx = &self.config.effects;
        for _ in 0..amount.min(fx.max_coin_sprites) {
            let offset = Vec2::new(
                (rng.gen::<f32>() - 0.5) * fx.coin_scatter,
                (rng.gen::<f32>() - 0.5) * fx.coin_scatter,
            );
            self.coin_effects.push(CoinEffect::new(
                at + offset,
                fx.coin_rise_speed,
                fx.coin_lifetime_ms,
            ));
        }
    }

    fn spawn_effect(&mut self, effect: EffectSpawn) {
        let boxes = &self.config.mystery_box;
        match effect {
            EffectSpawn::CriticalHit { at } => self
                .crit_effects
                .push(CriticalHitEffect::new(at, self.config.effects.crit_lifetime_ms)),
            EffectSpawn::Explosion { at, size } => self
                .explosions
                .push(ExplosionEffect::new(at, size, boxes.explosion_lifespan_ms)),
            EffectSpawn::FloatingText { at, text } => self.texts.push(TextEffect::new(
                at,
                text,
                boxes.text_speed,
                boxes.text_lifespan_ms,
            )),
        }
    }

    /// Enemy contact costs one life unless the player is invincible.
    fn check_player_collisions(&mut self) {
        if self.player.invincible {
            return;
        }
        let touched = self
            .aliens
            .aliens()
            .iter()
            .any(|alien| player_hits_enemy(&self.player, alien));
        if !touched || !self.player.take_hit() {
            return;
        }

        self.session.lives = self.session.lives.saturating_sub(1);
        self.hud.update_lives(self.session.lives);
        tracing::info!(lives = self.session.lives, "player hit");

        if self.session.lives == 0 {
            self.trigger_game_over();
        }
    }

    fn trigger_game_over(&mut self) {
        if self.status == GameStatus::GameOver {
            return;
        }
        self.status = GameStatus::GameOver;
        self.hud.show_game_over(self.session.score, self.session.coins);
        tracing::info!(score = self.session.score, coins = self.session.coins, "game over");
    }
}
