//! Rendering layer. All terminal I/O lives here.
//!
//! Each frame is drawn back-to-front from an immutable view of the game:
//! clouds, boxes, aliens, player, bullets, effects, then the HUD row and any
//! overlay. Simulation pixels map onto terminal cells through
//! `DisplayConfig`; sprites come from the `AssetStore` and every sprite has a
//! procedural fallback for when it is not ready.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{AssetId, AssetStore, Sprite};
use crate::compute::Game;
use crate::config::DisplayConfig;
use crate::entities::{Alien, AlienKind, Bullet, Cloud, MysteryBox, Vec2};
use crate::hud::HudPanel;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_CLOUD: Color = Color::DarkGrey;
const C_BOX: Color = Color::Magenta;
const C_ALIEN_LARGE: Color = Color::Green;
const C_ALIEN_SMALL: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_BULLET_CRIT: Color = Color::Red;
const C_COIN: Color = Color::Yellow;
const C_CRIT_TEXT: Color = Color::Red;
const C_EXPLOSION: Color = Color::Yellow;
const C_POWERUP_TEXT: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_COINS: Color = Color::Yellow;
const C_HUD_CRIT: Color = Color::Red;
const C_HUD_LIVES: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Alpha below which a fading entity is no longer drawn.
const MIN_VISIBLE_ALPHA: f32 = 0.15;

// ── Pixel ↔ cell mapping ──────────────────────────────────────────────────────

/// Simulation viewport covering a `cols` × `rows` terminal.
pub fn viewport_for(cols: u16, rows: u16, display: &DisplayConfig) -> Vec2 {
    Vec2::new(
        f32::from(cols) * display.cell_width_px,
        f32::from(rows) * display.cell_height_px,
    )
}

/// Pixel position at the center of a terminal cell.
pub fn cell_to_pixel(col: u16, row: u16, display: &DisplayConfig) -> Vec2 {
    Vec2::new(
        (f32::from(col) + 0.5) * display.cell_width_px,
        (f32::from(row) + 0.5) * display.cell_height_px,
    )
}

/// Cell containing a pixel position (may be off-grid).
pub fn pixel_to_cell(pos: Vec2, display: &DisplayConfig) -> (i32, i32) {
    (
        (pos.x / display.cell_width_px).floor() as i32,
        (pos.y / display.cell_height_px).floor() as i32,
    )
}

/// Colour for a fading entity, or `None` once it is too faint to show.
fn shade(color: Color, alpha: f32) -> Option<Color> {
    if alpha < MIN_VISIBLE_ALPHA {
        None
    } else if alpha < 0.6 {
        Some(Color::DarkGrey)
    } else {
        Some(color)
    }
}

// ── Clipped cell writer ───────────────────────────────────────────────────────

struct Painter<'a, W: Write> {
    out: &'a mut W,
    cols: i32,
    rows: i32,
    display: &'a DisplayConfig,
}

impl<'a, W: Write> Painter<'a, W> {
    /// Write `text` starting at a cell, dropping whatever falls off-grid.
    fn put(&mut self, col: i32, row: i32, text: &str, color: Color) -> std::io::Result<()> {
        if row < 0 || row >= self.rows {
            return Ok(());
        }
        let visible: String = text
            .chars()
            .enumerate()
            .filter(|(i, _)| (0..self.cols).contains(&(col + *i as i32)))
            .map(|(_, ch)| ch)
            .collect();
        if visible.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }

    /// Write `text` horizontally centered on a pixel position.
    fn put_centered(&mut self, pos: Vec2, text: &str, color: Color) -> std::io::Result<()> {
        let (col, row) = pixel_to_cell(pos, self.display);
        let half = text.chars().count() as i32 / 2;
        self.put(col - half, row, text, color)
    }

    /// Blit a sprite centered on a pixel position. Spaces stay transparent.
    fn blit(&mut self, sprite: &Sprite, pos: Vec2, color: Color) -> std::io::Result<()> {
        let (col, row) = pixel_to_cell(pos, self.display);
        let left = col - sprite.width() as i32 / 2;
        let top = row - sprite.height() as i32 / 2;
        for (dy, line) in sprite.rows().iter().enumerate() {
            let mut offset = 0;
            for run in line.split(' ') {
                if !run.is_empty() {
                    self.put(left + offset, top + dy as i32, run, color)?;
                }
                offset += run.chars().count() as i32 + 1;
            }
        }
        Ok(())
    }

    /// Fill the cells of a pixel-space circle. `sparse` leaves a dotted
    /// pattern so large shapes don't swamp the screen.
    fn fill_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        glyph: &str,
        color: Color,
        sparse: bool,
    ) -> std::io::Result<()> {
        let (min_col, min_row) = pixel_to_cell(center - Vec2::new(radius, radius), self.display);
        let (max_col, max_row) = pixel_to_cell(center + Vec2::new(radius, radius), self.display);
        for row in min_row.max(0)..=max_row.min(self.rows - 1) {
            for col in min_col.max(0)..=max_col.min(self.cols - 1) {
                if sparse && (col + row) % 3 != 0 {
                    continue;
                }
                let cell = cell_to_pixel(col as u16, row as u16, self.display);
                if cell.distance(center) <= radius {
                    self.put(col, row, glyph, color)?;
                }
            }
        }
        Ok(())
    }

    /// Outline of a pixel-space circle.
    fn ring(
        &mut self,
        center: Vec2,
        radius: f32,
        glyph: &str,
        color: Color,
    ) -> std::io::Result<()> {
        const STEPS: usize = 16;
        for i in 0..STEPS {
            let angle = i as f32 / STEPS as f32 * 2.0 * PI;
            let p = center + Vec2::from_angle(angle) * radius;
            self.put_centered(p, glyph, color)?;
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game<HudPanel>,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let display = &game.config().display;
    let viewport = game.viewport();
    let mut p = Painter {
        out,
        cols: (viewport.x / display.cell_width_px).round() as i32,
        rows: (viewport.y / display.cell_height_px).round() as i32,
        display,
    };

    p.out.queue(terminal::Clear(terminal::ClearType::All))?;

    for cloud in game.clouds.clouds() {
        draw_cloud(&mut p, cloud, assets)?;
    }
    for mystery_box in game.boxes.boxes() {
        draw_mystery_box(&mut p, mystery_box, game, assets)?;
    }
    for alien in game.aliens.aliens() {
        draw_alien(&mut p, alien, assets)?;
    }
    draw_player(&mut p, game, assets)?;
    for bullet in &game.bullets {
        draw_bullet(&mut p, bullet, assets)?;
    }
    draw_effects(&mut p, game, assets)?;

    draw_hud(&mut p, game.hud(), assets)?;
    if let Some((score, coins)) = game.hud().game_over {
        draw_game_over(&mut p, score, coins)?;
    } else if !game.is_started() {
        draw_title(&mut p)?;
    }

    p.out.queue(style::ResetColor)?;
    p.out.queue(cursor::MoveTo(0, (p.rows - 1).max(0) as u16))?;
    p.out.flush()?;
    Ok(())
}

/// The sprite for `id` once its load has finished; `None` means draw the
/// procedural fallback.
fn ready_sprite(assets: &AssetStore, id: AssetId) -> Option<&Sprite> {
    if assets.is_ready(id) {
        assets.get(id)
    } else {
        None
    }
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_cloud<W: Write>(
    p: &mut Painter<W>,
    cloud: &Cloud,
    assets: &AssetStore,
) -> std::io::Result<()> {
    match ready_sprite(assets, AssetId::Cloud(cloud.variant)) {
        Some(sprite) => p.blit(sprite, cloud.pos, C_CLOUD),
        None => p.fill_circle(cloud.pos, cloud.size / 2.0, "·", C_CLOUD, true),
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_mystery_box<W: Write>(
    p: &mut Painter<W>,
    mystery_box: &MysteryBox,
    game: &Game<HudPanel>,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let cfg = &game.config().mystery_box;
    let Some(color) = shade(C_BOX, mystery_box.alpha(cfg.fade_window_ms)) else {
        return Ok(());
    };
    if let Some(sprite) = ready_sprite(assets, AssetId::MysteryBox) {
        return p.blit(sprite, mystery_box.pos, color);
    }

    // Spin through the four quadrant glyphs; pulse widens the frame.
    const SPIN: [char; 4] = ['◰', '◳', '◲', '◱'];
    let quarter = (mystery_box.rotation / FRAC_PI_2).floor().rem_euclid(4.0) as usize;
    let glyph = SPIN[quarter % 4];
    let label = if mystery_box.pulse(cfg.pulse_speed) > 1.0 {
        format!("[ {glyph} ]")
    } else {
        format!("[{glyph}]")
    };
    p.put_centered(mystery_box.pos, &label, color)
}

fn draw_alien<W: Write>(
    p: &mut Painter<W>,
    alien: &Alien,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let (id, color) = match alien.kind {
        AlienKind::Large => (AssetId::AlienLarge, C_ALIEN_LARGE),
        AlienKind::Small => (AssetId::AlienSmall, C_ALIEN_SMALL),
    };
    match ready_sprite(assets, id) {
        Some(sprite) => p.blit(sprite, alien.pos, color),
        None => p.fill_circle(alien.pos, alien.radius(), "█", color, false),
    }
}

/// Arrow for a facing angle, snapped to the nearest 45°.
fn direction_glyph(rotation: f32) -> &'static str {
    const ARROWS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    let octant = (rotation / FRAC_PI_4).round().rem_euclid(8.0) as usize;
    ARROWS[octant % 8]
}

fn draw_player<W: Write>(
    p: &mut Painter<W>,
    game: &Game<HudPanel>,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let player = &game.player;
    let Some(color) = shade(C_PLAYER, player.flash_alpha(&game.config().player)) else {
        return Ok(());
    };
    let arrow = direction_glyph(player.rotation);

    if let Some(sprite) = ready_sprite(assets, AssetId::Player) {
        p.blit(sprite, player.pos, color)?;
    } else {
        p.put_centered(player.pos, "▲", color)?;
    }
    // Nose marker one ship length out along the facing direction.
    let nose = player.pos + Vec2::from_angle(player.rotation) * player.size;
    p.put_centered(nose, arrow, color)
}

fn draw_bullet<W: Write>(
    p: &mut Painter<W>,
    bullet: &Bullet,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let (id, color, fallback) = if bullet.is_critical {
        (AssetId::CritProjectile, C_BULLET_CRIT, "✦")
    } else {
        (AssetId::Projectile, C_BULLET, "•")
    };
    match ready_sprite(assets, id) {
        Some(sprite) => p.blit(sprite, bullet.pos, color),
        None => p.put_centered(bullet.pos, fallback, color),
    }
}

fn draw_effects<W: Write>(
    p: &mut Painter<W>,
    game: &Game<HudPanel>,
    assets: &AssetStore,
) -> std::io::Result<()> {
    for coin in &game.coin_effects {
        if let Some(color) = shade(C_COIN, coin.alpha()) {
            match ready_sprite(assets, AssetId::Coin) {
                Some(sprite) => p.blit(sprite, coin.pos, color)?,
                None => p.put_centered(coin.pos, "●", color)?,
            }
        }
    }

    for crit in &game.crit_effects {
        if let Some(color) = shade(C_CRIT_TEXT, crit.alpha()) {
            // Text grows by spreading its letters out.
            let text = if crit.scale >= 2.0 { "C R I T !" } else { "CRIT!" };
            p.put_centered(crit.pos, text, color)?;
        }
    }

    for explosion in &game.explosions {
        let Some(color) = shade(C_EXPLOSION, explosion.alpha()) else {
            continue;
        };
        match ready_sprite(assets, AssetId::Explosion) {
            Some(sprite) => p.blit(sprite, explosion.pos, color)?,
            None => {
                let progress = 1.0 - explosion.alpha();
                let radius = explosion.size / 2.0 * (0.5 + 0.5 * progress);
                p.ring(explosion.pos, radius, "*", color)?;
            }
        }
    }

    for text in &game.texts {
        if let Some(color) = shade(C_POWERUP_TEXT, text.alpha()) {
            p.put_centered(text.pos, &text.text, color)?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    p: &mut Painter<W>,
    hud: &HudPanel,
    assets: &AssetStore,
) -> std::io::Result<()> {
    let score = hud.score_text();
    let coins = hud.coins_text();
    let crit = hud.crit_text();

    let mut col = 1;
    p.put(col, 0, &score, C_HUD_SCORE)?;
    col += score.chars().count() as i32 + 3;
    p.put(col, 0, &coins, C_HUD_COINS)?;
    col += coins.chars().count() as i32 + 3;
    p.put(col, 0, &crit, C_HUD_CRIT)?;

    // Lives, right-aligned. A loaded heart sprite supplies the glyph.
    let heart: String = ready_sprite(assets, AssetId::Heart)
        .and_then(|s| s.rows().first())
        .and_then(|row| row.trim().chars().next())
        .unwrap_or('♥')
        .to_string();
    let hearts = heart.repeat(hud.lives as usize);
    let rx = p.cols - hearts.chars().count() as i32 - 1;
    p.put(rx, 0, &hearts, C_HUD_LIVES)
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered_lines<W: Write>(
    p: &mut Painter<W>,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = p.cols / 2;
    let start_row = p.rows / 2 - lines.len() as i32 / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx - msg.chars().count() as i32 / 2;
        p.put(col, start_row + i as i32, msg, *color)?;
    }
    Ok(())
}

fn draw_title<W: Write>(p: &mut Painter<W>) -> std::io::Result<()> {
    let lines = [
        ("★  SKYWARD  SHOOTER  ★".to_string(), Color::Cyan),
        ("Aim with the mouse, your ship fires on its own".to_string(), Color::White),
        ("Shoot the ? boxes for power-ups".to_string(), Color::DarkGrey),
        ("Press any key to begin".to_string(), Color::Yellow),
    ];
    draw_centered_lines(p, &lines)
}

fn draw_game_over<W: Write>(p: &mut Painter<W>, score: u32, coins: u32) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER    ║".to_string(), Color::Red),
        ("╚══════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {score}"), Color::Yellow),
        (format!("Coins: {coins}"), Color::Yellow),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered_lines(p, &lines)?;

    p.put(1, p.rows - 1, "Mouse : Aim   R : Restart   Q : Quit", C_HINT)
}
