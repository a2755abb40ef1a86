use std::thread;
use std::time::{Duration, Instant};

use skyward_shooter::assets::{AssetId, AssetStore, Sprite};
use skyward_shooter::compute::Game;
use skyward_shooter::config::{DisplayConfig, GameConfig};
use skyward_shooter::display::{self, cell_to_pixel, pixel_to_cell, viewport_for};
use skyward_shooter::entities::*;
use skyward_shooter::hud::{Hud, HudPanel};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_game() -> Game<HudPanel> {
    let mut rng = StdRng::seed_from_u64(42);
    let config = GameConfig::default();
    let viewport = viewport_for(100, 38, &config.display);
    Game::new(config, viewport, HudPanel::default(), &mut rng).unwrap()
}

fn render_to_string(game: &Game<HudPanel>, assets: &AssetStore) -> String {
    let mut out: Vec<u8> = Vec::new();
    display::render(&mut out, game, assets).unwrap();
    String::from_utf8_lossy(&out).into_owned()
}

fn small_alien(pos: Vec2) -> Alien {
    Alien {
        kind: AlienKind::Small,
        pos,
        vel: Vec2::ZERO,
        size: 50.0,
        health: 2,
        points: 10,
        coins: 1,
    }
}

// ── pixel ↔ cell mapping ──────────────────────────────────────────────────────

#[test]
fn viewport_scales_cells_to_pixels() {
    let display = DisplayConfig::default();
    assert_eq!(viewport_for(100, 40, &display), Vec2::new(800.0, 640.0));
}

#[test]
fn cell_center_maps_back_to_same_cell() {
    let display = DisplayConfig::default();
    let p = cell_to_pixel(12, 7, &display);
    assert_eq!(p, Vec2::new(100.0, 120.0));
    assert_eq!(pixel_to_cell(p, &display), (12, 7));
}

#[test]
fn negative_pixels_map_off_grid() {
    let display = DisplayConfig::default();
    assert_eq!(pixel_to_cell(Vec2::new(-1.0, 20.0), &display), (-1, 1));
}

// ── sprites ───────────────────────────────────────────────────────────────────

#[test]
fn sprite_parse_trims_trailing_blank_rows() {
    let sprite = Sprite::parse("ab\ncde  \n\n\n").unwrap();
    assert_eq!(sprite.height(), 2);
    assert_eq!(sprite.width(), 3);
    assert_eq!(sprite.rows()[1], "cde");
}

#[test]
fn blank_sprite_is_rejected() {
    assert!(Sprite::parse("").is_none());
    assert!(Sprite::parse("   \n\n").is_none());
}

#[test]
fn background_loader_delivers_present_files_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("coin.txt"), "¤\n").unwrap();
    let manifest = vec![
        (AssetId::Coin, "coin.txt".to_string()),
        (AssetId::Heart, "missing.txt".to_string()),
    ];

    let mut store = AssetStore::load_in_background(dir.path(), manifest);
    let deadline = Instant::now() + Duration::from_secs(5);
    while store.is_loading() && Instant::now() < deadline {
        store.poll();
        thread::sleep(Duration::from_millis(5));
    }

    assert!(!store.is_loading());
    assert!(store.is_ready(AssetId::Coin));
    assert!(!store.is_ready(AssetId::Heart));
    assert_eq!(store.get(AssetId::Coin).unwrap().rows()[0], "¤");
}

#[test]
fn unready_sprite_draws_fallback() {
    let mut game = make_game();
    game.aliens
        .aliens_mut()
        .push(small_alien(Vec2::new(200.0, 200.0)));
    let mut assets = AssetStore::empty();
    assets.insert(AssetId::AlienLarge, Sprite::parse("XYZ").unwrap());
    assert!(!assets.is_ready(AssetId::AlienSmall));

    let frame = render_to_string(&game, &assets);
    assert!(frame.contains('█'));
    assert!(!frame.contains("XYZ"));
}

#[test]
fn manifest_names_every_cloud_variant() {
    let config = GameConfig::default();
    let manifest = skyward_shooter::assets::manifest(&config);
    for i in 0..config.background.cloud_images.len() {
        assert!(manifest.iter().any(|(id, _)| *id == AssetId::Cloud(i)));
    }
    assert!(manifest
        .iter()
        .any(|(id, path)| *id == AssetId::AlienLarge && path == "alien_big.txt"));
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[test]
fn hud_panel_formats_stats() {
    let mut hud = HudPanel::default();
    hud.update_score(120);
    hud.update_coins(7);
    hud.update_crit_chance(2.5);
    assert_eq!(hud.score_text(), "SCORE: 120");
    assert_eq!(hud.coins_text(), "COINS: 7");
    assert_eq!(hud.crit_text(), "CRIT: 2.5%");
}

#[test]
fn hud_row_shows_stats_and_hearts() {
    let game = make_game();
    let frame = render_to_string(&game, &AssetStore::empty());
    assert!(frame.contains("SCORE: 0"));
    assert!(frame.contains("COINS: 0"));
    assert!(frame.contains("CRIT: 0%"));
    assert!(frame.contains("♥♥♥"));
    assert!(!frame.contains("♥♥♥♥"));
}

// ── overlays ──────────────────────────────────────────────────────────────────

#[test]
fn title_shows_until_started() {
    let mut game = make_game();
    let assets = AssetStore::empty();
    assert!(render_to_string(&game, &assets).contains("Press any key to begin"));
    game.start();
    assert!(!render_to_string(&game, &assets).contains("Press any key to begin"));
}

#[test]
fn game_over_overlay_shows_final_stats() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut game = make_game();
    game.session.lives = 1;
    game.session.score = 340;
    game.session.coins = 12;
    let center = game.viewport() * 0.5;
    game.aliens.aliens_mut().push(small_alien(center));
    game.tick(16.0, &mut rng);
    assert!(game.is_game_over());

    let frame = render_to_string(&game, &AssetStore::empty());
    assert!(frame.contains("GAME  OVER"));
    assert!(frame.contains("Final Score: 340"));
    assert!(frame.contains("Coins: 12"));
    assert!(frame.contains("R - Play Again"));
}

// ── entities ──────────────────────────────────────────────────────────────────

#[test]
fn alien_without_sprite_draws_fallback_block() {
    let mut game = make_game();
    game.aliens
        .aliens_mut()
        .push(small_alien(Vec2::new(200.0, 200.0)));
    let frame = render_to_string(&game, &AssetStore::empty());
    assert!(frame.contains('█'));
}

#[test]
fn alien_with_sprite_draws_sprite() {
    let mut game = make_game();
    game.aliens
        .aliens_mut()
        .push(small_alien(Vec2::new(200.0, 200.0)));
    let mut assets = AssetStore::empty();
    assets.insert(AssetId::AlienSmall, Sprite::parse("XYZ").unwrap());
    let frame = render_to_string(&game, &assets);
    assert!(frame.contains("XYZ"));
    assert!(!frame.contains('█'));
}

#[test]
fn critical_bullet_uses_its_own_glyph() {
    let mut game = make_game();
    game.bullets.push(Bullet {
        pos: Vec2::new(100.0, 100.0),
        vel: Vec2::ZERO,
        size: 10.0,
        damage: 1,
        is_critical: true,
    });
    let frame = render_to_string(&game, &AssetStore::empty());
    assert!(frame.contains('✦'));
    assert!(!frame.contains('•'));
}

#[test]
fn entities_past_the_edges_are_clipped() {
    let mut game = make_game();
    game.aliens
        .aliens_mut()
        .push(small_alien(Vec2::new(-20.0, -20.0)));
    game.aliens
        .aliens_mut()
        .push(small_alien(Vec2::new(810.0, 615.0)));
    game.texts.push(TextEffect::new(
        Vec2::new(8.0, 300.0),
        "+20 Coins".into(),
        0.4,
        1_500.0,
    ));
    let frame = render_to_string(&game, &AssetStore::empty());
    assert!(frame.contains("Coins"));
}

#[test]
fn floating_text_is_drawn_while_visible() {
    let mut game = make_game();
    let mut text = TextEffect::new(Vec2::new(300.0, 300.0), "+1 Heart".into(), 0.4, 1_000.0);
    let assets = AssetStore::empty();
    game.texts.push(text.clone());
    assert!(render_to_string(&game, &assets).contains("+1 Heart"));

    text.elapsed_ms = 950.0;
    game.texts.clear();
    game.texts.push(text);
    assert!(!render_to_string(&game, &assets).contains("+1 Heart"));
}
