use skyward_shooter::config::PlayerConfig;
use skyward_shooter::entities::Vec2;
use skyward_shooter::player::{ArmState, Player};

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn armed_player(config: &PlayerConfig) -> Player {
    let mut player = Player::new(Vec2::new(400.0, 300.0), config, 0.0);
    player.arm();
    player
}

// ── construction ──────────────────────────────────────────────────────────────

#[test]
fn new_player_uses_config_defaults() {
    let config = PlayerConfig::default();
    let player = Player::new(Vec2::new(400.0, 300.0), &config, 0.0);
    assert_eq!(player.state, ArmState::Idle);
    assert_eq!(player.damage, 1);
    assert_eq!(player.crit_chance, 0.0);
    assert!(!player.invincible);
    assert_relative_eq!(player.radius(), 10.0);
}

#[test]
fn recenter_follows_viewport() {
    let config = PlayerConfig::default();
    let mut player = Player::new(Vec2::ZERO, &config, 0.0);
    player.recenter(Vec2::new(640.0, 480.0));
    assert_eq!(player.pos, Vec2::new(320.0, 240.0));
}

// ── aiming ────────────────────────────────────────────────────────────────────

#[test]
fn idle_player_ignores_pointer() {
    let config = PlayerConfig::default();
    let mut player = Player::new(Vec2::new(400.0, 300.0), &config, 0.0);
    player.update(Vec2::new(400.0, 600.0), 16.0, &config);
    assert_eq!(player.rotation, 0.0);
}

#[test]
fn armed_player_snaps_to_pointer() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    player.update(Vec2::new(400.0, 0.0), 16.0, &config);
    assert_relative_eq!(player.rotation, -std::f32::consts::FRAC_PI_2);
    player.update(Vec2::new(500.0, 400.0), 16.0, &config);
    assert_relative_eq!(player.rotation, std::f32::consts::FRAC_PI_4);
}

// ── firing ────────────────────────────────────────────────────────────────────

#[test]
fn idle_player_cannot_fire() {
    let config = PlayerConfig::default();
    let mut player = Player::new(Vec2::new(400.0, 300.0), &config, 0.0);
    assert!(player.try_fire(10_000.0, &config, &mut seeded_rng()).is_none());
}

#[test]
fn fire_rate_gates_shots() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    let mut rng = seeded_rng();
    assert!(player.try_fire(299.0, &config, &mut rng).is_none());
    assert!(player.try_fire(300.0, &config, &mut rng).is_some());
    assert!(player.try_fire(450.0, &config, &mut rng).is_none());
    assert!(player.try_fire(600.0, &config, &mut rng).is_some());
}

#[test]
fn bullet_leaves_along_facing() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    player.aim_at(Vec2::new(400.0, 0.0));
    let bullet = player.try_fire(300.0, &config, &mut seeded_rng()).unwrap();
    assert_eq!(bullet.pos, player.pos);
    assert_relative_eq!(bullet.vel.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(bullet.vel.y, -10.0);
    assert_eq!(bullet.size, 10.0);
}

#[test]
fn bullet_damage_is_fixed_at_fire_time() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    let mut rng = seeded_rng();
    let first = player.try_fire(300.0, &config, &mut rng).unwrap();
    player.increase_damage(2);
    let second = player.try_fire(600.0, &config, &mut rng).unwrap();
    assert_eq!(first.damage, 1);
    assert_eq!(second.damage, 3);
}

#[test]
fn zero_crit_chance_never_crits() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    let mut rng = seeded_rng();
    for i in 1..=200 {
        let bullet = player.try_fire(i as f64 * 300.0, &config, &mut rng).unwrap();
        assert!(!bullet.is_critical);
    }
}

#[test]
fn full_crit_chance_always_crits() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    player.increase_crit_chance(150.0);
    let mut rng = seeded_rng();
    for i in 1..=200 {
        let bullet = player.try_fire(i as f64 * 300.0, &config, &mut rng).unwrap();
        assert!(bullet.is_critical);
    }
}

#[test]
fn crit_rate_tracks_percentage() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    player.increase_crit_chance(25.0);
    let mut rng = seeded_rng();
    let shots = 4_000;
    let crits = (1..=shots)
        .filter_map(|i| player.try_fire(i as f64 * 300.0, &config, &mut rng))
        .filter(|b| b.is_critical)
        .count();
    let share = crits as f64 / shots as f64;
    assert!((share - 0.25).abs() < 0.03, "crit share was {share}");
}

// ── invincibility ─────────────────────────────────────────────────────────────

#[test]
fn hit_grants_invincibility_and_blocks_repeat_hits() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    assert!(player.take_hit());
    assert!(player.invincible);
    assert!(!player.take_hit());
}

#[test]
fn invincibility_wears_off_after_duration() {
    let config = PlayerConfig::default();
    let mut player = Player::new(Vec2::new(400.0, 300.0), &config, 0.0);
    player.take_hit();
    player.update(Vec2::ZERO, 1_999.0, &config);
    assert!(player.invincible);
    player.update(Vec2::ZERO, 1.0, &config);
    assert!(!player.invincible);
    assert!(player.take_hit());
}

#[test]
fn flash_alternates_while_invincible() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    assert_eq!(player.flash_alpha(&config), 1.0);
    player.take_hit();
    assert_eq!(player.flash_alpha(&config), 0.5);
    player.update(Vec2::ZERO, 100.0, &config);
    assert_eq!(player.flash_alpha(&config), 1.0);
    player.update(Vec2::ZERO, 100.0, &config);
    assert_eq!(player.flash_alpha(&config), 0.5);
}

// ── stat growth ───────────────────────────────────────────────────────────────

#[test]
fn crit_chance_accumulates() {
    let config = PlayerConfig::default();
    let mut player = armed_player(&config);
    player.increase_crit_chance(2.5);
    player.increase_crit_chance(2.5);
    assert_relative_eq!(player.crit_chance, 5.0);
}
