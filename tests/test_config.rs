use std::io::Write;
use std::path::Path;

use skyward_shooter::config::{self, GameConfig};
use skyward_shooter::entities::PowerUpKind;
use skyward_shooter::error::GameError;

use tempfile::NamedTempFile;

fn write_config(toml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    file
}

// ── defaults ──────────────────────────────────────────────────────────────────

#[test]
fn defaults_validate() {
    assert!(GameConfig::default().validate().is_ok());
}

#[test]
fn defaults_match_constant_table() {
    let c = GameConfig::default();
    assert_eq!(c.player.fire_rate_ms, 300.0);
    assert_eq!(c.player.starting_lives, 3);
    assert_eq!(c.player.max_lives, 6);
    assert_eq!(c.player.invincibility_ms, 2_000.0);
    assert_eq!(c.enemy.spawn_interval_ms, 1_000.0);
    assert_eq!(c.enemy.large.health, 4);
    assert_eq!(c.enemy.small.points, 10);
    assert_eq!(c.mystery_box.min_spawn_interval_ms, 25_000.0);
    assert_eq!(c.mystery_box.max_spawn_interval_ms, 35_000.0);
    assert_eq!(c.mystery_box.coins, 5);
    assert_eq!(c.background.variant_count(), 3);

    let weights: u32 = c.mystery_box.powerups.iter().map(|p| p.weight).sum();
    assert_eq!(weights, 90);
}

// ── loading ───────────────────────────────────────────────────────────────────

#[test]
fn partial_file_keeps_other_defaults() {
    let file = write_config("[player]\nmax_lives = 8\n\n[enemy]\nspawn_interval_ms = 750.0\n");
    let c = config::load(file.path()).unwrap();
    assert_eq!(c.player.max_lives, 8);
    assert_eq!(c.player.fire_rate_ms, 300.0);
    assert_eq!(c.enemy.spawn_interval_ms, 750.0);
    assert_eq!(c.enemy.large.points, 15);
}

#[test]
fn powerup_table_can_be_replaced() {
    let file = write_config(
        r#"
[[mystery_box.powerups]]
kind = "heart"
text = "+1 Heart"
weight = 1

[[mystery_box.powerups]]
kind = "coins20"
text = "+20 Coins"
weight = 3
value = 20.0
"#,
    );
    let c = config::load(file.path()).unwrap();
    let kinds: Vec<PowerUpKind> = c.mystery_box.powerups.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![PowerUpKind::Heart, PowerUpKind::Coins20]);
    assert_eq!(c.mystery_box.powerups[0].value, 0.0);
    assert_eq!(c.mystery_box.powerups[1].value, 20.0);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, GameError::ConfigRead { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[player\nsize = ");
    let err = config::load(file.path()).unwrap_err();
    assert!(matches!(err, GameError::ConfigParse { .. }));
}

#[test]
fn unknown_powerup_kind_is_a_parse_error() {
    let file = write_config(
        "[[mystery_box.powerups]]\nkind = \"shield\"\ntext = \"Shield\"\nweight = 1\n",
    );
    let err = config::load(file.path()).unwrap_err();
    assert!(matches!(err, GameError::ConfigParse { .. }));
}

// ── validation ────────────────────────────────────────────────────────────────

#[test]
fn inverted_box_window_is_rejected() {
    let file = write_config(
        "[mystery_box]\nmin_spawn_interval_ms = 40000.0\nmax_spawn_interval_ms = 30000.0\n",
    );
    let err = config::load(file.path()).unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn starting_lives_above_max_is_rejected() {
    let mut c = GameConfig::default();
    c.player.starting_lives = 7;
    assert!(matches!(c.validate(), Err(GameError::InvalidConfig(_))));
}

#[test]
fn zero_weight_tables_are_rejected() {
    let mut c = GameConfig::default();
    c.enemy.large.weight = 0;
    c.enemy.small.weight = 0;
    assert!(c.validate().is_err());

    let mut c = GameConfig::default();
    for p in &mut c.mystery_box.powerups {
        p.weight = 0;
    }
    assert!(c.validate().is_err());
}

#[test]
fn weights_near_u32_max_are_accepted() {
    let mut c = GameConfig::default();
    c.enemy.large.weight = u32::MAX / 2 + 1;
    c.enemy.small.weight = u32::MAX / 2 + 1;
    for p in &mut c.mystery_box.powerups {
        p.weight = u32::MAX - 1;
    }
    assert!(c.validate().is_ok());
}

#[test]
fn huge_weights_load_from_file() {
    let file = write_config(&format!(
        "[enemy.large]\nweight = {max}\n\n[enemy.small]\nweight = {max}\n",
        max = u32::MAX
    ));
    let c = config::load(file.path()).unwrap();
    assert_eq!(c.enemy.large.weight, u32::MAX);
    assert_eq!(c.enemy.small.weight, u32::MAX);
}

#[test]
fn non_positive_reference_frame_is_rejected() {
    let mut c = GameConfig::default();
    c.frame.reference_ms = 0.0;
    assert!(c.validate().is_err());
}

#[test]
fn missing_cloud_variants_are_rejected() {
    let mut c = GameConfig::default();
    c.background.cloud_speeds.clear();
    assert!(c.validate().is_err());
}
