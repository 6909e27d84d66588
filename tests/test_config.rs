use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::config::{CooldownRange, GameConfig, MAX_ENEMIES};
use space_invaders::entities::AssetId;
use space_invaders::Error;

// ── Defaults ──────────────────────────────────────────────────────────────────

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    config.validate().expect("defaults validate");
    assert_eq!(config.world.width, 1600.0);
    assert_eq!(config.world.height, 1000.0);
    assert_eq!(config.enemies.rows, 6);
    assert_eq!(config.enemies.cols, 8);
    assert_eq!(config.enemies.origin, Vec2::new(180.0, 30.0));
    assert_eq!(config.enemies.spacing, Vec2::new(130.0, 90.0));
    assert_eq!(config.enemies.initial_cooldown, CooldownRange::new(3.0, 10.0));
    assert_eq!(config.volley.reload_cooldown, CooldownRange::new(2.0, 5.0));
}

#[test]
fn asset_glyphs_resolve() {
    let assets = GameConfig::default().assets;
    assert_eq!(assets.glyph(AssetId::Ship), "▲");
    assert_eq!(assets.glyph(AssetId::EnemyBullet), "↓");
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[test]
fn empty_json_gives_defaults() {
    let config = GameConfig::from_json_str("{}").unwrap();
    assert_eq!(config, GameConfig::default());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r#"{
        "collision_radius": 30.0,
        "ship": { "spawn": [100.0, 700.0] },
        "enemies": { "reload_cooldown": { "min": 1.0, "max": 1.5 } }
    }"#;
    let config = GameConfig::from_json_str(json).unwrap();
    assert_eq!(config.collision_radius, 30.0);
    assert_eq!(config.ship.spawn, Vec2::new(100.0, 700.0));
    assert_eq!(config.ship.speed, 7.0);
    assert_eq!(config.enemies.reload_cooldown, CooldownRange::new(1.0, 1.5));
    assert_eq!(config.enemies.rows, 6);
}

#[test]
fn malformed_json_is_parse_error() {
    let err = GameConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn load_missing_file_is_io_error() {
    let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn load_reads_file() {
    let path = std::env::temp_dir().join(format!("space_invaders_cfg_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "audio_bell": true, "world": { "width": 800.0 } }"#).unwrap();
    let config = GameConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(config.audio_bell);
    assert_eq!(config.world.width, 800.0);
    assert_eq!(config.world.height, 1000.0);
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn rejects_empty_grid() {
    let err = GameConfig::from_json_str(r#"{ "enemies": { "rows": 0 } }"#).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn rejects_oversized_grid() {
    for json in [
        r#"{ "enemies": { "rows": 65536, "cols": 65536 } }"#,
        r#"{ "enemies": { "rows": 4097, "cols": 1 } }"#,
    ] {
        let err = GameConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{json} should be rejected");
    }
}

#[test]
fn accepts_grid_at_enemy_limit() {
    let config = GameConfig::from_json_str(r#"{ "enemies": { "rows": 64, "cols": 64 } }"#).unwrap();
    assert_eq!(config.enemies.rows * config.enemies.cols, MAX_ENEMIES);
}

#[test]
fn rejects_inverted_cooldown_range() {
    let json = r#"{ "volley": { "reload_cooldown": { "min": 5.0, "max": 2.0 } } }"#;
    let err = GameConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("volley.reload_cooldown")));
}

#[test]
fn rejects_non_positive_values() {
    for json in [
        r#"{ "collision_radius": 0.0 }"#,
        r#"{ "ship": { "speed": -1.0 } }"#,
        r#"{ "projectiles": { "player_speed": 0.0 } }"#,
        r#"{ "world": { "height": 0.0 } }"#,
        r#"{ "projectiles": { "cull_margin": -5.0 } }"#,
    ] {
        let err = GameConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{json} should be rejected");
    }
}

// ── CooldownRange ─────────────────────────────────────────────────────────────

#[test]
fn cooldown_sample_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(1);
    let range = CooldownRange::new(2.0, 5.0);
    for _ in 0..1000 {
        let v = range.sample(&mut rng);
        assert!((2.0..=5.0).contains(&v));
    }
}

#[test]
fn degenerate_range_returns_min() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(CooldownRange::new(4.0, 4.0).sample(&mut rng), 4.0);
}
