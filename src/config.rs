//! Gameplay tuning.
//!
//! Every number the simulation uses lives here, with defaults matching the
//! final version of the arcade game.  Hosts may override any subset from a
//! JSON file; missing fields keep their defaults.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::AssetId;
use crate::error::{Error, Result};

/// Upper bound on `enemies.rows * enemies.cols`.
pub const MAX_ENEMIES: u32 = 4096;

// ── Cooldown ranges ──────────────────────────────────────────────────────────

/// Inclusive range of seconds a randomized cooldown is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooldownRange {
    pub min: f64,
    pub max: f64,
}

impl CooldownRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a cooldown uniformly from `[min, max]`.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{name}: bounds must be finite and non-negative (got {}..{})",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Starting position (centre of the bottom strip).
    pub spawn: Vec2,
    /// Horizontal units moved per tick while a direction is held.
    pub speed: f32,
    /// Seconds between player shots.
    pub fire_cooldown: f64,
    /// Keep the ship inside `[0, world.width]`.  When off, the ship can slide
    /// off-screen.
    pub clamp_to_world: bool,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(800.0, 900.0),
            speed: 7.0,
            fire_cooldown: 0.3,
            clamp_to_world: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Units per tick, upward.
    pub player_speed: f32,
    /// Units per tick, downward.
    pub enemy_speed: f32,
    pub cull_offscreen: bool,
    /// How far outside the world a projectile may drift before it is dropped.
    pub cull_margin: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            player_speed: 10.0,
            enemy_speed: 5.0,
            cull_offscreen: true,
            cull_margin: 32.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub rows: u32,
    pub cols: u32,
    /// Position of the top-left enemy.
    pub origin: Vec2,
    /// Distance between neighbouring columns (x) and rows (y).
    pub spacing: Vec2,
    /// Cooldown each enemy starts with.
    pub initial_cooldown: CooldownRange,
    /// Cooldown re-drawn after each shot.
    pub reload_cooldown: CooldownRange,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 8,
            origin: Vec2::new(180.0, 30.0),
            spacing: Vec2::new(130.0, 90.0),
            initial_cooldown: CooldownRange::new(3.0, 10.0),
            reload_cooldown: CooldownRange::new(2.0, 5.0),
        }
    }
}

/// The global timer deciding when the frontline gets to shoot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolleyConfig {
    pub initial_cooldown: f64,
    pub reload_cooldown: CooldownRange,
}

impl Default for VolleyConfig {
    fn default() -> Self {
        Self {
            initial_cooldown: 2.0,
            reload_cooldown: CooldownRange::new(2.0, 5.0),
        }
    }
}

/// Glyph the terminal host draws for each asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub ship: String,
    pub alien: String,
    pub player_bullet: String,
    pub enemy_bullet: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            ship: "▲".to_string(),
            alien: "Ѫ".to_string(),
            player_bullet: "║".to_string(),
            enemy_bullet: "↓".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn glyph(&self, asset: AssetId) -> &str {
        match asset {
            AssetId::Ship => &self.ship,
            AssetId::Alien => &self.alien,
            AssetId::PlayerBullet => &self.player_bullet,
            AssetId::EnemyBullet => &self.enemy_bullet,
        }
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub ship: ShipConfig,
    pub projectiles: ProjectileConfig,
    pub enemies: EnemyConfig,
    pub volley: VolleyConfig,
    pub collision_radius: f32,
    pub assets: AssetConfig,
    /// Ring the terminal bell on `AudioCue`s.
    pub audio_bell: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            ship: ShipConfig::default(),
            projectiles: ProjectileConfig::default(),
            enemies: EnemyConfig::default(),
            volley: VolleyConfig::default(),
            collision_radius: 50.0,
            assets: AssetConfig::default(),
            audio_bell: false,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        positive("world.width", self.world.width as f64)?;
        positive("world.height", self.world.height as f64)?;
        positive("ship.speed", self.ship.speed as f64)?;
        positive("ship.fire_cooldown", self.ship.fire_cooldown)?;
        positive("projectiles.player_speed", self.projectiles.player_speed as f64)?;
        positive("projectiles.enemy_speed", self.projectiles.enemy_speed as f64)?;
        positive("collision_radius", self.collision_radius as f64)?;
        positive("volley.initial_cooldown", self.volley.initial_cooldown)?;

        if !self.projectiles.cull_margin.is_finite() || self.projectiles.cull_margin < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "projectiles.cull_margin must be finite and non-negative (got {})",
                self.projectiles.cull_margin
            )));
        }
        if !self.ship.spawn.is_finite()
            || !self.enemies.origin.is_finite()
            || !self.enemies.spacing.is_finite()
        {
            return Err(Error::InvalidConfig(
                "positions and spacing must be finite".to_string(),
            ));
        }
        let grid = self.enemies.rows.checked_mul(self.enemies.cols).unwrap_or(u32::MAX);
        if grid == 0 || grid > MAX_ENEMIES {
            return Err(Error::InvalidConfig(format!(
                "enemy grid must hold 1..={MAX_ENEMIES} enemies (got {}x{})",
                self.enemies.rows, self.enemies.cols
            )));
        }

        self.enemies.initial_cooldown.validate("enemies.initial_cooldown")?;
        self.enemies.reload_cooldown.validate("enemies.reload_cooldown")?;
        self.volley.reload_cooldown.validate("volley.reload_cooldown")?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be finite and positive (got {value})"
        )))
    }
}
