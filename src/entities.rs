//! All game entity types — pure data, no rules.
//!
//! Positions are world units with y growing downward (toward the player).
//! Timestamps are seconds since the simulation started.

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ── Shared records ────────────────────────────────────────────────────────────

/// Position and per-tick velocity, common to every entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, vel: Vec2::ZERO }
    }
}

/// Cooldown state shared by everything that shoots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireGate {
    /// Seconds that must pass between two shots.
    pub cooldown: f64,
    /// `None` until the first shot; a fresh gate is ready immediately.
    pub last_shot: Option<f64>,
}

impl FireGate {
    pub fn ready_now(cooldown: f64) -> Self {
        Self { cooldown, last_shot: None }
    }

    /// A gate whose window starts at `now` rather than already being open.
    pub fn armed_at(cooldown: f64, now: f64) -> Self {
        Self { cooldown, last_shot: Some(now) }
    }
}

// ── Host-facing identifiers ───────────────────────────────────────────────────

/// What the host should draw for an entity.  Resolved to real resources by
/// the host once at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    Ship,
    Alien,
    PlayerBullet,
    EnemyBullet,
}

/// Fire-and-forget sound requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    PlayerShot,
}

/// Logical key state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// One drawable item handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub asset: AssetId,
    pub pos: Vec2,
}

// ── Combatants & projectiles ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub body: Body,
    /// Units moved per tick while a direction is held.
    pub speed: f32,
    pub gate: FireGate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub gate: FireGate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub body: Body,
}

impl Projectile {
    /// Spawned at `origin`, travelling up at `speed` units per tick.
    pub fn player(origin: Vec2, speed: f32) -> Self {
        Self {
            body: Body { pos: origin, vel: Vec2::new(0.0, -speed) },
        }
    }

    /// Spawned at `origin`, travelling down at `speed` units per tick.
    pub fn enemy(origin: Vec2, speed: f32) -> Self {
        Self {
            body: Body { pos: origin, vel: Vec2::new(0.0, speed) },
        }
    }
}

// ── Sum type over everything on screen ────────────────────────────────────────

/// Borrowed view of any entity, used wherever all kinds are handled alike.
#[derive(Clone, Copy, Debug)]
pub enum Entity<'a> {
    Ship(&'a Ship),
    Enemy(&'a Enemy),
    PlayerProjectile(&'a Projectile),
    EnemyProjectile(&'a Projectile),
}

impl<'a> Entity<'a> {
    pub fn body(&self) -> &'a Body {
        match *self {
            Entity::Ship(s) => &s.body,
            Entity::Enemy(e) => &e.body,
            Entity::PlayerProjectile(p) | Entity::EnemyProjectile(p) => &p.body,
        }
    }

    pub fn asset(&self) -> AssetId {
        match self {
            Entity::Ship(_) => AssetId::Ship,
            Entity::Enemy(_) => AssetId::Alien,
            Entity::PlayerProjectile(_) => AssetId::PlayerBullet,
            Entity::EnemyProjectile(_) => AssetId::EnemyBullet,
        }
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            asset: self.asset(),
            pos: self.body().pos,
        }
    }
}
