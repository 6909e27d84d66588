//! Game rules.
//!
//! Small functions over the entity records in `entities`.  `CombatSimulation`
//! strings them together into a tick; each one is usable (and tested) on its
//! own.  Randomness only ever comes through an injected `Rng`.

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::config::{CooldownRange, EnemyConfig, ShipConfig, WorldConfig};
use crate::entities::{Body, Enemy, FireGate, InputState, Projectile, Ship};

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn spawn_ship(config: &ShipConfig) -> Ship {
    Ship {
        body: Body::at(config.spawn),
        speed: config.speed,
        gate: FireGate::ready_now(config.fire_cooldown),
    }
}

/// Lay out `rows × cols` enemies row by row, starting at `origin`.  Each one
/// gets its own cooldown drawn from `initial_cooldown`, counting from `now`.
pub fn spawn_enemy_grid(config: &EnemyConfig, now: f64, rng: &mut impl Rng) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(config.rows as usize * config.cols as usize);
    for row in 0..config.rows {
        for col in 0..config.cols {
            let pos = config.origin + config.spacing * Vec2::new(col as f32, row as f32);
            let cooldown = config.initial_cooldown.sample(rng);
            enemies.push(Enemy {
                body: Body::at(pos),
                gate: FireGate::armed_at(cooldown, now),
            });
        }
    }
    enemies
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Shift the ship by one step per held direction.  Left and right together
/// cancel out.  With `world` given, x is clamped to `[0, world.width]`.
pub fn update_ship(ship: &mut Ship, input: &InputState, world: Option<&WorldConfig>) {
    if input.left {
        ship.body.pos.x -= ship.speed;
    }
    if input.right {
        ship.body.pos.x += ship.speed;
    }
    if let Some(world) = world {
        ship.body.pos.x = ship.body.pos.x.clamp(0.0, world.width);
    }
}

pub fn advance_projectile(projectile: &mut Projectile) {
    projectile.body.pos += projectile.body.vel;
}

/// Drop projectiles that have left the world rectangle grown by `margin`.
/// Returns how many were dropped.
pub fn cull_offscreen(projectiles: &mut Vec<Projectile>, world: &WorldConfig, margin: f32) -> usize {
    let before = projectiles.len();
    projectiles.retain(|p| {
        let Vec2 { x, y } = p.body.pos;
        x >= -margin && x <= world.width + margin && y >= -margin && y <= world.height + margin
    });
    before - projectiles.len()
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Open the gate if its cooldown has elapsed since the last shot.  On
/// success the window restarts at `now`.
pub fn try_fire(gate: &mut FireGate, now: f64) -> bool {
    let ready = match gate.last_shot {
        None => true,
        Some(last) => now - last >= gate.cooldown,
    };
    if ready {
        gate.last_shot = Some(now);
    }
    ready
}

/// A player projectile at the ship's position, or `None` while cooling down.
pub fn ship_shoot(ship: &mut Ship, now: f64, projectile_speed: f32) -> Option<Projectile> {
    if !try_fire(&mut ship.gate, now) {
        return None;
    }
    Some(Projectile::player(ship.body.pos, projectile_speed))
}

/// An enemy projectile at the enemy's position, or `None` while cooling down.
/// A successful shot re-draws the enemy's cooldown from `reload`.
pub fn enemy_shoot(
    enemy: &mut Enemy,
    now: f64,
    projectile_speed: f32,
    reload: &CooldownRange,
    rng: &mut impl Rng,
) -> Option<Projectile> {
    if !try_fire(&mut enemy.gate, now) {
        return None;
    }
    enemy.gate.cooldown = reload.sample(rng);
    Some(Projectile::enemy(enemy.body.pos, projectile_speed))
}

// ── Targeting ────────────────────────────────────────────────────────────────

/// Indices of the enemy closest to the player (largest y) in each column.
///
/// Columns are exact x values, listed in order of first appearance.  On a y
/// tie within a column the earlier enemy wins.
pub fn select_frontline(enemies: &[Enemy]) -> Vec<usize> {
    // (column x, index of current front enemy)
    let mut columns: Vec<(f32, usize)> = Vec::new();
    for (i, enemy) in enemies.iter().enumerate() {
        let pos = enemy.body.pos;
        match columns.iter_mut().find(|(x, _)| *x == pos.x) {
            Some((_, front)) => {
                if pos.y > enemies[*front].body.pos.y {
                    *front = i;
                }
            }
            None => columns.push((pos.x, i)),
        }
    }
    columns.into_iter().map(|(_, i)| i).collect()
}

/// Pick one frontline enemy uniformly at random.
pub fn pick_shooter(enemies: &[Enemy], rng: &mut impl Rng) -> Option<usize> {
    let front = select_frontline(enemies);
    if front.is_empty() {
        return None;
    }
    Some(front[rng.gen_range(0..front.len())])
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Remove every enemy that has a projectile strictly within `radius`, along
/// with that projectile.
///
/// Enemies are visited in order and each takes the first live projectile in
/// range; a consumed projectile is not offered to later enemies.  Returns the
/// number of pairs removed.
pub fn resolve_collisions(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut Vec<Enemy>,
    radius: f32,
) -> usize {
    let mut used = vec![false; projectiles.len()];
    let mut killed = vec![false; enemies.len()];

    for (ei, enemy) in enemies.iter().enumerate() {
        let hit = projectiles
            .iter()
            .enumerate()
            .position(|(pi, p)| !used[pi] && p.body.pos.distance(enemy.body.pos) < radius);
        if let Some(pi) = hit {
            used[pi] = true;
            killed[ei] = true;
            debug!(x = enemy.body.pos.x, y = enemy.body.pos.y, "enemy destroyed");
        }
    }

    let mut used = used.into_iter();
    projectiles.retain(|_| !used.next().unwrap_or(false));
    let mut killed_iter = killed.iter();
    enemies.retain(|_| !killed_iter.next().copied().unwrap_or(false));

    killed.iter().filter(|k| **k).count()
}
