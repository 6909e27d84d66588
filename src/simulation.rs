//! The per-frame combat step.
//!
//! `CombatSimulation` owns every entity.  The host calls `tick` once per frame
//! with the current input and time, then `render` to get a read-only snapshot
//! of what to draw.  Nothing here touches the terminal, the clock or a global
//! RNG; all of those come in as arguments.

use rand::Rng;
use tracing::{debug, info, trace};

use crate::compute::{
    advance_projectile, cull_offscreen, enemy_shoot, pick_shooter, resolve_collisions,
    ship_shoot, spawn_enemy_grid, spawn_ship, update_ship,
};
use crate::config::GameConfig;
use crate::entities::{AudioCue, Enemy, Entity, InputState, Projectile, Ship, Sprite};

/// Running totals, mostly for the HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    pub kills: u32,
    pub player_shots: u32,
    pub enemy_shots: u32,
    pub enemies_left: u32,
}

/// When the frontline is next allowed to shoot.
#[derive(Clone, Copy, Debug, PartialEq)]
struct VolleyTimer {
    last: f64,
    cooldown: f64,
}

#[derive(Clone, Debug)]
pub struct CombatSimulation {
    config: GameConfig,
    ship: Ship,
    enemies: Vec<Enemy>,
    player_shots: Vec<Projectile>,
    enemy_shots: Vec<Projectile>,
    volley: VolleyTimer,
    audio: Vec<AudioCue>,
    stats: SimStats,
}

impl CombatSimulation {
    /// Spawn the ship and the enemy grid.  `now` is the start time; enemy and
    /// volley cooldowns count from it.
    pub fn new(config: GameConfig, now: f64, rng: &mut impl Rng) -> Self {
        let ship = spawn_ship(&config.ship);
        let enemies = spawn_enemy_grid(&config.enemies, now, rng);
        let volley = VolleyTimer {
            last: now,
            cooldown: config.volley.initial_cooldown,
        };
        info!(
            enemies = enemies.len(),
            rows = config.enemies.rows,
            cols = config.enemies.cols,
            "combat simulation created"
        );
        let stats = SimStats {
            enemies_left: enemies.len() as u32,
            ..SimStats::default()
        };
        Self {
            config,
            ship,
            enemies,
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            volley,
            audio: Vec::new(),
            stats,
        }
    }

    /// Replace the spawned grid with a hand-placed formation.
    pub fn with_enemies(mut self, enemies: Vec<Enemy>) -> Self {
        self.enemies = enemies;
        self.stats.enemies_left = self.enemies.len() as u32;
        self
    }

    /// Advance one frame.
    pub fn tick(&mut self, input: &InputState, now: f64, rng: &mut impl Rng) {
        self.stats.ticks += 1;

        // ── 1. Ship ──────────────────────────────────────────────────────────
        let bounds = self.config.ship.clamp_to_world.then_some(&self.config.world);
        update_ship(&mut self.ship, input, bounds);

        // ── 2. Player fire ───────────────────────────────────────────────────
        if input.fire {
            self.fire_player(now);
        }

        // ── 3. Projectiles ───────────────────────────────────────────────────
        self.player_shots.iter_mut().for_each(advance_projectile);
        self.enemy_shots.iter_mut().for_each(advance_projectile);

        // ── 4. Enemy volley ──────────────────────────────────────────────────
        if now - self.volley.last >= self.volley.cooldown {
            self.fire_volley(now, rng);
        }

        // ── 5. Collisions ────────────────────────────────────────────────────
        let had_enemies = !self.enemies.is_empty();
        let kills = resolve_collisions(
            &mut self.player_shots,
            &mut self.enemies,
            self.config.collision_radius,
        );
        self.stats.kills += kills as u32;
        self.stats.enemies_left = self.enemies.len() as u32;
        if had_enemies && self.enemies.is_empty() {
            info!(ticks = self.stats.ticks, kills = self.stats.kills, "wave cleared");
        }

        // ── 6. Off-screen projectiles ────────────────────────────────────────
        if self.config.projectiles.cull_offscreen {
            let margin = self.config.projectiles.cull_margin;
            let dropped = cull_offscreen(&mut self.player_shots, &self.config.world, margin)
                + cull_offscreen(&mut self.enemy_shots, &self.config.world, margin);
            if dropped > 0 {
                trace!(dropped, "culled off-screen projectiles");
            }
        }

        trace!(
            tick = self.stats.ticks,
            player_shots = self.player_shots.len(),
            enemy_shots = self.enemy_shots.len(),
            enemies = self.enemies.len(),
            "tick done"
        );
    }

    /// Try to shoot from the ship.  Returns whether a projectile spawned; a
    /// shot also queues `AudioCue::PlayerShot`.
    pub fn fire_player(&mut self, now: f64) -> bool {
        match ship_shoot(&mut self.ship, now, self.config.projectiles.player_speed) {
            Some(projectile) => {
                self.player_shots.push(projectile);
                self.audio.push(AudioCue::PlayerShot);
                self.stats.player_shots += 1;
                true
            }
            None => false,
        }
    }

    fn fire_volley(&mut self, now: f64, rng: &mut impl Rng) {
        if let Some(i) = pick_shooter(&self.enemies, rng) {
            let shot = enemy_shoot(
                &mut self.enemies[i],
                now,
                self.config.projectiles.enemy_speed,
                &self.config.enemies.reload_cooldown,
                rng,
            );
            if let Some(projectile) = shot {
                let pos = projectile.body.pos;
                debug!(x = pos.x, y = pos.y, "enemy fired");
                self.enemy_shots.push(projectile);
                self.stats.enemy_shots += 1;
            }
        }
        // The timer restarts whether or not the chosen enemy was ready.
        self.volley.last = now;
        self.volley.cooldown = self.config.volley.reload_cooldown.sample(rng);
    }

    // ── Read-only views ──────────────────────────────────────────────────────

    /// Everything on screen, in draw order: ship, player projectiles, enemy
    /// projectiles, enemies.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        std::iter::once(Entity::Ship(&self.ship))
            .chain(self.player_shots.iter().map(Entity::PlayerProjectile))
            .chain(self.enemy_shots.iter().map(Entity::EnemyProjectile))
            .chain(self.enemies.iter().map(Entity::Enemy))
    }

    pub fn render(&self) -> Vec<Sprite> {
        self.entities().map(|e| e.sprite()).collect()
    }

    /// Take the audio cues queued since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio)
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn player_shots(&self) -> &[Projectile] {
        &self.player_shots
    }

    pub fn enemy_shots(&self) -> &[Projectile] {
        &self.enemy_shots
    }

    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty()
    }
}
