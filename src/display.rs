//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and a read-only view of the
//! simulation.  No game logic is performed; this module only translates
//! sprites from world units into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::config::GameConfig;
use space_invaders::entities::{AssetId, Sprite};
use space_invaders::simulation::{CombatSimulation, SimStats};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_SHIP: Color = Color::White;
const C_ALIEN: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn colour(asset: AssetId) -> Color {
    match asset {
        AssetId::Ship => C_SHIP,
        AssetId::Alien => C_ALIEN,
        AssetId::PlayerBullet => C_BULLET_PLAYER,
        AssetId::EnemyBullet => C_BULLET_ENEMY,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into a `width × height` terminal.
pub fn render<W: Write>(
    out: &mut W,
    sim: &CombatSimulation,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, &sim.stats(), width)?;

    let config = sim.config();
    for sprite in sim.render() {
        draw_sprite(out, &sprite, config, width, height)?;
    }

    draw_controls_hint(out, height)?;

    if sim.is_cleared() {
        draw_wave_cleared(out, &sim.stats(), width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Map a world position onto the play area (inside the border, rows
/// 2 ..= height-3).  Positions on the far edge of the world land in the last
/// cell; anything outside the world is `None`.
pub fn to_cell(sprite: &Sprite, config: &GameConfig, width: u16, height: u16) -> Option<(u16, u16)> {
    let cols = width.saturating_sub(2);
    let rows = height.saturating_sub(4);
    let fx = sprite.pos.x / config.world.width;
    let fy = sprite.pos.y / config.world.height;
    if cols == 0 || rows == 0 || !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
        return None;
    }
    let col = ((fx * cols as f32) as u16).min(cols - 1);
    let row = ((fy * rows as f32) as u16).min(rows - 1);
    Some((1 + col, 2 + row))
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, stats: &SimStats, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Kills:{:>4}", stats.kills)))?;

    let right = format!(
        "Aliens:{:>3}  Shots:{:>4}",
        stats.enemies_left, stats.player_shots
    );
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&right))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    config: &GameConfig,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let Some((col, row)) = to_cell(sprite, config, width, height) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(colour(sprite.asset)))?;
    out.queue(Print(config.assets.glyph(sprite.asset)))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Wave-cleared overlay ──────────────────────────────────────────────────────

fn draw_wave_cleared<W: Write>(
    out: &mut W,
    stats: &SimStats,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines: [(String, Color); 5] = [
        ("╔════════════════════╗".to_string(), Color::Green),
        ("║   WAVE  CLEARED    ║".to_string(), Color::Green),
        ("╚════════════════════╝".to_string(), Color::Green),
        (format!("Shots fired: {:>6}", stats.player_shots), Color::Yellow),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
