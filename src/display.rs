/// Terminal rendering of the arena, HUD and overlays.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use topdown_shooter::compute::hud;
use topdown_shooter::entities::{
    Direction, GameState, LifeIcon, Projectile, ProjectileKind, Wall,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::Red;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_ARROW: Color = Color::Magenta;
const C_WALL: Color = Color::DarkGrey;
const C_DOOR: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// Terminal cells are roughly twice as tall as they are wide.
const COLS_PER_UNIT: f32 = 4.0;
const ROWS_PER_UNIT: f32 = 2.0;

/// First terminal row of the play field (row 0 is the HUD, row 1 the border).
const TOP: u16 = 2;
const LEFT: u16 = 1;

// ── Coordinate mapping ────────────────────────────────────────────────────────

fn field_size(state: &GameState) -> (u16, u16) {
    let arena = state.config.arena;
    let cols = ((arena.half_width * 2.0 * COLS_PER_UNIT).round() as u16).saturating_add(1);
    let rows = ((arena.half_height * 2.0 * ROWS_PER_UNIT).round() as u16).saturating_add(1);
    (cols, rows)
}

fn to_cell(state: &GameState, pos: Vec2) -> (u16, u16) {
    let arena = state.config.arena;
    let col = ((pos.x + arena.half_width) * COLS_PER_UNIT).round().max(0.0) as u16;
    let row = ((arena.half_height - pos.y) * ROWS_PER_UNIT).round().max(0.0) as u16;
    (LEFT.saturating_add(col), TOP.saturating_add(row))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state)?;
    draw_hud(out, state)?;

    if let Some(level) = state.level.active() {
        for wall in &level.walls {
            draw_wall(out, state, wall)?;
        }
        if let Some(door) = &level.door {
            let (x, y) = to_cell(state, door.pos);
            out.queue(cursor::MoveTo(x, y))?;
            out.queue(style::SetForegroundColor(C_DOOR))?;
            out.queue(Print("▒"))?;
        }
    }

    for enemy in &state.enemies {
        let (x, y) = to_cell(state, enemy.pos);
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(style::SetForegroundColor(C_ENEMY))?;
        out.queue(Print("Ж"))?;
    }
    for projectile in &state.projectiles {
        draw_projectile(out, state, projectile)?;
    }

    draw_player(out, state)?;
    draw_controls_hint(out, state)?;

    if hud(state).paused {
        draw_pause(out, state)?;
    }

    // Park cursor in a harmless spot and flush
    let (_, rows) = field_size(state);
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, TOP + rows + 2))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (cols, rows) = field_size(state);
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(0, TOP + rows))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in TOP..TOP + rows {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(LEFT + cols, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let snapshot = hud(state);

    // Life icons on the left
    let hearts: String = snapshot
        .life_icons()
        .iter()
        .map(|icon| match icon {
            LifeIcon::Alive => '♥',
            LifeIcon::Dead => '♡',
        })
        .collect();
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&hearts))?;

    // Score and record
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "  Score: {:<5} Max: {:<5}",
        snapshot.score, snapshot.max_score
    )))?;

    // Level name on the right
    if let Some(level) = state.level.active() {
        let (cols, _) = field_size(state);
        let tag = format!("[ {} ]", level.name.to_uppercase());
        let x = (LEFT + cols).saturating_sub(tag.chars().count() as u16);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_BORDER))?;
        out.queue(Print(&tag))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_wall<W: Write>(out: &mut W, state: &GameState, wall: &Wall) -> std::io::Result<()> {
    // min is bottom-left in world space, which is the lower row on screen
    let (x0, y1) = to_cell(state, wall.min);
    let (x1, y0) = to_cell(state, wall.max);
    out.queue(style::SetForegroundColor(C_WALL))?;
    for row in y0..=y1 {
        out.queue(cursor::MoveTo(x0, row))?;
        out.queue(Print("█".repeat((x1 - x0 + 1) as usize)))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let glyph = match p.facing {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Left => "◀",
        Direction::Right => "▶",
    };
    let color = if p.hurt_until.is_some() {
        C_PLAYER_HURT
    } else {
        C_PLAYER
    };

    let (x, y) = to_cell(state, p.pos);
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    state: &GameState,
    projectile: &Projectile,
) -> std::io::Result<()> {
    let (x, y) = to_cell(state, projectile.pos);
    out.queue(cursor::MoveTo(x, y))?;
    match projectile.kind {
        ProjectileKind::Bullet => {
            out.queue(style::SetForegroundColor(C_BULLET))?;
            out.queue(Print("•"))?;
        }
        ProjectileKind::Arrow => {
            let glyph = match Direction::from_vector(projectile.dir) {
                Some(Direction::Up) => "↑",
                Some(Direction::Down) | None => "↓",
                Some(Direction::Left) => "←",
                Some(Direction::Right) => "→",
            };
            out.queue(style::SetForegroundColor(C_ARROW))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Controls hint (below the field) ───────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (_, rows) = field_size(state);
    out.queue(cursor::MoveTo(1, TOP + rows + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ / WASD : Move   SPACE : Shoot   X : Random shot   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Pause overlay ─────────────────────────────────────────────────────────────

fn draw_pause<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let lines: &[&str] = &[
        "╔════════════════════╗",
        "║       PAUSED       ║",
        "║  P - Resume        ║",
        "╚════════════════════╝",
    ];
    let (cols, rows) = field_size(state);
    let cx = LEFT + cols / 2;
    let start_row = (TOP + rows / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetForegroundColor(Color::Yellow))?;
    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
