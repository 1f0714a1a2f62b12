/// Rendering layer: all terminal I/O lives here.
///
/// The simulation draws through the `Surface` trait in logical coordinates.
/// `TerminalSurface` scales those onto the terminal grid with crossterm.
/// No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Entity, EntityState, Rgb, Session, BLACK, WHITE};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Rgb = WHITE;
const C_SCORE: Rgb = BLACK;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "Type the falling letters   ESC / Ctrl-C : Quit";

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Drawing target ────────────────────────────────────────────────────────────

/// Something text can be drawn onto, addressed in logical play-area pixels.
pub trait Surface {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) -> std::io::Result<()>;
}

impl Entity {
    /// Draw the trigger key while fading, the chosen text otherwise.
    pub fn render<S: Surface>(&self, surface: &mut S) -> std::io::Result<()> {
        let text = match self.state {
            EntityState::Fading => &self.trigger_key,
            _ => &self.display_text,
        };
        surface.draw_text(self.x, self.y, text, self.color)
    }
}

impl Session {
    pub fn render_score<S: Surface>(&self, surface: &mut S) -> std::io::Result<()> {
        let (x, y) = self.rules.score_pos();
        surface.draw_text(x, y, &self.score.to_string(), C_SCORE)
    }
}

// ── Terminal backend ──────────────────────────────────────────────────────────

pub struct TerminalSurface<W: Write> {
    out: W,
    /// Logical play-area size.
    width: i32,
    height: i32,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: i32, height: i32, cols: u16, rows: u16) -> Self {
        Self { out, width, height, cols, rows }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Map a logical point to a terminal cell, or `None` if it falls outside
    /// the grid. The last row is reserved for the controls hint.
    pub fn cell_for(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let play_rows = self.rows.saturating_sub(1) as i64;
        if x < 0 || y < 0 || self.width <= 0 || self.height <= 0 {
            return None;
        }
        let col = x as i64 * self.cols as i64 / self.width as i64;
        let row = y as i64 * play_rows / self.height as i64;
        if col >= self.cols as i64 || row >= play_rows {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Clear the screen to the background colour.
    pub fn begin_frame(&mut self) -> std::io::Result<()> {
        self.out.queue(style::SetBackgroundColor(to_color(C_BACKGROUND)))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    /// Draw the controls hint and flush the frame.
    pub fn present(&mut self) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(HINT))?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) -> std::io::Result<()> {
        let Some((col, row)) = self.cell_for(x, y) else {
            return Ok(());
        };
        // Clip long words at the right edge instead of wrapping.
        let room = (self.cols - col) as usize;
        let visible: String = text.chars().take(room).collect();

        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetBackgroundColor(to_color(C_BACKGROUND)))?;
        self.out.queue(style::SetForegroundColor(to_color(color)))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }
}
