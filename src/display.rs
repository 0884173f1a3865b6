/// Terminal panel. All terminal I/O lives here.
///
/// The engine draws into an in-memory [`FrameBuffer`]; on `flush` this
/// module paints the play area with half-block glyphs (two pixel rows per
/// terminal row), throttled to the frame rate. No game logic here.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use pixel_raider::config::{HEIGHT, HUD_LINE_Y, WIDTH};
use pixel_raider::{Board, FrameBuffer};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PIXEL: Color = Color::White;
const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_LED_OK: Color = Color::Green;
const C_LED_LOW: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Terminal rows used by the play area (pixel rows below the HUD line).
const PLAY_TOP: i32 = HUD_LINE_Y;
const PLAY_ROWS: u16 = ((HEIGHT - PLAY_TOP + 1) / 2) as u16;

pub struct TerminalBoard<W: Write> {
    out: W,
    fb: FrameBuffer,
    last_draw: Option<Instant>,
    error: Option<io::Error>,
}

impl<W: Write> TerminalBoard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fb: FrameBuffer::new(),
            last_draw: None,
            error: None,
        }
    }

    /// First I/O failure seen while drawing, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Draw the current buffer now, ignoring the frame throttle.
    pub fn render(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_hud()?;
        self.draw_border()?;
        self.draw_pixels()?;
        if let Some(score) = self.fb.end_screen {
            self.draw_game_over(score)?;
        }
        self.draw_controls_hint()?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, PLAY_ROWS + 3))?;
        self.out.flush()?;
        self.last_draw = Some(Instant::now());
        Ok(())
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!("Sc:{:>3}", self.fb.score)))?;

        self.out.queue(cursor::MoveTo(WIDTH as u16 / 2, 0))?;
        self.out.queue(Print(format!("Lives:{}", self.fb.lives)))?;

        let led = if self.fb.low_lives { C_LED_LOW } else { C_LED_OK };
        self.out.queue(cursor::MoveTo(WIDTH as u16 - 1, 0))?;
        self.out.queue(style::SetForegroundColor(led))?;
        self.out.queue(Print("●"))?;
        Ok(())
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> io::Result<()> {
        let w = WIDTH as usize;
        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
        self.out.queue(cursor::MoveTo(0, PLAY_ROWS + 2))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;
        for row in 2..PLAY_ROWS + 2 {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(WIDTH as u16 + 1, row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    // ── Play area ─────────────────────────────────────────────────────────────

    fn draw_pixels(&mut self) -> io::Result<()> {
        self.out.queue(style::SetForegroundColor(C_PIXEL))?;
        for row in 0..PLAY_ROWS {
            let top = PLAY_TOP + 1 + row as i32 * 2;
            let line: String = (0..WIDTH)
                .map(|x| match (self.fb.pixel(x, top), self.fb.pixel(x, top + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            self.out.queue(cursor::MoveTo(1, row + 2))?;
            self.out.queue(Print(line))?;
        }
        Ok(())
    }

    // ── Game-over overlay ─────────────────────────────────────────────────────

    fn draw_game_over(&mut self, score: u32) -> io::Result<()> {
        let score_line = format!("Score: {:>3}", score);
        let lines: &[(&str, Color)] = &[
            ("╔══════════════════╗", Color::Red),
            ("║    GAME  OVER    ║", Color::Red),
            ("╚══════════════════╝", Color::Red),
            (&score_line, Color::Yellow),
        ];

        let cx = WIDTH as u16 / 2 + 1;
        let start_row = (PLAY_ROWS / 2).saturating_sub(lines.len() as u16 / 2) + 2;
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(*msg))?;
        }
        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, PLAY_ROWS + 3))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        let hint = if self.fb.end_screen.is_some() {
            "Q : Quit"
        } else {
            "← ↑ → ↓ / WASD : Move   + - : Speed   SPACE : Shoot   Q : Quit"
        };
        self.out.queue(Print(hint))?;
        Ok(())
    }
}

impl<W: Write> Board for TerminalBoard<W> {
    fn set_pixel(&mut self, x: i32, y: i32) {
        self.fb.set_pixel(x, y);
    }

    fn clear_pixel(&mut self, x: i32, y: i32) {
        self.fb.clear_pixel(x, y);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.fb.draw_line(x0, y0, x1, y1);
    }

    fn clear(&mut self) {
        self.fb.clear();
    }

    fn flush(&mut self) {
        self.fb.flush();
        let due = self.last_draw.map_or(true, |t| t.elapsed() >= FRAME);
        if due {
            let result = self.render();
            self.record(result);
        }
    }

    fn show_status(&mut self, score: u32, lives: u32) {
        self.fb.show_status(score, lives);
    }

    fn show_end_screen(&mut self, score: u32) {
        self.fb.show_end_screen(score);
        let result = self.render();
        self.record(result);
    }

    fn set_low_lives(&mut self, on: bool) {
        self.fb.set_low_lives(on);
    }
}
