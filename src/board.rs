/// Hardware boundary: the panel the core draws on and the controls it
/// reads. The core only writes pixels and never reads them back.

use crate::config::{AXIS_HIGH, AXIS_LOW, HEIGHT, WIDTH};

pub trait Board {
    fn set_pixel(&mut self, x: i32, y: i32);
    fn clear_pixel(&mut self, x: i32, y: i32);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    /// Blank the whole panel.
    fn clear(&mut self);
    /// Push buffered pixels to the panel.
    fn flush(&mut self);
    /// HUD text. Formatting is the board's business; the core hands over
    /// the numbers.
    fn show_status(&mut self, score: u32, lives: u32);
    fn show_end_screen(&mut self, score: u32);
    /// Low-lives warning light.
    fn set_low_lives(&mut self, on: bool);
}

/// One reading of the analog inputs, each normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSample {
    pub x: f32,
    pub y: f32,
    /// Speed knob. Higher is a longer ship tick, i.e. slower.
    pub speed: f32,
}

impl InputSample {
    /// Stick centred, knob at its fastest.
    pub const NEUTRAL: InputSample = InputSample { x: 0.5, y: 0.5, speed: 0.0 };

    pub fn left(&self) -> bool {
        self.x < AXIS_LOW
    }

    pub fn right(&self) -> bool {
        self.x > AXIS_HIGH
    }

    pub fn up(&self) -> bool {
        self.y < AXIS_LOW
    }

    pub fn down(&self) -> bool {
        self.y > AXIS_HIGH
    }
}

pub trait Controls {
    fn sample(&self) -> InputSample;
}

impl Controls for InputSample {
    fn sample(&self) -> InputSample {
        *self
    }
}

// ── In-memory panel ───────────────────────────────────────────────────────────

/// An 84×48 one-bit frame buffer. Writes outside the panel are dropped,
/// which is how sprites slide off the edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<bool>,
    pub score: u32,
    pub lives: u32,
    pub end_screen: Option<u32>,
    pub low_lives: bool,
    pub flushes: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; (WIDTH * HEIGHT) as usize],
            score: 0,
            lives: 0,
            end_screen: None,
            low_lives: false,
            flushes: 0,
        }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y) {
            Some((y * WIDTH + x) as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).map(|i| self.pixels[i]).unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    fn put(&mut self, x: i32, y: i32, on: bool) {
        if let Some(i) = Self::index(x, y) {
            self.pixels[i] = on;
        }
    }
}

impl Board for FrameBuffer {
    fn set_pixel(&mut self, x: i32, y: i32) {
        self.put(x, y, true);
    }

    fn clear_pixel(&mut self, x: i32, y: i32) {
        self.put(x, y, false);
    }

    /// Bresenham, endpoints inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.put(x, y, true);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn show_status(&mut self, score: u32, lives: u32) {
        self.score = score;
        self.lives = lives;
    }

    fn show_end_screen(&mut self, score: u32) {
        self.end_screen = Some(score);
    }

    fn set_low_lives(&mut self, on: bool) {
        self.low_lives = on;
    }
}
