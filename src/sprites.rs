/// Static point-list artwork. Pure data, no logic.
///
/// Every sprite is a list of pixel offsets from an anchor point. Painting
/// a sprite sets (or clears) each offset relative to the anchor.

use crate::board::Board;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

const fn p(x: i32, y: i32) -> Point {
    Point { x, y }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite(pub &'static [Point]);

impl Sprite {
    pub const EMPTY: Sprite = Sprite(&[]);

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &'static [Point] {
        self.0
    }
}

/// Set or clear every pixel of `sprite` anchored at (`x`, `y`).
pub fn paint<B: Board + ?Sized>(board: &mut B, x: i32, y: i32, sprite: Sprite, on: bool) {
    for pt in sprite.points() {
        if on {
            board.set_pixel(x + pt.x, y + pt.y);
        } else {
            board.clear_pixel(x + pt.x, y + pt.y);
        }
    }
}

// ── Artwork ───────────────────────────────────────────────────────────────────

/// Player ship, nose pointing right. Spans ±3 pixels around the anchor.
pub const SPACESHIP: Sprite = Sprite(&[
    p(0, 0), p(-3, -3), p(-2, -2), p(-1, -2), p(-2, -1), p(-1, -1), p(-1, 0),
    p(-1, 1), p(-1, 2), p(-2, 1), p(-2, 2), p(-1, 2), p(-3, 3), p(0, -1),
    p(0, 1), p(1, 0), p(1, -1), p(1, 1), p(2, 0), p(3, 0),
]);

pub const ASTEROID: Sprite = Sprite(&[
    p(0, 0), p(-1, -1), p(0, -1), p(0, -2), p(1, -1), p(1, 0), p(2, 0),
    p(-1, 1), p(0, 1), p(0, 1), p(1, 1), p(1, 2),
]);

pub const ENEMY_SPACESHIP: Sprite = Sprite(&[
    p(0, 0), p(0, 1), p(0, -1), p(1, -2), p(1, 2), p(-1, 0),
]);

pub const BOSS: Sprite = Sprite(&[
    p(2, -4), p(3, -4), p(4, -4),
    p(-1, -3), p(0, -3), p(1, -3), p(2, -3), p(3, -3),
    p(-3, -2), p(-2, -2), p(-1, -2), p(0, -2), p(1, -2), p(2, -2), p(3, -2), p(4, -2), p(5, -2),
    p(-5, -1), p(-4, -1), p(-3, -1), p(-2, -1), p(-1, -1), p(0, -1), p(1, -1), p(2, -1), p(3, -1),
    p(-6, 0), p(-5, 0), p(-4, 0), p(-3, 0), p(-2, 0), p(-1, 0),
    p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(4, 0),
    p(-5, 1), p(-4, 1), p(-3, 1), p(-2, 1), p(-1, 1), p(0, 1), p(1, 1), p(2, 1), p(3, 1),
    p(-3, 2), p(-2, 2), p(-1, 2), p(0, 2), p(1, 2), p(2, 2), p(3, 2), p(4, 2), p(5, 2),
    p(-1, 3), p(0, 3), p(1, 3), p(2, 3), p(3, 3),
    p(2, 4), p(3, 4), p(4, 4),
]);

/// Gun ports on the boss hull, one per registry slot. The entry at the
/// driver slot is unused: the driver sits at the boss centre.
pub const BOSS_GUNS: &[Point] = &[
    p(2, -4), p(-1, -3), p(-4, -2), p(-5, -1), p(-6, 0), p(-5, 1), p(-4, 2), p(-1, 3), p(2, 4),
];
