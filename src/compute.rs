/// Ship control and the collision predicates shared by every handler.
///
/// Handlers take the world by `&mut` and draw through the injected
/// [`Board`]; all randomness lives elsewhere, so everything here is
/// deterministic.

use std::time::Duration;

use crate::board::{Board, InputSample};
use crate::config::{
    SHIP_INTERVAL_MIN, SHIP_INTERVAL_SPAN, SHIP_MAX_X, SHIP_MAX_Y, SHIP_MIN_X, SHIP_MIN_Y,
    SHIP_OFFSET,
};
use crate::entities::{Entity, Ship, World};
use crate::sprites::{self, SPACESHIP};

// ── Collision predicates ──────────────────────────────────────────────────────

/// Ship and entity share a column and their vertical spans overlap.
pub fn ship_touches(ship: &Ship, entity: &Entity) -> bool {
    let (top, bottom) = entity.span();
    ship.x == entity.x && ship.y + SHIP_OFFSET >= top && ship.y - SHIP_OFFSET <= bottom
}

/// Erase the ship and take a life if it is not already down.
pub fn crash_ship<B: Board + ?Sized>(world: &mut World, board: &mut B) {
    if world.kill_ship() {
        sprites::paint(board, world.ship.x, world.ship.y, SPACESHIP, false);
    }
}

// ── Ship movement ─────────────────────────────────────────────────────────────

/// Ship tick interval for a speed-knob reading.
pub fn ship_interval(input: &InputSample) -> Duration {
    let span = SHIP_INTERVAL_SPAN.as_millis() as f32 * input.speed.clamp(0.0, 1.0);
    SHIP_INTERVAL_MIN + Duration::from_millis(span.round() as u64)
}

/// Move the ship one pixel per active axis, staying inside the play
/// area, then check whether it flew into anything.
pub fn steer_ship<B: Board + ?Sized>(world: &mut World, board: &mut B, input: &InputSample) {
    let ship = &mut world.ship;
    sprites::paint(board, ship.x, ship.y, SPACESHIP, false);

    if input.down() && ship.y < SHIP_MAX_Y {
        ship.y += 1;
    }
    if input.up() && ship.y > SHIP_MIN_Y {
        ship.y -= 1;
    }
    if input.right() && ship.x < SHIP_MAX_X {
        ship.x += 1;
    }
    if input.left() && ship.x > SHIP_MIN_X {
        ship.x -= 1;
    }
    ship.x = ship.x.clamp(SHIP_MIN_X, SHIP_MAX_X);
    ship.y = ship.y.clamp(SHIP_MIN_Y, SHIP_MAX_Y);

    sprites::paint(board, ship.x, ship.y, SPACESHIP, true);

    if !world.ship.alive {
        return;
    }
    let ticks = world.phase_ticks;
    let hit = world
        .registry
        .slots()
        .iter()
        .any(|e| e.is_active(ticks) && ship_touches(&world.ship, e));
    if hit {
        crash_ship(world, board);
    }
}
