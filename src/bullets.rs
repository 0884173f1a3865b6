/// Player and enemy projectiles.
///
/// Both kinds move one pixel per bullet tick, drawing a trail that grows
/// to [`TRAIL_CAP`] pixels. Once a bullet reaches its far edge the trail
/// retracts a pixel per tick until the length is back to zero, at which
/// point the bullet is idle again.

use rand::Rng;

use crate::board::Board;
use crate::compute::crash_ship;
use crate::config::{Phase, BULLET_INTERVAL, ENEMY_FIRE_ODDS, MUZZLE, SHIP_OFFSET, TRAIL_CAP, WIDTH};
use crate::entities::{PlayerBullet, World};
use crate::scheduler::{Timer, Timers};
use crate::sprites;

/// Leftmost column an enemy bullet still occupies before retracting.
const ENEMY_EDGE: i32 = -1;

// ── Player bullet ─────────────────────────────────────────────────────────────

/// Launch a bullet from the ship's muzzle. Rejected while one is already
/// in flight. An accepted shot takes its first step immediately.
pub fn fire<B>(world: &mut World, board: &mut B, phase: &Phase, timers: &mut Timers) -> bool
where
    B: Board + ?Sized,
{
    if world.bullet.in_flight() {
        tracing::debug!("fire rejected, bullet in flight");
        return false;
    }
    world.bullet = PlayerBullet {
        x: world.ship.x + MUZZLE.x,
        y: world.ship.y + MUZZLE.y,
        length: 0,
    };
    step_player(world, board, phase, timers);
    true
}

/// Bullet-timer tick. Does nothing while idle.
pub fn advance_player<B>(world: &mut World, board: &mut B, phase: &Phase, timers: &mut Timers)
where
    B: Board + ?Sized,
{
    if !world.bullet.in_flight() {
        timers.detach(Timer::PlayerBullet);
        return;
    }
    step_player(world, board, phase, timers);
}

fn step_player<B>(world: &mut World, board: &mut B, phase: &Phase, timers: &mut Timers)
where
    B: Board + ?Sized,
{
    let b = &mut world.bullet;
    if b.x < WIDTH {
        board.set_pixel(b.x, b.y);
    }
    if b.length == TRAIL_CAP || b.x >= WIDTH {
        board.clear_pixel(b.x - b.length as i32, b.y);
        if b.x >= WIDTH {
            b.length = b.length.saturating_sub(1);
        }
    } else {
        b.length += 1;
    }

    if b.x < WIDTH {
        b.x += 1;
        resolve_player_hits(world, board, phase);
    }

    if world.bullet.in_flight() {
        timers.arm(Timer::PlayerBullet, BULLET_INTERVAL);
    } else {
        world.bullet = PlayerBullet::default();
        timers.detach(Timer::PlayerBullet);
    }
}

/// Test the bullet head against every live entity and every enemy bullet
/// in its row. A column either side of the target counts, since both
/// sides move a pixel on the same tick.
fn resolve_player_hits<B: Board + ?Sized>(world: &mut World, board: &mut B, phase: &Phase) {
    let (bx, by) = (world.bullet.x, world.bullet.y);
    let ticks = world.phase_ticks;

    for i in 0..world.registry.capacity() {
        let entity = world.registry.slots()[i];

        let (top, bottom) = entity.span();
        if entity.is_active(ticks)
            && (top..=bottom).contains(&by)
            && (bx == entity.x || bx == entity.x + 1)
        {
            world.registry.retire(i, board);
            world.score += phase.score_value;
            world.bullet.erase_trail(board);
            world.bullet.length = 0;
            if entity.clear_on_death {
                sprites::paint(board, entity.x, entity.y, phase.sprite, false);
            }
            tracing::debug!(
                slot = i,
                score = world.score,
                live = world.registry.live(),
                "entity destroyed"
            );
            return;
        }

        let enemy = entity.bullet;
        if enemy.active && by == enemy.y && (bx == enemy.x || bx == enemy.x + 1) {
            world.bullet.erase_trail(board);
            enemy.erase_trail(board);
            world.bullet.length = 0;
            world.registry.slots_mut()[i].bullet.reset();
            tracing::debug!(slot = i, "bullets collided");
            return;
        }
    }
}

// ── Enemy bullets ─────────────────────────────────────────────────────────────

/// Shared enemy-bullet tick: maybe arm idle guns, then move every bullet
/// in flight and test it against the ship.
pub fn advance_enemies<B, R>(world: &mut World, board: &mut B, rng: &mut R, timers: &mut Timers)
where
    B: Board + ?Sized,
    R: Rng,
{
    let ticks = world.phase_ticks;

    for i in 0..world.registry.capacity() {
        let live = world.registry.live();
        let entity = world.registry.slots()[i];
        let mut b = entity.bullet;

        if !b.active && entity.is_active(ticks) && live > 0 && rng.gen_ratio(1, ENEMY_FIRE_ODDS) {
            b.active = true;
            b.length = 0;
        }
        if !b.active {
            continue;
        }

        if b.length == 0 {
            b.x = entity.x;
            b.y = entity.y;
        }
        if b.x > ENEMY_EDGE {
            board.set_pixel(b.x, b.y);
        }
        if b.length == TRAIL_CAP || b.x <= ENEMY_EDGE {
            board.clear_pixel(b.x + b.length as i32, b.y);
            if b.x <= ENEMY_EDGE {
                b.length = b.length.saturating_sub(1);
            }
        } else {
            b.length += 1;
        }

        if b.x > ENEMY_EDGE {
            b.x -= 1;
            let ship = world.ship;
            if ship.alive
                && (ship.y - SHIP_OFFSET..=ship.y + SHIP_OFFSET).contains(&b.y)
                && (b.x == ship.x || b.x == ship.x - 1)
            {
                b.erase_trail(board);
                b.length = 0;
                tracing::debug!(slot = i, "enemy bullet hit ship");
                crash_ship(world, board);
            }
        }

        if b.length == 0 {
            b.reset();
        }
        world.registry.slots_mut()[i].bullet = b;
    }

    timers.arm(Timer::EnemyBullet, BULLET_INTERVAL);
}
