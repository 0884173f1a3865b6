/// Boss behavior.
///
/// The boss spans the whole registry: the driver slot holds the boss
/// centre and its collision envelope, every other slot is a gun port
/// pinned to the driver by a fixed offset. Each slot is one hit point.
/// The driver slides in to a docking column, then bobs between two rows
/// until every slot is shot away, after which it sinks off the bottom.

use crate::board::Board;
use crate::compute::{crash_ship, ship_touches};
use crate::config::{
    Phase, BOSS_DOCK_X, BOSS_GONE_Y, BOSS_HIGH_Y, BOSS_LOW_Y, BOSS_SPAWN_X, BOSS_SPAWN_Y,
    BULLET_INTERVAL,
};
use crate::entities::{BossMotion, Entity, Outcome, World};
use crate::scheduler::{Timer, Timers};
use crate::sprites;

pub fn spawn(world: &mut World, phase: &Phase, driver: usize, timers: &mut Timers) {
    world.phase_entered = true;
    world.phase_ticks = 0;
    world.boss = BossMotion::Approach;
    world.registry.fill(phase.capacity, |i| {
        let mut slot = Entity {
            alive: true,
            cutoff: i32::MIN,
            clear_on_death: false,
            ..Entity::default()
        };
        if i == driver {
            slot.x = BOSS_SPAWN_X;
            slot.y = BOSS_SPAWN_Y;
            slot.extents = phase.half_extents;
        }
        slot
    });
    pin_gun_ports(world, phase, driver);

    if phase.can_shoot {
        timers.arm(Timer::EnemyBullet, BULLET_INTERVAL);
    }
    tracing::info!(phase = phase.name, hit_points = phase.capacity, "boss spawned");
}

/// Next motion state after the driver reached (`x`, `y`).
pub fn next_motion(motion: BossMotion, x: i32, y: i32) -> BossMotion {
    match motion {
        BossMotion::Approach if x <= BOSS_DOCK_X => BossMotion::Descend,
        BossMotion::Descend if y >= BOSS_LOW_Y => BossMotion::Ascend,
        BossMotion::Ascend if y <= BOSS_HIGH_Y => BossMotion::Descend,
        other => other,
    }
}

pub fn tick<B>(world: &mut World, board: &mut B, phase: &Phase, driver: usize, timers: &mut Timers)
where
    B: Board + ?Sized,
{
    if !world.phase_entered {
        spawn(world, phase, driver, timers);
    }
    world.phase_ticks += 1;

    if world.boss != BossMotion::DeathDescent && !world.registry.any_alive() {
        tracing::info!("boss destroyed");
        world.boss = BossMotion::DeathDescent;
    }

    let Some(&core) = world.registry.get(driver) else {
        return;
    };
    sprites::paint(board, core.x, core.y, phase.sprite, false);

    if world.boss == BossMotion::DeathDescent {
        if core.y >= BOSS_GONE_Y {
            world.request_transition(Outcome::PhaseCleared);
            finish(world, phase, timers);
        } else {
            let y = core.y + 1;
            if let Some(slot) = world.registry.get_mut(driver) {
                slot.y = y;
            }
            sprites::paint(board, core.x, y, phase.sprite, true);
        }
        return;
    }

    let (mut x, mut y) = (core.x, core.y);
    match world.boss {
        BossMotion::Approach => x -= 1,
        BossMotion::Descend => y += 1,
        BossMotion::Ascend => y -= 1,
        BossMotion::DeathDescent => {}
    }
    world.boss = next_motion(world.boss, x, y);

    let moved = Entity { x, y, ..core };
    if let Some(slot) = world.registry.get_mut(driver) {
        *slot = moved;
    }

    if world.ship.alive && ship_touches(&world.ship, &moved) {
        crash_ship(world, board);
    } else {
        sprites::paint(board, x, y, phase.sprite, true);
    }
    pin_gun_ports(world, phase, driver);

    if !world.ship.alive {
        world.request_transition(Outcome::ShipDestroyed);
        finish(world, phase, timers);
    }
}

/// Move every gun port to the driver position plus its offset.
fn pin_gun_ports(world: &mut World, phase: &Phase, driver: usize) {
    let Some(&core) = world.registry.get(driver) else {
        return;
    };
    for (i, slot) in world.registry.slots_mut().iter_mut().enumerate() {
        if i == driver {
            continue;
        }
        if let Some(offset) = phase.shot_offsets.get(i) {
            slot.x = core.x + offset.x;
            slot.y = core.y + offset.y;
        }
    }
}

fn finish(world: &mut World, phase: &Phase, timers: &mut Timers) {
    world.phase_entered = false;
    world.phase_ticks = 0;
    world.boss = BossMotion::default();
    if phase.can_shoot {
        timers.detach(Timer::EnemyBullet);
    }
}
